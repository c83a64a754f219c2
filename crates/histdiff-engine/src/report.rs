//! Problematic-feature report

use std::path::Path;

use histdiff_core::{Error, Result};
use tracing::info;

use crate::range::ProblematicFeature;

/// Write one `<feature>,<reason>` line per excluded feature
///
/// The file is written even when nothing was excluded, so its presence
/// marks a completed range pass.
pub fn write_problematic_features(path: &Path, features: &[ProblematicFeature]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| Error::Other(e.into()))?;
    for feature in features {
        writer
            .write_record([feature.name.as_str(), feature.reason.tag()])
            .map_err(|e| Error::Other(e.into()))?;
    }
    writer.flush()?;
    info!(path = %path.display(), count = features.len(), "wrote problematic feature report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::ProblemReason;

    #[test]
    fn test_report_lines() {
        let path = std::env::temp_dir().join(format!(
            "histdiff_report_{}_problematicFeats.csv",
            std::process::id()
        ));
        let features = vec![
            ProblematicFeature {
                name: "Nuclei_Texture".to_string(),
                reason: ProblemReason::NoValues,
            },
            ProblematicFeature {
                name: "Cells_Area".to_string(),
                reason: ProblemReason::NoValues,
            },
        ];
        write_problematic_features(&path, &features).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(text, "Nuclei_Texture,noValues\nCells_Area,noValues\n");
    }
}
