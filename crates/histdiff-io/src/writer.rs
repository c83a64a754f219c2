//! Score matrix output

use std::io::Write;
use std::path::Path;

use histdiff_engine::ScoreMatrix;
use tracing::info;

use crate::error::Result;

/// Header of the id column in score files
pub const ID_HEADER: &str = "id";

/// Write scores as CSV: `id,<feature...>`, one row per well
pub fn write_scores_to<W: Write>(scores: &ScoreMatrix, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(scores.features().len() + 1);
    header.push(ID_HEADER);
    header.extend(scores.features().iter().map(String::as_str));
    writer.write_record(&header)?;

    for (entity, row) in scores.rows() {
        let mut record = Vec::with_capacity(row.len() + 1);
        record.push(entity.to_string());
        record.extend(row.iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write scores to a CSV file
pub fn write_scores(scores: &ScoreMatrix, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)?;
    write_scores_to(scores, file)?;
    info!(path = %path.display(), rows = scores.len(), "wrote scores");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let mut scores = ScoreMatrix::new(vec!["f1".to_string(), "f2".to_string()].into());
        scores.push_row("A2", vec![-0.3125, f64::NAN]).unwrap();
        scores.push_row("A1", vec![0.0, 1.5]).unwrap();

        let mut out = Vec::new();
        write_scores_to(&scores, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,f1,f2\nA2,-0.3125,NaN\nA1,0,1.5\n"
        );
    }
}
