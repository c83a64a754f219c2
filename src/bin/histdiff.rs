//! HistDiff command-line interface

use std::fs::File;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use histdiff_core::{BatchSource, BlockDefinition};
use histdiff_engine::{HistDiffConfig, HistDiffPipeline};
use histdiff_io::{write_scores, DelimitedSource, PlateMap};
use tracing::{info, warn};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

#[derive(Parser, Debug)]
#[command(name = "histdiff")]
#[command(about = "Per-well, per-feature HistDiff scores from cell-by-cell data")]
#[command(version)]
struct Cli {
    /// Cell-by-cell data, one row per cell
    #[arg(short, long)]
    input: PathBuf,

    /// Output CSV of scores
    #[arg(short, long)]
    output: PathBuf,

    /// Plate map CSV listing wells and reference controls
    #[arg(short, long, requires_all = ["reference_column", "well_location"])]
    controls_file: Option<PathBuf>,

    /// Plate-map column whose `REFERENCE` cells mark control wells
    #[arg(short, long)]
    reference_column: Option<String>,

    /// Plate-map column holding well locations
    #[arg(short, long)]
    well_location: Option<String>,

    /// Id column(s) of the cell data; several are joined with `_`
    #[arg(short = 'd', long = "index-column", required = true)]
    index_columns: Vec<String>,

    /// Field delimiter of the cell data
    #[arg(long, default_value = "\t")]
    delimiter: char,

    /// Bins per histogram
    #[arg(long)]
    nbins: Option<usize>,

    /// Rows read per batch
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Smoothing factor
    #[arg(long)]
    alpha: Option<f64>,

    /// Where to write features without any finite value
    #[arg(long)]
    problematic_out: Option<PathBuf>,

    /// Explicit blocks as a JSON array of well lists, e.g. '[["A1","A2"],["B1"]]'
    #[arg(long)]
    blocks: Option<String>,

    /// JSON run configuration; other flags override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,

    /// Shorthand for `--log-level debug`
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        cli.log_level
    };
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = build_config(&cli)?;
    let delimiter = u8::try_from(cli.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .with_context(|| format!("delimiter {:?} is not a single ASCII character", cli.delimiter))?;

    let source = DelimitedSource::builder(&cli.input)
        .delimiter(delimiter)
        .id_columns(cli.index_columns.iter().cloned())
        .chunk_size(config.chunk_size)
        .build()
        .with_context(|| format!("failed to open {}", cli.input.display()))?;
    info!(
        input = %cli.input.display(),
        features = source.feature_names().len(),
        "reading cell data"
    );

    let pipeline = HistDiffPipeline::new(config)?;
    let run = pipeline.run(&source)?;
    write_scores(&run.scores, &cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    info!(
        wells = run.scores.len(),
        features = run.scores.features().len(),
        excluded = run.ranges.problematic.len(),
        output = %cli.output.display(),
        "done"
    );
    Ok(())
}

fn build_config(cli: &Cli) -> Result<HistDiffConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open config {}", path.display()))?;
            serde_json::from_reader(file)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => HistDiffConfig::default(),
    };

    if let Some(path) = &cli.controls_file {
        let (Some(well_column), Some(reference_column)) =
            (&cli.well_location, &cli.reference_column)
        else {
            bail!("--controls-file needs --well-location and --reference-column");
        };
        let map = PlateMap::from_csv(path, well_column, reference_column)
            .with_context(|| format!("failed to read plate map {}", path.display()))?;
        config.plate = map.plate;
        config.controls = map.controls;
    }
    if config.controls.is_empty() {
        warn!("no control wells configured, every score will be zero");
    }

    if let Some(nbins) = cli.nbins {
        config.nbins = nbins;
    }
    if let Some(chunk_size) = cli.chunk_size {
        config.chunk_size = chunk_size;
    }
    if let Some(alpha) = cli.alpha {
        config.smoothing_alpha = alpha;
    }
    if let Some(path) = &cli.problematic_out {
        config.problematic_features_path = Some(path.clone());
    }
    if let Some(blocks) = &cli.blocks {
        let groups: Vec<Vec<String>> =
            serde_json::from_str(blocks).context("--blocks must be a JSON array of well lists")?;
        config.blocks = BlockDefinition::from_groups(groups);
    }

    config.validate()?;
    Ok(config)
}
