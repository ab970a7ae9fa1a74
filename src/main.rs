//! Batch entrypoint: read a traffic log and a model, write predictions and metrics.
//!
//! Usage: `attack-inference [--config FILE] [DATASET.csv] [MODEL.onnx]`. Paths not
//! given on the command line come from the JSON config.

use attack_inference::{
    config::PipelineConfig,
    dataset::Table,
    inference::InferencePipeline,
    logging::StructuredLogger,
    model::OnnxClassifier,
};
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(version, about = "Predict attack types for a network-traffic log")]
struct Cli {
    /// Traffic log CSV; overrides `dataset_path`
    #[arg(value_name = "DATASET")]
    dataset: Option<PathBuf>,
    /// ONNX classifier; overrides `model_path`
    #[arg(value_name = "MODEL")]
    model: Option<PathBuf>,
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "ATTACK_INFERENCE_CONFIG",
        default_value = "config.json"
    )]
    config: PathBuf,
}

fn run(config: &PipelineConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let raw = Table::from_csv_path(&config.dataset_path)?;
    info!(path = %config.dataset_path.display(), rows = raw.len(), "dataset read");

    let model = OnnxClassifier::load(&config.model_path, &config.manifest_path())?;
    let pipeline = InferencePipeline::new(config.features.clone());
    let output = pipeline.run(&raw, &model)?;

    std::fs::create_dir_all(&config.output_dir)?;
    let predictions_path = config.output_dir.join("predictions.csv");
    output
        .predictions
        .write_csv(BufWriter::new(File::create(&predictions_path)?))?;
    let metrics_path = config.output_dir.join("metrics.json");
    serde_json::to_writer_pretty(BufWriter::new(File::create(&metrics_path)?), &output.summary)?;
    info!(
        predictions = %predictions_path.display(),
        metrics = %metrics_path.display(),
        "results written"
    );

    StructuredLogger::emit_json(&output.metrics, &mut std::io::stdout().lock())?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let mut config = PipelineConfig::load(&cli.config);
    if let Some(dataset) = cli.dataset {
        config.dataset_path = dataset;
    }
    if let Some(model) = cli.model {
        config.model_path = model;
    }

    StructuredLogger::init(config.log.json, &config.log.level);
    info!(config = %cli.config.display(), "attack-inference starting");

    if let Err(e) = run(&config) {
        error!(error = %e, "run failed");
        std::process::exit(1);
    }
}
