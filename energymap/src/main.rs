//! Command line front-end: build feature vectors for a GeoJSON file and
//! optionally run them through the prediction service.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use energymap::collect::http::HttpPredictionService;
use energymap::collect::prediction::{apply_predictions, PredictionService};
use energymap::geometric::building::read_feature_collection;
use energymap::{BuildingCollection, EnergyMapConfig};

#[derive(Parser)]
#[command(name = "energymap", about = "Building energy-load feature extraction")]
struct Cli {
    /// JSON config file; defaults apply for anything it leaves out
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the `/predict_all` payload for every building in a GeoJSON file
    Vectors {
        /// GeoJSON Feature or FeatureCollection
        input: PathBuf,
    },
    /// Predict loads for every building and write the annotated GeoJSON
    Predict {
        /// GeoJSON Feature or FeatureCollection
        input: PathBuf,
        /// Prediction service base URL (overrides the config)
        #[arg(long)]
        endpoint: Option<String>,
        /// Output file; stdout when omitted
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EnergyMapConfig::from_json_file(path)?,
        None => EnergyMapConfig::default(),
    };

    match cli.command {
        Commands::Vectors { input } => print_vectors(&input, &config),
        Commands::Predict {
            input,
            endpoint,
            output,
        } => predict(&input, endpoint, output.as_deref(), config),
    }
}

fn read_input(input: &Path) -> Result<String> {
    std::fs::read_to_string(input).with_context(|| format!("Failed to read GeoJSON file: {:?}", input))
}

fn print_vectors(input: &Path, config: &EnergyMapConfig) -> Result<()> {
    let geojson = read_input(input)?;
    let collection = BuildingCollection::from_geojson(&geojson, config)
        .with_context(|| format!("Failed to load buildings from {:?}", input))?;

    let payload = serde_json::to_string_pretty(&collection.batch_request())
        .context("Failed to serialize feature vectors")?;
    println!("{}", payload);
    Ok(())
}

fn predict(
    input: &Path,
    endpoint: Option<String>,
    output: Option<&Path>,
    mut config: EnergyMapConfig,
) -> Result<()> {
    if let Some(endpoint) = endpoint {
        config.endpoint = endpoint;
    }

    let geojson = read_input(input)?;
    let mut fc = read_feature_collection(&geojson)
        .with_context(|| format!("Failed to parse GeoJSON from {:?}", input))?;
    let collection = BuildingCollection::from_feature_collection(&fc, &config);

    let service = HttpPredictionService::new(&config.endpoint)
        .with_context(|| format!("Invalid prediction endpoint: {}", config.endpoint))?;
    let predictions = service
        .predict_all(&collection.records())
        .context("Failed to refresh predictions")?;

    let updated = apply_predictions(&mut fc, &predictions);
    log::info!("{} of {} buildings have predicted loads", updated, collection.len());

    let annotated = geojson::GeoJson::from(fc).to_string();
    match output {
        Some(path) => std::fs::write(path, annotated)
            .with_context(|| format!("Failed to write GeoJSON file: {:?}", path))?,
        None => println!("{}", annotated),
    }
    Ok(())
}
