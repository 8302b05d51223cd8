// Example: Predicting heating and cooling loads for a GeoJSON file
// Requires a running prediction service (default http://localhost:5000)
//
//   cargo run --example predict_all -- buildings.geojson [endpoint]
use anyhow::{Context, Result};
use energymap::collect::http::HttpPredictionService;
use energymap::collect::prediction::{
    apply_predictions, PredictionService, COOLING_LOAD_PROPERTY, HEATING_LOAD_PROPERTY,
};
use energymap::commons::basic_functions::load_color;
use energymap::geometric::building::read_feature_collection;
use energymap::{BuildingCollection, EnergyMapConfig};

fn main() -> Result<()> {
    println!("=== Example: Predicting loads with /predict_all ===\n");

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .context("usage: predict_all <buildings.geojson> [endpoint]")?;

    let mut config = EnergyMapConfig::default();
    if let Some(endpoint) = args.next() {
        config.endpoint = endpoint;
    }

    let geojson_data = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path))?;
    let mut fc = read_feature_collection(&geojson_data)?;

    let collection = BuildingCollection::from_feature_collection(&fc, &config);
    println!("Buildings loaded: {}", collection.len());

    let service = HttpPredictionService::new(&config.endpoint)?;
    println!("Requesting predictions from {}", service.predict_all_url());
    let predictions = service.predict_all(&collection.records())?;

    let updated = apply_predictions(&mut fc, &predictions);
    println!("Buildings with predictions: {}\n", updated);

    for feature in &fc.features {
        let Some(props) = feature.properties.as_ref() else {
            continue;
        };
        let id = props.get("id").map(|v| v.to_string()).unwrap_or_default();
        let heating = props.get(HEATING_LOAD_PROPERTY).and_then(|v| v.as_f64());
        let cooling = props.get(COOLING_LOAD_PROPERTY).and_then(|v| v.as_f64());
        if let (Some(heating), Some(cooling)) = (heating, cooling) {
            println!(
                "  {}: heating {:.2} kWh ({}), cooling {:.2} kWh ({})",
                id,
                heating,
                load_color(heating),
                cooling,
                load_color(cooling)
            );
        }
    }

    Ok(())
}
