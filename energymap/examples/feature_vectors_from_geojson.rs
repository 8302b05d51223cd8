// Example: Building feature vectors from GeoJSON
// This example shows how to turn building footprints into prediction inputs
use anyhow::Result;
use energymap::geometric::building::BuildingCollection;
use energymap::EnergyMapConfig;

fn main() -> Result<()> {
    println!("=== Example: Feature vectors from GeoJSON ===\n");

    // Example GeoJSON FeatureCollection with several buildings
    let geojson_data = r#"
    {
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {
                    "id": "B-001",
                    "height": 15.5,
                    "stories": 5,
                    "BOC": "Government"
                },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[
                        [-79.3840, 43.6530],
                        [-79.3832, 43.6530],
                        [-79.3832, 43.6534],
                        [-79.3840, 43.6534],
                        [-79.3840, 43.6530]
                    ]]
                }
            },
            {
                "type": "Feature",
                "properties": {
                    "id": "B-002",
                    "height": 9.0,
                    "BOC": "Residential",
                    "Shape__Area": 420.0
                },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[
                        [-79.3830, 43.6530],
                        [-79.3824, 43.6530],
                        [-79.3824, 43.6532],
                        [-79.3827, 43.6532],
                        [-79.3827, 43.6536],
                        [-79.3830, 43.6536],
                        [-79.3830, 43.6530]
                    ]]
                }
            },
            {
                "type": "Feature",
                "properties": {
                    "num_floors": 2,
                    "occupancy": "Industrial"
                },
                "geometry": null
            }
        ]
    }
    "#;

    let config = EnergyMapConfig::default();
    let collection = BuildingCollection::from_geojson(geojson_data, &config)?;

    println!("Buildings loaded: {}", collection.len());
    println!("\nBuilding details:");
    for building in collection.buildings() {
        println!("  Building {}:", building.id);
        println!("    - Type: {}", building.building_type.model_name());
        println!("    - Shape: {}", building.shape.name());
        println!("    - Orientation: {:.1}°", building.orientation);
        println!("    - Height: {:.1} m, storeys: {}", building.height, building.stories);
        println!("    - Roof area: {:.2} m²", building.roof_area);
        println!("    - Wall area: {:.2} m²", building.wall_area);
        println!("    - Window area: {:.2} m²", building.window_area);
    }

    println!("\nTotal roof area: {:.2} m²", collection.total_roof_area());

    // Body of the /predict_all request
    println!("\nPrediction request:");
    println!("{}", serde_json::to_string_pretty(&collection.batch_request())?);

    Ok(())
}
