use std::fs;

use outbreak_core::{ClusterRegistry, EngineConfig, GeoPoint, OutbreakEngine, RandomSource};
use outbreak_directory::load_population_str;
use serde_json::Value;

/// Every draw lands mid-range so the fallback paths are exact.
struct MidpointRandom;

impl RandomSource for MidpointRandom {
    fn next_unit(&mut self) -> f64 {
        0.5
    }
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn clinic_population_matches_golden() {
    let directory = fs::read_to_string(fixture_path("clinic_population.json"))
        .expect("could not read population fixture");
    let population = load_population_str(&directory).expect("population should load");

    let engine = OutbreakEngine::new(ClusterRegistry::default_clusters(), EngineConfig::default())
        .expect("engine");
    let report = engine.analyze(
        &population,
        Some(GeoPoint::new(34.05, -118.25)),
        "Persistent COUGH with fever, some chest pain and a rash",
        &mut MidpointRandom,
    );

    let mut actual = serde_json::to_value(report).expect("could not serialize report");
    normalize_dynamic_fields(&mut actual);

    let expected = fs::read_to_string(fixture_path("clinic_report_golden.json"))
        .expect("could not read golden report");
    let mut expected_value: Value = serde_json::from_str(&expected).expect("golden is invalid");
    normalize_dynamic_fields(&mut expected_value);

    assert_eq!(actual, expected_value);
}

fn normalize_dynamic_fields(value: &mut Value) {
    if let Some(obj) = value.as_object_mut() {
        if obj.contains_key("generatedAt") {
            obj.insert(
                "generatedAt".to_string(),
                Value::String("__DYNAMIC_TIMESTAMP__".to_string()),
            );
        }
    }
}
