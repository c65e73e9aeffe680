//! Framework-neutral WASM <-> JavaScript bridge for the outbreak engine.

use outbreak_core::{
    ClusterRegistry, EngineConfig, GeoPoint, OutbreakEngine, OutbreakError, SeededRandom,
};
use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

/// Options object accepted from JavaScript; every field is optional.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct JsEngineOptions {
    #[serde(default)]
    reference_point: Option<GeoPoint>,
    #[serde(default)]
    seed: Option<u32>,
    #[serde(default)]
    baseline_fraction: Option<f64>,
    #[serde(default)]
    deviation_threshold_percent: Option<f64>,
    #[serde(default)]
    confidence_cap: Option<f64>,
    #[serde(default)]
    registry: Option<serde_json::Value>,
}

impl JsEngineOptions {
    fn engine_config(&self) -> EngineConfig {
        let mut base = EngineConfig::default();
        if let Some(fraction) = self.baseline_fraction {
            base.baseline_fraction = fraction;
        }
        if let Some(threshold) = self.deviation_threshold_percent {
            base.deviation_threshold_percent = threshold;
        }
        if let Some(cap) = self.confidence_cap {
            base.confidence_cap = cap;
        }
        base
    }

    fn registry(&self) -> Result<ClusterRegistry, OutbreakError> {
        match &self.registry {
            Some(value) => outbreak_directory::load_registry_value(value),
            None => Ok(ClusterRegistry::default_clusters()),
        }
    }

    fn random_source(&self) -> SeededRandom {
        match self.seed {
            Some(seed) => SeededRandom::from_seed(u64::from(seed)),
            None => SeededRandom::from_entropy(),
        }
    }
}

/// Builds the processed-patient list, detected clusters and anomalies for `query`.
///
/// `population` is a directory export (array, or object with `patients`).
#[wasm_bindgen(js_name = analyzePopulation)]
pub fn analyze_population(
    population: JsValue,
    query: String,
    options: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let directory = from_value::<serde_json::Value>(population)
        .map_err(|err| JsValue::from_str(&format!("Could not read population JSON: {err}")))?;

    let options = match options {
        Some(js_options) => from_value::<JsEngineOptions>(js_options)
            .map_err(|err| JsValue::from_str(&format!("Could not read options: {err}")))?,
        None => JsEngineOptions::default(),
    };

    let population =
        outbreak_directory::load_population_value(&directory).map_err(format_outbreak_error)?;
    let registry = options.registry().map_err(format_outbreak_error)?;
    let engine =
        OutbreakEngine::new(registry, options.engine_config()).map_err(format_outbreak_error)?;

    let mut rng = options.random_source();
    let report = engine.analyze(&population, options.reference_point, &query, &mut rng);

    to_value(&report)
        .map_err(|err| JsValue::from_str(&format!("Could not serialize report: {err}")))
}

/// The built-in cluster table, for legends.
#[wasm_bindgen(js_name = defaultRegistry)]
pub fn default_registry() -> Result<JsValue, JsValue> {
    to_value(&ClusterRegistry::default_clusters())
        .map_err(|err| JsValue::from_str(&format!("Could not serialize registry: {err}")))
}

fn format_outbreak_error(err: OutbreakError) -> JsValue {
    JsValue::from_str(&format!("Outbreak engine error: {err}"))
}
