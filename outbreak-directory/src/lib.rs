//! Patient directory and cluster registry JSON loaders.
//!
//! Directory exports are loosely typed: flags arrive as booleans, numbers or
//! "yes"/"no" strings, and fields may be missing entirely. Anything that cannot
//! be read as a set flag is treated as unset.

use outbreak_core::{Cluster, ClusterRegistry, OutbreakError, Patient};
use serde::Deserialize;
use serde_json::Value;

const UNKNOWN_NAME: &str = "Unknown patient";

/// Load a population from a JSON string.
pub fn load_population_str(directory_json: &str) -> Result<Vec<Patient>, OutbreakError> {
    let value: Value = serde_json::from_str(directory_json)
        .map_err(|err| OutbreakError::Parse(err.to_string()))?;
    load_population_value(&value)
}

/// Load a population from a `serde_json::Value`.
///
/// Accepts either a bare array of records or an object with a `patients` array.
pub fn load_population_value(directory: &Value) -> Result<Vec<Patient>, OutbreakError> {
    let records = match directory {
        Value::Array(records) => records,
        Value::Object(_) => directory
            .get("patients")
            .and_then(Value::as_array)
            .ok_or(OutbreakError::MissingData)?,
        _ => return Err(OutbreakError::MissingData),
    };

    let population: Vec<Patient> = records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            if !record.is_object() {
                tracing::warn!(position = index + 1, "skipping non-object directory record");
                return None;
            }
            Some(parse_patient(record, index + 1))
        })
        .collect();

    tracing::debug!(patients = population.len(), "directory loaded");
    Ok(population)
}

fn parse_patient(record: &Value, position: usize) -> Patient {
    let id = text_field(record, &["id", "patientId", "patient_id"])
        .or_else(|| record.get("id").and_then(Value::as_u64).map(|n| n.to_string()))
        .unwrap_or_else(|| {
            let fallback = format!("patient-{position}");
            tracing::warn!(id = %fallback, "directory record has no id");
            fallback
        });

    let name = extract_name(record).unwrap_or_else(|| {
        tracing::warn!(%id, "directory record has no name");
        UNKNOWN_NAME.to_string()
    });

    Patient {
        id,
        name,
        age: record.get("age").and_then(parse_age),
        gender: text_field(record, &["gender", "sex"]),
        city: text_field(record, &["city"]),
        state: text_field(record, &["state"]),
        diabetic: flag(record, &["diabetic", "diabetes"]),
        current_smoker: flag(record, &["currentSmoker", "current_smoker", "smoker"]),
        heart_attack_history: flag(
            record,
            &["heartAttackHistory", "heart_attack_history", "previousHeartAttack"],
        ),
        anxiety: flag(record, &["anxiety"]),
        depression: flag(record, &["depression"]),
    }
}

fn extract_name(record: &Value) -> Option<String> {
    if let Some(name) = text_field(record, &["name", "fullName", "full_name"]) {
        return Some(name);
    }

    let first = text_field(record, &["firstName", "first_name"]).unwrap_or_default();
    let last = text_field(record, &["lastName", "last_name"]).unwrap_or_default();
    let full = format!("{first} {last}").trim().to_string();
    if full.is_empty() {
        None
    } else {
        Some(full)
    }
}

/// First non-blank string among `keys`, trimmed.
fn text_field(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| record.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

fn flag(record: &Value, keys: &[&str]) -> bool {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .any(flag_value)
}

fn flag_value(value: &Value) -> bool {
    match value {
        Value::Bool(set) => *set,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(false),
        Value::String(text) => matches!(
            text.trim().to_lowercase().as_str(),
            "yes" | "y" | "true" | "1"
        ),
        _ => false,
    }
}

fn parse_age(value: &Value) -> Option<u32> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|n| *n >= 0.0).map(|n| n as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[derive(Deserialize)]
struct RegistryDocument {
    #[serde(default = "default_registry_version")]
    version: String,
    clusters: Vec<Cluster>,
}

fn default_registry_version() -> String {
    "custom".to_string()
}

/// Load a cluster registry from a JSON string.
pub fn load_registry_str(registry_json: &str) -> Result<ClusterRegistry, OutbreakError> {
    let value: Value = serde_json::from_str(registry_json)
        .map_err(|err| OutbreakError::Parse(err.to_string()))?;
    load_registry_value(&value)
}

/// Load a cluster registry from `{ "version": ..., "clusters": [...] }`.
pub fn load_registry_value(registry: &Value) -> Result<ClusterRegistry, OutbreakError> {
    let document = RegistryDocument::deserialize(registry)
        .map_err(|err| OutbreakError::Parse(err.to_string()))?;
    ClusterRegistry::new(document.version, document.clusters)
}
