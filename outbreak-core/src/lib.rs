//! Symptom-cluster classification and outbreak anomaly detection over a patient population.

mod anomaly;
mod assign;
mod config;
mod engine;
mod geo;
mod matcher;
mod random;
mod registry;
mod report;
mod trend;

use serde::{Deserialize, Serialize};

pub use anomaly::BaselineScorer;
pub use assign::{ClusterAssigner, ClusterAssignment};
pub use config::{AssignmentRules, EngineConfig};
pub use engine::OutbreakEngine;
pub use geo::{location_hash, project};
pub use matcher::match_query;
pub use random::{RandomSource, SeededRandom};
pub use registry::{Cluster, ClusterRegistry};
pub use report::{ClusterCount, OutbreakReport};
pub use trend::{SyntheticTrendEstimator, TrendEstimator};

/// Severity tag carried by clusters and anomalies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Patient attributes as handed over by the patient directory.
///
/// Clinical flags that the directory did not supply are `false`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub diabetic: bool,
    pub current_smoker: bool,
    pub heart_attack_history: bool,
    pub anxiety: bool,
    pub depression: bool,
}

impl Patient {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Both coarse location fields, when present and non-blank.
    pub fn location(&self) -> Option<(&str, &str)> {
        let city = self.city.as_deref().filter(|c| !c.trim().is_empty())?;
        let state = self.state.as_deref().filter(|s| !s.trim().is_empty())?;
        Some((city, state))
    }
}

/// One patient after cluster assignment and geoprojection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedPatient {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub cluster: String,
    pub symptoms: Vec<String>,
    pub severity: Severity,
    pub intensity: f64,
    pub risk_factors: Vec<String>,
}

/// A registry cluster whose keywords were found in a free-text query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetectedCluster {
    pub name: String,
    pub match_count: usize,
    pub confidence: f64,
    pub severity: Severity,
    pub color: String,
}

/// Kind of anomaly raised for a detected cluster.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    Outbreak,
    Decline,
    AiDetected,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyReport {
    pub cluster_name: String,
    pub kind: AnomalyKind,
    /// Always non-negative; the direction is carried by `kind`.
    pub deviation_percent: f64,
    pub patients_affected: usize,
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, thiserror::Error)]
pub enum OutbreakError {
    #[error("input is missing required data")]
    MissingData,
    #[error("could not parse input: {0}")]
    Parse(String),
    #[error("invalid cluster registry: {0}")]
    InvalidRegistry(String),
    #[error("cluster `{0}` is not defined in the registry")]
    UnknownCluster(String),
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),
}
