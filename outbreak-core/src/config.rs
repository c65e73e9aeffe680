use serde::{Deserialize, Serialize};

use crate::{GeoPoint, OutbreakError};

/// Highest confidence a query match may report.
pub const MAX_CONFIDENCE_CAP: f64 = 95.0;

/// Tunable thresholds and defaults of the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Expected share of the population in any one cluster.
    pub baseline_fraction: f64,
    /// Absolute deviation (percent) a cluster must exceed to raise an anomaly.
    pub deviation_threshold_percent: f64,
    /// Upper bound on query-match confidence.
    pub confidence_cap: f64,
    /// Used when the caller has no geolocation fix.
    pub reference_point: GeoPoint,
    pub assignment: AssignmentRules,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            baseline_fraction: 0.2,
            deviation_threshold_percent: 15.0,
            confidence_cap: MAX_CONFIDENCE_CAP,
            reference_point: GeoPoint::new(40.7128, -74.0060),
            assignment: AssignmentRules::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), OutbreakError> {
        if !self.baseline_fraction.is_finite()
            || self.baseline_fraction <= 0.0
            || self.baseline_fraction > 1.0
        {
            return Err(OutbreakError::InvalidConfig(format!(
                "baseline fraction must be in (0, 1], got {}",
                self.baseline_fraction
            )));
        }
        if !self.deviation_threshold_percent.is_finite() || self.deviation_threshold_percent < 0.0 {
            return Err(OutbreakError::InvalidConfig(format!(
                "deviation threshold must be a non-negative percentage, got {}",
                self.deviation_threshold_percent
            )));
        }
        if !self.confidence_cap.is_finite()
            || self.confidence_cap <= 0.0
            || self.confidence_cap > MAX_CONFIDENCE_CAP
        {
            return Err(OutbreakError::InvalidConfig(format!(
                "confidence cap must be in (0, {MAX_CONFIDENCE_CAP}], got {}",
                self.confidence_cap
            )));
        }
        if !self.reference_point.lat.is_finite() || !self.reference_point.lng.is_finite() {
            return Err(OutbreakError::InvalidConfig(
                "reference point must have finite coordinates".to_string(),
            ));
        }
        Ok(())
    }
}

/// Cluster names targeted by the fixed-precedence assignment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AssignmentRules {
    /// Chosen first, for diabetic patients.
    pub diabetic: String,
    /// Chosen next, for patients with anxiety or depression.
    pub mood: String,
    pub fallback: String,
}

impl Default for AssignmentRules {
    fn default() -> Self {
        Self {
            diabetic: "cardiac".to_string(),
            mood: "neurological".to_string(),
            fallback: "respiratory".to_string(),
        }
    }
}
