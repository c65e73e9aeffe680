use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AnomalyReport, ClusterRegistry, DetectedCluster, ProcessedPatient};

/// Everything the display layer needs from one engine run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutbreakReport {
    pub generated_at: DateTime<Utc>,
    pub registry_version: String,
    pub processed_patients: Vec<ProcessedPatient>,
    pub detected_clusters: Vec<DetectedCluster>,
    pub anomalies: Vec<AnomalyReport>,
}

/// Patients per cluster, for legends and bar charts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterCount {
    pub name: String,
    pub color: String,
    pub count: usize,
}

impl OutbreakReport {
    pub fn assemble(
        registry_version: impl Into<String>,
        processed_patients: Vec<ProcessedPatient>,
        detected_clusters: Vec<DetectedCluster>,
        anomalies: Vec<AnomalyReport>,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            registry_version: registry_version.into(),
            processed_patients,
            detected_clusters,
            anomalies,
        }
    }

    /// Count of processed patients for every registry cluster, in registry order.
    pub fn cluster_distribution(&self, registry: &ClusterRegistry) -> Vec<ClusterCount> {
        registry
            .clusters()
            .iter()
            .map(|cluster| ClusterCount {
                name: cluster.name.clone(),
                color: cluster.color.clone(),
                count: self
                    .processed_patients
                    .iter()
                    .filter(|patient| patient.cluster == cluster.name)
                    .count(),
            })
            .collect()
    }

    /// `[lat, lng, intensity]` triples for a heatmap layer.
    pub fn heatmap_points(&self) -> Vec<[f64; 3]> {
        self.processed_patients
            .iter()
            .map(|patient| [patient.lat, patient.lng, patient.intensity])
            .collect()
    }
}
