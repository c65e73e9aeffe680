use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{OutbreakError, Severity};

/// A named group of related symptoms.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cluster {
    pub name: String,
    pub keywords: Vec<String>,
    pub color: String,
    pub severity: Severity,
    pub icon: String,
}

impl Cluster {
    pub fn new(
        name: impl Into<String>,
        keywords: &[&str],
        color: impl Into<String>,
        severity: Severity,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            color: color.into(),
            severity,
            icon: icon.into(),
        }
    }
}

/// Immutable, versioned table of symptom clusters in declaration order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClusterRegistry {
    version: String,
    clusters: Vec<Cluster>,
}

impl ClusterRegistry {
    /// Validates names and keywords, normalising both to trimmed form and keywords to lower case.
    pub fn new(version: impl Into<String>, clusters: Vec<Cluster>) -> Result<Self, OutbreakError> {
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(clusters.len());

        for mut cluster in clusters {
            cluster.name = cluster.name.trim().to_string();
            if cluster.name.is_empty() {
                return Err(OutbreakError::InvalidRegistry(
                    "cluster name must not be empty".to_string(),
                ));
            }
            if !seen.insert(cluster.name.clone()) {
                return Err(OutbreakError::InvalidRegistry(format!(
                    "duplicate cluster name `{}`",
                    cluster.name
                )));
            }

            cluster.keywords = cluster
                .keywords
                .iter()
                .map(|keyword| keyword.trim().to_lowercase())
                .filter(|keyword| !keyword.is_empty())
                .collect();
            if cluster.keywords.is_empty() {
                return Err(OutbreakError::InvalidRegistry(format!(
                    "cluster `{}` has no keywords",
                    cluster.name
                )));
            }

            normalized.push(cluster);
        }

        Ok(Self {
            version: version.into(),
            clusters: normalized,
        })
    }

    /// The five built-in clusters.
    pub fn default_clusters() -> Self {
        Self {
            version: "builtin-1".to_string(),
            clusters: vec![
                Cluster::new(
                    "respiratory",
                    &[
                        "cough",
                        "fever",
                        "shortness of breath",
                        "sore throat",
                        "congestion",
                        "wheezing",
                        "runny nose",
                    ],
                    "#3b82f6",
                    Severity::Medium,
                    "lungs",
                ),
                Cluster::new(
                    "cardiac",
                    &[
                        "chest pain",
                        "palpitations",
                        "dizziness",
                        "fatigue",
                        "irregular heartbeat",
                        "swelling",
                    ],
                    "#ef4444",
                    Severity::High,
                    "heart",
                ),
                Cluster::new(
                    "neurological",
                    &[
                        "headache",
                        "dizziness",
                        "confusion",
                        "numbness",
                        "seizure",
                        "memory loss",
                    ],
                    "#8b5cf6",
                    Severity::Medium,
                    "brain",
                ),
                Cluster::new(
                    "gastrointestinal",
                    &[
                        "nausea",
                        "vomiting",
                        "diarrhea",
                        "abdominal pain",
                        "loss of appetite",
                    ],
                    "#f59e0b",
                    Severity::Low,
                    "stomach",
                ),
                Cluster::new(
                    "dermatological",
                    &["rash", "itching", "hives", "blisters", "skin lesion"],
                    "#10b981",
                    Severity::Low,
                    "hand",
                ),
            ],
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn get(&self, name: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|cluster| cluster.name == name)
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}
