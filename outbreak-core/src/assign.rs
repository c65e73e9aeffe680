//! Per-patient cluster assignment from structured clinical flags.

use crate::{
    AssignmentRules, Cluster, ClusterRegistry, OutbreakError, Patient, RandomSource, Severity,
};

const MAX_SYMPTOMS: usize = 3;
const HIGH_RISK_INTENSITY: f64 = 0.9;
const BASE_INTENSITY_MIN: f64 = 0.3;
const BASE_INTENSITY_MAX: f64 = 0.8;

/// Outcome of assigning one patient.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterAssignment {
    pub cluster: String,
    pub symptoms: Vec<String>,
    pub severity: Severity,
    pub intensity: f64,
    pub risk_factors: Vec<String>,
}

/// Assigns exactly one cluster per patient, first match wins:
/// diabetic, then anxiety or depression, then the fallback cluster.
#[derive(Debug, Clone)]
pub struct ClusterAssigner {
    diabetic: Cluster,
    mood: Cluster,
    fallback: Cluster,
}

impl ClusterAssigner {
    /// Resolves the rule targets against `registry`.
    pub fn new(registry: &ClusterRegistry, rules: &AssignmentRules) -> Result<Self, OutbreakError> {
        let resolve = |name: &str| {
            registry
                .get(name)
                .cloned()
                .ok_or_else(|| OutbreakError::UnknownCluster(name.to_string()))
        };

        Ok(Self {
            diabetic: resolve(&rules.diabetic)?,
            mood: resolve(&rules.mood)?,
            fallback: resolve(&rules.fallback)?,
        })
    }

    pub fn select(&self, patient: &Patient) -> &Cluster {
        if patient.diabetic {
            &self.diabetic
        } else if patient.anxiety || patient.depression {
            &self.mood
        } else {
            &self.fallback
        }
    }

    pub fn assign(&self, patient: &Patient, rng: &mut dyn RandomSource) -> ClusterAssignment {
        let cluster = self.select(patient);
        ClusterAssignment {
            cluster: cluster.name.clone(),
            symptoms: symptoms_for(patient, cluster),
            severity: cluster.severity,
            intensity: intensity_for(patient, rng),
            risk_factors: risk_factors(patient),
        }
    }
}

/// Symptoms implied by the clinical flags, in flag order and without deduplication,
/// capped at three. Falls back to the cluster's first two keywords.
pub fn symptoms_for(patient: &Patient, cluster: &Cluster) -> Vec<String> {
    let flagged: [(bool, &[&str]); 5] = [
        (patient.current_smoker, &["chronic cough"]),
        (patient.diabetic, &["fatigue", "dizziness"]),
        (patient.heart_attack_history, &["chest pain"]),
        (patient.anxiety, &["palpitations", "headache"]),
        (patient.depression, &["fatigue", "insomnia"]),
    ];

    let symptoms: Vec<String> = flagged
        .iter()
        .filter(|(set, _)| *set)
        .flat_map(|(_, symptoms)| symptoms.iter())
        .take(MAX_SYMPTOMS)
        .map(|symptom| symptom.to_string())
        .collect();

    if symptoms.is_empty() {
        cluster.keywords.iter().take(2).cloned().collect()
    } else {
        symptoms
    }
}

pub fn intensity_for(patient: &Patient, rng: &mut dyn RandomSource) -> f64 {
    if patient.diabetic || patient.heart_attack_history {
        HIGH_RISK_INTENSITY
    } else {
        rng.uniform(BASE_INTENSITY_MIN, BASE_INTENSITY_MAX)
    }
}

pub fn risk_factors(patient: &Patient) -> Vec<String> {
    [
        (patient.diabetic, "Diabetic"),
        (patient.current_smoker, "Smoker"),
        (patient.heart_attack_history, "Heart Attack History"),
    ]
    .into_iter()
    .filter(|(set, _)| *set)
    .map(|(_, label)| label.to_string())
    .collect()
}
