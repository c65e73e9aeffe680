//! Baseline comparison of per-cluster population counts.

use std::collections::HashMap;

use crate::{
    AnomalyKind, AnomalyReport, DetectedCluster, EngineConfig, OutbreakError, ProcessedPatient,
    RandomSource, Severity, TrendEstimator,
};

/// Absorbs rounding in the deviation so a value exactly on the threshold stays inside it.
const DEVIATION_TOLERANCE: f64 = 1e-9;

/// Flags detected clusters whose assigned population strays from an even baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineScorer {
    baseline_fraction: f64,
    threshold_percent: f64,
}

impl Default for BaselineScorer {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            baseline_fraction: config.baseline_fraction,
            threshold_percent: config.deviation_threshold_percent,
        }
    }
}

impl BaselineScorer {
    /// Takes the baseline and threshold from `config` once it passes validation.
    pub fn from_config(config: &EngineConfig) -> Result<Self, OutbreakError> {
        config.validate()?;
        Ok(Self {
            baseline_fraction: config.baseline_fraction,
            threshold_percent: config.deviation_threshold_percent,
        })
    }

    pub fn baseline_fraction(&self) -> f64 {
        self.baseline_fraction
    }

    pub fn threshold_percent(&self) -> f64 {
        self.threshold_percent
    }

    /// Signed deviation of `observed` from the baseline, in percent.
    ///
    /// `None` when the population is empty and no baseline exists.
    pub fn deviation_percent(&self, observed: usize, total: usize) -> Option<f64> {
        let expected = total as f64 * self.baseline_fraction;
        if expected <= 0.0 {
            return None;
        }
        Some((observed as f64 - expected) / expected * 100.0)
    }

    /// One report per detected cluster beyond the threshold, then one trend report
    /// from `trend` when anything was detected.
    pub fn score(
        &self,
        detected: &[DetectedCluster],
        patients: &[ProcessedPatient],
        trend: &dyn TrendEstimator,
        rng: &mut dyn RandomSource,
    ) -> Vec<AnomalyReport> {
        if patients.is_empty() {
            if !detected.is_empty() {
                tracing::warn!("empty population, skipping anomaly scoring");
            }
            return Vec::new();
        }

        let counts = cluster_counts(patients);
        let count_of = |name: &str| counts.get(name).copied().unwrap_or(0);

        let mut anomalies: Vec<AnomalyReport> = detected
            .iter()
            .filter(|cluster| cluster.match_count > 0)
            .filter_map(|cluster| {
                let observed = count_of(&cluster.name);
                let deviation = self.deviation_percent(observed, patients.len())?;
                tracing::debug!(
                    cluster = %cluster.name,
                    observed,
                    deviation,
                    "baseline comparison"
                );
                if deviation.abs() <= self.threshold_percent + DEVIATION_TOLERANCE {
                    return None;
                }
                Some(baseline_report(cluster, observed, deviation))
            })
            .collect();

        if let Some(lead) = detected.iter().find(|cluster| cluster.match_count > 0) {
            if let Some(report) = trend.estimate(lead, count_of(&lead.name), rng) {
                anomalies.push(report);
            }
        }

        anomalies
    }
}

fn cluster_counts(patients: &[ProcessedPatient]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for patient in patients {
        *counts.entry(patient.cluster.as_str()).or_insert(0) += 1;
    }
    counts
}

fn baseline_report(cluster: &DetectedCluster, observed: usize, deviation: f64) -> AnomalyReport {
    let magnitude = deviation.abs();
    if deviation > 0.0 {
        AnomalyReport {
            cluster_name: cluster.name.clone(),
            kind: AnomalyKind::Outbreak,
            deviation_percent: magnitude,
            patients_affected: observed,
            message: format!(
                "Possible {} outbreak: {observed} patients, {magnitude:.1}% above baseline",
                cluster.name
            ),
            severity: cluster.severity,
        }
    } else {
        AnomalyReport {
            cluster_name: cluster.name.clone(),
            kind: AnomalyKind::Decline,
            deviation_percent: magnitude,
            patients_affected: observed,
            message: format!(
                "{} activity {magnitude:.1}% below baseline ({observed} patients)",
                cluster.name
            ),
            severity: Severity::Low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SeededRandom, SyntheticTrendEstimator};

    fn patients(spec: &[(&str, usize)]) -> Vec<ProcessedPatient> {
        spec.iter()
            .flat_map(|(cluster, count)| std::iter::repeat(*cluster).take(*count))
            .enumerate()
            .map(|(index, cluster)| ProcessedPatient {
                id: format!("p{index}"),
                lat: 0.0,
                lng: 0.0,
                cluster: cluster.to_string(),
                symptoms: Vec::new(),
                severity: Severity::Medium,
                intensity: 0.5,
                risk_factors: Vec::new(),
            })
            .collect()
    }

    fn detected(name: &str, severity: Severity) -> DetectedCluster {
        DetectedCluster {
            name: name.to_string(),
            match_count: 1,
            confidence: 20.0,
            severity,
            color: "#000".to_string(),
        }
    }

    #[test]
    fn deviation_handles_empty_population() {
        let scorer = BaselineScorer::default();
        assert_eq!(scorer.deviation_percent(0, 0), None);
        assert_eq!(scorer.deviation_percent(40, 100), Some(100.0));
    }

    #[test]
    fn decline_is_reported_as_absolute_value() {
        let population = patients(&[("cardiac", 5), ("respiratory", 95)]);
        let scorer = BaselineScorer::default();
        let mut rng = SeededRandom::from_seed(11);
        let anomalies = scorer.score(
            &[detected("cardiac", Severity::High)],
            &population,
            &SyntheticTrendEstimator::default(),
            &mut rng,
        );

        assert_eq!(anomalies.len(), 2);
        let decline = &anomalies[0];
        assert_eq!(decline.kind, AnomalyKind::Decline);
        assert_eq!(decline.deviation_percent, 75.0);
        assert_eq!(decline.patients_affected, 5);
        assert_eq!(decline.severity, Severity::Low);
        assert_eq!(anomalies[1].kind, AnomalyKind::AiDetected);
    }

    #[test]
    fn within_threshold_emits_only_trend_signal() {
        // 22 of 100 is +10%, inside the 15% band.
        let population = patients(&[("cardiac", 22), ("respiratory", 78)]);
        let mut rng = SeededRandom::from_seed(11);
        let anomalies = BaselineScorer::default().score(
            &[detected("cardiac", Severity::High)],
            &population,
            &SyntheticTrendEstimator::default(),
            &mut rng,
        );
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].kind, AnomalyKind::AiDetected);
        assert_eq!(anomalies[0].cluster_name, "cardiac");
        assert_eq!(anomalies[0].patients_affected, 22);
        assert!((50.0..80.0).contains(&anomalies[0].deviation_percent));
    }

    #[test]
    fn nothing_detected_means_no_anomalies() {
        let population = patients(&[("respiratory", 10)]);
        let mut rng = SeededRandom::from_seed(1);
        let anomalies = BaselineScorer::default().score(
            &[],
            &population,
            &SyntheticTrendEstimator::default(),
            &mut rng,
        );
        assert!(anomalies.is_empty());
    }

    #[test]
    fn empty_population_is_not_scored() {
        let mut rng = SeededRandom::from_seed(1);
        let anomalies = BaselineScorer::default().score(
            &[detected("respiratory", Severity::Medium)],
            &[],
            &SyntheticTrendEstimator::default(),
            &mut rng,
        );
        assert!(anomalies.is_empty());
    }

    #[test]
    fn scorer_rejects_invalid_thresholds() {
        let negative = EngineConfig {
            deviation_threshold_percent: -15.0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            BaselineScorer::from_config(&negative),
            Err(OutbreakError::InvalidConfig(_))
        ));

        let tuned = EngineConfig {
            baseline_fraction: 0.25,
            deviation_threshold_percent: 10.0,
            ..EngineConfig::default()
        };
        let scorer = BaselineScorer::from_config(&tuned).expect("valid config");
        assert_eq!(scorer.baseline_fraction(), 0.25);
        assert_eq!(scorer.threshold_percent(), 10.0);
    }

    #[test]
    fn unassigned_cluster_counts_as_zero() {
        let population = patients(&[("respiratory", 10)]);
        let mut rng = SeededRandom::from_seed(1);
        let anomalies = BaselineScorer::default().score(
            &[detected("dermatological", Severity::Low)],
            &population,
            &SyntheticTrendEstimator::default(),
            &mut rng,
        );
        assert_eq!(anomalies[0].kind, AnomalyKind::Decline);
        assert_eq!(anomalies[0].deviation_percent, 100.0);
        assert_eq!(anomalies[0].patients_affected, 0);
    }
}
