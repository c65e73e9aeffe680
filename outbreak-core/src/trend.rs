use crate::{AnomalyKind, AnomalyReport, DetectedCluster, OutbreakError, RandomSource, Severity};

/// Auxiliary temporal-trend signal appended after the per-cluster baseline checks.
///
/// `lead` is the highest-confidence detected cluster and `patients_in_cluster`
/// its assigned population.
pub trait TrendEstimator: Send + Sync {
    fn estimate(
        &self,
        lead: &DetectedCluster,
        patients_in_cluster: usize,
        rng: &mut dyn RandomSource,
    ) -> Option<AnomalyReport>;
}

/// Placeholder estimator: draws a rise percentage from `[min_percent, max_percent)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticTrendEstimator {
    min_percent: f64,
    max_percent: f64,
}

impl SyntheticTrendEstimator {
    /// Requires `0 <= min_percent < max_percent`, both finite.
    pub fn new(min_percent: f64, max_percent: f64) -> Result<Self, OutbreakError> {
        if !min_percent.is_finite()
            || !max_percent.is_finite()
            || min_percent < 0.0
            || min_percent >= max_percent
        {
            return Err(OutbreakError::InvalidConfig(format!(
                "trend range must satisfy 0 <= min < max, got [{min_percent}, {max_percent})"
            )));
        }
        Ok(Self {
            min_percent,
            max_percent,
        })
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min_percent, self.max_percent)
    }
}

impl Default for SyntheticTrendEstimator {
    fn default() -> Self {
        Self {
            min_percent: 50.0,
            max_percent: 80.0,
        }
    }
}

impl TrendEstimator for SyntheticTrendEstimator {
    fn estimate(
        &self,
        lead: &DetectedCluster,
        patients_in_cluster: usize,
        rng: &mut dyn RandomSource,
    ) -> Option<AnomalyReport> {
        let percent = rng.uniform(self.min_percent, self.max_percent);
        Some(AnomalyReport {
            cluster_name: lead.name.clone(),
            kind: AnomalyKind::AiDetected,
            deviation_percent: percent,
            patients_affected: patients_in_cluster,
            message: format!(
                "Trend analysis suggests {percent:.1}% rise in {} symptom reports",
                lead.name
            ),
            severity: Severity::Medium,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SeededRandom;

    #[test]
    fn range_must_be_ordered_and_non_negative() {
        for (min, max) in [(80.0, 50.0), (60.0, 60.0), (-10.0, 20.0), (f64::NAN, 80.0)] {
            assert!(
                matches!(
                    SyntheticTrendEstimator::new(min, max),
                    Err(OutbreakError::InvalidConfig(_))
                ),
                "[{min}, {max}) should be rejected"
            );
        }
    }

    #[test]
    fn draws_stay_inside_custom_range() {
        let estimator = SyntheticTrendEstimator::new(10.0, 20.0).expect("valid range");
        assert_eq!(estimator.range(), (10.0, 20.0));

        let lead = DetectedCluster {
            name: "cardiac".to_string(),
            match_count: 1,
            confidence: 16.7,
            severity: Severity::High,
            color: "#ef4444".to_string(),
        };
        let mut rng = SeededRandom::from_seed(9);
        for _ in 0..50 {
            let report = estimator.estimate(&lead, 4, &mut rng).expect("trend report");
            assert!((10.0..20.0).contains(&report.deviation_percent));
            assert_eq!(report.patients_affected, 4);
            assert_eq!(report.severity, Severity::Medium);
        }
    }
}
