use crate::{
    geo, match_query, AnomalyReport, BaselineScorer, ClusterAssigner, ClusterRegistry,
    DetectedCluster, EngineConfig, GeoPoint, OutbreakError, OutbreakReport, Patient,
    ProcessedPatient, RandomSource, SyntheticTrendEstimator, TrendEstimator,
};

/// Classification and anomaly engine bound to one registry and configuration.
pub struct OutbreakEngine {
    registry: ClusterRegistry,
    config: EngineConfig,
    assigner: ClusterAssigner,
    scorer: BaselineScorer,
    trend: Box<dyn TrendEstimator>,
}

impl OutbreakEngine {
    pub fn new(registry: ClusterRegistry, config: EngineConfig) -> Result<Self, OutbreakError> {
        let scorer = BaselineScorer::from_config(&config)?;
        let assigner = ClusterAssigner::new(&registry, &config.assignment)?;

        Ok(Self {
            registry,
            config,
            assigner,
            scorer,
            trend: Box::new(SyntheticTrendEstimator::default()),
        })
    }

    /// Replaces the trend signal appended to every scored query.
    pub fn with_trend_estimator(mut self, trend: impl TrendEstimator + 'static) -> Self {
        self.trend = Box::new(trend);
        self
    }

    pub fn registry(&self) -> &ClusterRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Assigns and places every patient. `reference` falls back to the configured point.
    pub fn process_population(
        &self,
        population: &[Patient],
        reference: Option<GeoPoint>,
        rng: &mut dyn RandomSource,
    ) -> Vec<ProcessedPatient> {
        let reference = reference.unwrap_or(self.config.reference_point);

        let processed: Vec<ProcessedPatient> = population
            .iter()
            .map(|patient| {
                let point = geo::project(patient, reference, rng);
                let assignment = self.assigner.assign(patient, rng);
                ProcessedPatient {
                    id: patient.id.clone(),
                    lat: point.lat,
                    lng: point.lng,
                    cluster: assignment.cluster,
                    symptoms: assignment.symptoms,
                    severity: assignment.severity,
                    intensity: assignment.intensity,
                    risk_factors: assignment.risk_factors,
                }
            })
            .collect();

        tracing::debug!(patients = processed.len(), "population processed");
        processed
    }

    pub fn detect_clusters(&self, query: &str) -> Vec<DetectedCluster> {
        let detected = match_query(query, &self.registry, self.config.confidence_cap);
        tracing::debug!(clusters = detected.len(), "query matched");
        detected
    }

    pub fn score_anomalies(
        &self,
        detected: &[DetectedCluster],
        processed: &[ProcessedPatient],
        rng: &mut dyn RandomSource,
    ) -> Vec<AnomalyReport> {
        let anomalies = self
            .scorer
            .score(detected, processed, self.trend.as_ref(), rng);
        tracing::debug!(anomalies = anomalies.len(), "anomalies scored");
        anomalies
    }

    /// Runs a query against an already processed population.
    ///
    /// A blank query, or an empty population, yields no detections and no anomalies.
    pub fn query(
        &self,
        processed: Vec<ProcessedPatient>,
        query: &str,
        rng: &mut dyn RandomSource,
    ) -> OutbreakReport {
        if query.trim().is_empty() || processed.is_empty() {
            return OutbreakReport::assemble(
                self.registry.version(),
                processed,
                Vec::new(),
                Vec::new(),
            );
        }

        let detected = self.detect_clusters(query);
        let anomalies = self.score_anomalies(&detected, &processed, rng);
        tracing::info!(
            patients = processed.len(),
            clusters = detected.len(),
            anomalies = anomalies.len(),
            "outbreak report ready"
        );
        OutbreakReport::assemble(self.registry.version(), processed, detected, anomalies)
    }

    /// Full refresh followed by a query.
    pub fn analyze(
        &self,
        population: &[Patient],
        reference: Option<GeoPoint>,
        query: &str,
        rng: &mut dyn RandomSource,
    ) -> OutbreakReport {
        let processed = self.process_population(population, reference, rng);
        self.query(processed, query, rng)
    }
}

impl std::fmt::Debug for OutbreakEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutbreakEngine")
            .field("registry", &self.registry.version())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
