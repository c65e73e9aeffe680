use crate::{ClusterRegistry, DetectedCluster};

/// Scores `query` against every cluster's keyword vocabulary.
///
/// A keyword counts once if it occurs anywhere in the lower-cased query. Confidence is the
/// share of the cluster's keywords found, times 100, capped at `confidence_cap`. Clusters
/// without a hit are left out; the rest are ordered by confidence, registry order on ties.
pub fn match_query(
    query: &str,
    registry: &ClusterRegistry,
    confidence_cap: f64,
) -> Vec<DetectedCluster> {
    let query = query.to_lowercase();

    let mut detected: Vec<DetectedCluster> = registry
        .clusters()
        .iter()
        .filter_map(|cluster| {
            let match_count = cluster
                .keywords
                .iter()
                .filter(|keyword| query.contains(keyword.as_str()))
                .count();
            if match_count == 0 {
                return None;
            }

            let confidence =
                (match_count as f64 / cluster.keywords.len() as f64 * 100.0).min(confidence_cap);
            Some(DetectedCluster {
                name: cluster.name.clone(),
                match_count,
                confidence,
                severity: cluster.severity,
                color: cluster.color.clone(),
            })
        })
        .collect();

    detected.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    detected
}
