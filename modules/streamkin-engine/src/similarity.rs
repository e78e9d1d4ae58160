//! Audience-overlap scoring. Pure functions, no I/O.

use std::collections::HashMap;

/// Jaccard-style similarity between the origin's sampled audience and each
/// candidate's audience.
///
/// The intersection is the mutual-following count; the denominator
/// approximates the union as `sampled + candidate_total - overlap`. Scores
/// land in [0, 1] and candidates without an enriched follower total fall
/// back to a denominator of the sample alone.
pub fn jaccard_scores(
    mutual: &HashMap<String, u32>,
    totals: &HashMap<String, u64>,
    num_sampled: u32,
) -> HashMap<String, f64> {
    mutual
        .iter()
        .map(|(id, overlap)| {
            let total = totals.get(id).copied().unwrap_or(0);
            let union = (u64::from(num_sampled) + total).saturating_sub(u64::from(*overlap));
            let score = if union == 0 {
                0.0
            } else {
                f64::from(*overlap) / union as f64
            };
            (id.clone(), score.clamp(0.0, 1.0))
        })
        .collect()
}

/// Candidate ids ordered by descending score; ties break by id so output is
/// deterministic.
pub fn rank(scores: &HashMap<String, f64>) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = scores
        .iter()
        .map(|(id, score)| (id.clone(), *score))
        .collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked
}
