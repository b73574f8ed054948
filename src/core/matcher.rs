use thiserror::Error;

use crate::core::scoring::{calculate_distance_score, is_exact_match};
use crate::models::{Candidate, DistanceWeights, LegacyMatch, MatchKind, PhysiqueQuery, ScoredCandidate};

/// Errors produced by the legacy matcher
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("no candidates available to match against")]
    EmptyCandidateSet,
}

/// Nearest-neighbour physique matcher
///
/// # Pipeline Stages
/// 1. Clamp and bucket the query
/// 2. Exact physique lookup, first in iteration order wins
/// 3. Weighted distance fallback, ties go to the earliest candidate
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: DistanceWeights,
}

impl Matcher {
    pub fn new(weights: DistanceWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: DistanceWeights::default(),
        }
    }

    pub fn weights(&self) -> &DistanceWeights {
        &self.weights
    }

    /// Find the single candidate whose reference physique is closest to the query
    ///
    /// # Arguments
    /// * `query` - The visitor's raw (age, height, weight)
    /// * `candidates` - The loaded catalog, in document order
    ///
    /// # Returns
    /// The selected candidate with the raw and normalized query, or
    /// `MatchError::EmptyCandidateSet`
    pub fn find_legacy(
        &self,
        query: &PhysiqueQuery,
        candidates: &[Candidate],
    ) -> Result<LegacyMatch, MatchError> {
        if candidates.is_empty() {
            return Err(MatchError::EmptyCandidateSet);
        }

        let normalized = query.normalized();

        if let Some(exact) = candidates.iter().find(|c| is_exact_match(c, &normalized)) {
            tracing::debug!("Exact legacy match {} for {:?}", exact.id, normalized);
            return Ok(LegacyMatch {
                candidate: exact.clone(),
                query: *query,
                normalized_query: normalized,
                kind: MatchKind::Exact,
            });
        }

        // Strict less-than keeps the earliest candidate on equal scores
        let mut best: Option<(usize, f64)> = None;
        for (index, candidate) in candidates.iter().enumerate() {
            let score = calculate_distance_score(candidate, &normalized, &self.weights);
            match best {
                Some((_, best_score)) if score >= best_score => {}
                _ => best = Some((index, score)),
            }
        }

        let (index, score) = best.ok_or(MatchError::EmptyCandidateSet)?;
        let candidate = &candidates[index];

        tracing::debug!(
            "Nearest legacy match {} (score {:.2}) for {:?}",
            candidate.id,
            score,
            normalized
        );

        Ok(LegacyMatch {
            candidate: candidate.clone(),
            query: *query,
            normalized_query: normalized,
            kind: MatchKind::Nearest { score },
        })
    }

    /// Rank candidates by weighted distance to the query
    ///
    /// Ordering is by score, then by position in `candidates`. Exact
    /// matches score zero and therefore lead the list.
    pub fn rank(
        &self,
        query: &PhysiqueQuery,
        candidates: &[Candidate],
        limit: usize,
    ) -> Result<Vec<ScoredCandidate>, MatchError> {
        if candidates.is_empty() {
            return Err(MatchError::EmptyCandidateSet);
        }

        let normalized = query.normalized();

        let mut scored: Vec<(usize, f64)> = candidates
            .iter()
            .enumerate()
            .map(|(index, candidate)| {
                (index, calculate_distance_score(candidate, &normalized, &self.weights))
            })
            .collect();

        scored.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(index, score)| {
                let candidate = &candidates[index];
                ScoredCandidate {
                    is_exact: is_exact_match(candidate, &normalized),
                    candidate: candidate.clone(),
                    score,
                }
            })
            .collect())
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
