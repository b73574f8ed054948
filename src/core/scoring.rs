use crate::models::{Candidate, DistanceWeights, PhysiqueQuery};

/// Weighted distance between a candidate's reference physique and a query
///
/// Lower is closer. The query is expected to be normalized already.
///
/// Scoring formula:
/// score = (
///     |height delta| * 1.2 +
///     |weight delta| * 1.0 +
///     |age delta|    * 0.6
/// )
pub fn calculate_distance_score(
    candidate: &Candidate,
    query: &PhysiqueQuery,
    weights: &DistanceWeights,
) -> f64 {
    let height_delta = axis_delta(candidate.height_cm.into(), query.height_cm.into());
    let weight_delta = axis_delta(candidate.weight_kg.into(), query.weight_kg.into());
    let age_delta = axis_delta(candidate.prime_age.into(), query.age.into());

    height_delta * weights.height + weight_delta * weights.weight + age_delta * weights.age
}

/// True when the candidate's reference physique equals the query exactly
#[inline]
pub fn is_exact_match(candidate: &Candidate, query: &PhysiqueQuery) -> bool {
    candidate.prime_age == query.age
        && candidate.height_cm == query.height_cm
        && candidate.weight_kg == query.weight_kg
}

#[inline]
fn axis_delta(a: i32, b: i32) -> f64 {
    f64::from((a - b).abs())
}
