use crate::models::{ScoringWeights, SimilaritySignal};

/// Combine a candidate's signals into one overall similarity (0-1)
///
/// Weighted mean of the produced signals:
/// overall = Σ weight(kind) * score / Σ weight(kind)
///
/// With equal weights this is the arithmetic mean. Per-paper work reasons
/// are not signals and must not be passed here. No signals, or signals
/// that all carry zero weight, give 0.
pub fn aggregate_score<'a, I>(signals: I, weights: &ScoringWeights) -> f64
where
    I: IntoIterator<Item = &'a SimilaritySignal>,
{
    let (weighted_sum, weight_total) = signals
        .into_iter()
        .fold((0.0, 0.0), |(sum, total), signal| {
            let weight = weights.for_kind(signal.kind);
            (sum + weight * signal.score, total + weight)
        });

    if weight_total <= 0.0 {
        return 0.0;
    }

    (weighted_sum / weight_total).clamp(0.0, 1.0)
}
