use crate::core::vector::{average, cosine_similarity, VectorError};
use crate::models::{MatchThresholds, Profile, SignalKind, SimilaritySignal, Work};

/// Target side of a comparison, prepared once per request
///
/// The target's work centroid does not depend on the candidate, so it is
/// averaged here instead of once per candidate.
#[derive(Debug, Clone)]
pub struct TargetContext<'a> {
    pub profile: &'a Profile,
    pub work_centroid: Option<Vec<f32>>,
}

impl<'a> TargetContext<'a> {
    pub fn new(profile: &'a Profile, works: &[Work]) -> Self {
        let work_centroid = match work_centroid(works) {
            Ok(centroid) => centroid,
            Err(e) => {
                tracing::warn!(
                    target_id = %profile.id,
                    error = %e,
                    "Target work embeddings are inconsistent, work signal disabled"
                );
                None
            }
        };

        Self { profile, work_centroid }
    }
}

/// Candidate work ranked against the target's work centroid
#[derive(Debug, Clone, PartialEq)]
pub struct RelevantWork {
    pub title: String,
    pub year: Option<i32>,
    pub similarity: f64,
}

/// Every signal computed for one candidate. `None` means omitted, not zero.
#[derive(Debug, Clone, Default)]
pub struct CandidateSignals {
    pub profile: Option<SimilaritySignal>,
    pub interest: Option<SimilaritySignal>,
    pub impact: Option<SimilaritySignal>,
    pub work: Option<SimilaritySignal>,
    pub relevant_works: Vec<RelevantWork>,
}

impl CandidateSignals {
    /// Produced signals, in reporting order
    pub fn iter(&self) -> impl Iterator<Item = &SimilaritySignal> {
        [&self.profile, &self.interest, &self.impact, &self.work]
            .into_iter()
            .flatten()
    }
}

/// Computes the individual similarity signals between a target and a candidate
#[derive(Debug, Clone, Copy)]
pub struct SignalExtractor {
    thresholds: MatchThresholds,
}

impl SignalExtractor {
    pub fn new(thresholds: MatchThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &MatchThresholds {
        &self.thresholds
    }

    /// Compute all signals for one candidate
    pub fn extract(
        &self,
        target: &TargetContext<'_>,
        candidate: &Profile,
        candidate_works: &[Work],
    ) -> CandidateSignals {
        let (work, relevant_works) = match &target.work_centroid {
            Some(centroid) => self.work_signal(centroid, candidate, candidate_works),
            None => (None, Vec::new()),
        };

        CandidateSignals {
            profile: profile_signal(target.profile, candidate),
            interest: interest_signal(target.profile, candidate),
            impact: impact_signal(target.profile, candidate, self.thresholds.impact_ratio),
            work,
            relevant_works,
        }
    }

    /// Work signal plus the candidate's most relevant works
    pub fn work_signal(
        &self,
        target_centroid: &[f32],
        candidate: &Profile,
        candidate_works: &[Work],
    ) -> (Option<SimilaritySignal>, Vec<RelevantWork>) {
        let candidate_centroid = match work_centroid(candidate_works) {
            Ok(Some(centroid)) => centroid,
            Ok(None) => return (None, Vec::new()),
            Err(e) => {
                warn_skipped(candidate, SignalKind::Work, &e);
                return (None, Vec::new());
            }
        };

        let similarity = match cosine_similarity(target_centroid, &candidate_centroid) {
            Ok(sim) => sim.clamp(0.0, 1.0),
            Err(e) => {
                warn_skipped(candidate, SignalKind::Work, &e);
                return (None, Vec::new());
            }
        };

        let relevant = rank_relevant_works(target_centroid, candidate_works, self.thresholds.relevant_works);

        let signal = SimilaritySignal::new(
            SignalKind::Work,
            similarity,
            format!("Strong research work similarity ({:.2})", similarity),
        );

        (Some(signal), relevant)
    }
}

impl Default for SignalExtractor {
    fn default() -> Self {
        Self::new(MatchThresholds::default())
    }
}

/// Cosine similarity of the profile embeddings, negatives mapped to 0
pub fn profile_signal(target: &Profile, candidate: &Profile) -> Option<SimilaritySignal> {
    let (a, b) = match (&target.embedding, &candidate.embedding) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            tracing::debug!(candidate_id = %candidate.id, "Profile signal omitted: missing embedding");
            return None;
        }
    };

    match cosine_similarity(a, b) {
        Ok(sim) => {
            let score = sim.clamp(0.0, 1.0);
            Some(SimilaritySignal::new(
                SignalKind::Profile,
                score,
                format!("Research profile similarity of {:.2}", score),
            ))
        }
        Err(e) => {
            warn_skipped(candidate, SignalKind::Profile, &e);
            None
        }
    }
}

/// Fraction of the target's distinct interests the candidate shares
pub fn interest_signal(target: &Profile, candidate: &Profile) -> Option<SimilaritySignal> {
    let target_interests = distinct(&target.interests);
    if target_interests.is_empty() {
        return None;
    }

    let shared: Vec<&str> = target_interests
        .iter()
        .copied()
        .filter(|interest| candidate.interests.iter().any(|c| c.as_str() == *interest))
        .collect();

    if shared.is_empty() {
        return None;
    }

    let score = shared.len() as f64 / target_interests.len() as f64;
    let noun = if target_interests.len() == 1 { "interest" } else { "interests" };

    Some(SimilaritySignal::new(
        SignalKind::Interest,
        score,
        format!(
            "Shares {} of {} research {}: {}",
            shared.len(),
            target_interests.len(),
            noun,
            shared.join(", ")
        ),
    ))
}

/// Relative citation impact, only when the candidate is near the target's impact
pub fn impact_signal(target: &Profile, candidate: &Profile, ratio_threshold: f64) -> Option<SimilaritySignal> {
    if target.citations == 0 {
        return None;
    }

    let target_citations = target.citations as f64;
    let candidate_citations = candidate.citations as f64;
    if candidate_citations < ratio_threshold * target_citations {
        return None;
    }

    let score = (candidate_citations / target_citations).min(1.0);
    Some(SimilaritySignal::new(
        SignalKind::Impact,
        score,
        format!(
            "Similar impact with {} citations (target: {})",
            candidate.citations, target.citations
        ),
    ))
}

/// Average of the embedded works, `None` when no work carries an embedding
pub fn work_centroid(works: &[Work]) -> Result<Option<Vec<f32>>, VectorError> {
    let embeddings: Vec<&[f32]> = works
        .iter()
        .filter_map(|work| work.embedding.as_deref())
        .collect();

    if embeddings.is_empty() {
        return Ok(None);
    }

    average(&embeddings).map(Some)
}

/// Top `n` embedded works by similarity to `centroid`.
///
/// Ordered by similarity, then newer year first, then listing order.
/// Works whose embedding cannot be compared are left out.
pub fn rank_relevant_works(centroid: &[f32], works: &[Work], n: usize) -> Vec<RelevantWork> {
    let mut ranked: Vec<RelevantWork> = works
        .iter()
        .filter_map(|work| {
            let embedding = work.embedding.as_deref()?;
            let similarity = cosine_similarity(centroid, embedding).ok()?;
            Some(RelevantWork {
                title: work.title.clone(),
                year: work.year,
                similarity: similarity.clamp(0.0, 1.0),
            })
        })
        .collect();

    // Stable sort keeps listing order for full ties
    ranked.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.year.cmp(&a.year))
    });

    ranked.truncate(n);
    ranked
}

fn distinct(values: &[String]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::with_capacity(values.len());
    for value in values {
        if !seen.contains(&value.as_str()) {
            seen.push(value);
        }
    }
    seen
}

fn warn_skipped(candidate: &Profile, kind: SignalKind, error: &VectorError) {
    tracing::warn!(
        candidate_id = %candidate.id,
        signal = ?kind,
        error = %error,
        "Skipping signal for candidate with inconsistent embeddings"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, interests: &[&str], citations: u32, embedding: Option<Vec<f32>>) -> Profile {
        Profile {
            id: id.to_string(),
            name: format!("Scholar {}", id),
            interests: interests.iter().map(|s| s.to_string()).collect(),
            citations,
            h_index: 10,
            embedding,
        }
    }

    #[test]
    fn test_interest_signal_half_overlap() {
        let target = profile("t", &["nlp", "vision"], 0, None);
        let candidate = profile("c", &["nlp", "robotics"], 0, None);

        let signal = interest_signal(&target, &candidate).unwrap();
        assert_eq!(signal.kind, SignalKind::Interest);
        assert_eq!(signal.score, 0.5);
        assert!(signal.description.contains("nlp"));
        assert_eq!(signal.description, "Shares 1 of 2 research interests: nlp");
    }

    #[test]
    fn test_interest_description_single_target_interest() {
        let target = profile("t", &["nlp"], 0, None);
        let candidate = profile("c", &["nlp", "vision"], 0, None);

        let signal = interest_signal(&target, &candidate).unwrap();
        assert_eq!(signal.description, "Shares 1 of 1 research interest: nlp");
    }

    #[test]
    fn test_interest_signal_omitted_without_target_interests() {
        let target = profile("t", &[], 0, None);
        let candidate = profile("c", &["nlp"], 0, None);
        assert!(interest_signal(&target, &candidate).is_none());
    }

    #[test]
    fn test_interest_signal_is_case_sensitive() {
        let target = profile("t", &["NLP"], 0, None);
        let candidate = profile("c", &["nlp"], 0, None);
        assert!(interest_signal(&target, &candidate).is_none());
    }

    #[test]
    fn test_interest_signal_treats_duplicates_as_set() {
        let target = profile("t", &["nlp", "nlp", "vision"], 0, None);
        let candidate = profile("c", &["nlp"], 0, None);
        assert_eq!(interest_signal(&target, &candidate).unwrap().score, 0.5);
    }

    #[test]
    fn test_impact_signal_threshold() {
        let target = profile("t", &[], 1000, None);

        assert!(impact_signal(&target, &profile("c", &[], 700, None), 0.8).is_none());

        let signal = impact_signal(&target, &profile("c", &[], 900, None), 0.8).unwrap();
        assert!((signal.score - 0.9).abs() < 1e-12);
        assert!(signal.description.contains("900"));
        assert!(signal.description.contains("1000"));

        let capped = impact_signal(&target, &profile("c", &[], 5000, None), 0.8).unwrap();
        assert_eq!(capped.score, 1.0);
    }

    #[test]
    fn test_impact_signal_omitted_for_zero_target_citations() {
        let target = profile("t", &[], 0, None);
        assert!(impact_signal(&target, &profile("c", &[], 50, None), 0.8).is_none());
    }

    #[test]
    fn test_profile_signal_clamps_negative() {
        let target = profile("t", &[], 0, Some(vec![1.0, 0.0]));
        let candidate = profile("c", &[], 0, Some(vec![-1.0, 0.0]));
        assert_eq!(profile_signal(&target, &candidate).unwrap().score, 0.0);
    }

    #[test]
    fn test_profile_signal_omitted_when_embedding_missing() {
        let target = profile("t", &[], 0, Some(vec![1.0, 0.0]));
        let candidate = profile("c", &[], 0, None);
        assert!(profile_signal(&target, &candidate).is_none());
    }

    #[test]
    fn test_profile_signal_omitted_on_dimension_mismatch() {
        let target = profile("t", &[], 0, Some(vec![1.0, 0.0]));
        let candidate = profile("c", &[], 0, Some(vec![1.0, 0.0, 0.0]));
        assert!(profile_signal(&target, &candidate).is_none());
    }

    #[test]
    fn test_rank_relevant_works_tie_breaks() {
        let works = vec![
            Work::new("old", "c").with_year(2001).with_embedding(vec![1.0, 0.0]),
            Work::new("far", "c").with_year(2024).with_embedding(vec![0.0, 1.0]),
            Work::new("new", "c").with_year(2020).with_embedding(vec![2.0, 0.0]),
            Work::new("undated", "c").with_embedding(vec![1.0, 0.0]),
            Work::new("no embedding", "c").with_year(2023),
        ];

        let ranked = rank_relevant_works(&[1.0, 0.0], &works, 3);
        let titles: Vec<&str> = ranked.iter().map(|w| w.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "old", "undated"]);
    }

    #[test]
    fn test_rank_relevant_works_keeps_listing_order_on_full_tie() {
        let works = vec![
            Work::new("first", "c").with_year(2020).with_embedding(vec![1.0, 0.0]),
            Work::new("second", "c").with_year(2020).with_embedding(vec![1.0, 0.0]),
        ];

        let ranked = rank_relevant_works(&[1.0, 0.0], &works, 3);
        assert_eq!(ranked[0].title, "first");
        assert_eq!(ranked[1].title, "second");
    }

    #[test]
    fn test_work_signal_requires_both_sides() {
        let target = profile("t", &[], 0, None);
        let target_works = vec![Work::new("a", "t").with_embedding(vec![1.0, 0.0])];
        let extractor = SignalExtractor::default();

        let ctx = TargetContext::new(&target, &target_works);
        let candidate = profile("c", &[], 0, None);
        let signals = extractor.extract(&ctx, &candidate, &[Work::new("b", "c")]);
        assert!(signals.work.is_none());
        assert!(signals.relevant_works.is_empty());

        let empty_ctx = TargetContext::new(&target, &[]);
        let candidate_works = vec![Work::new("b", "c").with_embedding(vec![1.0, 0.0])];
        let signals = extractor.extract(&empty_ctx, &candidate, &candidate_works);
        assert!(signals.work.is_none());
    }

    #[test]
    fn test_work_signal_and_relevant_works() {
        let target = profile("t", &[], 0, None);
        let target_works = vec![
            Work::new("a", "t").with_embedding(vec![1.0, 0.0]),
            Work::new("b", "t").with_embedding(vec![1.0, 0.0]),
        ];
        let candidate = profile("c", &[], 0, None);
        let candidate_works: Vec<Work> = (0..5)
            .map(|i| Work::new(format!("w{}", i), "c").with_year(2000 + i).with_embedding(vec![1.0, i as f32]))
            .collect();

        let ctx = TargetContext::new(&target, &target_works);
        let signals = SignalExtractor::default().extract(&ctx, &candidate, &candidate_works);

        let work = signals.work.unwrap();
        assert!(work.score > 0.0 && work.score <= 1.0);
        let titles: Vec<&str> = signals.relevant_works.iter().map(|w| w.title.as_str()).collect();
        assert_eq!(titles, vec!["w0", "w1", "w2"]);
    }

    #[test]
    fn test_inconsistent_candidate_works_skip_only_work_signal() {
        let target = profile("t", &["nlp"], 100, Some(vec![1.0, 0.0]));
        let target_works = vec![Work::new("a", "t").with_embedding(vec![1.0, 0.0])];
        let candidate = profile("c", &["nlp"], 100, Some(vec![1.0, 0.0]));
        let candidate_works = vec![
            Work::new("x", "c").with_embedding(vec![1.0, 0.0]),
            Work::new("y", "c").with_embedding(vec![1.0]),
        ];

        let ctx = TargetContext::new(&target, &target_works);
        let signals = SignalExtractor::default().extract(&ctx, &candidate, &candidate_works);

        assert!(signals.work.is_none());
        assert!(signals.profile.is_some());
        assert!(signals.interest.is_some());
        assert!(signals.impact.is_some());
        assert_eq!(signals.iter().count(), 3);
    }
}
