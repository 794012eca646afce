use rayon::prelude::*;
use thiserror::Error;

use crate::core::{
    reasons::generate_reasons,
    scoring::aggregate_score,
    signals::{SignalExtractor, TargetContext},
};
use crate::models::{MatchResult, MatchThresholds, Profile, ScoringWeights, Work};
use crate::services::store::{ProfileStore, StoreError};

/// Errors surfaced by the matching facade
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Scholar not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Candidate profile together with its works
#[derive(Debug, Clone)]
pub struct Candidate {
    pub profile: Profile,
    pub works: Vec<Work>,
}

/// Result of the matching process
#[derive(Debug)]
pub struct RankedMatches {
    pub matches: Vec<MatchResult>,
    pub total_candidates: usize,
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Signal extraction (profile, interest, impact, work)
/// 2. Reason generation
/// 3. Score aggregation
/// 4. Threshold filter, ranking and truncation
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    extractor: SignalExtractor,
    parallel: bool,
}

impl Matcher {
    pub fn new(weights: ScoringWeights, thresholds: MatchThresholds) -> Self {
        Self {
            weights,
            extractor: SignalExtractor::new(thresholds),
            parallel: false,
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default(), MatchThresholds::default())
    }

    /// Score candidates on the rayon pool instead of the calling thread
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Find the best matching scholars for a target
    ///
    /// Loads the target, its works and every other profile with their works
    /// from `store`, then ranks them with [`Matcher::rank`].
    ///
    /// # Errors
    /// * `MatchError::NotFound` if `target_id` does not resolve to a profile
    /// * `MatchError::Store` for any other store failure, without retry
    pub async fn find_matches<S>(
        &self,
        store: &S,
        target_id: &str,
        min_similarity: f64,
        limit: usize,
    ) -> Result<RankedMatches, MatchError>
    where
        S: ProfileStore + ?Sized,
    {
        let target = store.get_profile(target_id).await.map_err(|e| match e {
            StoreError::NotFound(_) => MatchError::NotFound(target_id.to_string()),
            other => MatchError::Store(other),
        })?;

        let target_works = store.list_works_by_author_name(&target.name).await?;
        let profiles = store.list_all_profiles_except(target_id).await?;

        let mut candidates = Vec::with_capacity(profiles.len());
        for profile in profiles {
            let works = store.list_works_by_author_name(&profile.name).await?;
            candidates.push(Candidate { profile, works });
        }

        tracing::debug!(
            "Loaded target {} with {} works and {} candidates",
            target_id,
            target_works.len(),
            candidates.len()
        );

        Ok(self.rank(&target, &target_works, &candidates, min_similarity, limit))
    }

    /// Score, filter, sort and truncate an in-memory candidate population
    ///
    /// Pure given its inputs; the result does not depend on whether
    /// candidates are scored in parallel.
    pub fn rank(
        &self,
        target: &Profile,
        target_works: &[Work],
        candidates: &[Candidate],
        min_similarity: f64,
        limit: usize,
    ) -> RankedMatches {
        let total_candidates = candidates.len();
        let context = TargetContext::new(target, target_works);

        let scored: Vec<MatchResult> = if self.parallel {
            candidates
                .par_iter()
                .map(|candidate| self.score_candidate(&context, candidate))
                .collect()
        } else {
            candidates
                .iter()
                .map(|candidate| self.score_candidate(&context, candidate))
                .collect()
        };

        let mut matches: Vec<MatchResult> = scored
            .into_iter()
            .filter(|m| m.overall_similarity >= min_similarity)
            .collect();

        // Sort by score (descending) and then by id (ascending)
        matches.sort_by(|a, b| {
            b.overall_similarity
                .partial_cmp(&a.overall_similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.author_id.cmp(&b.author_id))
        });

        matches.truncate(limit);

        RankedMatches {
            matches,
            total_candidates,
        }
    }

    /// Compute signals, reasons and the overall score for one candidate
    pub fn score_candidate(&self, target: &TargetContext<'_>, candidate: &Candidate) -> MatchResult {
        let profile = &candidate.profile;
        let signals = self.extractor.extract(target, profile, &candidate.works);

        let overall_similarity = aggregate_score(signals.iter(), &self.weights);
        let match_reasons = generate_reasons(&signals, self.extractor.thresholds().work_reason);

        MatchResult {
            author_id: profile.id.clone(),
            name: profile.name.clone(),
            overall_similarity,
            profile_similarity: signals.profile.as_ref().map(|s| s.score),
            work_similarity: signals.work.as_ref().map(|s| s.score),
            h_index: profile.h_index,
            citations: profile.citations,
            interests: profile.interests.clone(),
            match_reasons,
            recent_relevant_works: signals.relevant_works.into_iter().map(|w| w.title).collect(),
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
