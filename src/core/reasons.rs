use crate::core::signals::{CandidateSignals, RelevantWork};
use crate::models::{MatchReason, SignalKind};

/// Turn computed signals into match reasons
///
/// Profile, interest and impact signals always yield a reason. Work reasons
/// (the aggregate plus one per relevant paper) are only written when the
/// work similarity is above `work_reason_threshold`.
pub fn generate_reasons(signals: &CandidateSignals, work_reason_threshold: f64) -> Vec<MatchReason> {
    let mut reasons: Vec<MatchReason> = [&signals.profile, &signals.interest, &signals.impact]
        .into_iter()
        .flatten()
        .map(MatchReason::from)
        .collect();

    if let Some(work) = &signals.work {
        if work.score > work_reason_threshold {
            reasons.push(MatchReason::from(work));
            reasons.extend(signals.relevant_works.iter().map(related_paper_reason));
        }
    }

    reasons
}

/// Reason for a single relevant paper
pub fn related_paper_reason(work: &RelevantWork) -> MatchReason {
    let year = match work.year {
        Some(year) => year.to_string(),
        None => "year unknown".to_string(),
    };

    MatchReason {
        kind: SignalKind::Work,
        description: format!(
            "Related paper: {} ({}), similarity {:.2}",
            work.title, year, work.similarity
        ),
        score: work.similarity,
    }
}
