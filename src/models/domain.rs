use serde::{Deserialize, Serialize};

/// Scholar profile, either the match target or a candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    /// Research interest tags, compared case-sensitively
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub citations: u32,
    #[serde(default)]
    pub h_index: u32,
    /// Profile-level embedding, absent when the profile has not been embedded yet
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
}

/// Publication attributed to a scholar by author name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Work {
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(default)]
    pub journal: Option<String>,
    #[serde(default)]
    pub citations: u32,
    #[serde(rename = "abstract", default)]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    pub author_name: String,
    #[serde(skip_serializing, default)]
    pub embedding: Option<Vec<f32>>,
}

impl Work {
    /// Minimal work with only the fields the matcher reads
    pub fn new(title: impl Into<String>, author_name: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: None,
            authors: None,
            journal: None,
            citations: 0,
            abstract_text: None,
            url: None,
            author_name: author_name.into(),
            embedding: None,
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }
}

/// Kind of similarity signal, also used as the `type` of a match reason
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Profile,
    Work,
    Interest,
    Impact,
}

/// One computed similarity signal between a target and a candidate
#[derive(Debug, Clone, PartialEq)]
pub struct SimilaritySignal {
    pub kind: SignalKind,
    /// Always within [0, 1]
    pub score: f64,
    pub description: String,
}

impl SimilaritySignal {
    pub fn new(kind: SignalKind, score: f64, description: impl Into<String>) -> Self {
        Self {
            kind,
            score: score.clamp(0.0, 1.0),
            description: description.into(),
        }
    }
}

/// Human-readable justification attached to a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReason {
    #[serde(rename = "type")]
    pub kind: SignalKind,
    pub description: String,
    pub score: f64,
}

impl From<&SimilaritySignal> for MatchReason {
    fn from(signal: &SimilaritySignal) -> Self {
        Self {
            kind: signal.kind,
            description: signal.description.clone(),
            score: signal.score,
        }
    }
}

/// Ranked, explained match for one candidate scholar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub author_id: String,
    pub name: String,
    pub overall_similarity: f64,
    pub profile_similarity: Option<f64>,
    pub work_similarity: Option<f64>,
    pub h_index: u32,
    pub citations: u32,
    pub interests: Vec<String>,
    pub match_reasons: Vec<MatchReason>,
    /// Titles of up to three candidate works closest to the target's work
    pub recent_relevant_works: Vec<String>,
}

/// Per-signal weights for the overall similarity.
///
/// Equal weights give the plain arithmetic mean of the produced signals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub profile: f64,
    pub work: f64,
    pub interest: f64,
    pub impact: f64,
}

impl ScoringWeights {
    pub fn for_kind(&self, kind: SignalKind) -> f64 {
        match kind {
            SignalKind::Profile => self.profile,
            SignalKind::Work => self.work,
            SignalKind::Interest => self.interest,
            SignalKind::Impact => self.impact,
        }
    }

    /// Reject negative or non-finite weights
    pub fn validate(&self) -> Result<(), String> {
        for (name, weight) in [
            ("profile", self.profile),
            ("work", self.work),
            ("interest", self.interest),
            ("impact", self.impact),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(format!("weight '{}' must be a finite non-negative number, got {}", name, weight));
            }
        }
        Ok(())
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            profile: 1.0,
            work: 1.0,
            interest: 1.0,
            impact: 1.0,
        }
    }
}

/// Materiality thresholds used while extracting signals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchThresholds {
    /// Candidate citations must reach this fraction of the target's for an impact signal
    pub impact_ratio: f64,
    /// Work similarity must exceed this before work reasons are written
    pub work_reason: f64,
    /// Number of candidate works kept as relevant works
    pub relevant_works: usize,
}

impl MatchThresholds {
    /// Reject ratios and similarity cut-offs outside their domains
    pub fn validate(&self) -> Result<(), String> {
        if !self.impact_ratio.is_finite() || self.impact_ratio < 0.0 {
            return Err(format!(
                "threshold 'impact_ratio' must be a finite non-negative number, got {}",
                self.impact_ratio
            ));
        }
        if !(0.0..=1.0).contains(&self.work_reason) {
            return Err(format!(
                "threshold 'work_reason' must be within [0, 1], got {}",
                self.work_reason
            ));
        }
        Ok(())
    }
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            impact_ratio: 0.8,
            work_reason: 0.7,
            relevant_works: 3,
        }
    }
}
