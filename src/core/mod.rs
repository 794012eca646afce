// Core algorithm exports
pub mod matcher;
pub mod reasons;
pub mod scoring;
pub mod signals;
pub mod vector;

pub use matcher::{Candidate, MatchError, Matcher, RankedMatches};
pub use reasons::generate_reasons;
pub use scoring::aggregate_score;
pub use signals::{CandidateSignals, RelevantWork, SignalExtractor, TargetContext};
pub use vector::{average, cosine_distance, cosine_similarity, VectorError};
