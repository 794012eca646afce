// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Profile, Work, SignalKind, SimilaritySignal, MatchReason, MatchResult, ScoringWeights, MatchThresholds};
pub use requests::{MatchScholarsRequest, ListArticlesRequest, SearchArticlesRequest};
pub use responses::{HealthResponse, ErrorResponse, ScoredArticle};
