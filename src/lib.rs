//! Scholar Match - explainable scholar matching service
//!
//! Ranks candidate scholars against a target by combining profile-embedding
//! similarity, aggregated work-embedding similarity, shared research
//! interests and relative citation impact into one score, with a
//! human-readable reason for every signal that contributed.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{Candidate, MatchError, Matcher, RankedMatches, vector::{average, cosine_similarity}};
pub use models::{Profile, Work, MatchResult, MatchReason, SignalKind, ScoringWeights, MatchThresholds};
pub use services::{InMemoryStore, ProfileStore, StoreError};
