use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query for the match endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchScholarsRequest {
    #[validate(length(min = 1))]
    pub author_id: String,
    /// Falls back to `matching.default_min_similarity` when absent
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1.0))]
    pub min_similarity: Option<f64>,
    /// Falls back to `matching.default_limit` when absent
    #[serde(default)]
    #[validate(range(min = 1))]
    pub limit: Option<usize>,
}

/// Query for listing stored articles
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListArticlesRequest {
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default = "default_article_limit")]
    #[validate(range(min = 1))]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_article_limit() -> usize {
    10
}

/// Query for free-text article search
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchArticlesRequest {
    #[validate(length(min = 1))]
    pub query: String,
    #[serde(default = "default_search_limit")]
    #[validate(range(min = 1))]
    pub limit: usize,
}

fn default_search_limit() -> usize {
    5
}
