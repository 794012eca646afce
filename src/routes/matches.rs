use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::config::MatchingSettings;
use crate::core::{cosine_similarity, MatchError, Matcher};
use crate::models::{
    ErrorResponse, HealthResponse, ListArticlesRequest, MatchResult, MatchScholarsRequest,
    ScoredArticle, SearchArticlesRequest,
};
use crate::services::{CacheKey, CacheManager, EmbeddingService, ProfileStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProfileStore>,
    pub embedder: Arc<dyn EmbeddingService>,
    pub cache: Arc<CacheManager>,
    pub matcher: Matcher,
    pub matching: MatchingSettings,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/match-scholars", web::get().to(match_scholars))
        .route("/articles", web::get().to(list_articles))
        .route("/search", web::get().to(search_articles));
}

fn error_response(status: actix_web::http::StatusCode, error: &str, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status.as_u16(),
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.store.health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find matching scholars
///
/// GET /api/v1/match-scholars?author_id={id}&min_similarity=0.6&limit=5
async fn match_scholars(
    state: web::Data<AppState>,
    query: web::Query<MatchScholarsRequest>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        tracing::info!("Validation failed for match_scholars request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let author_id = &query.author_id;
    let min_similarity = query.min_similarity.unwrap_or(state.matching.default_min_similarity);
    // Cap limit to keep responses bounded
    let limit = query
        .limit
        .unwrap_or(state.matching.default_limit)
        .min(state.matching.max_limit);

    tracing::info!(
        "Finding matches for scholar: {}, min_similarity: {}, limit: {}",
        author_id,
        min_similarity,
        limit
    );

    let cache_key = CacheKey::matches(author_id, min_similarity, limit);
    if let Ok(cached) = state.cache.get::<Vec<MatchResult>>(&cache_key).await {
        tracing::debug!("Serving cached matches for {}", author_id);
        return HttpResponse::Ok().json(cached);
    }

    let result = match state
        .matcher
        .find_matches(state.store.as_ref(), author_id, min_similarity, limit)
        .await
    {
        Ok(result) => result,
        Err(MatchError::NotFound(id)) => {
            tracing::info!("Scholar not found: {}", id);
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "Author not found".to_string(),
                message: format!("No scholar with id {}", id),
                status_code: 404,
            });
        }
        Err(e) => {
            tracing::error!("Failed to match scholar {}: {}", author_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to compute matches".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    tracing::info!(
        "Returning {} matches for scholar {} (from {} candidates)",
        result.matches.len(),
        author_id,
        result.total_candidates
    );

    if let Err(e) = state.cache.set(&cache_key, &result.matches).await {
        tracing::warn!("Failed to cache matches for {}: {}", author_id, e);
    }

    HttpResponse::Ok().json(result.matches)
}

/// List stored articles
///
/// GET /api/v1/articles?author_name={name}&limit=10&offset=0
async fn list_articles(
    state: web::Data<AppState>,
    query: web::Query<ListArticlesRequest>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return error_response(
            actix_web::http::StatusCode::BAD_REQUEST,
            "Validation failed",
            errors.to_string(),
        );
    }

    let limit = query.limit.min(state.matching.max_limit);

    match state
        .store
        .list_works(query.author_name.as_deref(), limit, query.offset)
        .await
    {
        Ok(works) => HttpResponse::Ok().json(works),
        Err(e) => {
            tracing::error!("Failed to list articles: {}", e);
            error_response(
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to list articles",
                e.to_string(),
            )
        }
    }
}

/// Search stored articles by semantic similarity to free text
///
/// GET /api/v1/search?query={text}&limit=5
async fn search_articles(
    state: web::Data<AppState>,
    query: web::Query<SearchArticlesRequest>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return error_response(
            actix_web::http::StatusCode::BAD_REQUEST,
            "Validation failed",
            errors.to_string(),
        );
    }

    let query_embedding = match state.embedder.embed(&query.query).await {
        Ok(embedding) => embedding,
        Err(e) => {
            tracing::error!("Failed to embed search query: {}", e);
            return error_response(
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Error generating embedding for query",
                e.to_string(),
            );
        }
    };

    let works = match state.store.list_embedded_works().await {
        Ok(works) => works,
        Err(e) => {
            tracing::error!("Failed to load articles for search: {}", e);
            return error_response(
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load articles",
                e.to_string(),
            );
        }
    };

    let limit = query.limit.min(state.matching.max_limit);
    HttpResponse::Ok().json(rank_articles(&query_embedding, works, limit))
}

/// Rank works by similarity to a query vector, listing order on ties
fn rank_articles(query_embedding: &[f32], works: Vec<crate::models::Work>, limit: usize) -> Vec<ScoredArticle> {
    let mut scored: Vec<ScoredArticle> = works
        .into_iter()
        .filter_map(|work| {
            let similarity = cosine_similarity(query_embedding, work.embedding.as_deref()?).ok()?;
            Some(ScoredArticle { work, similarity })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(limit);
    scored
}
