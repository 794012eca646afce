use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Profile, Work};

/// Errors that can occur when reading profiles and works
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Read access to scholar profiles and their works
///
/// Embeddings are expected to be populated already; the matcher never
/// generates them.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch one profile, `StoreError::NotFound` if the id is unknown
    async fn get_profile(&self, id: &str) -> Result<Profile, StoreError>;

    /// All works attributed to the given author name, in listing order
    async fn list_works_by_author_name(&self, name: &str) -> Result<Vec<Work>, StoreError>;

    /// Every profile except the one with the given id
    async fn list_all_profiles_except(&self, id: &str) -> Result<Vec<Profile>, StoreError>;

    /// Page through stored works, optionally restricted to one author
    async fn list_works(
        &self,
        author_name: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Work>, StoreError>;

    /// Every work that carries an embedding
    async fn list_embedded_works(&self) -> Result<Vec<Work>, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

/// Store backed by in-process vectors, used by tests and benchmarks
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    profiles: Vec<Profile>,
    works: Vec<Work>,
}

impl InMemoryStore {
    pub fn new(profiles: Vec<Profile>, works: Vec<Work>) -> Self {
        Self { profiles, works }
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn get_profile(&self, id: &str) -> Result<Profile, StoreError> {
        self.profiles
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("Profile not found: {}", id)))
    }

    async fn list_works_by_author_name(&self, name: &str) -> Result<Vec<Work>, StoreError> {
        Ok(self.works.iter().filter(|w| w.author_name == name).cloned().collect())
    }

    async fn list_all_profiles_except(&self, id: &str) -> Result<Vec<Profile>, StoreError> {
        Ok(self.profiles.iter().filter(|p| p.id != id).cloned().collect())
    }

    async fn list_works(
        &self,
        author_name: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Work>, StoreError> {
        Ok(self
            .works
            .iter()
            .filter(|w| author_name.map_or(true, |name| w.author_name == name))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list_embedded_works(&self) -> Result<Vec<Work>, StoreError> {
        Ok(self.works.iter().filter(|w| w.embedding.is_some()).cloned().collect())
    }
}
