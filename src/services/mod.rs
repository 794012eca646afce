// Service exports
pub mod cache;
pub mod embedding;
pub mod postgres;
pub mod store;

pub use cache::{CacheManager, CacheKey, CacheError};
pub use embedding::{EmbeddingClient, EmbeddingError, EmbeddingService};
pub use postgres::PostgresClient;
pub use store::{InMemoryStore, ProfileStore, StoreError};
