use async_trait::async_trait;
use thiserror::Error;

use crate::models::SavedQuote;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Duplicate record: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Persistence collaborator for saved quotes, keyed by `id`.
///
/// Implementations store records verbatim. Validation and recomputation are
/// the job of [`QuoteStore`](crate::store::QuoteStore); a repository never
/// touches `result`.
#[async_trait]
pub trait QuoteRepository: Send + Sync {
    /// Insert a new record and return it as stored.
    ///
    /// Fails with [`RepositoryError::Conflict`] if the id is already taken.
    async fn create_quote(
        &self,
        quote: SavedQuote,
    ) -> Result<SavedQuote, RepositoryError>;

    async fn get_quote(
        &self,
        id: &str,
    ) -> Result<SavedQuote, RepositoryError>;

    /// Overwrite the record with the same id.
    async fn update_quote(
        &self,
        quote: &SavedQuote,
    ) -> Result<(), RepositoryError>;

    async fn delete_quote(
        &self,
        id: &str,
    ) -> Result<(), RepositoryError>;

    /// All records, most recently created first.
    async fn list_quotes(&self) -> Result<Vec<SavedQuote>, RepositoryError>;
}
