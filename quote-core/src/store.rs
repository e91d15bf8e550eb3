//! The quote store: the authoritative create/read/update/delete service.
//!
//! Every write recomputes [`DerivedResult`](crate::DerivedResult) from the
//! submitted [`FinanceInput`](crate::FinanceInput); results sent by a client
//! are display-only and never persisted. Reads return stored records verbatim.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::calculations::compute;
use crate::db::QuoteRepository;
use crate::error::QuoteError;
use crate::models::{CreateQuoteRequest, SavedQuote, UpdateQuoteRequest};
use crate::validation::{require_id, validate_create, validate_update};

/// Request/response boundary for saved quotes.
///
/// [`QuoteStore`] is the canonical implementation; a transport client would be
/// another. Errors are returned as-is so callers can map them onto their own
/// surface.
#[async_trait]
pub trait QuoteApi: Send + Sync {
    async fn create_quote(
        &self,
        request: CreateQuoteRequest,
    ) -> Result<SavedQuote, QuoteError>;

    /// Snapshot of all quotes, most recently created first.
    async fn list_quotes(&self) -> Result<Vec<SavedQuote>, QuoteError>;

    async fn get_quote(
        &self,
        id: &str,
    ) -> Result<SavedQuote, QuoteError>;

    async fn update_quote(
        &self,
        id: &str,
        request: UpdateQuoteRequest,
    ) -> Result<SavedQuote, QuoteError>;

    /// Not idempotent: deleting an id twice fails the second time.
    async fn delete_quote(
        &self,
        id: &str,
    ) -> Result<(), QuoteError>;
}

pub struct QuoteStore {
    repo: Arc<dyn QuoteRepository>,
}

impl QuoteStore {
    pub fn new(repo: Arc<dyn QuoteRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl QuoteApi for QuoteStore {
    async fn create_quote(
        &self,
        request: CreateQuoteRequest,
    ) -> Result<SavedQuote, QuoteError> {
        validate_create(&request)?;

        let result = compute(&request.finance_quote);
        if request.result.is_some_and(|submitted| submitted != result) {
            debug!("discarding client-submitted result that differs from recomputation");
        }

        let now = Utc::now();
        let quote = SavedQuote {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            finance_quote: request.finance_quote,
            result,
            created_at: now,
            updated_at: now,
        };

        let created = self.repo.create_quote(quote).await?;
        info!(id = %created.id, name = %created.name, "quote created");
        Ok(created)
    }

    async fn list_quotes(&self) -> Result<Vec<SavedQuote>, QuoteError> {
        let quotes = self.repo.list_quotes().await?;
        debug!(count = quotes.len(), "listed quotes");
        Ok(quotes)
    }

    async fn get_quote(
        &self,
        id: &str,
    ) -> Result<SavedQuote, QuoteError> {
        let id = require_id(id)?;
        debug!(%id, "fetching quote");
        Ok(self.repo.get_quote(id).await?)
    }

    async fn update_quote(
        &self,
        id: &str,
        request: UpdateQuoteRequest,
    ) -> Result<SavedQuote, QuoteError> {
        let id = require_id(id)?;
        validate_update(&request)?;

        let mut quote = self.repo.get_quote(id).await?;

        if let Some(name) = request.name {
            quote.name = name;
        }
        if let Some(finance_quote) = request.finance_quote {
            quote.result = compute(&finance_quote);
            quote.finance_quote = finance_quote;
        }
        quote.updated_at = Utc::now();

        self.repo.update_quote(&quote).await?;
        info!(%id, "quote updated");
        Ok(quote)
    }

    async fn delete_quote(
        &self,
        id: &str,
    ) -> Result<(), QuoteError> {
        let id = require_id(id)?;
        self.repo.delete_quote(id).await?;
        info!(%id, "quote deleted");
        Ok(())
    }
}
