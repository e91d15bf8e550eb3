//! In-process backend, registered as `"memory"`.
//!
//! Records live in a map guarded by a [`RwLock`] that is held for one
//! primitive at a time, so concurrent writers to the same id race and the
//! last one wins.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::factory::{DbConfig, RepositoryFactory};
use super::repository::{QuoteRepository, RepositoryError};
use crate::models::SavedQuote;

#[derive(Default)]
struct Entries {
    next_seq: u64,
    by_id: HashMap<String, (u64, SavedQuote)>,
}

/// Map-backed [`QuoteRepository`].
#[derive(Default)]
pub struct MemoryRepository {
    entries: RwLock<Entries>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuoteRepository for MemoryRepository {
    async fn create_quote(
        &self,
        quote: SavedQuote,
    ) -> Result<SavedQuote, RepositoryError> {
        let mut entries = self.entries.write().await;
        if entries.by_id.contains_key(&quote.id) {
            return Err(RepositoryError::Conflict(format!("quote id '{}' already exists", quote.id)));
        }
        let seq = entries.next_seq;
        entries.next_seq += 1;
        entries.by_id.insert(quote.id.clone(), (seq, quote.clone()));
        Ok(quote)
    }

    async fn get_quote(
        &self,
        id: &str,
    ) -> Result<SavedQuote, RepositoryError> {
        self.entries
            .read()
            .await
            .by_id
            .get(id)
            .map(|(_, quote)| quote.clone())
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn update_quote(
        &self,
        quote: &SavedQuote,
    ) -> Result<(), RepositoryError> {
        let mut entries = self.entries.write().await;
        match entries.by_id.get_mut(&quote.id) {
            Some((_, stored)) => {
                *stored = quote.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound(quote.id.clone())),
        }
    }

    async fn delete_quote(
        &self,
        id: &str,
    ) -> Result<(), RepositoryError> {
        self.entries
            .write()
            .await
            .by_id
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn list_quotes(&self) -> Result<Vec<SavedQuote>, RepositoryError> {
        let entries = self.entries.read().await;
        let mut rows: Vec<_> = entries.by_id.values().collect();
        rows.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| seq_b.cmp(seq_a))
        });
        Ok(rows.into_iter().map(|(_, quote)| quote.clone()).collect())
    }
}

/// [`RepositoryFactory`] for the in-process backend.
///
/// The connection string is ignored; every `create` call starts empty.
pub struct MemoryRepositoryFactory;

#[async_trait]
impl RepositoryFactory for MemoryRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        _config: &DbConfig,
    ) -> Result<Box<dyn QuoteRepository>, RepositoryError> {
        Ok(Box::new(MemoryRepository::new()))
    }
}
