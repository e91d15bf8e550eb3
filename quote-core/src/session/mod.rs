//! Client-side working model.
//!
//! A [`QuoteSession`] holds the quote being edited plus a mirror of the saved
//! quotes. It is owned by one session and passed around explicitly. The quote
//! store is the source of truth; the local snapshot written by
//! [`QuoteSession::persist`] is only a convenience for resuming work.

pub mod local;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::{by_cost, by_profit, by_selling_price, compute};
use crate::error::QuoteError;
use crate::models::{CreateQuoteRequest, DerivedResult, FinanceInput, SavedQuote, UpdateQuoteRequest};
use crate::store::QuoteApi;
use crate::validation::require_id;

pub use local::{FileLocalStore, LocalStore, MemoryLocalStore, SESSION_KEY};

/// One editable input of a [`FinanceInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Cost,
    Profit,
    SellingPrice,
    Term,
    Rate,
    OutOfPocket,
    TaxRate,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Cost,
        Field::Profit,
        Field::SellingPrice,
        Field::Term,
        Field::Rate,
        Field::OutOfPocket,
        Field::TaxRate,
    ];

    /// Wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cost => "cost",
            Self::Profit => "profit",
            Self::SellingPrice => "sellingPrice",
            Self::Term => "term",
            Self::Rate => "rate",
            Self::OutOfPocket => "outOfPocket",
            Self::TaxRate => "taxRate",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown field '{0}'")]
pub struct UnknownField(String);

impl FromStr for Field {
    type Err = UnknownField;

    /// Accepts wire (`sellingPrice`), snake (`selling_price`) and kebab
    /// (`selling-price`) spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Field::ALL
            .into_iter()
            .find(|field| field.as_str().to_ascii_lowercase() == normalized)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// The quote currently being edited.
///
/// `id` is `None` until the quote has been saved or while composing a new one;
/// `Some` means saving will update that stored quote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingQuote {
    pub id: Option<String>,
    #[serde(rename = "quoteName")]
    pub name: String,
    pub finance_quote: FinanceInput,
    /// Display-only; the store recomputes on save.
    pub result: DerivedResult,
}

impl WorkingQuote {
    fn from_saved(quote: &SavedQuote) -> Self {
        Self {
            id: Some(quote.id.clone()),
            name: quote.name.clone(),
            finance_quote: quote.finance_quote,
            result: quote.result,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSession {
    #[serde(flatten)]
    working: WorkingQuote,
    saved_quotes: Vec<SavedQuote>,
    /// True once `saved_quotes` came from the store in this process.
    #[serde(skip)]
    synced: bool,
}

impl QuoteSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn working(&self) -> &WorkingQuote {
        &self.working
    }

    pub fn saved_quotes(&self) -> &[SavedQuote] {
        &self.saved_quotes
    }

    /// Whether the saved list reflects a store round trip rather than a
    /// restored snapshot.
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    // ── editing ──────────────────────────────────────────────────────────

    /// Set one input, keeping `selling_price == cost + profit`, and
    /// recompute the displayed result.
    pub fn set_field(
        &mut self,
        field: Field,
        value: f64,
    ) {
        let input = &self.working.finance_quote;
        let updated = match field {
            Field::Cost => by_cost(input, value),
            Field::Profit => by_profit(input, value),
            Field::SellingPrice => by_selling_price(input, value),
            Field::Term => FinanceInput { term: value, ..*input },
            Field::Rate => FinanceInput { rate: value, ..*input },
            Field::OutOfPocket => FinanceInput {
                out_of_pocket: value,
                ..*input
            },
            Field::TaxRate => FinanceInput {
                tax_rate: value,
                ..*input
            },
        };
        self.working.finance_quote = updated;
        self.working.result = compute(&updated);
    }

    pub fn set_cost(
        &mut self,
        cost: f64,
    ) {
        self.set_field(Field::Cost, cost);
    }

    pub fn set_profit(
        &mut self,
        profit: f64,
    ) {
        self.set_field(Field::Profit, profit);
    }

    pub fn set_selling_price(
        &mut self,
        selling_price: f64,
    ) {
        self.set_field(Field::SellingPrice, selling_price);
    }

    pub fn set_term(
        &mut self,
        term: f64,
    ) {
        self.set_field(Field::Term, term);
    }

    pub fn set_rate(
        &mut self,
        rate: f64,
    ) {
        self.set_field(Field::Rate, rate);
    }

    pub fn set_out_of_pocket(
        &mut self,
        out_of_pocket: f64,
    ) {
        self.set_field(Field::OutOfPocket, out_of_pocket);
    }

    pub fn set_tax_rate(
        &mut self,
        tax_rate: f64,
    ) {
        self.set_field(Field::TaxRate, tax_rate);
    }

    pub fn set_name(
        &mut self,
        name: impl Into<String>,
    ) {
        self.working.name = name.into();
    }

    /// Discard the working quote and start a blank, unsaved one.
    pub fn new_quote(&mut self) {
        self.working = WorkingQuote::default();
    }

    /// Load a saved quote from the local list into the working quote.
    pub fn open(
        &mut self,
        id: &str,
    ) -> Result<(), QuoteError> {
        let quote = self
            .saved_quotes
            .iter()
            .find(|q| q.id == id)
            .ok_or_else(|| QuoteError::NotFound(id.to_string()))?;
        self.working = WorkingQuote::from_saved(quote);
        Ok(())
    }

    // ── store round trips ────────────────────────────────────────────────

    /// Replace the saved list with the store's current contents, verbatim.
    pub async fn refresh(
        &mut self,
        api: &dyn QuoteApi,
    ) -> Result<(), QuoteError> {
        let quotes = api.list_quotes().await?;
        debug!(count = quotes.len(), "session refreshed from store");
        self.saved_quotes = quotes;
        self.synced = true;
        Ok(())
    }

    /// Save the working quote under `name`.
    ///
    /// Unsaved quotes are created and appended to the local list; bound quotes
    /// are updated and their local entry replaced. On success the working
    /// quote resets to a blank one. On failure nothing local changes.
    pub async fn save(
        &mut self,
        api: &dyn QuoteApi,
        name: &str,
    ) -> Result<SavedQuote, QuoteError> {
        let saved = match self.working.id.as_deref() {
            None => {
                let request = CreateQuoteRequest {
                    name: name.to_string(),
                    finance_quote: self.working.finance_quote,
                    result: Some(self.working.result),
                };
                let created = api.create_quote(request).await?;
                self.saved_quotes.push(created.clone());
                created
            }
            Some(id) => {
                let request = UpdateQuoteRequest {
                    name: Some(name.to_string()),
                    finance_quote: Some(self.working.finance_quote),
                    result: Some(self.working.result),
                };
                let updated = api.update_quote(id, request).await?;
                match self.saved_quotes.iter_mut().find(|q| q.id == updated.id) {
                    Some(entry) => *entry = updated.clone(),
                    None => self.saved_quotes.push(updated.clone()),
                }
                updated
            }
        };

        self.new_quote();
        Ok(saved)
    }

    /// Delete a saved quote from the store, then from the local list.
    ///
    /// If the working quote was bound to `id` it is unbound, keeping its
    /// inputs, so a later save creates a new quote.
    pub async fn delete(
        &mut self,
        api: &dyn QuoteApi,
        id: &str,
    ) -> Result<(), QuoteError> {
        let id = require_id(id)?;
        api.delete_quote(id).await?;
        self.saved_quotes.retain(|q| q.id != id);
        if self.working.id.as_deref() == Some(id) {
            self.working.id = None;
        }
        Ok(())
    }

    // ── local tier ───────────────────────────────────────────────────────

    /// Resume from the local snapshot, or start fresh if there is none or it
    /// cannot be read. The restored list is not considered synced.
    pub fn restore(store: &dyn LocalStore) -> Self {
        let raw = match store.load(SESSION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::new(),
            Err(error) => {
                warn!(%error, "could not read local session snapshot");
                return Self::new();
            }
        };

        match serde_json::from_str::<QuoteSession>(&raw) {
            Ok(session) => session,
            Err(error) => {
                warn!(%error, "discarding unreadable local session snapshot");
                Self::new()
            }
        }
    }

    /// Write the snapshot to the local tier. Failures are logged, not returned.
    pub fn persist(
        &self,
        store: &dyn LocalStore,
    ) {
        let raw = match serde_json::to_string(self) {
            Ok(raw) => raw,
            Err(error) => {
                warn!(%error, "could not serialize session snapshot");
                return;
            }
        };
        if let Err(error) = store.save(SESSION_KEY, &raw) {
            warn!(%error, "could not write local session snapshot");
        }
    }
}
