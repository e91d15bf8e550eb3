use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DerivedResult, FinanceInput};

/// A persisted, named quote.
///
/// `result` is always the calculation engine's output for `finance_quote`;
/// it is never edited on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedQuote {
    pub id: String,
    pub name: String,
    pub finance_quote: FinanceInput,
    pub result: DerivedResult,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a quote.
///
/// A client may send the result it displayed, but the store recomputes it
/// from `finance_quote` and never persists the submitted one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuoteRequest {
    pub name: String,
    pub finance_quote: FinanceInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<DerivedResult>,
}

impl CreateQuoteRequest {
    pub fn new(
        name: impl Into<String>,
        finance_quote: FinanceInput,
    ) -> Self {
        Self {
            name: name.into(),
            finance_quote,
            result: None,
        }
    }
}

/// Partial update. Absent fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuoteRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finance_quote: Option<FinanceInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<DerivedResult>,
}

/// Result block of the wire format, which carries the quote name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResultView {
    #[serde(flatten)]
    pub figures: DerivedResult,
    pub quote_name: String,
}

/// Wire representation of a [`SavedQuote`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub id: String,
    pub finance_quote: FinanceInput,
    pub result: QuoteResultView,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SavedQuote> for QuoteResponse {
    fn from(quote: SavedQuote) -> Self {
        Self {
            id: quote.id,
            finance_quote: quote.finance_quote,
            result: QuoteResultView {
                figures: quote.result,
                quote_name: quote.name,
            },
            created_at: quote.created_at,
            updated_at: quote.updated_at,
        }
    }
}

impl From<QuoteResponse> for SavedQuote {
    fn from(response: QuoteResponse) -> Self {
        Self {
            id: response.id,
            name: response.result.quote_name,
            finance_quote: response.finance_quote,
            result: response.result.figures,
            created_at: response.created_at,
            updated_at: response.updated_at,
        }
    }
}
