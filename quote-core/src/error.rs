//! Error taxonomy for the quote store boundary and its wire envelope.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::RepositoryError;

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Wire path of the field, e.g. `financeQuote.taxRate`.
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every way a quote store operation can fail.
///
/// The calculation engine and reconciler are total, so all of these originate
/// at the store and reach callers unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuoteError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Quote ID is required")]
    MissingQuoteId,

    #[error("Quote not found: {0}")]
    NotFound(String),

    #[error("A record with this data already exists: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl QuoteError {
    /// Stable machine-readable code sent to callers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::MissingQuoteId => "MISSING_QUOTE_ID",
            Self::NotFound(_) => "QUOTE_NOT_FOUND",
            Self::Conflict(_) => "DUPLICATE_RECORD",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP-equivalent status for transports that need one.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::MissingQuoteId => 400,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Internal(_) => 500,
        }
    }

    /// Build the caller-facing envelope.
    ///
    /// In production internal failures carry a generic message only.
    pub fn to_api_error(
        &self,
        production: bool,
    ) -> ApiError {
        let (message, details) = match self {
            Self::Validation(fields) => (
                "Validation failed".to_string(),
                serde_json::to_value(fields).ok(),
            ),
            Self::MissingQuoteId => ("Quote ID is required".to_string(), None),
            Self::NotFound(_) => ("Quote not found".to_string(), None),
            Self::Conflict(_) => ("A record with this data already exists".to_string(), None),
            Self::Internal(detail) => {
                let message = if production {
                    "Internal server error".to_string()
                } else {
                    detail.clone()
                };
                (message, None)
            }
        };

        ApiError {
            message,
            code: self.code().to_string(),
            details,
        }
    }
}

impl From<RepositoryError> for QuoteError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => Self::NotFound(id),
            RepositoryError::Conflict(detail) => Self::Conflict(detail),
            other => Self::Internal(other.to_string()),
        }
    }
}

/// Error body returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
