//! Vehicle finance quotes: calculation, reconciliation, storage contract and
//! the client-side working session.

pub mod calculations;
pub mod db;
pub mod error;
pub mod models;
pub mod session;
pub mod store;
pub mod validation;

pub use db::repository::{QuoteRepository, RepositoryError};
pub use error::{ApiError, FieldError, QuoteError};
pub use models::*;
pub use session::{Field, QuoteSession, WorkingQuote};
pub use store::{QuoteApi, QuoteStore};
