mod finance;
mod quote;

pub use finance::{DerivedResult, FinanceInput};
pub use quote::{
    CreateQuoteRequest, QuoteResponse, QuoteResultView, SavedQuote, UpdateQuoteRequest,
};
