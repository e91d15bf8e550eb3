//! Input checks applied at the store boundary, before anything is computed.

use crate::error::{FieldError, QuoteError};
use crate::models::{CreateQuoteRequest, FinanceInput, UpdateQuoteRequest};

/// Collect every problem with a create request.
pub fn validate_create(request: &CreateQuoteRequest) -> Result<(), QuoteError> {
    let mut errors = Vec::new();
    check_name(&request.name, &mut errors);
    check_finance_input(&request.finance_quote, &mut errors);
    into_result(errors)
}

/// Collect every problem with the fields an update actually supplies.
pub fn validate_update(request: &UpdateQuoteRequest) -> Result<(), QuoteError> {
    let mut errors = Vec::new();
    if let Some(name) = &request.name {
        check_name(name, &mut errors);
    }
    if let Some(input) = &request.finance_quote {
        check_finance_input(input, &mut errors);
    }
    into_result(errors)
}

/// Reject blank ids before touching storage.
pub fn require_id(id: &str) -> Result<&str, QuoteError> {
    let id = id.trim();
    if id.is_empty() {
        Err(QuoteError::MissingQuoteId)
    } else {
        Ok(id)
    }
}

fn check_name(
    name: &str,
    errors: &mut Vec<FieldError>,
) {
    if name.trim().is_empty() {
        errors.push(FieldError::new("name", "must not be empty"));
    }
}

fn check_finance_input(
    input: &FinanceInput,
    errors: &mut Vec<FieldError>,
) {
    let fields = [
        ("cost", input.cost),
        ("profit", input.profit),
        ("sellingPrice", input.selling_price),
        ("term", input.term),
        ("rate", input.rate),
        ("outOfPocket", input.out_of_pocket),
        ("taxRate", input.tax_rate),
    ];

    for (field, value) in fields {
        let path = format!("financeQuote.{field}");
        if !value.is_finite() {
            errors.push(FieldError::new(path, "must be a finite number"));
        } else if value < 0.0 {
            errors.push(FieldError::new(path, "must be greater than or equal to 0"));
        }
    }
}

fn into_result(errors: Vec<FieldError>) -> Result<(), QuoteError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(QuoteError::Validation(errors))
    }
}
