//! Rendering for command results: aligned text for people, the wire shape
//! for `--json`.

use std::fmt::Write;

use quote_core::calculations::common::{format_amount, format_percent};
use quote_core::{
    ApiError, DerivedResult, FinanceInput, QuoteError, QuoteResponse, QuoteSession, SavedQuote,
};
use serde::Serialize;

const LABEL_WIDTH: usize = 18;
const VALUE_WIDTH: usize = 12;

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

pub fn quote_json(quote: &SavedQuote) -> serde_json::Result<String> {
    to_json(&QuoteResponse::from(quote.clone()))
}

pub fn quotes_json(quotes: &[SavedQuote]) -> serde_json::Result<String> {
    let responses: Vec<QuoteResponse> = quotes.iter().cloned().map(QuoteResponse::from).collect();
    to_json(&responses)
}

pub fn error_json(error: &ApiError) -> serde_json::Result<String> {
    to_json(error)
}

/// Text form of a failure: the caller-facing message, then one line per
/// rejected field.
pub fn render_error(
    error: &QuoteError,
    production: bool,
) -> String {
    let api_error = error.to_api_error(production);
    let mut out = format!("error [{}]: {}\n", api_error.code, api_error.message);
    if let QuoteError::Validation(fields) = error {
        for field in fields {
            let _ = writeln!(out, "  {}: {}", field.field, field.message);
        }
    }
    out
}

fn line(
    out: &mut String,
    label: &str,
    value: &str,
) {
    let _ = writeln!(out, "{label:<LABEL_WIDTH$}{value:>VALUE_WIDTH$}");
}

pub fn render_inputs(input: &FinanceInput) -> String {
    let mut out = String::new();
    line(&mut out, "Cost", &format_amount(input.cost));
    line(&mut out, "Profit", &format_amount(input.profit));
    line(&mut out, "Selling price", &format_amount(input.selling_price));
    line(&mut out, "Term (months)", &input.term.to_string());
    line(&mut out, "Rate", &format_percent(input.rate));
    line(&mut out, "Out of pocket", &format_amount(input.out_of_pocket));
    line(&mut out, "Tax rate", &format_percent(input.tax_rate));
    out
}

pub fn render_result(result: &DerivedResult) -> String {
    let mut out = String::new();
    line(&mut out, "Taxes", &format_amount(result.taxes));
    line(&mut out, "Out of pocket", &format_amount(result.out_of_pocket));
    line(&mut out, "Base loan amount", &format_amount(result.base_loan_amount));
    line(&mut out, "Interest", &format_amount(result.interest));
    line(&mut out, "Total loan amount", &format_amount(result.total_loan_amount));
    line(&mut out, "Monthly payment", &format_amount(result.payment));
    out
}

pub fn render_quote(quote: &SavedQuote) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", quote.name, quote.id);
    let _ = writeln!(
        out,
        "created {}, updated {}",
        quote.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
        quote.updated_at.format("%Y-%m-%d %H:%M:%S UTC"),
    );
    out.push('\n');
    out.push_str(&render_inputs(&quote.finance_quote));
    out.push('\n');
    out.push_str(&render_result(&quote.result));
    out
}

pub fn render_list(quotes: &[SavedQuote]) -> String {
    if quotes.is_empty() {
        return "No saved quotes.\n".to_string();
    }

    let mut out = String::new();
    for quote in quotes {
        let _ = writeln!(
            out,
            "{}  {:<24} total {:>12}  payment {:>10}",
            quote.id,
            quote.name,
            format_amount(quote.result.total_loan_amount),
            format_amount(quote.result.payment),
        );
    }
    out
}

pub fn render_session(session: &QuoteSession) -> String {
    let working = session.working();
    let name = if working.name.is_empty() { "(unnamed)" } else { working.name.as_str() };
    let binding = working.id.as_deref().unwrap_or("unsaved");

    let mut out = String::new();
    let _ = writeln!(out, "Working quote: {name} [{binding}]");
    out.push('\n');
    out.push_str(&render_inputs(&working.finance_quote));
    out.push('\n');
    out.push_str(&render_result(&working.result));
    out.push('\n');
    let _ = writeln!(
        out,
        "Saved quotes: {} ({})",
        session.saved_quotes().len(),
        if session.is_synced() { "synced" } else { "local copy" },
    );
    if !session.saved_quotes().is_empty() {
        out.push_str(&render_list(session.saved_quotes()));
    }
    out
}
