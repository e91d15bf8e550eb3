use serde::{Deserialize, Serialize};

/// Inputs describing one financing scenario.
///
/// Percent fields (`rate`, `tax_rate`) are whole-number percentages, so
/// `8.25` means 8.25%.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceInput {
    pub cost: f64,
    pub profit: f64,
    pub selling_price: f64,
    /// Number of payment periods.
    pub term: f64,
    /// Interest rate for the whole term, in percent.
    pub rate: f64,
    pub out_of_pocket: f64,
    pub tax_rate: f64,
}

/// Figures derived from a [`FinanceInput`] by
/// [`compute`](crate::calculations::compute).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedResult {
    pub taxes: f64,
    pub base_loan_amount: f64,
    pub interest: f64,
    /// Negative when the out-of-pocket amount exceeds the loan need.
    pub total_loan_amount: f64,
    pub payment: f64,
    pub out_of_pocket: f64,
}
