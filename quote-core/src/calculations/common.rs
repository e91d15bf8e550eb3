//! Presentation helpers for quote figures.
//!
//! The engine works in `f64` and never rounds. These helpers convert a figure
//! to a [`Decimal`] rounded to cents for display only; nothing rounded here is
//! ever fed back into a calculation or persisted.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a figure to exactly two decimal places using half-up rounding.
///
/// Values at exactly half a cent are rounded away from zero. Non-finite
/// values, which the engine never produces from valid inputs, display as zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use quote_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(1058.7041666666667), dec!(1058.70));
/// assert_eq!(round_half_up(0.125), dec!(0.13));
/// assert_eq!(round_half_up(-0.125), dec!(-0.13)); // Away from zero
/// ```
pub fn round_half_up(value: f64) -> Decimal {
    Decimal::try_from(value)
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats a figure as a cents-rounded amount, e.g. `12704.45` or `990.00`.
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", round_half_up(value))
}

/// Formats a percentage field, trimming trailing zeros (`8.25%`, `5%`).
pub fn format_percent(value: f64) -> String {
    let percent = Decimal::try_from(value)
        .unwrap_or(Decimal::ZERO)
        .round_dp(4)
        .normalize();
    format!("{percent}%")
}
