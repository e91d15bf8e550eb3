//! Single-period finance quote calculation.
//!
//! | Figure              | Formula                                          |
//! |---------------------|--------------------------------------------------|
//! | `taxes`             | selling price × tax rate / 100                   |
//! | `base_loan_amount`  | selling price + taxes                            |
//! | `interest`          | base loan amount × rate / 100                    |
//! | `total_loan_amount` | base loan amount + interest − out of pocket      |
//! | `payment`           | total loan amount / term (0 when term is 0)      |
//! | `out_of_pocket`     | copied from the input                            |
//!
//! No rounding and no clamping happen here. A negative total or payment means
//! the buyer is putting down more than the deal needs, and is returned as is.
//!
//! # Example
//!
//! ```
//! use quote_core::FinanceInput;
//! use quote_core::calculations::compute;
//!
//! let input = FinanceInput {
//!     cost: 10000.0,
//!     profit: 2000.0,
//!     selling_price: 12000.0,
//!     term: 12.0,
//!     rate: 5.5,
//!     out_of_pocket: 1000.0,
//!     tax_rate: 8.25,
//! };
//!
//! let result = compute(&input);
//!
//! assert_eq!(result.taxes, 990.0);
//! assert_eq!(result.total_loan_amount, 12704.45);
//! ```

use crate::models::{DerivedResult, FinanceInput};

/// Derive every result figure from `input`.
///
/// Total over its domain: never fails, never produces `NaN` from a zero term.
pub fn compute(input: &FinanceInput) -> DerivedResult {
    let taxes = taxes(input);
    let base_loan_amount = input.selling_price + taxes;
    let interest = base_loan_amount * (input.rate / 100.0);
    let total_loan_amount = base_loan_amount + interest - input.out_of_pocket;

    DerivedResult {
        taxes,
        base_loan_amount,
        interest,
        total_loan_amount,
        payment: payment(total_loan_amount, input.term),
        out_of_pocket: input.out_of_pocket,
    }
}

fn taxes(input: &FinanceInput) -> f64 {
    input.selling_price * (input.tax_rate / 100.0)
}

fn payment(
    total_loan_amount: f64,
    term: f64,
) -> f64 {
    if term == 0.0 {
        0.0
    } else {
        total_loan_amount / term
    }
}
