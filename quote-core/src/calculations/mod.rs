//! Quote calculations.
//!
//! [`engine`] derives the loan figures from a [`FinanceInput`](crate::FinanceInput),
//! [`reconcile`] keeps cost, profit and selling price consistent while one of
//! them is edited, and [`common`] holds presentation helpers.

pub mod common;
pub mod engine;
pub mod reconcile;

pub use engine::compute;
pub use reconcile::{by_cost, by_profit, by_selling_price};
