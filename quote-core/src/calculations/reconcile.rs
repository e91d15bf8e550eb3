//! Keeps `selling_price == cost + profit` while one of the three is edited.
//!
//! Each function changes exactly the edited field and its single dependent
//! field. Nothing is validated; a selling price below cost simply produces a
//! negative profit.

use crate::models::FinanceInput;

/// Set the cost and move the selling price with it.
pub fn by_cost(
    input: &FinanceInput,
    cost: f64,
) -> FinanceInput {
    FinanceInput {
        cost,
        selling_price: cost + input.profit,
        ..*input
    }
}

/// Set the profit and move the selling price with it.
pub fn by_profit(
    input: &FinanceInput,
    profit: f64,
) -> FinanceInput {
    FinanceInput {
        profit,
        selling_price: input.cost + profit,
        ..*input
    }
}

/// Set the selling price and derive the profit from the current cost.
pub fn by_selling_price(
    input: &FinanceInput,
    selling_price: f64,
) -> FinanceInput {
    FinanceInput {
        selling_price,
        profit: selling_price - input.cost,
        ..*input
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn base() -> FinanceInput {
        FinanceInput {
            cost: 5000.0,
            profit: 2000.0,
            selling_price: 7000.0,
            term: 12.0,
            rate: 5.0,
            out_of_pocket: 1000.0,
            tax_rate: 8.0,
        }
    }

    #[test]
    fn by_cost_updates_selling_price() {
        let updated = by_cost(&base(), 6000.0);

        assert_eq!(
            updated,
            FinanceInput {
                cost: 6000.0,
                selling_price: 8000.0,
                ..base()
            }
        );
    }

    #[test]
    fn by_profit_updates_selling_price() {
        let updated = by_profit(&base(), 3000.0);

        assert_eq!(
            updated,
            FinanceInput {
                profit: 3000.0,
                selling_price: 8000.0,
                ..base()
            }
        );
    }

    #[test]
    fn by_selling_price_updates_profit() {
        let updated = by_selling_price(&base(), 9000.0);

        assert_eq!(
            updated,
            FinanceInput {
                selling_price: 9000.0,
                profit: 4000.0,
                ..base()
            }
        );
    }

    #[test]
    fn selling_price_below_cost_gives_negative_profit() {
        let updated = by_selling_price(&base(), 4500.0);

        assert_eq!(updated.profit, -500.0);
    }

    #[test]
    fn input_argument_is_not_modified() {
        let input = base();

        let _ = by_cost(&input, 1.0);

        assert_eq!(input, base());
    }

    #[test]
    fn invariant_holds_after_every_edit() {
        let values = [0.0, 0.1, 1.5, 99.99, 12345.678, -250.0, 1e9];

        for &x in &values {
            for &y in &values {
                let start = FinanceInput {
                    cost: y,
                    profit: y / 3.0,
                    selling_price: y + y / 3.0,
                    ..FinanceInput::default()
                };

                let a = by_cost(&start, x);
                assert_eq!(a.selling_price, a.cost + a.profit, "by_cost({y}, {x})");

                let b = by_profit(&start, x);
                assert_eq!(b.selling_price, b.cost + b.profit, "by_profit({y}, {x})");
            }
        }
    }

    #[test]
    fn invariant_holds_after_selling_price_edit_on_exact_values() {
        // Subtraction then re-addition is exact for values sharing a binary scale.
        for &(cost, price) in &[(5000.0, 7000.0), (0.0, 0.0), (1000.5, 250.25), (64.0, 1024.0)] {
            let start = FinanceInput {
                cost,
                ..FinanceInput::default()
            };

            let updated = by_selling_price(&start, price);

            assert_eq!(updated.selling_price, updated.cost + updated.profit);
        }
    }
}
