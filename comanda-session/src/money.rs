//! Money calculation utilities using rust_decimal for precision
//!
//! All totals are computed in `Decimal` internally and converted to `f64`
//! only at the serialization edge.

use rust_decimal::prelude::*;
use serde::Serialize;
use shared::order::ItemLine;

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Sales tax rate applied to the order subtotal (3%)
const TAX_RATE: Decimal = Decimal::from_parts(3, 0, 0, false, 2);

/// Derived bill totals for the composition view
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrderTotals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

fn line_total(line: &ItemLine) -> Decimal {
    Decimal::from_f64(line.price).unwrap_or_default() * Decimal::from(line.quantity)
}

/// Compute subtotal, tax and total over the current item lines.
pub fn totals(items: &[ItemLine]) -> OrderTotals {
    let subtotal = round(items.iter().map(line_total).sum());
    let tax = round(subtotal * TAX_RATE);
    let total = subtotal + tax;

    OrderTotals {
        subtotal: subtotal.to_f64().unwrap_or(0.0),
        tax: tax.to_f64().unwrap_or(0.0),
        total: total.to_f64().unwrap_or(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::ItemStatus;

    fn line(price: f64, quantity: i32) -> ItemLine {
        ItemLine {
            item_id: None,
            menu_item_id: 1,
            name: "Test".to_string(),
            price,
            quantity,
            status: ItemStatus::Draft,
        }
    }

    #[test]
    fn totals_apply_three_percent_tax() {
        let totals = totals(&[line(4.50, 1)]);
        assert_eq!(totals.subtotal, 4.50);
        assert_eq!(totals.tax, 0.14);
        assert_eq!(totals.total, 4.64);
    }

    #[test]
    fn totals_multiply_by_quantity() {
        let totals = totals(&[line(2.00, 3), line(1.25, 1)]);
        assert_eq!(totals.subtotal, 7.25);
        assert_eq!(totals.tax, 0.22);
        assert_eq!(totals.total, 7.47);
    }

    #[test]
    fn empty_order_has_zero_totals() {
        let totals = totals(&[]);
        assert_eq!(totals.subtotal, 0.0);
        assert_eq!(totals.tax, 0.0);
        assert_eq!(totals.total, 0.0);
    }
}
