use std::sync::atomic::{AtomicUsize, Ordering};

use rust_decimal::Decimal;

pub mod assets;
pub mod persistence;
pub mod version;

static ID_COUNTER: AtomicUsize = AtomicUsize::new(1);

pub fn generate_id(prefix: &str) -> String {
    let value = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{value}")
}

/// Formats a monetary amount for display, e.g. `12.90 €`.
pub fn format_eur(amount: Decimal) -> String {
    format!("{:.2} €", amount)
}

/// Formats a shipment weight for display, e.g. `2.35 kg`.
pub fn format_kg(weight: Decimal) -> String {
    format!("{:.2} kg", weight)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn ids_are_unique_per_prefix() {
        let a = generate_id("row");
        let b = generate_id("row");
        assert_ne!(a, b);
    }

    #[test]
    fn money_formats_with_two_decimals() {
        assert_eq!(format_eur(dec!(3.5)), "3.50 €");
        assert_eq!(format_eur(dec!(0)), "0.00 €");
    }
}
