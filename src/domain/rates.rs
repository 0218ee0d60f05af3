//! Fixed carrier rate table and cheapest-option lookup for outgoing parcels.

use std::sync::OnceLock;

use rust_decimal::Decimal;

use super::entities::ShippingOption;

/// At most this many candidate options are offered per order.
pub const MAX_CANDIDATES: usize = 2;

fn tier(carrier: &str, package_name: &str, price_cents: i64, max_weight_grams: i64) -> ShippingOption {
    ShippingOption {
        carrier: carrier.to_string(),
        package_name: package_name.to_string(),
        price: Decimal::new(price_cents, 2),
        max_weight_kg: Decimal::new(max_weight_grams, 3),
    }
}

/// The negotiated carrier rates. Table order matters: equal-priced tiers keep
/// their position when candidates are ranked.
pub fn rate_table() -> &'static [ShippingOption] {
    static TABLE: OnceLock<Vec<ShippingOption>> = OnceLock::new();
    TABLE.get_or_init(|| {
        vec![
            tier("DHL", "Päckchen S", 3_99, 2_000),
            tier("Hermes", "Päckchen", 4_50, 2_000),
            tier("DPD", "Classic XS", 4_90, 3_000),
            tier("DHL", "Paket 2 kg", 5_49, 2_000),
            tier("DPD", "Classic S", 5_90, 8_000),
            tier("DHL", "Paket 5 kg", 6_99, 5_000),
            tier("DPD", "Classic M", 9_90, 20_000),
            tier("DHL", "Paket 10 kg", 10_49, 10_000),
            tier("GLS", "Business M", 16_90, 31_500),
            tier("DHL", "Paket 31,5 kg", 19_99, 31_500),
            tier("GLS", "Business L", 21_90, 40_000),
        ]
    })
}

/// Returns the up-to-two cheapest tiers able to carry `total_weight_kg`.
///
/// The sort is stable, so equal prices fall back to table order. An empty
/// result means no tier can take the shipment; callers treat that as "no
/// shipping cost available", not as an error.
pub fn cheapest_options(total_weight_kg: Decimal) -> Vec<ShippingOption> {
    let mut qualifying: Vec<ShippingOption> = rate_table()
        .iter()
        .filter(|option| option.carries(total_weight_kg))
        .cloned()
        .collect();
    qualifying.sort_by(|a, b| a.price.cmp(&b.price));
    qualifying.truncate(MAX_CANDIDATES);
    qualifying
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn candidates_are_sorted_and_capped() {
        for weight in [dec!(0.1), dec!(1.5), dec!(2.0), dec!(7.5), dec!(19.0), dec!(31.5)] {
            let options = cheapest_options(weight);
            assert!(options.len() <= MAX_CANDIDATES);
            assert!(options.iter().all(|option| option.max_weight_kg >= weight));
            if let [first, second] = options.as_slice() {
                assert!(first.price <= second.price);
            }
        }
    }

    #[test]
    fn light_parcel_gets_the_cheapest_tier() {
        let options = cheapest_options(dec!(0.5));
        assert_eq!(options[0].carrier, "DHL");
        assert_eq!(options[0].package_name, "Päckchen S");
        assert_eq!(options[0].price, dec!(3.99));
    }

    #[test]
    fn boundary_weight_still_qualifies() {
        // 2.0 kg is inclusive for the 2 kg tiers.
        let options = cheapest_options(dec!(2.0));
        assert_eq!(options[0].price, dec!(3.99));
        assert_eq!(options[1].price, dec!(4.50));
    }

    #[test]
    fn overweight_shipment_yields_no_options() {
        assert!(cheapest_options(dec!(40.001)).is_empty());
        assert!(cheapest_options(dec!(120)).is_empty());
    }

    #[test]
    fn equal_prices_keep_table_order() {
        let mut table = vec![
            tier("A", "One", 5_00, 10_000),
            tier("B", "Two", 5_00, 10_000),
        ];
        table.sort_by(|a, b| a.price.cmp(&b.price));
        assert_eq!(table[0].carrier, "A");
        assert_eq!(table[1].carrier, "B");
    }
}
