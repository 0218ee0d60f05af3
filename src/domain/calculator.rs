//! Order-level weight, cost and profit calculation.
//!
//! Everything in this module is a pure recomputation over the fetched orders
//! and the product catalog; results are never persisted on their own.

use std::collections::HashMap;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

use super::entities::{
    Order, OrderId, OrderLineItem, OrderStatus, Product, ProductId, ShippingOption,
};
use super::rates::cheapest_options;

/// Aggregated weight, cost and revenue of one order's line items.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrderTotals {
    pub total_weight_kg: Decimal,
    pub purchase_cost: Decimal,
    pub revenue: Decimal,
    /// Product ids that could not be resolved against the catalog. Their
    /// lines contribute nothing to the totals above.
    pub unresolved: Vec<ProductId>,
}

impl OrderTotals {
    pub fn has_gaps(&self) -> bool {
        !self.unresolved.is_empty()
    }
}

/// Where an order's shipping cost figure came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShippingCostSource {
    /// An option the admin already recorded on the order.
    Selected,
    /// The cheapest qualifying tier from the rate table.
    Cheapest,
    /// No tier can carry the shipment; cost falls back to zero.
    Unavailable,
}

impl ShippingCostSource {
    pub fn label(&self) -> &'static str {
        match self {
            ShippingCostSource::Selected => "selected",
            ShippingCostSource::Cheapest => "cheapest",
            ShippingCostSource::Unavailable => "n/a",
        }
    }
}

/// Derived per-order figures, recomputed on every data reload.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderCalculation {
    pub order_id: OrderId,
    pub institution: String,
    pub status: OrderStatus,
    pub totals: OrderTotals,
    /// Up to two qualifying rate-table tiers, cheapest first.
    pub candidates: Vec<ShippingOption>,
    pub shipping_cost: Decimal,
    pub shipping_source: ShippingCostSource,
    pub profit: Decimal,
}

impl OrderCalculation {
    pub fn shipping_locked(&self) -> bool {
        self.status.locks_shipping()
    }
}

/// Sums weight, purchase cost and revenue over an order's line items.
///
/// Gram weights are normalized to kilograms before multiplying by quantity.
/// The per-unit sale price is the order line's quoted price when positive,
/// otherwise the catalog sale price. Lines whose product is missing from the
/// catalog are collected in `unresolved` instead of aborting the calculation.
pub fn aggregate_order(
    items: &[OrderLineItem],
    catalog: &HashMap<ProductId, Product>,
) -> OrderTotals {
    let mut totals = OrderTotals::default();

    for item in items {
        let Some(product) = catalog.get(&item.product_id) else {
            warn!(product_id = %item.product_id, "order line references unknown product, skipping");
            totals.unresolved.push(item.product_id.clone());
            continue;
        };

        let quantity = Decimal::from(item.quantity);
        let sale_price = if item.price_per_unit > Decimal::ZERO {
            item.price_per_unit
        } else {
            product.sale_price
        };

        totals.total_weight_kg += product.unit_weight_kg() * quantity;
        totals.purchase_cost += product.purchase_price * quantity;
        totals.revenue += sale_price * quantity;
    }

    totals
}

/// Computes the full derived figure set for one order.
///
/// Shipping cost priority: recorded selection, then cheapest candidate, then
/// zero when nothing can carry the weight.
pub fn calculate_order(order: &Order, catalog: &HashMap<ProductId, Product>) -> OrderCalculation {
    let totals = aggregate_order(&order.items, catalog);
    let candidates = cheapest_options(totals.total_weight_kg);

    let (shipping_cost, shipping_source) = match (&order.selected_shipping, candidates.first()) {
        (Some(selected), _) => (selected.price, ShippingCostSource::Selected),
        (None, Some(cheapest)) => (cheapest.price, ShippingCostSource::Cheapest),
        (None, None) => (Decimal::ZERO, ShippingCostSource::Unavailable),
    };

    let profit = totals.revenue - totals.purchase_cost - shipping_cost;

    OrderCalculation {
        order_id: order.id.clone(),
        institution: order.institution.clone(),
        status: order.status,
        totals,
        candidates,
        shipping_cost,
        shipping_source,
        profit,
    }
}

/// Recomputes every order sequentially against one catalog snapshot.
pub fn calculate_orders(
    orders: &[Order],
    catalog: &HashMap<ProductId, Product>,
) -> Vec<OrderCalculation> {
    orders
        .iter()
        .map(|order| calculate_order(order, catalog))
        .collect()
}

/// Why a shipping selection was refused before reaching the backend.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("shipping can no longer change once an order is {0}")]
    Locked(&'static str),
    #[error("{carrier} {package} is not a candidate for this shipment weight")]
    NotACandidate { carrier: String, package: String },
}

/// Checks a chosen option against the order's lock state and its
/// weight-derived candidate list. The backend persists whatever it is sent,
/// so this is the only gate a price passes before being recorded.
pub fn validate_shipping_selection(
    calculation: &OrderCalculation,
    choice: &ShippingOption,
) -> Result<(), SelectionError> {
    if calculation.shipping_locked() {
        return Err(SelectionError::Locked(calculation.status.label()));
    }

    if !calculation.candidates.contains(choice) {
        return Err(SelectionError::NotACandidate {
            carrier: choice.carrier.clone(),
            package: choice.package_name.clone(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use time::OffsetDateTime;

    use super::*;
    use crate::domain::entities::{SelectedShipping, WeightUnit};

    fn product(id: &str, purchase: Decimal, sale: Decimal, weight: Decimal, unit: WeightUnit) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            purchase_price: purchase,
            sale_price: sale,
            weight,
            weight_unit: unit,
            in_stock: Some(100),
        }
    }

    fn catalog_of(products: Vec<Product>) -> HashMap<ProductId, Product> {
        products.into_iter().map(|p| (p.id.clone(), p)).collect()
    }

    fn line(product_id: &str, quantity: u32, price_per_unit: Decimal) -> OrderLineItem {
        OrderLineItem {
            product_id: product_id.to_string(),
            quantity,
            price_per_unit,
        }
    }

    fn order(id: &str, status: OrderStatus, items: Vec<OrderLineItem>) -> Order {
        Order {
            id: id.to_string(),
            institution: "Seniorenheim Rosenhof".to_string(),
            status,
            created_at: OffsetDateTime::UNIX_EPOCH,
            items,
            selected_shipping: None,
        }
    }

    #[test]
    fn aggregates_weight_cost_and_revenue() {
        let catalog = catalog_of(vec![
            product("a", dec!(1.50), dec!(3.00), dec!(0.5), WeightUnit::Kilograms),
            product("b", dec!(5.00), dec!(9.00), dec!(1000), WeightUnit::Grams),
        ]);
        let items = vec![line("a", 2, dec!(3.00)), line("b", 1, dec!(9.00))];

        let totals = aggregate_order(&items, &catalog);

        assert_eq!(totals.total_weight_kg, dec!(2.0));
        assert_eq!(totals.purchase_cost, dec!(8.00));
        assert_eq!(totals.revenue, dec!(15.00));
        assert!(!totals.has_gaps());
    }

    #[test]
    fn gram_weights_are_normalized_per_unit() {
        let catalog = catalog_of(vec![product(
            "wipes",
            dec!(0.80),
            dec!(1.95),
            dec!(500),
            WeightUnit::Grams,
        )]);
        let totals = aggregate_order(&[line("wipes", 1, dec!(1.95))], &catalog);
        assert_eq!(totals.total_weight_kg, dec!(0.5));
    }

    #[test]
    fn unknown_products_are_collected_not_fatal() {
        let catalog = catalog_of(vec![product(
            "known",
            dec!(2.00),
            dec!(4.00),
            dec!(1),
            WeightUnit::Kilograms,
        )]);
        let items = vec![line("known", 1, dec!(4.00)), line("ghost", 3, dec!(2.50))];

        let totals = aggregate_order(&items, &catalog);

        assert_eq!(totals.unresolved, vec!["ghost".to_string()]);
        assert_eq!(totals.total_weight_kg, dec!(1));
        assert_eq!(totals.revenue, dec!(4.00));
        assert!(totals.has_gaps());
    }

    #[test]
    fn quoted_line_price_wins_over_catalog_price() {
        let catalog = catalog_of(vec![product(
            "gloves",
            dec!(1.00),
            dec!(2.50),
            dec!(0.2),
            WeightUnit::Kilograms,
        )]);
        let totals = aggregate_order(&[line("gloves", 4, dec!(2.20))], &catalog);
        assert_eq!(totals.revenue, dec!(8.80));

        let fallback = aggregate_order(&[line("gloves", 4, Decimal::ZERO)], &catalog);
        assert_eq!(fallback.revenue, dec!(10.00));
    }

    #[test]
    fn profit_is_exact_to_the_cent() {
        let catalog = catalog_of(vec![
            product("a", dec!(1.50), dec!(3.00), dec!(0.5), WeightUnit::Kilograms),
            product("b", dec!(5.00), dec!(9.00), dec!(1000), WeightUnit::Grams),
        ]);
        let mut subject = order(
            "o-1",
            OrderStatus::Confirmed,
            vec![line("a", 2, dec!(3.00)), line("b", 1, dec!(9.00))],
        );
        subject.selected_shipping = Some(SelectedShipping {
            carrier: "DHL".to_string(),
            price: dec!(6.99),
        });

        let calc = calculate_order(&subject, &catalog);

        assert_eq!(calc.shipping_source, ShippingCostSource::Selected);
        assert_eq!(calc.profit, dec!(0.01));
    }

    #[test]
    fn falls_back_to_cheapest_candidate_then_zero() {
        let catalog = catalog_of(vec![product(
            "light",
            dec!(1.00),
            dec!(2.00),
            dec!(0.5),
            WeightUnit::Kilograms,
        )]);
        let cheap = calculate_order(
            &order("o-2", OrderStatus::Pending, vec![line("light", 1, dec!(2.00))]),
            &catalog,
        );
        assert_eq!(cheap.shipping_source, ShippingCostSource::Cheapest);
        assert_eq!(cheap.shipping_cost, cheap.candidates[0].price);

        let heavy_catalog = catalog_of(vec![product(
            "pallet",
            dec!(10.00),
            dec!(30.00),
            dec!(90),
            WeightUnit::Kilograms,
        )]);
        let heavy = calculate_order(
            &order("o-3", OrderStatus::Pending, vec![line("pallet", 1, dec!(30.00))]),
            &heavy_catalog,
        );
        assert!(heavy.candidates.is_empty());
        assert_eq!(heavy.shipping_source, ShippingCostSource::Unavailable);
        assert_eq!(heavy.shipping_cost, Decimal::ZERO);
        assert_eq!(heavy.profit, dec!(20.00));
    }

    #[test]
    fn selection_is_rejected_after_shipment() {
        let catalog = catalog_of(vec![product(
            "light",
            dec!(1.00),
            dec!(2.00),
            dec!(0.5),
            WeightUnit::Kilograms,
        )]);
        let calc = calculate_order(
            &order("o-4", OrderStatus::Shipped, vec![line("light", 1, dec!(2.00))]),
            &catalog,
        );
        let choice = calc.candidates[0].clone();

        assert_eq!(
            validate_shipping_selection(&calc, &choice),
            Err(SelectionError::Locked("Shipped"))
        );
    }

    #[test]
    fn selection_must_come_from_the_candidate_list() {
        let catalog = catalog_of(vec![product(
            "light",
            dec!(1.00),
            dec!(2.00),
            dec!(0.5),
            WeightUnit::Kilograms,
        )]);
        let calc = calculate_order(
            &order("o-5", OrderStatus::Pending, vec![line("light", 1, dec!(2.00))]),
            &catalog,
        );

        let made_up = ShippingOption {
            carrier: "DHL".to_string(),
            package_name: "Paket 31,5 kg".to_string(),
            price: dec!(0.01),
            max_weight_kg: dec!(31.5),
        };
        assert!(matches!(
            validate_shipping_selection(&calc, &made_up),
            Err(SelectionError::NotACandidate { .. })
        ));

        let legitimate = calc.candidates[0].clone();
        assert_eq!(validate_shipping_selection(&calc, &legitimate), Ok(()));
    }
}
