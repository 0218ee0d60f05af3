//! Portfolio-level cost coverage.
//!
//! Distributes the period's accumulated profit proportionally across the two
//! fixed cost buckets (warehouse, incoming + outgoing shipping) and reports
//! what remains as net profit once both buckets are full.

use rust_decimal::Decimal;

use super::entities::CostInputs;

/// Coverage state of one fixed cost bucket.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BucketCoverage {
    pub total: Decimal,
    pub filled: Decimal,
    /// 0–100, capped at 100.
    pub coverage_pct: Decimal,
}

impl BucketCoverage {
    fn at_ratio(total: Decimal, fill_ratio: Decimal) -> Self {
        Self {
            total,
            filled: total * fill_ratio,
            coverage_pct: fill_ratio * Decimal::ONE_HUNDRED,
        }
    }

    pub fn is_covered(&self) -> bool {
        self.coverage_pct >= Decimal::ONE_HUNDRED
    }
}

/// Result of one allocation pass over the filtered period.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CoverageReport {
    pub warehouse: BucketCoverage,
    pub shipping: BucketCoverage,
    pub total_costs: Decimal,
    /// Profit left after both buckets are fully covered; zero otherwise.
    pub net_profit: Decimal,
    /// How far profit falls short of covering the buckets. Carries the loss
    /// magnitude when the period is negative instead of hiding it.
    pub shortfall: Decimal,
}

/// Allocates `profit` across the fixed buckets.
///
/// `order_shipping_total` is the sum of per-order shipping costs for the
/// period; it joins the incoming-shipping input to form the shipping bucket.
/// Pure and idempotent: identical inputs always produce identical reports.
pub fn allocate_profit(
    profit: Decimal,
    inputs: &CostInputs,
    order_shipping_total: Decimal,
) -> CoverageReport {
    let shipping_bucket = inputs.incoming_shipping_cost + order_shipping_total;
    let total_costs = inputs.warehouse_cost + shipping_bucket;

    if total_costs.is_zero() {
        return CoverageReport {
            warehouse: BucketCoverage::default(),
            shipping: BucketCoverage::default(),
            total_costs,
            net_profit: profit.max(Decimal::ZERO),
            shortfall: (-profit).max(Decimal::ZERO),
        };
    }

    let fill_ratio = if profit > Decimal::ZERO {
        (profit / total_costs).min(Decimal::ONE)
    } else {
        Decimal::ZERO
    };

    // Only a fully covered period leaves net profit; partial fills consume
    // everything by construction, so skip the sum-of-filled residue.
    let net_profit = if fill_ratio == Decimal::ONE {
        profit - total_costs
    } else {
        Decimal::ZERO
    };

    CoverageReport {
        warehouse: BucketCoverage::at_ratio(inputs.warehouse_cost, fill_ratio),
        shipping: BucketCoverage::at_ratio(shipping_bucket, fill_ratio),
        total_costs,
        net_profit,
        shortfall: (total_costs - profit).max(Decimal::ZERO),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn inputs(warehouse: Decimal, incoming: Decimal) -> CostInputs {
        CostInputs {
            warehouse_cost: warehouse,
            incoming_shipping_cost: incoming,
        }
    }

    #[test]
    fn half_covered_warehouse_reports_no_net_profit() {
        let report = allocate_profit(dec!(50), &inputs(dec!(100), Decimal::ZERO), Decimal::ZERO);

        assert_eq!(report.warehouse.coverage_pct, dec!(50));
        assert_eq!(report.warehouse.filled, dec!(50.0));
        assert_eq!(report.net_profit, Decimal::ZERO);
        assert_eq!(report.shortfall, dec!(50));
    }

    #[test]
    fn profit_splits_proportionally_across_buckets() {
        let report = allocate_profit(dec!(150), &inputs(dec!(200), dec!(50)), dec!(50));

        // 150 / 300 = 50% fill on both buckets.
        assert_eq!(report.warehouse.coverage_pct, dec!(50));
        assert_eq!(report.shipping.coverage_pct, dec!(50));
        assert_eq!(report.warehouse.filled, dec!(100.0));
        assert_eq!(report.shipping.filled, dec!(50.0));
        assert_eq!(report.net_profit, Decimal::ZERO);
    }

    #[test]
    fn surplus_beyond_full_coverage_is_net_profit() {
        let report = allocate_profit(dec!(400), &inputs(dec!(200), dec!(100)), Decimal::ZERO);

        assert!(report.warehouse.is_covered());
        assert!(report.shipping.is_covered());
        assert_eq!(report.warehouse.coverage_pct, dec!(100));
        assert_eq!(report.net_profit, dec!(100));
        assert_eq!(report.shortfall, Decimal::ZERO);
    }

    #[test]
    fn zero_costs_pass_profit_straight_through() {
        let report = allocate_profit(dec!(75.50), &inputs(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
        assert_eq!(report.net_profit, dec!(75.50));
        assert_eq!(report.shortfall, Decimal::ZERO);
        assert_eq!(report.warehouse.coverage_pct, Decimal::ZERO);
    }

    #[test]
    fn losses_show_zero_coverage_but_surface_the_deficit() {
        let report = allocate_profit(dec!(-40), &inputs(dec!(100), Decimal::ZERO), dec!(10));

        assert_eq!(report.warehouse.coverage_pct, Decimal::ZERO);
        assert_eq!(report.shipping.coverage_pct, Decimal::ZERO);
        assert_eq!(report.net_profit, Decimal::ZERO);
        // 110 of costs plus the 40 loss.
        assert_eq!(report.shortfall, dec!(150));
    }

    #[test]
    fn allocation_is_idempotent() {
        let cost_inputs = inputs(dec!(120), dec!(30));
        let first = allocate_profit(dec!(90), &cost_inputs, dec!(25.47));
        let second = allocate_profit(dec!(90), &cost_inputs, dec!(25.47));
        assert_eq!(first, second);
    }
}
