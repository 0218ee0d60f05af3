#![allow(dead_code)]

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Identifier for products as issued by the platform backend.
pub type ProductId = String;

/// Identifier for orders as issued by the platform backend.
pub type OrderId = String;

/// Unit the warehouse stores a product weight in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightUnit {
    #[serde(rename = "g")]
    Grams,
    #[default]
    #[serde(rename = "kg")]
    Kilograms,
}

impl WeightUnit {
    /// Normalizes a stored weight value to kilograms.
    pub fn to_kilograms(&self, value: Decimal) -> Decimal {
        match self {
            WeightUnit::Grams => value / Decimal::from(1000),
            WeightUnit::Kilograms => value,
        }
    }
}

/// Catalog entry from the warehouse stock endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub purchase_price: Decimal,
    pub sale_price: Decimal,
    pub weight: Decimal,
    pub weight_unit: WeightUnit,
    /// Units currently on hand, when the backend reports it.
    pub in_stock: Option<i64>,
}

impl Product {
    /// Weight of a single unit in kilograms, regardless of storage unit.
    pub fn unit_weight_kg(&self) -> Decimal {
        self.weight_unit.to_kilograms(self.weight)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Packed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Packed => "Packed",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Query-string value the backend expects for this status.
    pub fn as_query(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Packed => "packed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Once a parcel left the building the recorded shipping option is frozen.
    pub fn locks_shipping(&self) -> bool {
        matches!(self, OrderStatus::Shipped | OrderStatus::Delivered)
    }

    pub fn all() -> &'static [OrderStatus] {
        &[
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Packed,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ]
    }
}

/// A single position on an order, as embedded in the orders endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderLineItem {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Per-unit sale price the institution was quoted for this line.
    pub price_per_unit: Decimal,
}

/// Shipping option already persisted on an order.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedShipping {
    pub carrier: String,
    pub price: Decimal,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub institution: String,
    pub status: OrderStatus,
    pub created_at: OffsetDateTime,
    pub items: Vec<OrderLineItem>,
    pub selected_shipping: Option<SelectedShipping>,
}

impl Order {
    pub fn shipping_locked(&self) -> bool {
        self.status.locks_shipping()
    }

    /// True when the order was created in the given month of the given year.
    pub fn in_period(&self, year: i32, month: u8) -> bool {
        self.created_at.year() == year && u8::from(self.created_at.month()) == month
    }
}

/// One row of the fixed carrier rate table: a named package tier with a price
/// and the heaviest shipment it accepts.
#[derive(Clone, Debug, PartialEq)]
pub struct ShippingOption {
    pub carrier: String,
    pub package_name: String,
    pub price: Decimal,
    pub max_weight_kg: Decimal,
}

impl ShippingOption {
    pub fn carries(&self, total_weight_kg: Decimal) -> bool {
        total_weight_kg <= self.max_weight_kg
    }
}

/// Fixed monthly cost buckets the admin enters by hand. Independent of order
/// data and persisted per user, not on the platform backend.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CostInputs {
    pub warehouse_cost: Decimal,
    pub incoming_shipping_cost: Decimal,
}
