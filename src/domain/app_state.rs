#![allow(dead_code)]

use std::{
    collections::HashMap,
    time::{Duration, SystemTime},
};

use serde::{Deserialize, Serialize};

use super::entities::{CostInputs, Order, Product, ProductId};

/// Current settings schema. Bump when `PersistedState` changes shape so stale
/// documents can be migrated instead of silently misread.
pub const SETTINGS_SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    /// Fixed cost buckets the admin entered; persisted per user.
    pub cost_inputs: CostInputs,
    pub cache: CacheTimestamps,
    /// Monotonic counter for order loads. A fetch that completes under an
    /// older generation than the latest request is discarded, so rapid filter
    /// changes cannot overwrite fresher data with stale responses.
    pub load_generation: u64,
}

impl AppState {
    /// Registers a new order load and returns its generation tag.
    pub fn begin_order_load(&mut self) -> u64 {
        self.load_generation += 1;
        self.load_generation
    }

    /// Whether a fetch tagged with `generation` is still the latest one.
    pub fn is_current_load(&self, generation: u64) -> bool {
        self.load_generation == generation
    }

    /// Catalog keyed by product id, the shape the calculator consumes.
    pub fn product_index(&self) -> HashMap<ProductId, Product> {
        self.products
            .iter()
            .map(|product| (product.id.clone(), product.clone()))
            .collect()
    }

    pub fn is_stale(&self, resource: &CacheResource, ttl: Duration) -> bool {
        self.cache.is_stale(resource, ttl)
    }

    pub fn apply_persisted(&mut self, persisted: PersistedState) {
        self.cost_inputs = persisted.cost_inputs;
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            schema_version: SETTINGS_SCHEMA_VERSION,
            cost_inputs: self.cost_inputs.clone(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct CacheTimestamps {
    entries: HashMap<CacheResource, SystemTime>,
}

impl CacheTimestamps {
    pub fn record_fetch(&mut self, resource: CacheResource, fetched_at: SystemTime) {
        self.entries.insert(resource, fetched_at);
    }

    pub fn fetched_at(&self, resource: &CacheResource) -> Option<SystemTime> {
        self.entries.get(resource).copied()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CacheResource, &SystemTime)> {
        self.entries.iter()
    }

    pub fn is_stale(&self, resource: &CacheResource, ttl: Duration) -> bool {
        self.fetched_at(resource)
            .map(|time| time.elapsed().map(|elapsed| elapsed > ttl).unwrap_or(true))
            .unwrap_or(true)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheResource {
    Stock,
    /// Keyed by the order query (status filter + limit) that produced it.
    Orders(String),
}

/// What survives an app restart: the admin's cost buckets, nothing fetched.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub schema_version: u32,
    #[serde(default)]
    pub cost_inputs: CostInputs,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn generations_invalidate_older_loads() {
        let mut state = AppState::default();
        let first = state.begin_order_load();
        let second = state.begin_order_load();

        assert!(!state.is_current_load(first));
        assert!(state.is_current_load(second));
    }

    #[test]
    fn persisted_state_round_trips_cost_inputs() {
        let mut state = AppState::default();
        state.cost_inputs = CostInputs {
            warehouse_cost: dec!(1200),
            incoming_shipping_cost: dec!(340.50),
        };

        let json = serde_json::to_string(&state.to_persisted()).unwrap();
        let restored: PersistedState = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.schema_version, SETTINGS_SCHEMA_VERSION);
        assert_eq!(restored.cost_inputs, state.cost_inputs);
    }

    #[test]
    fn settings_without_version_field_still_load() {
        // Documents written before versioning default to schema 0.
        let legacy = r#"{"cost_inputs":{"warehouse_cost":"100","incoming_shipping_cost":"25"}}"#;
        let restored: PersistedState = serde_json::from_str(legacy).unwrap();
        assert_eq!(restored.schema_version, 0);
        assert_eq!(restored.cost_inputs.warehouse_cost, dec!(100));
    }
}
