#![allow(dead_code)]

//! Thin asynchronous client for the ordering platform's REST backend.
//!
//! - Typed accessors for the order list and the warehouse stock.
//! - Persists shipping selections via `PATCH orders/:id/shipping`.
//! - Maintains a 15-minute in-memory cache with stale fallbacks; the product
//!   catalog additionally falls back to an on-disk snapshot when the backend
//!   is unreachable at startup.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, SystemTime},
};

use reqwest::{Client, Url};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::{
    Order, OrderLineItem, OrderStatus, Product, SelectedShipping, ShippingOption, WeightUnit,
};
use crate::infra::cache::{load_stock_cache, save_stock_cache, StockCache};

const DEFAULT_BASE_URL: &str = "http://localhost:4000/api/";
const BASE_URL_ENV: &str = "ORDER_DESK_API_URL";
const TOKEN_ENV: &str = "ORDER_DESK_API_TOKEN";
const DEFAULT_TTL: Duration = Duration::from_secs(15 * 60);
const USER_AGENT: &str = "order-profit-desk/0.5.0";

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error: {0}")]
    Api(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    Fresh,
    Cached,
    Stale,
}

#[derive(Clone, Debug)]
pub struct CachedPayload<T> {
    pub data: T,
    pub fetched_at: SystemTime,
    pub status: CacheStatus,
}

impl<T> CachedPayload<T> {
    fn new(data: T, fetched_at: SystemTime, status: CacheStatus) -> Self {
        Self {
            data,
            fetched_at,
            status,
        }
    }
}

/// Parameters for the order list endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct OrdersQuery {
    pub status: Option<OrderStatus>,
    pub limit: u32,
}

impl Default for OrdersQuery {
    fn default() -> Self {
        Self {
            status: None,
            limit: 200,
        }
    }
}

impl OrdersQuery {
    /// Stable key for caching one query's result set.
    pub fn cache_key(&self) -> String {
        let status = self.status.map(|s| s.as_query()).unwrap_or("all");
        format!("{status}:{limit}", limit = self.limit)
    }
}

#[derive(Default)]
struct ApiCache {
    stock: Option<Cached<Vec<Product>>>,
    orders: HashMap<String, Cached<Vec<Order>>>,
}

impl ApiCache {
    fn clear(&mut self) {
        self.stock = None;
        self.orders.clear();
    }
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    status: String,
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
    cache: Arc<Mutex<ApiCache>>,
    ttl: Duration,
}

impl ApiClient {
    /// Builds a client from the environment, falling back to the local
    /// development backend.
    pub fn new() -> Result<Self, ApiClientError> {
        let base = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let mut client = Self::with_base_url(&base)?;
        client.token = std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty());
        Ok(client)
    }

    pub fn with_base_url(base: &str) -> Result<Self, ApiClientError> {
        let base_url = Url::parse(base)?;
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url,
            token: None,
            cache: Arc::new(Mutex::new(ApiCache::default())),
            ttl: DEFAULT_TTL,
        })
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Loads the full warehouse catalog.
    ///
    /// Fallback chain on failure: stale in-memory copy, then the on-disk
    /// snapshot from a previous run.
    pub async fn get_stock(&self) -> Result<CachedPayload<Vec<Product>>, ApiClientError> {
        if let Some(payload) = self.cached_stock().await {
            return Ok(payload);
        }

        let url = self.url("warehouse/stock")?;
        match self
            .fetch_data::<Vec<StockItemDto>>(self.authorize(self.http.get(url)))
            .await
        {
            Ok(response) => {
                let products = response.into_iter().map(Product::from).collect::<Vec<_>>();
                info!(count = products.len(), "loaded warehouse stock");
                if let Err(err) = save_stock_cache(&StockCache::new(products.clone())) {
                    warn!(%err, "failed to snapshot catalog to disk");
                }
                Ok(self.store_stock(products, CacheStatus::Fresh).await)
            }
            Err(error) => {
                if let Some(stale) = self.cached_stock_stale().await {
                    warn!(%error, "stock fetch failed, serving stale in-memory catalog");
                    return Ok(stale);
                }
                if let Some(snapshot) = load_stock_cache() {
                    warn!(%error, "stock fetch failed, serving on-disk catalog snapshot");
                    let fetched_at = snapshot.fetched_at();
                    let payload =
                        CachedPayload::new(snapshot.products.clone(), fetched_at, CacheStatus::Stale);
                    let mut cache = self.cache.lock().await;
                    cache.stock = Some(Cached::new(snapshot.products, fetched_at));
                    return Ok(payload);
                }
                Err(error)
            }
        }
    }

    /// Loads orders with embedded line items for the given filter.
    pub async fn get_orders(
        &self,
        query: &OrdersQuery,
    ) -> Result<CachedPayload<Vec<Order>>, ApiClientError> {
        let key = query.cache_key();
        if let Some(payload) = self.cached_orders(&key).await {
            debug!(%key, "serving cached order list");
            return Ok(payload);
        }

        let mut url = self.url("orders/all")?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(status) = query.status {
                pairs.append_pair("status", status.as_query());
            }
            pairs.append_pair("limit", &query.limit.to_string());
        }

        match self
            .fetch_data::<OrdersPageDto>(self.authorize(self.http.get(url)))
            .await
        {
            Ok(page) => {
                let orders = page.orders.into_iter().map(Order::from).collect::<Vec<_>>();
                info!(count = orders.len(), %key, "loaded orders");
                Ok(self.store_orders(&key, orders, CacheStatus::Fresh).await)
            }
            Err(error) => {
                if let Some(stale) = self.cached_orders_stale(&key).await {
                    warn!(%error, %key, "order fetch failed, serving stale cache");
                    return Ok(stale);
                }
                Err(error)
            }
        }
    }

    /// Records the chosen shipping option on an order and invalidates every
    /// cached order list so the next load reflects it.
    pub async fn select_shipping(
        &self,
        order_id: &str,
        choice: &ShippingOption,
    ) -> Result<(), ApiClientError> {
        let url = self.url(&format!("orders/{order_id}/shipping"))?;
        let body = ShippingSelectionBody {
            carrier: &choice.carrier,
            price: choice.price,
        };

        self.send_command(self.authorize(self.http.patch(url)).json(&body))
            .await?;

        let mut cache = self.cache.lock().await;
        cache.orders.clear();
        info!(order_id, carrier = %choice.carrier, "persisted shipping selection");
        Ok(())
    }

    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }

    async fn cached_stock(&self) -> Option<CachedPayload<Vec<Product>>> {
        let cache = self.cache.lock().await;
        cache.stock.as_ref().and_then(|entry| entry.if_fresh(self.ttl))
    }

    async fn cached_stock_stale(&self) -> Option<CachedPayload<Vec<Product>>> {
        let cache = self.cache.lock().await;
        cache.stock.as_ref().map(Cached::stale)
    }

    async fn cached_orders(&self, key: &str) -> Option<CachedPayload<Vec<Order>>> {
        let cache = self.cache.lock().await;
        cache.orders.get(key).and_then(|entry| entry.if_fresh(self.ttl))
    }

    async fn cached_orders_stale(&self, key: &str) -> Option<CachedPayload<Vec<Order>>> {
        let cache = self.cache.lock().await;
        cache.orders.get(key).map(Cached::stale)
    }

    async fn store_stock(
        &self,
        data: Vec<Product>,
        status: CacheStatus,
    ) -> CachedPayload<Vec<Product>> {
        let fetched_at = SystemTime::now();
        let payload = CachedPayload::new(data.clone(), fetched_at, status);
        let mut cache = self.cache.lock().await;
        cache.stock = Some(Cached::new(data, fetched_at));
        payload
    }

    async fn store_orders(
        &self,
        key: &str,
        data: Vec<Order>,
        status: CacheStatus,
    ) -> CachedPayload<Vec<Order>> {
        let fetched_at = SystemTime::now();
        let payload = CachedPayload::new(data.clone(), fetched_at, status);
        let mut cache = self.cache.lock().await;
        cache
            .orders
            .insert(key.to_string(), Cached::new(data, fetched_at));
        payload
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn fetch_data<T>(&self, builder: reqwest::RequestBuilder) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
    {
        let response = builder.send().await?.error_for_status()?;
        let envelope: ApiEnvelope<T> = response.json().await?;
        let ApiEnvelope {
            status,
            data,
            message,
        } = envelope;

        if status.eq_ignore_ascii_case("ok") {
            data.ok_or_else(|| ApiClientError::Api("response missing data".into()))
        } else {
            Err(ApiClientError::Api(message.unwrap_or(status)))
        }
    }

    /// Like `fetch_data` for endpoints whose success response carries no body
    /// worth keeping.
    async fn send_command(&self, builder: reqwest::RequestBuilder) -> Result<(), ApiClientError> {
        let response = builder.send().await?.error_for_status()?;
        let envelope: ApiEnvelope<serde_json::Value> = response.json().await?;
        if envelope.status.eq_ignore_ascii_case("ok") {
            Ok(())
        } else {
            Err(ApiClientError::Api(envelope.message.unwrap_or(envelope.status)))
        }
    }

    fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }
}

struct Cached<T> {
    value: T,
    fetched_at: SystemTime,
}

impl<T: Clone> Cached<T> {
    fn new(value: T, fetched_at: SystemTime) -> Self {
        Self { value, fetched_at }
    }

    fn if_fresh(&self, ttl: Duration) -> Option<CachedPayload<T>> {
        if self
            .fetched_at
            .elapsed()
            .map(|elapsed| elapsed <= ttl)
            .unwrap_or(false)
        {
            Some(CachedPayload::new(
                self.value.clone(),
                self.fetched_at,
                CacheStatus::Cached,
            ))
        } else {
            None
        }
    }

    fn stale(&self) -> CachedPayload<T> {
        CachedPayload::new(self.value.clone(), self.fetched_at, CacheStatus::Stale)
    }
}

#[derive(Serialize)]
struct ShippingSelectionBody<'a> {
    carrier: &'a str,
    price: Decimal,
}

#[derive(Debug, Deserialize)]
struct StockItemDto {
    #[serde(deserialize_with = "string_from_json")]
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    purchase_price: Option<Decimal>,
    #[serde(default, alias = "price")]
    sale_price: Option<Decimal>,
    #[serde(default)]
    weight: Option<Decimal>,
    #[serde(default)]
    weight_unit: Option<String>,
    #[serde(default, alias = "stock")]
    amount: Option<i64>,
}

impl From<StockItemDto> for Product {
    fn from(dto: StockItemDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name.unwrap_or_else(|| "Unknown product".to_string()),
            purchase_price: dto.purchase_price.unwrap_or_default(),
            sale_price: dto.sale_price.unwrap_or_default(),
            weight: dto.weight.unwrap_or_default(),
            weight_unit: parse_weight_unit(dto.weight_unit.as_deref()),
            in_stock: dto.amount,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OrderItemDto {
    #[serde(deserialize_with = "string_from_json")]
    product_id: String,
    #[serde(default)]
    quantity: Option<u32>,
    #[serde(default)]
    price_per_unit: Option<Decimal>,
}

impl From<OrderItemDto> for OrderLineItem {
    fn from(dto: OrderItemDto) -> Self {
        Self {
            product_id: dto.product_id,
            quantity: dto.quantity.unwrap_or(1).max(1),
            price_per_unit: dto.price_per_unit.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OrderDto {
    #[serde(deserialize_with = "string_from_json")]
    id: String,
    #[serde(default, alias = "institution")]
    institution_name: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default, alias = "line_items")]
    items: Vec<OrderItemDto>,
    #[serde(default)]
    selected_shipping_carrier: Option<String>,
    #[serde(default)]
    selected_shipping_price: Option<Decimal>,
}

impl From<OrderDto> for Order {
    fn from(dto: OrderDto) -> Self {
        let selected_shipping = match (dto.selected_shipping_carrier, dto.selected_shipping_price) {
            (Some(carrier), Some(price)) => Some(SelectedShipping { carrier, price }),
            _ => None,
        };

        Self {
            id: dto.id,
            institution: dto
                .institution_name
                .unwrap_or_else(|| "Unknown institution".to_string()),
            status: parse_status(dto.status.as_deref()),
            created_at: parse_timestamp(dto.created_at.as_deref()),
            items: dto.items.into_iter().map(OrderLineItem::from).collect(),
            selected_shipping,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OrdersPageDto {
    #[serde(default)]
    orders: Vec<OrderDto>,
    /// Reported by the backend for pagination; unused here since the limit is
    /// part of the query.
    #[serde(default)]
    #[allow(dead_code)]
    total: Option<u64>,
}

fn parse_weight_unit(raw: Option<&str>) -> WeightUnit {
    match raw.map(str::trim) {
        Some(value) if value.eq_ignore_ascii_case("g") || value.eq_ignore_ascii_case("gram") || value.eq_ignore_ascii_case("grams") => {
            WeightUnit::Grams
        }
        _ => WeightUnit::Kilograms,
    }
}

fn parse_status(raw: Option<&str>) -> OrderStatus {
    match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
        Some("confirmed") => OrderStatus::Confirmed,
        Some("packed") => OrderStatus::Packed,
        Some("shipped") => OrderStatus::Shipped,
        Some("delivered") => OrderStatus::Delivered,
        Some("cancelled") | Some("canceled") => OrderStatus::Cancelled,
        _ => OrderStatus::Pending,
    }
}

fn parse_timestamp(raw: Option<&str>) -> OffsetDateTime {
    raw.and_then(|value| OffsetDateTime::parse(value, &Rfc3339).ok())
        .unwrap_or_else(OffsetDateTime::now_utc)
}

fn string_from_json<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct StringOrNumber;

    impl<'de> serde::de::Visitor<'de> for StringOrNumber {
        type Value = String;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or number")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(StringOrNumber)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn order_dto_maps_numeric_ids_and_selection() {
        let json = r#"{
            "id": 4711,
            "institution": "Pflegeheim Am Park",
            "status": "Shipped",
            "created_at": "2026-03-14T09:30:00Z",
            "line_items": [
                {"product_id": 12, "quantity": 3, "price_per_unit": 2.5},
                {"product_id": "sku-9"}
            ],
            "selected_shipping_carrier": "DHL",
            "selected_shipping_price": 6.99
        }"#;

        let order = Order::from(serde_json::from_str::<OrderDto>(json).unwrap());

        assert_eq!(order.id, "4711");
        assert_eq!(order.institution, "Pflegeheim Am Park");
        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(order.created_at.year(), 2026);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].product_id, "12");
        assert_eq!(order.items[1].quantity, 1);
        let selected = order.selected_shipping.unwrap();
        assert_eq!(selected.price, dec!(6.99));
    }

    #[test]
    fn stock_dto_maps_weight_units_and_aliases() {
        let json = r#"{
            "id": "p-1",
            "name": "Compression bandage",
            "purchase_price": "1.20",
            "price": 2.9,
            "weight": 250,
            "weight_unit": "g",
            "stock": 48
        }"#;

        let product = Product::from(serde_json::from_str::<StockItemDto>(json).unwrap());

        assert_eq!(product.weight_unit, WeightUnit::Grams);
        assert_eq!(product.unit_weight_kg(), dec!(0.25));
        assert_eq!(product.sale_price, dec!(2.9));
        assert_eq!(product.in_stock, Some(48));
    }

    #[test]
    fn unknown_status_defaults_to_pending() {
        assert_eq!(parse_status(Some("in_limbo")), OrderStatus::Pending);
        assert_eq!(parse_status(None), OrderStatus::Pending);
        assert_eq!(parse_status(Some("Delivered")), OrderStatus::Delivered);
    }

    #[test]
    fn query_cache_keys_distinguish_filters() {
        let all = OrdersQuery::default();
        let shipped = OrdersQuery {
            status: Some(OrderStatus::Shipped),
            limit: 50,
        };
        assert_eq!(all.cache_key(), "all:200");
        assert_eq!(shipped.cache_key(), "shipped:50");
        assert_ne!(all.cache_key(), shipped.cache_key());
    }
}
