use dioxus::{prelude::*, signals::Signal};
use tracing::{debug, warn};

use crate::{
    domain::{AppState, CacheResource},
    infra::api::{ApiClient, CacheStatus, OrdersQuery},
    ui::{
        components::toast::{push_toast, Toast, ToastKind, ToastMessage},
        pages::{DashboardPage, OrdersPage, SettingsPage},
        shell::Shell,
    },
    util::{
        assets,
        persistence::{load_persisted_state, save_persisted_state},
    },
};

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    Dashboard {},
    #[route("/orders")]
    Orders {},
    #[route("/settings")]
    Settings {},
}

/// Shared handle to the backend client. `None` when construction failed; the
/// fetch paths surface that as a toast instead of crashing the UI.
#[derive(Clone)]
pub struct ApiHandle(Option<ApiClient>);

impl ApiHandle {
    fn initialize() -> Self {
        match ApiClient::new() {
            Ok(client) => Self(Some(client)),
            Err(err) => {
                warn!(%err, "failed to initialise API client");
                Self(None)
            }
        }
    }

    pub fn client(&self) -> Option<ApiClient> {
        self.0.clone()
    }
}

/// The latest queued order load. The generation tag lets completed fetches
/// detect they were superseded by a newer filter change.
#[derive(Clone, Debug, PartialEq)]
pub struct OrdersRequest {
    pub generation: u64,
    pub query: OrdersQuery,
}

impl Default for OrdersRequest {
    fn default() -> Self {
        Self {
            generation: 0,
            query: OrdersQuery::default(),
        }
    }
}

/// Bumped to force a catalog re-fetch.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StockReload(pub u64);

#[component]
pub fn App() -> Element {
    let state = use_signal(AppState::default);
    use_hook({
        let mut state = state.clone();
        move || {
            if let Some(saved) = load_persisted_state() {
                state.with_mut(|st| st.apply_persisted(saved));
            }
        }
    });
    use_context_provider(|| state.clone());

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts.clone());

    let orders_request = use_signal(OrdersRequest::default);
    use_context_provider(|| orders_request.clone());

    let stock_reload = use_signal(StockReload::default);
    use_context_provider(|| stock_reload.clone());

    let api = use_hook(ApiHandle::initialize);
    use_context_provider(|| api.clone());

    let _stock = use_resource({
        let state = state.clone();
        let toasts = toasts.clone();
        let api = api.clone();
        let stock_reload = stock_reload.clone();
        move || {
            let api = api.clone();
            async move { fetch_stock(api, state.clone(), toasts.clone(), stock_reload.clone()).await }
        }
    });

    let _orders = use_resource({
        let state = state.clone();
        let toasts = toasts.clone();
        let api = api.clone();
        let orders_request = orders_request.clone();
        move || {
            let api = api.clone();
            async move { fetch_orders(api, state.clone(), toasts.clone(), orders_request.clone()).await }
        }
    });

    rsx! {
        document::Link { rel: "icon", href: assets::favicon_data_uri() }
        document::Style { "{assets::main_css()}" }
        document::Style { "{assets::tailwind_css()}" }
        Router::<Route> {}
        Toast {}
    }
}

pub fn persist_user_state(state: &Signal<AppState>) {
    let snapshot = state.with(|st| st.to_persisted());
    if let Err(err) = save_persisted_state(&snapshot) {
        warn!(%err, "failed to persist user settings");
    }
}

/// Queues an order reload under a fresh generation. Any in-flight load with
/// an older generation will be discarded when it completes.
pub fn request_orders_reload(
    mut state: Signal<AppState>,
    mut orders_request: Signal<OrdersRequest>,
    query: OrdersQuery,
) {
    let generation = state.with_mut(|st| st.begin_order_load());
    debug!(generation, key = %query.cache_key(), "queueing order reload");
    orders_request.set(OrdersRequest { generation, query });
}

async fn fetch_stock(
    api: ApiHandle,
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    stock_reload: Signal<StockReload>,
) -> Option<CacheStatus> {
    // Read subscribes this resource to manual refreshes from the settings page.
    let _tick = stock_reload();

    let Some(client) = api.client() else {
        push_toast(toasts.clone(), ToastKind::Error, "Failed to initialise API client.");
        return None;
    };

    match client.get_stock().await {
        Ok(payload) => {
            state.with_mut(|st| {
                st.products = payload.data.clone();
                st.cache
                    .record_fetch(CacheResource::Stock, payload.fetched_at);
            });
            if payload.status == CacheStatus::Stale {
                push_toast(
                    toasts.clone(),
                    ToastKind::Warning,
                    "Loaded cached warehouse stock; the catalog might be stale.",
                );
            }
            Some(payload.status)
        }
        Err(err) => {
            push_toast(
                toasts.clone(),
                ToastKind::Error,
                format!("Failed to load warehouse stock: {err}"),
            );
            None
        }
    }
}

async fn fetch_orders(
    api: ApiHandle,
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    orders_request: Signal<OrdersRequest>,
) -> Option<CacheStatus> {
    let request = orders_request();

    let Some(client) = api.client() else {
        push_toast(toasts.clone(), ToastKind::Error, "Failed to initialise API client.");
        return None;
    };

    match client.get_orders(&request.query).await {
        Ok(payload) => {
            let mut applied = false;
            state.with_mut(|st| {
                if st.is_current_load(request.generation) {
                    st.orders = payload.data.clone();
                    st.cache.record_fetch(
                        CacheResource::Orders(request.query.cache_key()),
                        payload.fetched_at,
                    );
                    applied = true;
                } else {
                    debug!(
                        generation = request.generation,
                        latest = st.load_generation,
                        "discarding superseded order load"
                    );
                }
            });

            if applied && payload.status == CacheStatus::Stale {
                push_toast(
                    toasts.clone(),
                    ToastKind::Warning,
                    "Loaded cached orders; data might be stale.",
                );
            }

            applied.then_some(payload.status)
        }
        Err(err) => {
            push_toast(
                toasts.clone(),
                ToastKind::Error,
                format!("Failed to load orders: {err}"),
            );
            None
        }
    }
}

#[component]
pub fn Dashboard() -> Element {
    rsx! { Shell { DashboardPage {} } }
}

#[component]
pub fn Orders() -> Element {
    rsx! { Shell { OrdersPage {} } }
}

#[component]
pub fn Settings() -> Element {
    rsx! { Shell { SettingsPage {} } }
}
