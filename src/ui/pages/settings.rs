use std::time::SystemTime;

use dioxus::prelude::*;

use crate::{
    app::{request_orders_reload, ApiHandle, OrdersRequest, StockReload},
    domain::{AppState, CacheResource},
    ui::{
        components::toast::{push_toast, ToastKind, ToastMessage},
        theme,
    },
    util::version::{check_for_update, version_label, APP_REPO_URL},
};

#[component]
pub fn SettingsPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let orders_request = use_context::<Signal<OrdersRequest>>();
    let stock_reload = use_context::<Signal<StockReload>>();
    let api = use_context::<ApiHandle>();

    let cache_entries = state.with(|st| {
        st.cache
            .iter()
            .map(|(resource, time)| (cache_label(resource), humanize_age(*time)))
            .collect::<Vec<_>>()
    });

    let on_clear_cache = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        let api = api.clone();
        move |_| {
            state.with_mut(|st| st.cache.clear());
            if let Some(client) = api.client() {
                spawn(async move {
                    client.clear_cache().await;
                });
            }
            push_toast(
                toasts.clone(),
                ToastKind::Info,
                "Cleared caches. Data will refresh on next fetch.",
            );
        }
    };

    let on_refresh_stock = {
        let mut stock_reload = stock_reload.clone();
        let toasts = toasts.clone();
        move |_| {
            stock_reload.with_mut(|reload| reload.0 += 1);
            push_toast(toasts.clone(), ToastKind::Info, "Refreshing warehouse stock...");
        }
    };

    let on_refresh_orders = {
        let state = state.clone();
        let orders_request = orders_request.clone();
        let toasts = toasts.clone();
        move |_| {
            let query = orders_request().query;
            request_orders_reload(state.clone(), orders_request.clone(), query);
            push_toast(toasts.clone(), ToastKind::Info, "Refreshing orders...");
        }
    };

    let on_check_update = {
        let toasts = toasts.clone();
        move |_| {
            let toasts = toasts.clone();
            spawn(async move {
                match check_for_update().await {
                    Ok(info) => {
                        let kind = if info.update_available() {
                            ToastKind::Success
                        } else {
                            ToastKind::Info
                        };
                        push_toast(toasts.clone(), kind, info.to_string());
                    }
                    Err(err) => {
                        push_toast(
                            toasts.clone(),
                            ToastKind::Error,
                            format!("Update check failed: {err}"),
                        );
                    }
                }
            });
        }
    };

    let base_url = api
        .client()
        .map(|client| client.base_url().to_string())
        .unwrap_or_else(|| "not configured".to_string());

    rsx! {
        div { class: "space-y-8",
            section {
                class: "{theme::PANEL} p-6",
                h2 { class: "{theme::SECTION_TITLE}", "Backend" }
                p { class: "mt-2 text-sm text-slate-400", "Orders and stock are loaded from the platform API." }
                p { class: "mt-3 text-sm text-slate-300 font-mono", "{base_url}" }
                p {
                    class: "mt-1 text-xs {theme::TEXT_MUTED}",
                    "Set ORDER_DESK_API_URL and ORDER_DESK_API_TOKEN to point elsewhere."
                }
            }

            section {
                class: "{theme::PANEL} p-6",
                h2 { class: "{theme::SECTION_TITLE}", "Cache Status" }
                if cache_entries.is_empty() {
                    p { class: "mt-3 text-sm text-slate-400", "No cached fetches yet." }
                } else {
                    ul {
                        class: "mt-3 space-y-2 text-sm text-slate-300",
                        for (label, age) in cache_entries {
                            li { class: "flex items-center justify-between rounded-lg border border-slate-800 bg-slate-900/60 px-3 py-2",
                                span { "{label}" }
                                span { class: "text-xs {theme::TEXT_MUTED}", "{age}" }
                            }
                        }
                    }
                }
                button {
                    class: "mt-4 rounded-lg border border-amber-500/40 px-4 py-2 text-xs font-semibold uppercase tracking-wide text-amber-200 hover:bg-amber-500/10",
                    onclick: on_clear_cache,
                    "Clear Caches"
                }
            }

            section {
                class: "{theme::PANEL} p-6",
                h2 { class: "{theme::SECTION_TITLE}", "Data Controls" }
                p { class: "mt-2 text-sm text-slate-400", "Trigger refreshes when the backend data moved on." }
                div { class: "mt-3 flex gap-3",
                    button {
                        class: "rounded-lg border border-indigo-500/40 px-4 py-2 text-xs font-semibold uppercase tracking-wide text-indigo-200 hover:bg-indigo-500/10",
                        onclick: on_refresh_stock,
                        "Refresh Stock"
                    }
                    button {
                        class: "rounded-lg border border-indigo-500/40 px-4 py-2 text-xs font-semibold uppercase tracking-wide text-indigo-200 hover:bg-indigo-500/10",
                        onclick: on_refresh_orders,
                        "Refresh Orders"
                    }
                }
            }

            section {
                class: "{theme::PANEL} p-6",
                h2 { class: "{theme::SECTION_TITLE}", "About" }
                p { class: "mt-2 text-sm text-slate-300", "Order Profit Desk {version_label()}" }
                a {
                    href: APP_REPO_URL,
                    target: "_blank",
                    rel: "noreferrer",
                    class: "mt-1 inline-block text-xs text-indigo-300 hover:text-indigo-100",
                    "{APP_REPO_URL}"
                }
                div { class: "mt-3",
                    button { class: "{theme::BTN_SECONDARY}", onclick: on_check_update, "Check for Updates" }
                }
            }
        }
    }
}

fn cache_label(resource: &CacheResource) -> String {
    match resource {
        CacheResource::Stock => "Warehouse stock".to_string(),
        CacheResource::Orders(key) => format!("Orders ({key})"),
    }
}

fn humanize_age(fetched_at: SystemTime) -> String {
    let age = SystemTime::now()
        .duration_since(fetched_at)
        .unwrap_or_default()
        .as_secs();
    if age < 60 {
        format!("{age}s ago")
    } else if age < 3_600 {
        format!("{}m ago", age / 60)
    } else if age < 86_400 {
        format!("{}h ago", age / 3_600)
    } else {
        format!("{}d ago", age / 86_400)
    }
}
