use dioxus::prelude::*;
use rust_decimal::Decimal;

use crate::{
    app::{request_orders_reload, OrdersRequest},
    domain::{AppState, Order, OrderStatus},
    infra::api::OrdersQuery,
    ui::{
        components::{
            status_badge::StatusBadge,
            toast::{push_toast, ToastKind, ToastMessage},
        },
        theme,
    },
    util::{format_eur, format_kg},
};

#[component]
pub fn OrdersPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let orders_request = use_context::<Signal<OrdersRequest>>();

    let selected_order = use_signal(|| None::<String>);
    let mut limit_input = use_signal(|| orders_request().query.limit.to_string());

    let active_status = orders_request().query.status;
    let orders = state.with(|st| st.orders.clone());
    let catalog = state.with(|st| st.product_index());

    let selected: Option<Order> = selected_order()
        .as_ref()
        .and_then(|id| orders.iter().find(|order| &order.id == id))
        .cloned();

    let on_filter = {
        let state = state.clone();
        let orders_request = orders_request.clone();
        move |status: Option<OrderStatus>| {
            let limit = limit_input()
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|l| *l > 0)
                .unwrap_or(OrdersQuery::default().limit);
            request_orders_reload(
                state.clone(),
                orders_request.clone(),
                OrdersQuery { status, limit },
            );
        }
    };

    let on_reload = {
        let on_filter = on_filter.clone();
        let toasts = toasts.clone();
        move |_| {
            on_filter(active_status);
            push_toast(toasts.clone(), ToastKind::Info, "Reloading orders...");
        }
    };

    rsx! {
        div { class: "space-y-6",
            header {
                class: "flex flex-wrap items-end justify-between gap-4",
                div {
                    h1 { class: "text-2xl font-semibold text-slate-100", "Orders" }
                    p {
                        class: "text-sm text-slate-400",
                        "Order list as the backend reports it, with line items per order."
                    }
                }
                div { class: "flex items-end gap-3",
                    div { class: "w-24",
                        label { class: "{theme::LABEL}", "Limit" }
                        input {
                            class: "{theme::INPUT}",
                            inputmode: "numeric",
                            value: limit_input(),
                            oninput: move |evt| limit_input.set(evt.value()),
                        }
                    }
                    button { class: "{theme::BTN_PRIMARY}", onclick: on_reload, "Reload" }
                }
            }

            section {
                class: "flex flex-wrap gap-2",
                FilterButton {
                    label: "All",
                    active: active_status.is_none(),
                    onclick: {
                        let on_filter = on_filter.clone();
                        move |_| on_filter(None)
                    },
                }
                for status in OrderStatus::all().iter().copied() {
                    FilterButton {
                        label: status.label(),
                        active: active_status == Some(status),
                        onclick: {
                            let on_filter = on_filter.clone();
                            move |_| on_filter(Some(status))
                        },
                    }
                }
            }

            section {
                class: "grid gap-6 lg:grid-cols-[2fr,1fr]",
                div {
                    class: "{theme::TABLE_CONTAINER}",
                    table {
                        class: "min-w-full {theme::TABLE_DIVIDER} text-sm",
                        thead {
                            class: "{theme::TABLE_HEADER} text-left tracking-wide",
                            tr {
                                th { class: "px-4 py-3 font-medium", "Order" }
                                th { class: "px-4 py-3 font-medium", "Institution" }
                                th { class: "px-4 py-3 font-medium", "Created" }
                                th { class: "px-4 py-3 font-medium", "Status" }
                                th { class: "px-4 py-3 font-medium text-right", "Items" }
                            }
                        }
                        tbody {
                            class: "{theme::TABLE_DIVIDER}",
                            for order in orders.iter().cloned() {
                                OrderListRow {
                                    order: order.clone(),
                                    selected: selected_order().as_deref() == Some(order.id.as_str()),
                                    on_select: {
                                        let mut selected_order = selected_order.clone();
                                        move |id: String| selected_order.set(Some(id))
                                    },
                                }
                            }
                            if orders.is_empty() {
                                tr {
                                    td {
                                        class: "px-4 py-6 text-center text-sm {theme::TEXT_MUTED}",
                                        colspan: "5",
                                        "No orders loaded for this filter."
                                    }
                                }
                            }
                        }
                    }
                }

                div {
                    class: "space-y-4",
                    h2 { class: "text-sm font-semibold text-slate-200", "Line Items" }
                    if let Some(order) = selected.as_ref() {
                        LineItemsPanel { order: order.clone(), catalog: catalog.clone() }
                    } else {
                        div {
                            class: "{theme::PANEL} p-4 text-sm {theme::TEXT_MUTED}",
                            "Select an order to inspect its positions."
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn FilterButton(label: &'static str, active: bool, onclick: EventHandler<()>) -> Element {
    let class = if active {
        theme::BTN_FILTER_ACTIVE
    } else {
        theme::BTN_FILTER_INACTIVE
    };

    rsx! {
        button {
            class: "{class}",
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}

#[component]
fn OrderListRow(order: Order, selected: bool, on_select: EventHandler<String>) -> Element {
    let row_class = format!(
        "cursor-pointer transition-colors {}",
        if selected {
            "bg-indigo-500/10"
        } else {
            "hover:bg-slate-800/40"
        }
    );
    let created = format!(
        "{:04}-{:02}-{:02}",
        order.created_at.year(),
        u8::from(order.created_at.month()),
        order.created_at.day()
    );
    let select_id = order.id.clone();

    rsx! {
        tr {
            class: row_class,
            onclick: move |_| on_select.call(select_id.clone()),
            td { class: "px-4 py-3 font-medium text-slate-300", "#{order.id}" }
            td { class: "px-4 py-3 text-slate-300", "{order.institution}" }
            td { class: "px-4 py-3 {theme::TEXT_MUTED}", "{created}" }
            td {
                class: "px-4 py-3",
                StatusBadge { status: order.status }
            }
            td { class: "px-4 py-3 text-right text-slate-300", "{order.items.len()}" }
        }
    }
}

#[component]
fn LineItemsPanel(
    order: Order,
    catalog: std::collections::HashMap<crate::domain::ProductId, crate::domain::Product>,
) -> Element {
    rsx! {
        div {
            class: "{theme::PANEL} divide-y divide-slate-800",
            for item in order.items.iter() {
                {
                    let product = catalog.get(&item.product_id);
                    let name = product
                        .map(|p| p.name.clone())
                        .unwrap_or_else(|| format!("Unknown product ({})", item.product_id));
                    let line_weight = product
                        .map(|p| format_kg(p.unit_weight_kg() * Decimal::from(item.quantity)));
                    let line_total = format_eur(item.price_per_unit * Decimal::from(item.quantity));
                    let unresolved = product.is_none();
                    rsx! {
                        div {
                            class: "flex items-center justify-between px-4 py-3",
                            div {
                                p {
                                    class: if unresolved { "text-sm font-medium text-amber-300" } else { "text-sm font-medium text-slate-200" },
                                    "{name}"
                                }
                                p {
                                    class: "text-xs {theme::TEXT_MUTED}",
                                    "{item.quantity} × {format_eur(item.price_per_unit)}"
                                }
                            }
                            div {
                                class: "text-right",
                                p { class: "text-sm font-semibold text-slate-200", "{line_total}" }
                                if let Some(weight) = line_weight {
                                    p { class: "text-xs {theme::TEXT_MUTED}", "{weight}" }
                                }
                            }
                        }
                    }
                }
            }
            if order.items.is_empty() {
                div { class: "px-4 py-6 text-center text-sm {theme::TEXT_MUTED}", "This order has no positions." }
            }
        }
    }
}
