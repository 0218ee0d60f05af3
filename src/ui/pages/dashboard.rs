use dioxus::prelude::*;
use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::{
    app::{persist_user_state, ApiHandle},
    domain::{
        allocate_profit, calculate_orders, validate_shipping_selection, AppState, CostInputs,
        SelectedShipping, ShippingOption,
    },
    ui::{
        components::{
            coverage_meter::CoverageMeter,
            kpi_card::KpiCard,
            order_table::{OrderRow, OrderTable},
            shipping_options::ShippingOptionsPanel,
            toast::{push_toast, ToastKind, ToastMessage},
        },
        theme,
    },
    util::{format_eur, format_kg},
};

#[component]
pub fn DashboardPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let api = use_context::<ApiHandle>();

    let now = OffsetDateTime::now_utc();
    let mut year_input = use_signal(|| now.year().to_string());
    let mut month_input = use_signal(|| u8::from(now.month()).to_string());

    let initial_inputs = state.with(|st| st.cost_inputs.clone());
    let mut warehouse_input = use_signal(|| initial_inputs.warehouse_cost.to_string());
    let mut incoming_input = use_signal(|| initial_inputs.incoming_shipping_cost.to_string());

    let selected_order = use_signal(|| None::<String>);

    let orders = state.with(|st| st.orders.clone());
    let catalog = state.with(|st| st.product_index());
    let cost_inputs = state.with(|st| st.cost_inputs.clone());

    let year = year_input().trim().parse::<i32>().unwrap_or(now.year());
    let month = month_input()
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|m| (1..=12).contains(m))
        .unwrap_or_else(|| u8::from(now.month()));

    let period_orders: Vec<_> = orders
        .iter()
        .filter(|order| order.in_period(year, month))
        .cloned()
        .collect();

    let calculations = calculate_orders(&period_orders, &catalog);

    let total_revenue: Decimal = calculations.iter().map(|c| c.totals.revenue).sum();
    let total_profit: Decimal = calculations.iter().map(|c| c.profit).sum();
    let shipping_total: Decimal = calculations.iter().map(|c| c.shipping_cost).sum();
    let report = allocate_profit(total_profit, &cost_inputs, shipping_total);

    let orders_with_gaps: Vec<String> = calculations
        .iter()
        .filter(|calc| calc.totals.has_gaps())
        .map(|calc| calc.order_id.clone())
        .collect();

    let rows: Vec<OrderRow> = calculations
        .iter()
        .map(|calc| OrderRow {
            id: calc.order_id.clone(),
            institution: calc.institution.clone(),
            status: calc.status,
            weight: format_kg(calc.totals.total_weight_kg),
            purchase_cost: format_eur(calc.totals.purchase_cost),
            revenue: format_eur(calc.totals.revenue),
            shipping: format_eur(calc.shipping_cost),
            shipping_source: calc.shipping_source.label(),
            profit: format_eur(calc.profit),
            profit_negative: calc.profit < Decimal::ZERO,
            unresolved_count: calc.totals.unresolved.len(),
        })
        .collect();

    let selected_id = selected_order();
    let selected_calc = selected_id
        .as_ref()
        .and_then(|id| calculations.iter().find(|calc| &calc.order_id == id))
        .cloned();
    let selected_shipping = selected_id.as_ref().and_then(|id| {
        period_orders
            .iter()
            .find(|order| &order.id == id)
            .and_then(|order| order.selected_shipping.clone())
    });

    let on_apply_costs = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        move |_| {
            match parse_cost_inputs(warehouse_input(), incoming_input()) {
                Ok(inputs) => {
                    state.with_mut(|st| st.cost_inputs = inputs);
                    persist_user_state(&state);
                    push_toast(toasts.clone(), ToastKind::Success, "Updated fixed cost buckets.");
                }
                Err(message) => {
                    push_toast(toasts.clone(), ToastKind::Error, message);
                }
            }
        }
    };

    let on_reset_costs = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        move |_| {
            let defaults = CostInputs::default();
            warehouse_input.set(defaults.warehouse_cost.to_string());
            incoming_input.set(defaults.incoming_shipping_cost.to_string());
            state.with_mut(|st| st.cost_inputs = defaults);
            persist_user_state(&state);
            push_toast(toasts.clone(), ToastKind::Info, "Cleared fixed cost buckets.");
        }
    };

    let on_select = {
        let mut selected_order = selected_order.clone();
        move |id: String| {
            selected_order.set(Some(id));
        }
    };

    let on_choose_shipping = {
        let state = state.clone();
        let toasts = toasts.clone();
        let api = api.clone();
        let selected_calc = selected_calc.clone();
        move |choice: ShippingOption| {
            let Some(calc) = selected_calc.clone() else {
                return;
            };

            if let Err(err) = validate_shipping_selection(&calc, &choice) {
                push_toast(toasts.clone(), ToastKind::Error, err.to_string());
                return;
            }

            let Some(client) = api.client() else {
                push_toast(toasts.clone(), ToastKind::Error, "API client unavailable.");
                return;
            };

            let mut state = state.clone();
            let toasts = toasts.clone();
            spawn(async move {
                match client.select_shipping(&calc.order_id, &choice).await {
                    Ok(()) => {
                        state.with_mut(|st| {
                            if let Some(order) =
                                st.orders.iter_mut().find(|order| order.id == calc.order_id)
                            {
                                order.selected_shipping = Some(SelectedShipping {
                                    carrier: choice.carrier.clone(),
                                    price: choice.price,
                                });
                            }
                        });
                        push_toast(
                            toasts.clone(),
                            ToastKind::Success,
                            format!(
                                "Recorded {} {} for order #{}.",
                                choice.carrier, choice.package_name, calc.order_id
                            ),
                        );
                    }
                    Err(err) => {
                        push_toast(
                            toasts.clone(),
                            ToastKind::Error,
                            format!("Failed to save shipping option: {err}"),
                        );
                    }
                }
            });
        }
    };

    let net_display = if report.net_profit > Decimal::ZERO {
        format!("Net profit {}", format_eur(report.net_profit))
    } else if report.shortfall > Decimal::ZERO {
        format!("Shortfall {}", format_eur(report.shortfall))
    } else {
        "Break even".to_string()
    };
    let net_class = if report.net_profit > Decimal::ZERO {
        "rounded-xl border border-emerald-500/40 bg-emerald-500/10 px-4 py-3 text-emerald-200"
    } else if report.shortfall > Decimal::ZERO {
        "rounded-xl border border-rose-500/40 bg-rose-500/10 px-4 py-3 text-rose-200"
    } else {
        "rounded-xl border border-slate-800 bg-slate-900/40 px-4 py-3 text-slate-300"
    };

    rsx! {
        div { class: "space-y-8",
            header {
                class: "flex flex-wrap items-end justify-between gap-4",
                div {
                    h1 { class: "text-2xl font-semibold text-slate-100", "Profit Dashboard" }
                    p {
                        class: "text-sm text-slate-400",
                        "Shipping candidates, per-order profit and fixed-cost coverage for one month."
                    }
                }
                div { class: "flex gap-3",
                    div { class: "w-20",
                        label { class: "{theme::LABEL}", "Month" }
                        input {
                            class: "{theme::INPUT}",
                            inputmode: "numeric",
                            value: month_input(),
                            oninput: move |evt| month_input.set(evt.value()),
                        }
                    }
                    div { class: "w-24",
                        label { class: "{theme::LABEL}", "Year" }
                        input {
                            class: "{theme::INPUT}",
                            inputmode: "numeric",
                            value: year_input(),
                            oninput: move |evt| year_input.set(evt.value()),
                        }
                    }
                }
            }

            section {
                class: "grid gap-4 sm:grid-cols-3",
                KpiCard {
                    title: "Orders".to_string(),
                    value: calculations.len().to_string(),
                    description: Some(format!("in {month:02}/{year}")),
                }
                KpiCard {
                    title: "Revenue".to_string(),
                    value: format_eur(total_revenue),
                    description: Some("Sum of quoted line prices".to_string()),
                }
                KpiCard {
                    title: "Profit".to_string(),
                    value: format_eur(total_profit),
                    description: Some("Revenue minus purchase and shipping".to_string()),
                }
            }

            if !orders_with_gaps.is_empty() {
                div {
                    class: "{theme::WARNING_BANNER}",
                    {format!(
                        "{} order(s) reference products missing from the catalog; their totals are incomplete: #{}",
                        orders_with_gaps.len(),
                        orders_with_gaps.join(", #")
                    )}
                }
            }

            section {
                class: "grid gap-4 sm:grid-cols-3",
                CoverageMeter { label: "Warehouse".to_string(), coverage: report.warehouse.clone() }
                CoverageMeter { label: "Shipping".to_string(), coverage: report.shipping.clone() }
                div {
                    class: net_class,
                    span { class: "text-xs font-semibold uppercase tracking-wide", "Bottom line" }
                    p { class: "mt-2 text-2xl font-semibold", "{net_display}" }
                    p { class: "mt-1 text-xs opacity-80", "Total fixed costs {format_eur(report.total_costs)}" }
                }
            }

            section {
                class: "{theme::PANEL} p-6",
                h2 { class: "{theme::SECTION_TITLE}", "Fixed Cost Buckets" }
                div { class: "mt-4 grid gap-4 sm:grid-cols-2",
                    div {
                        label { class: "{theme::LABEL}", "Warehouse costs / month" }
                        input {
                            class: "{theme::INPUT}",
                            inputmode: "decimal",
                            value: warehouse_input(),
                            oninput: move |evt| warehouse_input.set(evt.value()),
                        }
                    }
                    div {
                        label { class: "{theme::LABEL}", "Incoming shipping costs / month" }
                        input {
                            class: "{theme::INPUT}",
                            inputmode: "decimal",
                            value: incoming_input(),
                            oninput: move |evt| incoming_input.set(evt.value()),
                        }
                    }
                }
                div { class: "mt-4 flex gap-3",
                    button { class: "{theme::BTN_PRIMARY}", onclick: on_apply_costs, "Apply" }
                    button { class: "{theme::BTN_SECONDARY}", onclick: on_reset_costs, "Reset" }
                }
            }

            section {
                class: "grid gap-6 lg:grid-cols-[2fr,1fr]",
                div {
                    class: "space-y-4",
                    OrderTable {
                        rows,
                        selected_id: selected_id.clone(),
                        on_select,
                    }
                }
                div {
                    class: "space-y-4",
                    h2 { class: "text-sm font-semibold text-slate-200", "Shipping Options" }
                    if let Some(calc) = selected_calc.as_ref() {
                        p {
                            class: "text-xs {theme::TEXT_MUTED}",
                            "Order #{calc.order_id} · {format_kg(calc.totals.total_weight_kg)}"
                        }
                        ShippingOptionsPanel {
                            candidates: calc.candidates.clone(),
                            selected: selected_shipping.clone(),
                            locked: calc.shipping_locked(),
                            on_choose: on_choose_shipping,
                        }
                    } else {
                        div {
                            class: "{theme::PANEL} p-4 text-sm {theme::TEXT_MUTED}",
                            "Select an order row to review its shipping candidates."
                        }
                    }
                }
            }
        }
    }
}

fn parse_cost_inputs(warehouse: String, incoming: String) -> Result<CostInputs, String> {
    let warehouse_cost: Decimal = warehouse
        .trim()
        .parse()
        .map_err(|_| "Warehouse costs must be a number")?;
    let incoming_shipping_cost: Decimal = incoming
        .trim()
        .parse()
        .map_err(|_| "Incoming shipping costs must be a number")?;

    if warehouse_cost < Decimal::ZERO || incoming_shipping_cost < Decimal::ZERO {
        return Err("Cost buckets cannot be negative".to_string());
    }

    Ok(CostInputs {
        warehouse_cost,
        incoming_shipping_cost,
    })
}
