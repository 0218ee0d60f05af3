use dioxus::prelude::*;

use super::status_badge::StatusBadge;
use crate::domain::OrderStatus;
use crate::ui::theme;

/// One pre-formatted row of the dashboard order table.
#[derive(Clone, PartialEq)]
pub struct OrderRow {
    pub id: String,
    pub institution: String,
    pub status: OrderStatus,
    pub weight: String,
    pub purchase_cost: String,
    pub revenue: String,
    pub shipping: String,
    pub shipping_source: &'static str,
    pub profit: String,
    pub profit_negative: bool,
    pub unresolved_count: usize,
}

#[component]
pub fn OrderTable(
    rows: Vec<OrderRow>,
    selected_id: Option<String>,
    on_select: EventHandler<String>,
) -> Element {
    let is_empty = rows.is_empty();
    let rendered_rows = rows
        .into_iter()
        .map(|row| {
            let selected = selected_id.as_ref().map_or(false, |id| id == &row.id);
            (row, selected)
        })
        .collect::<Vec<_>>();

    rsx! {
        div {
            class: "{theme::TABLE_CONTAINER}",
            table {
                class: "min-w-full {theme::TABLE_DIVIDER} text-sm",
                thead {
                    class: "{theme::TABLE_HEADER} text-left tracking-wide",
                    tr {
                        th { class: "px-4 py-3 font-medium", "Order" }
                        th { class: "px-4 py-3 font-medium", "Institution" }
                        th { class: "px-4 py-3 font-medium", "Status" }
                        th { class: "px-4 py-3 font-medium text-right", "Weight" }
                        th { class: "px-4 py-3 font-medium text-right", "Cost" }
                        th { class: "px-4 py-3 font-medium text-right", "Revenue" }
                        th { class: "px-4 py-3 font-medium text-right", "Shipping" }
                        th { class: "px-4 py-3 font-medium text-right", "Profit" }
                    }
                }
                tbody {
                    class: "{theme::TABLE_DIVIDER}",
                    for (row, selected) in rendered_rows {
                        OrderRowView { row, selected, on_select: on_select.clone() }
                    }
                    if is_empty {
                        tr {
                            td {
                                class: "px-4 py-6 text-center text-sm {theme::TEXT_MUTED}",
                                colspan: "8",
                                "No orders in the selected period."
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn OrderRowView(row: OrderRow, selected: bool, on_select: EventHandler<String>) -> Element {
    let row_class = format!(
        "cursor-pointer transition-colors {}",
        if selected {
            "bg-indigo-500/10"
        } else {
            "hover:bg-slate-800/40"
        }
    );
    let profit_class = if row.profit_negative {
        "px-4 py-3 text-right font-medium text-rose-300"
    } else {
        "px-4 py-3 text-right font-medium text-emerald-300"
    };
    let select_id = row.id.clone();

    rsx! {
        tr {
            class: row_class,
            onclick: move |_| on_select.call(select_id.clone()),
            td {
                class: "px-4 py-3 font-medium text-slate-300",
                "#{row.id}"
                if row.unresolved_count > 0 {
                    span {
                        class: "ml-2 inline-flex items-center rounded-full border border-amber-500/40 bg-amber-500/10 px-1.5 py-0.5 text-[10px] font-semibold text-amber-300",
                        title: "Line items referencing unknown products are missing from these totals",
                        "{row.unresolved_count} unresolved"
                    }
                }
            }
            td { class: "px-4 py-3 text-slate-300", "{row.institution}" }
            td {
                class: "px-4 py-3",
                StatusBadge { status: row.status }
            }
            td { class: "px-4 py-3 text-right text-slate-300", "{row.weight}" }
            td { class: "px-4 py-3 text-right text-slate-300", "{row.purchase_cost}" }
            td { class: "px-4 py-3 text-right text-slate-300", "{row.revenue}" }
            td {
                class: "px-4 py-3 text-right text-slate-300",
                "{row.shipping}"
                span { class: "ml-1 text-[10px] uppercase {theme::TEXT_MUTED}", "({row.shipping_source})" }
            }
            td { class: profit_class, "{row.profit}" }
        }
    }
}
