use dioxus::prelude::*;

use crate::domain::OrderStatus;

#[component]
pub fn StatusBadge(status: OrderStatus) -> Element {
    let color = match status {
        OrderStatus::Pending => "bg-slate-700/40 text-slate-300 border-slate-600/60",
        OrderStatus::Confirmed => "bg-sky-500/10 text-sky-300 border-sky-500/40",
        OrderStatus::Packed => "bg-indigo-500/10 text-indigo-300 border-indigo-500/40",
        OrderStatus::Shipped => "bg-amber-500/10 text-amber-300 border-amber-500/40",
        OrderStatus::Delivered => "bg-emerald-500/10 text-emerald-300 border-emerald-500/40",
        OrderStatus::Cancelled => "bg-rose-500/10 text-rose-300 border-rose-500/40",
    };

    rsx! {
        span {
            class: "inline-flex items-center rounded-full border px-2 py-0.5 text-xs font-medium {color}",
            "{status.label()}"
        }
    }
}
