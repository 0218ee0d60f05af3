use dioxus::prelude::*;

use crate::domain::{SelectedShipping, ShippingOption};
use crate::ui::theme;
use crate::util::{format_eur, format_kg};

/// Candidate shipping tiers for one order, cheapest first.
#[component]
pub fn ShippingOptionsPanel(
    candidates: Vec<ShippingOption>,
    selected: Option<SelectedShipping>,
    locked: bool,
    on_choose: EventHandler<ShippingOption>,
) -> Element {
    if candidates.is_empty() {
        return rsx! {
            div {
                class: "{theme::PANEL} p-4 text-sm {theme::TEXT_MUTED}",
                "No carrier tier can take this shipment weight. Profit is computed without shipping."
            }
        };
    }

    rsx! {
        div {
            class: "space-y-3",
            if locked {
                div {
                    class: "{theme::WARNING_BANNER}",
                    "This order already left the warehouse; its shipping option is locked."
                }
            }
            for option in candidates {
                ShippingOptionCard {
                    option: option.clone(),
                    is_selected: selected
                        .as_ref()
                        .map_or(false, |s| s.carrier == option.carrier && s.price == option.price),
                    locked,
                    on_choose: on_choose.clone(),
                }
            }
        }
    }
}

#[component]
fn ShippingOptionCard(
    option: ShippingOption,
    is_selected: bool,
    locked: bool,
    on_choose: EventHandler<ShippingOption>,
) -> Element {
    let card_class = if is_selected {
        "flex items-center justify-between rounded-xl border border-emerald-500/40 bg-emerald-500/10 px-4 py-3"
    } else {
        "flex items-center justify-between rounded-xl border border-slate-800 bg-slate-900/60 px-4 py-3"
    };
    let choice = option.clone();

    rsx! {
        div {
            class: card_class,
            div {
                p { class: "text-sm font-semibold text-slate-200", "{option.carrier} · {option.package_name}" }
                p {
                    class: "text-xs {theme::TEXT_MUTED}",
                    "up to {format_kg(option.max_weight_kg)}"
                }
            }
            div {
                class: "flex items-center gap-3",
                span { class: "text-sm font-semibold text-slate-200", "{format_eur(option.price)}" }
                if is_selected {
                    span {
                        class: "rounded-full border border-emerald-500/40 px-2 py-0.5 text-[10px] font-semibold uppercase text-emerald-300",
                        "Selected"
                    }
                } else {
                    button {
                        class: if locked {
                            "rounded-md border border-slate-700 px-2 py-1 text-[10px] font-semibold uppercase tracking-wide text-slate-600 cursor-not-allowed"
                        } else {
                            "rounded-md border border-indigo-500/40 px-2 py-1 text-[10px] font-semibold uppercase tracking-wide text-indigo-200 hover:bg-indigo-500/10"
                        },
                        disabled: locked,
                        onclick: move |_| on_choose.call(choice.clone()),
                        "Choose"
                    }
                }
            }
        }
    }
}
