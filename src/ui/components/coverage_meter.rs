use dioxus::prelude::*;
use rust_decimal::Decimal;

use crate::domain::BucketCoverage;
use crate::util::format_eur;

/// Progress meter for one fixed cost bucket.
#[component]
pub fn CoverageMeter(label: String, coverage: BucketCoverage) -> Element {
    let pct = coverage.coverage_pct.round_dp(0);
    let (bar_color, text_color) = if coverage.is_covered() {
        ("bg-emerald-500", "text-emerald-300")
    } else if coverage.coverage_pct > Decimal::ZERO {
        ("bg-amber-500", "text-amber-300")
    } else {
        ("bg-slate-600", "text-slate-400")
    };

    let detail = format!(
        "{} of {}",
        format_eur(coverage.filled.round_dp(2)),
        format_eur(coverage.total)
    );

    rsx! {
        div {
            class: "rounded-xl border border-slate-800 bg-slate-900/40 px-4 py-3",
            div {
                class: "flex items-center justify-between",
                span { class: "text-xs font-semibold uppercase tracking-wide text-slate-500", "{label}" }
                span { class: "text-xs font-semibold uppercase {text_color}", "{pct}%" }
            }
            div {
                class: "mt-3 h-2 overflow-hidden rounded-full bg-slate-800",
                div {
                    class: "h-full rounded-full {bar_color}",
                    style: "width: {pct}%",
                }
            }
            p { class: "mt-2 text-xs text-slate-500", "{detail}" }
        }
    }
}
