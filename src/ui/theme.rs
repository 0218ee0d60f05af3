//! Shared style strings so pages and components stay visually consistent.

pub const BTN_PRIMARY: &str =
    "rounded-lg bg-indigo-500 px-4 py-2 text-sm font-semibold text-white hover:bg-indigo-400";

pub const BTN_SECONDARY: &str =
    "rounded-lg border border-slate-600 px-4 py-2 text-sm font-semibold text-slate-200 hover:bg-slate-800";

pub const BTN_FILTER_ACTIVE: &str =
    "rounded px-2.5 py-1 text-xs font-semibold bg-indigo-500/20 text-indigo-300 border border-indigo-500/40";

pub const BTN_FILTER_INACTIVE: &str =
    "rounded px-2.5 py-1 text-xs text-slate-500 border border-slate-700 hover:border-slate-600 hover:text-slate-300";

pub const INPUT: &str =
    "mt-1 w-full rounded-lg border border-slate-700 bg-slate-950 px-3 py-2 text-sm text-slate-100 focus:border-indigo-500 focus:outline-none";

pub const PANEL: &str = "rounded-xl border border-slate-800 bg-slate-900/40";

pub const TABLE_CONTAINER: &str =
    "rounded-xl border border-slate-800 bg-slate-900/40 overflow-hidden";

pub const TABLE_HEADER: &str =
    "border-b border-slate-800 bg-slate-900/60 text-xs uppercase text-slate-500";

pub const TABLE_DIVIDER: &str = "divide-y divide-slate-800";

pub const LABEL: &str = "block text-xs font-semibold uppercase text-slate-500";

pub const SECTION_TITLE: &str = "text-sm font-semibold uppercase tracking-wide text-slate-500";

pub const TEXT_MUTED: &str = "text-slate-500";

pub const WARNING_BANNER: &str =
    "rounded-lg border border-amber-500/30 bg-amber-500/10 px-3 py-2 text-xs text-amber-200";
