//! Transient notification stack, rendered above every page.

use std::time::Duration;

use dioxus::prelude::*;

use crate::util::generate_id;

const AUTO_DISMISS_AFTER: Duration = Duration::from_secs(7);
const MAX_VISIBLE: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    fn classes(&self) -> &'static str {
        match self {
            ToastKind::Info => "border-sky-500/40 bg-sky-500/10 text-sky-100",
            ToastKind::Success => "border-emerald-500/40 bg-emerald-500/10 text-emerald-100",
            ToastKind::Warning => "border-amber-500/40 bg-amber-500/10 text-amber-100",
            ToastKind::Error => "border-rose-500/40 bg-rose-500/10 text-rose-100",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            ToastKind::Info => "ℹ️",
            ToastKind::Success => "✅",
            ToastKind::Warning => "⚠️",
            ToastKind::Error => "⛔",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ToastMessage {
    pub id: String,
    pub kind: ToastKind,
    pub text: String,
}

impl ToastMessage {
    pub fn new(kind: ToastKind, text: impl Into<String>) -> Self {
        Self {
            id: generate_id("toast"),
            kind,
            text: text.into(),
        }
    }
}

/// Appends a notification, evicting the oldest once the stack is full.
pub fn push_toast(
    mut toasts: Signal<Vec<ToastMessage>>,
    kind: ToastKind,
    message: impl Into<String>,
) {
    let text = message.into();
    toasts.with_mut(|entries| {
        if entries.len() >= MAX_VISIBLE {
            entries.remove(0);
        }
        entries.push(ToastMessage::new(kind, text));
    });
}

#[component]
pub fn Toast() -> Element {
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let messages = toasts();

    if messages.is_empty() {
        return rsx! { Fragment {} };
    }

    rsx! {
        div {
            class: "pointer-events-none fixed inset-x-0 bottom-4 flex justify-center",
            ul {
                class: "space-y-3",
                for message in messages {
                    ToastEntry { message, toasts: toasts.clone() }
                }
            }
        }
    }
}

#[component]
fn ToastEntry(message: ToastMessage, toasts: Signal<Vec<ToastMessage>>) -> Element {
    let timer_toasts = toasts.clone();
    let timer_id = message.id.clone();
    let _auto_dismiss = use_future(move || {
        let mut toasts = timer_toasts.clone();
        let id = timer_id.clone();
        async move {
            tokio::time::sleep(AUTO_DISMISS_AFTER).await;
            toasts.with_mut(|entries| entries.retain(|entry| entry.id != id));
        }
    });

    let dismiss_id = message.id.clone();
    let class = format!(
        "pointer-events-auto flex items-start gap-3 rounded-xl border px-4 py-3 shadow-lg backdrop-blur {}",
        message.kind.classes()
    );

    rsx! {
        li {
            class: class,
            span { class: "text-lg", "{message.kind.icon()}" }
            p { class: "text-sm font-medium", "{message.text}" }
            button {
                class: "ml-3 text-xs uppercase tracking-wide text-slate-300 hover:text-white",
                onclick: move |_| {
                    let target = dismiss_id.clone();
                    let mut toasts = toasts.clone();
                    toasts.with_mut(|entries| entries.retain(|entry| entry.id != target));
                },
                "Dismiss"
            }
        }
    }
}
