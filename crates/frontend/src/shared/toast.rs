//! Всплывающие уведомления об успехе/ошибке операций.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

const TOAST_LIMIT: usize = 5;
const SUCCESS_TIMEOUT_MS: u32 = 4_000;
const ERROR_TIMEOUT_MS: u32 = 8_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    fn class(&self) -> &'static str {
        match self {
            ToastKind::Success => "toast toast--success",
            ToastKind::Error => "toast toast--error",
            ToastKind::Info => "toast toast--info",
        }
    }

    fn timeout_ms(&self) -> u32 {
        match self {
            ToastKind::Error => ERROR_TIMEOUT_MS,
            _ => SUCCESS_TIMEOUT_MS,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Очередь без реактивности; старые сообщения вытесняются сверх лимита.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToastQueue {
    items: Vec<Toast>,
    next_id: u64,
}

impl ToastQueue {
    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.items.push(Toast {
            id,
            kind,
            message: message.into(),
        });
        if self.items.len() > TOAST_LIMIT {
            let overflow = self.items.len() - TOAST_LIMIT;
            self.items.drain(..overflow);
        }
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|t| t.id != id);
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }
}

#[derive(Clone, Copy)]
pub struct ToastService {
    queue: RwSignal<ToastQueue>,
}

impl ToastService {
    pub fn new() -> Self {
        Self {
            queue: RwSignal::new(ToastQueue::default()),
        }
    }

    pub fn show(&self, kind: ToastKind, message: impl Into<String>) {
        let message = message.into();
        if kind == ToastKind::Error {
            log::warn!("{}", message);
        }
        let mut id = 0;
        self.queue.update(|q| id = q.push(kind, message));

        let queue = self.queue;
        spawn_local(async move {
            TimeoutFuture::new(kind.timeout_ms()).await;
            let _ = queue.try_update(|q| q.dismiss(id));
        });
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(ToastKind::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(ToastKind::Error, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.show(ToastKind::Info, message);
    }

    pub fn dismiss(&self, id: u64) {
        self.queue.update(|q| q.dismiss(id));
    }
}

pub fn use_toast() -> ToastService {
    use_context::<ToastService>().expect("ToastService not provided in context")
}

#[component]
pub fn ToastHost() -> impl IntoView {
    let toasts = use_toast();

    view! {
        <div class="toast-container">
            <For
                each=move || toasts.queue.with(|q| q.items().to_vec())
                key=|t| t.id
                children=move |toast: Toast| {
                    let id = toast.id;
                    view! {
                        <div class=toast.kind.class() on:click=move |_| toasts.dismiss(id)>
                            {toast.message}
                        </div>
                    }
                }
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_assigns_increasing_ids() {
        let mut q = ToastQueue::default();
        let a = q.push(ToastKind::Success, "saved");
        let b = q.push(ToastKind::Error, "failed");
        assert!(b > a);
        assert_eq!(q.items().len(), 2);
        assert_eq!(q.items()[1].message, "failed");
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut q = ToastQueue::default();
        for i in 0..(TOAST_LIMIT + 2) {
            q.push(ToastKind::Info, format!("m{}", i));
        }
        assert_eq!(q.items().len(), TOAST_LIMIT);
        assert_eq!(q.items()[0].message, "m2");
    }

    #[test]
    fn test_dismiss() {
        let mut q = ToastQueue::default();
        let a = q.push(ToastKind::Info, "a");
        q.push(ToastKind::Info, "b");
        q.dismiss(a);
        assert_eq!(q.items().len(), 1);
        assert_eq!(q.items()[0].message, "b");
        q.dismiss(999);
        assert_eq!(q.items().len(), 1);
    }
}
