//! Стек модальных окон. Формы создания/редактирования открываются здесь.
//!
//! Escape и клик по подложке закрывают только верхнее окно.

use gloo_timers::future::TimeoutFuture;
use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::sync::Arc;

type Builder = Arc<dyn Fn(ModalHandle) -> AnyView + Send + Sync>;

#[derive(Clone)]
struct ModalEntry {
    id: u64,
    builder: Builder,
    modal_style: Option<String>,
    modal_class: Option<String>,
}

#[derive(Clone, Copy)]
pub struct ModalHandle {
    id: u64,
    svc: ModalStackService,
}

impl ModalHandle {
    pub fn close(&self) {
        self.svc.close_deferred(self.id);
    }
}

#[derive(Clone, Copy)]
pub struct ModalStackService {
    stack: RwSignal<Vec<ModalEntry>>,
    next_id: RwSignal<u64>,
}

impl ModalStackService {
    pub fn new() -> Self {
        Self {
            stack: RwSignal::new(Vec::new()),
            next_id: RwSignal::new(1),
        }
    }

    pub fn is_open(&self) -> bool {
        self.stack.with(|s| !s.is_empty())
    }

    pub fn push<F>(&self, builder: F) -> ModalHandle
    where
        F: Fn(ModalHandle) -> AnyView + Send + Sync + 'static,
    {
        self.push_with_frame(None, None, builder)
    }

    pub fn push_with_frame<F>(
        &self,
        modal_style: Option<String>,
        modal_class: Option<String>,
        builder: F,
    ) -> ModalHandle
    where
        F: Fn(ModalHandle) -> AnyView + Send + Sync + 'static,
    {
        let id = self.next_id.get_untracked();
        self.next_id.set(id + 1);

        self.stack.update(|s| {
            s.push(ModalEntry {
                id,
                builder: Arc::new(builder),
                modal_style,
                modal_class,
            })
        });

        ModalHandle { id, svc: *self }
    }

    pub fn close(&self, id: u64) {
        self.stack.update(|s| s.retain(|e| e.id != id));
    }

    /// Закрытие на следующем тике: окно не удаляется во время обработки
    /// собственного события клика.
    pub fn close_deferred(&self, id: u64) {
        let svc = *self;
        spawn_local(async move {
            TimeoutFuture::new(0).await;
            svc.close(id);
        });
    }

    fn top_id(&self) -> Option<u64> {
        self.stack.with_untracked(|s| s.last().map(|e| e.id))
    }
}

pub fn use_modals() -> ModalStackService {
    use_context::<ModalStackService>().expect("ModalStackService not provided in context")
}

#[component]
fn ModalFrame(
    on_close: Callback<()>,
    z_index: i32,
    modal_class: Option<String>,
    modal_style: Option<String>,
    children: Children,
) -> impl IntoView {
    // закрываем, только если и нажатие, и отпускание были на подложке
    let pressed_on_overlay = RwSignal::new(false);
    let is_overlay = |ev: &ev::MouseEvent| match (ev.target(), ev.current_target()) {
        (Some(t), Some(ct)) => t == ct,
        _ => false,
    };

    let class = match modal_class {
        Some(extra) if !extra.is_empty() => format!("modal {}", extra),
        _ => "modal".to_string(),
    };

    view! {
        <div
            class="modal-overlay"
            style=format!("z-index: {};", z_index)
            on:mousedown=move |ev| pressed_on_overlay.set(is_overlay(&ev))
            on:click=move |ev| {
                let close = pressed_on_overlay.get_untracked() && is_overlay(&ev);
                pressed_on_overlay.set(false);
                if close {
                    on_close.run(());
                }
            }
        >
            <div class=class style=modal_style.unwrap_or_default()>
                {children()}
            </div>
        </div>
    }
}

/// Mounted once at the application root.
#[component]
pub fn ModalHost() -> impl IntoView {
    let svc = use_modals();

    let keydown = window_event_listener(ev::keydown, move |ev| {
        if ev.key() == "Escape" {
            if let Some(id) = svc.top_id() {
                svc.close_deferred(id);
            }
        }
    });
    on_cleanup(move || keydown.remove());

    view! {
        <For
            each={move || svc.stack.get().into_iter().enumerate().collect::<Vec<_>>()}
            key=|(_, entry)| entry.id
            children=move |(idx, entry): (usize, ModalEntry)| {
                let id = entry.id;
                let handle = ModalHandle { id, svc };
                view! {
                    <ModalFrame
                        on_close=Callback::new(move |_| svc.close_deferred(id))
                        z_index=1000 + idx as i32
                        modal_class=entry.modal_class.clone()
                        modal_style=entry.modal_style.clone()
                    >
                        {(entry.builder)(handle)}
                    </ModalFrame>
                }
            }
        />
    }
}

/// Заголовок окна формы; тело и кнопки форма рисует сама
/// (`modal-body`, `modal-footer`).
#[component]
pub fn ModalHeader(#[prop(into)] title: Signal<String>, on_close: Callback<()>) -> impl IntoView {
    view! {
        <div class="modal-header">
            <h2 class="modal-title">{move || title.get()}</h2>
            <button class="modal-close" title="Close" on:click=move |_| on_close.run(())>
                {crate::shared::icons::icon("x")}
            </button>
        </div>
    }
}
