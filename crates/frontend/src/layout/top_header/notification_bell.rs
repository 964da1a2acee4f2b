use contracts::domain::a010_notification::aggregate::UnreadCount;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a010_notification::api;
use crate::layout::global_context::use_app_context;
use crate::shared::icons::icon;
use crate::shared::polling::poll_every;

const UNREAD_POLL_MS: u32 = 30_000;

/// Счётчик непрочитанных, общий для колокольчика и страницы уведомлений.
#[derive(Clone, Copy)]
pub struct NotificationBadge {
    pub unread: RwSignal<UnreadCount>,
}

impl NotificationBadge {
    pub fn new() -> Self {
        Self {
            unread: RwSignal::new(UnreadCount::default()),
        }
    }

    pub fn refresh(&self) {
        let unread = self.unread;
        spawn_local(async move {
            match api::unread_count().await {
                Ok(count) => {
                    let _ = unread.try_set(count);
                }
                Err(e) => log::debug!("unread count failed: {}", e),
            }
        });
    }
}

pub fn use_notification_badge() -> NotificationBadge {
    use_context::<NotificationBadge>().expect("NotificationBadge not provided in context")
}

#[component]
pub fn NotificationBell() -> impl IntoView {
    let ctx = use_app_context();
    let badge = use_notification_badge();

    poll_every(UNREAD_POLL_MS, move || badge.refresh());

    view! {
        <button
            class="top-header__icon-btn top-header__bell"
            title="Notifications"
            on:click=move |_| ctx.open_page("a010_notification")
        >
            {icon("bell")}
            {move || badge.unread.get().badge().map(|text| view! {
                <span class="top-header__badge">{text}</span>
            })}
        </button>
    }
}
