//! Верхняя панель: бренд, переключатель меню, уведомления, пользователь, выход.

pub mod notification_bell;

use crate::layout::global_context::use_app_context;
use crate::shared::icons::icon;
use crate::system::auth::context::{do_logout, use_auth};
use leptos::prelude::*;
use leptos::task::spawn_local;
use notification_bell::NotificationBell;

#[component]
pub fn TopHeader() -> impl IntoView {
    let ctx = use_app_context();
    let (auth_state, set_auth_state) = use_auth();

    let logout = move |_| {
        ctx.close_all();
        spawn_local(async move {
            let _ = do_logout(set_auth_state).await;
        });
    };

    let user_name = move || {
        auth_state
            .get()
            .user_info
            .map(|u| u.display_name().to_string())
            .unwrap_or_default()
    };
    let role_name = move || {
        auth_state
            .get()
            .role()
            .map(|r| r.display_name())
            .unwrap_or_default()
    };

    view! {
        <header class="top-header">
            <div class="top-header__brand">
                <button
                    class="top-header__icon-btn"
                    title=move || if ctx.left_open.get() { "Hide navigation" } else { "Show navigation" }
                    on:click=move |_| ctx.toggle_left()
                >
                    {icon("panel-left")}
                </button>
                <span class="top-header__title">"Insurance Agency"</span>
            </div>

            <div class="top-header__actions">
                <NotificationBell />
                <div class="top-header__user">
                    {icon("user")}
                    <span class="top-header__user-name">{user_name}</span>
                    <span class="top-header__role">{role_name}</span>
                </div>
                <button class="top-header__icon-btn" title="Sign out" on:click=logout>
                    {icon("log-out")}
                </button>
            </div>
        </header>
    }
}
