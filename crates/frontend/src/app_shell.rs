//! Корень после авторизации: экран входа или основной layout.

use crate::layout::global_context::{use_app_context, Tab as TabData};
use crate::layout::left::Sidebar;
use crate::layout::tabs::TabPage;
use crate::layout::Shell;
use crate::system::auth::context::use_auth;
use crate::system::pages::login::LoginPage;
use contracts::system::navigation::home_page;
use leptos::prelude::*;
use thaw::*;

#[component]
fn MainLayout() -> impl IntoView {
    let tabs_store = use_app_context();
    let (auth_state, _) = use_auth();

    if let Some(role) = auth_state.get_untracked().role() {
        tabs_store.init_router_integration(role);
        if tabs_store.opened.with_untracked(|t| t.is_empty()) {
            tabs_store.open_page(home_page(role));
        }
    }

    view! {
        <Shell
            left=|| view! { <Sidebar /> }.into_any()
            center=move || {
                view! {
                    <For
                        each=move || tabs_store.opened.get()
                        key=|tab| tab.key.clone()
                        children=move |tab: TabData| view! { <TabPage tab=tab tabs_store=tabs_store /> }
                    />
                }
                .into_any()
            }
        />
    }
}

#[component]
pub fn AppShell() -> impl IntoView {
    let (auth_state, _) = use_auth();

    view! {
        <Show
            when=move || auth_state.with(|s| s.is_authenticated())
            fallback=move || {
                if auth_state.with(|s| s.is_restoring()) {
                    view! { <div class="app-loading"><Spinner /></div> }.into_any()
                } else {
                    view! { <LoginPage /> }.into_any()
                }
            }
        >
            <MainLayout />
        </Show>
    }
}
