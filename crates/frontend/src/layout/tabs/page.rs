use super::registry::render_tab_content;
use crate::layout::global_context::{AppGlobalContext, Tab as TabData};
use crate::system::auth::context::use_auth;
use leptos::prelude::*;

/// Контент таба создаётся один раз при открытии; неактивные табы только
/// скрываются, поэтому состояние страниц (фильтры, страница списка) живёт,
/// пока таб открыт.
#[component]
pub fn TabPage(tab: TabData, tabs_store: AppGlobalContext) -> impl IntoView {
    let (auth_state, _) = use_auth();
    let key = tab.key.clone();
    let key_for_active = tab.key.clone();

    let is_active = move || tabs_store.active.with(|a| a.as_deref() == Some(key_for_active.as_str()));
    let content = render_tab_content(&key, auth_state.get_untracked().role());

    view! {
        <div
            class="tabs__item"
            class:tabs__item--hidden=move || !is_active()
            data-tab-key=key
        >
            {content}
        </div>
    }
}
