use super::tabs::TabBar;
use crate::layout::global_context::use_app_context;
use leptos::prelude::*;

/// Рабочая область: полоса табов и их содержимое.
/// Пока ни один таб не открыт, показывается подсказка про меню слева.
#[component]
pub fn Center(children: Children) -> impl IntoView {
    let ctx = use_app_context();
    let nothing_open = move || ctx.opened.with(|tabs| tabs.is_empty());

    view! {
        <div data-zone="center" class="app-tabs">
            <TabBar />
            <Show when=nothing_open>
                <div class="app-tabs__empty">"Pick a page in the menu to get started."</div>
            </Show>
            <div class="app-tabs__content">{children()}</div>
        </div>
    }
}
