pub mod tab;

use crate::layout::global_context::{use_app_context, Tab as TabData};
use leptos::prelude::*;
use tab::Tab;

/// Полоса открытых табов
#[component]
pub fn TabBar() -> impl IntoView {
    let ctx = use_app_context();

    view! {
        <Show when=move || !ctx.opened.with(|t| t.is_empty())>
            <div class="tabs__bar">
                <For
                    each=move || ctx.opened.get()
                    key=|t: &TabData| t.key.clone()
                    children=move |tab: TabData| view! { <Tab tab=tab /> }
                />
            </div>
        </Show>
    }
}
