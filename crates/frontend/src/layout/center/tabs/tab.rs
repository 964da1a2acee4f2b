use crate::layout::global_context::{use_app_context, Tab as TabData};
use crate::shared::icons::icon;
use leptos::ev;
use leptos::prelude::*;

#[component]
pub fn Tab(tab: TabData) -> impl IntoView {
    let ctx = use_app_context();
    let key = StoredValue::new(tab.key.clone());

    let is_active = Memo::new(move |_| {
        ctx.active.with(|a| a.as_deref() == Some(key.get_value().as_str()))
    });
    // заголовок может поменяться после загрузки записи
    let title = move || {
        ctx.opened.with(|tabs| {
            tabs.iter()
                .find(|t| t.key == key.get_value())
                .map(|t| t.title.clone())
                .unwrap_or_default()
        })
    };

    view! {
        <div
            class="tabs__tab"
            class:tabs__tab--active=move || is_active.get()
            on:click=move |_| ctx.activate_tab(&key.get_value())
        >
            <span class="tabs__title">{title}</span>
            <button
                class="tabs__close"
                title="Close"
                on:click=move |ev: ev::MouseEvent| {
                    ev.stop_propagation();
                    ctx.close_tab(&key.get_value());
                }
            >
                {icon("x")}
            </button>
        </div>
    }
}
