//! Боковое меню: группы из `menu_for_role` текущей роли.

use crate::layout::global_context::use_app_context;
use crate::shared::icons::icon;
use crate::system::auth::context::use_auth;
use contracts::system::navigation::{base_key, menu_for_role, MenuGroup, MenuItem};
use leptos::prelude::*;

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_app_context();
    let (auth_state, _) = use_auth();

    // по умолчанию все группы раскрыты
    let collapsed = RwSignal::new(Vec::<&'static str>::new());

    let groups = move || {
        auth_state
            .get()
            .role()
            .map(menu_for_role)
            .unwrap_or_default()
    };

    view! {
        <nav class="app-sidebar__content">
            <For
                each=groups
                key=|g| g.id
                children=move |group: MenuGroup| {
                    let id = group.id;
                    let is_expanded = move || !collapsed.get().contains(&id);
                    view! {
                        <div class="app-sidebar__group">
                            <div
                                class="app-sidebar__item app-sidebar__item--group"
                                on:click=move |_| collapsed.update(|c| {
                                    if let Some(pos) = c.iter().position(|g| *g == id) {
                                        c.remove(pos);
                                    } else {
                                        c.push(id);
                                    }
                                })
                            >
                                <div class="app-sidebar__item-content">
                                    {icon(group.icon)}
                                    <span>{group.label}</span>
                                </div>
                                <div
                                    class="app-sidebar__chevron"
                                    class:app-sidebar__chevron--expanded=is_expanded
                                >
                                    {icon("chevron-right")}
                                </div>
                            </div>
                            <Show when=is_expanded>
                                <div class="app-sidebar__children">
                                    {group.items.clone().into_iter().map(|item: MenuItem| {
                                        let key = item.key;
                                        view! {
                                            <div
                                                class="app-sidebar__item"
                                                class:app-sidebar__item--active=move || {
                                                    ctx.active.get().as_deref().map(base_key) == Some(key)
                                                }
                                                on:click=move |_| ctx.open_page(key)
                                            >
                                                <div class="app-sidebar__item-content">
                                                    {icon(item.icon)}
                                                    <span>{item.label}</span>
                                                </div>
                                            </div>
                                        }
                                    }).collect_view()}
                                </div>
                            </Show>
                        </div>
                    }
                }
            />
        </nav>
    }
}
