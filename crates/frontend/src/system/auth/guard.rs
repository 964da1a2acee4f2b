use contracts::system::roles::{Permission, Resource};
use leptos::prelude::*;

use super::context::use_auth;

/// Renders children only when the current role may open the resource.
#[component]
pub fn RequireView(resource: Resource, children: ChildrenFn) -> impl IntoView {
    let (auth_state, _) = use_auth();

    view! {
        <Show
            when=move || auth_state.get().can_view(resource)
            fallback=|| view! { <div class="alert alert--error">"Access denied."</div> }
        >
            {children()}
        </Show>
    }
}

/// Hides children (no fallback) when the permission is missing. Used for buttons.
#[component]
pub fn RequirePermission(permission: Permission, children: ChildrenFn) -> impl IntoView {
    let (auth_state, _) = use_auth();

    view! {
        <Show when=move || auth_state.get().can(permission)>
            {children()}
        </Show>
    }
}
