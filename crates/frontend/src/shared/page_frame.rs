use super::page_standard::page_class;
use leptos::prelude::*;

/// Root wrapper of every tab page.
#[component]
pub fn PageFrame(
    /// `{page_key}--{category}`, e.g. `"a006_policy--list"`
    page_id: &'static str,
    category: &'static str,
    #[prop(optional)] class: &'static str,
    children: Children,
) -> impl IntoView {
    let full_class = if class.is_empty() {
        page_class(category).to_string()
    } else {
        format!("{} {}", page_class(category), class)
    };

    view! {
        <div id=page_id class=full_class data-page-category=category>
            {children()}
        </div>
    }
}
