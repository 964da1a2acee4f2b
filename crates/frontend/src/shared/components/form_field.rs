use leptos::prelude::*;

/// Подпись + поле; `*` для обязательных
#[component]
pub fn FormField(
    label: &'static str,
    #[prop(optional)] required: bool,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="form__group">
            <label class="form__label">
                {label}
                {required.then(|| view! { <span class="form__required">" *"</span> })}
            </label>
            {children()}
        </div>
    }
}
