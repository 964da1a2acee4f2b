use leptos::prelude::*;

/// Native date picker bound to a `yyyy-mm-dd` string; empty means no date.
#[component]
pub fn DateInput(
    value: RwSignal<String>,
    #[prop(into, optional)] disabled: Signal<bool>,
    #[prop(optional)] min: Option<String>,
    #[prop(optional)] max: Option<String>,
) -> impl IntoView {
    view! {
        <input
            type="date"
            class="date-input"
            prop:value=move || value.get()
            min=min
            max=max
            disabled=move || disabled.get()
            on:input=move |ev| value.set(event_target_value(&ev))
        />
    }
}

/// Pair of date inputs for a `from`/`to` filter.
#[component]
pub fn DateRange(from: RwSignal<String>, to: RwSignal<String>) -> impl IntoView {
    view! {
        <div class="date-range">
            <DateInput value=from />
            <span class="date-range__separator">"-"</span>
            <DateInput value=to />
        </div>
    }
}
