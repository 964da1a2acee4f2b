use crate::shared::icons::sized_icon;
use leptos::prelude::*;

#[component]
pub fn StatCard(
    label: &'static str,
    icon_name: &'static str,
    /// None while loading
    #[prop(into)]
    value: Signal<Option<String>>,
    #[prop(optional, into)] subtitle: MaybeProp<String>,
) -> impl IntoView {
    view! {
        <div class="stat-card">
            <div class="stat-card__header">
                <span class="stat-card__icon">{sized_icon(icon_name, 20)}</span>
                <span class="stat-card__label">{label}</span>
            </div>
            <div class="stat-card__value">
                {move || value.get().unwrap_or_else(|| "…".to_string())}
            </div>
            {move || subtitle.get().map(|s| view! { <div class="stat-card__subtitle">{s}</div> })}
        </div>
    }
}
