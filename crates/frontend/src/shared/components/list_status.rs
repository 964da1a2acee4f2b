use leptos::prelude::*;
use thaw::*;

/// Состояния списка поверх таблицы: загрузка, ошибка, пусто.
#[component]
pub fn ListStatus(
    #[prop(into)] loading: Signal<bool>,
    #[prop(into)] error: Signal<Option<String>>,
    #[prop(into)] empty: Signal<bool>,
    on_retry: Callback<()>,
    #[prop(optional)] empty_text: Option<&'static str>,
) -> impl IntoView {
    let empty_text = empty_text.unwrap_or("Nothing found.");

    view! {
        {move || error.get().map(|e| view! {
            <div class="alert alert--error">
                <span>{e}</span>
                <Button appearance=ButtonAppearance::Subtle on_click=move |_| on_retry.run(())>
                    "Retry"
                </Button>
            </div>
        })}
        <Show when=move || loading.get()>
            <div class="list-status list-status--loading">
                <Spinner />
            </div>
        </Show>
        <Show when=move || empty.get()>
            <div class="list-status list-status--empty">{empty_text}</div>
        </Show>
    }
}
