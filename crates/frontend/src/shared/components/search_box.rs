use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

const SEARCH_DEBOUNCE_MS: u32 = 300;

/// Text input that reports its value after typing pauses.
#[component]
pub fn SearchBox(
    #[prop(into)] placeholder: String,
    on_search: Callback<String>,
) -> impl IntoView {
    let text = RwSignal::new(String::new());
    let generation = StoredValue::new(0u64);

    Effect::new(move |prev: Option<()>| {
        let value = text.get();
        generation.update_value(|g| *g += 1);
        if prev.is_none() {
            return;
        }
        let current = generation.get_value();
        spawn_local(async move {
            TimeoutFuture::new(SEARCH_DEBOUNCE_MS).await;
            // за время ожидания был ввод, этот запрос устарел
            if generation.try_get_value() == Some(current) {
                on_search.run(value);
            }
        });
    });

    view! {
        <div class="search-box">
            <Input value=text placeholder=placeholder />
        </div>
    }
}
