use contracts::shared::lookup::LookupItem;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a002_customer::api;
use crate::shared::components::{LookupSelect, SearchBox};

/// Выбор клиента с поиском на сервере.
///
/// Уже выбранный клиент догружается отдельно, чтобы он был в списке
/// даже когда не попадает в результаты поиска.
#[component]
pub fn CustomerPicker(
    value: RwSignal<String>,
    #[prop(into, optional)] dealer_id: Signal<Option<String>>,
    #[prop(into, optional)] disabled: Signal<bool>,
) -> impl IntoView {
    let items = RwSignal::new(Vec::<LookupItem>::new());
    let selected = RwSignal::new(None::<LookupItem>);

    let load = move |search: Option<String>| {
        let dealer = dealer_id.get_untracked();
        spawn_local(async move {
            match api::lookup(search, dealer).await {
                Ok(found) => items.set(found),
                Err(e) => log::warn!("customer lookup failed: {}", e),
            }
        });
    };

    Effect::new(move |_| {
        dealer_id.track();
        load(None);
    });

    let initial = value.get_untracked();
    if !initial.is_empty() {
        spawn_local(async move {
            if let Ok(customer) = api::get(&initial).await {
                selected.set(Some(LookupItem {
                    id: customer.to_string_id(),
                    code: customer.base.code.clone(),
                    name: customer.base.description.clone(),
                }));
            }
        });
    }

    let options = Signal::derive(move || {
        let mut list = items.get();
        if let Some(current) = selected.get() {
            if !list.iter().any(|i| i.id == current.id) {
                list.insert(0, current);
            }
        }
        list
    });

    view! {
        <div class="customer-picker">
            <Show when=move || !disabled.get()>
                <SearchBox
                    placeholder="Search customer..."
                    on_search=Callback::new(move |text: String| {
                        let text = text.trim().to_string();
                        load((!text.is_empty()).then_some(text));
                    })
                />
            </Show>
            <LookupSelect value=value items=options disabled=disabled />
        </div>
    }
}
