use contracts::shared::lookup::LookupItem;
use leptos::prelude::*;
use thaw::*;

/// Выпадающий список ссылочного поля. Пустое значение = не выбрано.
#[component]
pub fn LookupSelect(
    value: RwSignal<String>,
    #[prop(into)] items: Signal<Vec<LookupItem>>,
    #[prop(into, optional)] empty_label: Option<String>,
    #[prop(into, optional)] disabled: Signal<bool>,
) -> impl IntoView {
    let empty_label = empty_label.unwrap_or_else(|| "-- not selected --".to_string());

    view! {
        <Select value=value disabled=disabled>
            <option value="">{empty_label}</option>
            <For
                each=move || items.get()
                key=|item| item.id.clone()
                children=move |item: LookupItem| {
                    let id = item.id.clone();
                    view! { <option value=id>{item.label()}</option> }
                }
            />
        </Select>
    }
}

/// Список значений перечисления: (code, display name).
#[component]
pub fn CodeSelect(
    value: RwSignal<String>,
    options: Vec<(&'static str, &'static str)>,
    #[prop(into, optional)] empty_label: Option<String>,
) -> impl IntoView {
    view! {
        <Select value=value>
            {empty_label.map(|label| view! { <option value="">{label}</option> })}
            {options
                .into_iter()
                .map(|(code, name)| view! { <option value=code>{name}</option> })
                .collect_view()}
        </Select>
    }
}

/// `(code, display_name)` pairs of a code enum, for `CodeSelect`.
macro_rules! code_options {
    ($enum:ty) => {
        <$enum>::ALL
            .iter()
            .map(|v| (v.code(), v.display_name()))
            .collect::<Vec<(&'static str, &'static str)>>()
    };
}

pub(crate) use code_options;

/// Display name of a referenced record; the raw id when it is not in the list.
pub fn lookup_name(items: &[LookupItem], id: &str) -> String {
    items
        .iter()
        .find(|item| item.id == id)
        .map(|item| item.name.clone())
        .unwrap_or_else(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_name() {
        let items = vec![LookupItem {
            id: "d1".into(),
            code: "DLR-000001".into(),
            name: "Anka".into(),
        }];
        assert_eq!(lookup_name(&items, "d1"), "Anka");
        assert_eq!(lookup_name(&items, "zz"), "zz");
    }
}
