use contracts::domain::a004_price_list::aggregate::{PriceList, PriceListDto};
use contracts::enums::{Currency, PolicyType};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::rates::{rates_from_rows, rows_from_rates, RatesEditor};
use crate::domain::a004_price_list::api;
use crate::shared::components::lookup_select::code_options;
use crate::shared::components::{CodeSelect, DateInput, FormField};
use crate::shared::export::{read_file_text, selected_file};
use crate::shared::form_utils::{non_empty, or_empty};
use crate::shared::modal_stack::{ModalHandle, ModalHeader};
use crate::shared::toast::use_toast;

#[component]
pub fn PriceListForm(
    price_list: Option<PriceList>,
    handle: ModalHandle,
    on_saved: Callback<()>,
) -> impl IntoView {
    let toast = use_toast();
    let dto = price_list.as_ref().map(|p| p.to_dto()).unwrap_or_default();
    let title = match &price_list {
        Some(p) => format!("Price list {} v{}", p.base.code, p.version),
        None => "New price list".to_string(),
    };

    let id = StoredValue::new(dto.id.clone());
    let code = StoredValue::new(dto.code.clone());
    let version = StoredValue::new(dto.version);
    let name = RwSignal::new(dto.description.clone());
    let policy_type = RwSignal::new(dto.policy_type.code().to_string());
    let currency = RwSignal::new(dto.currency.code().to_string());
    let valid_from = RwSignal::new(dto.valid_from.clone());
    let valid_to = RwSignal::new(dto.valid_to.clone());
    let rates = RwSignal::new(rows_from_rates(&dto.rates));
    let comment = RwSignal::new(or_empty(&dto.comment));

    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    let submit = move |_| {
        let parsed_rates = match rates.with_untracked(|rows| rates_from_rows(rows)) {
            Ok(r) => r,
            Err(e) => {
                set_error.set(Some(e));
                return;
            }
        };
        let dto = PriceListDto {
            id: id.get_value(),
            code: code.get_value(),
            description: name.get_untracked().trim().to_string(),
            policy_type: PolicyType::from_code(&policy_type.get_untracked()).unwrap_or_default(),
            currency: Currency::from_code(&currency.get_untracked()).unwrap_or_default(),
            valid_from: valid_from.get_untracked(),
            valid_to: valid_to.get_untracked(),
            version: version.get_value(),
            rates: parsed_rates,
            comment: non_empty(comment.get_untracked()),
        };
        if let Err(errors) = dto.validate() {
            set_error.set(Some(errors.to_string()));
            return;
        }

        set_error.set(None);
        set_saving.set(true);
        spawn_local(async move {
            let result = api::save(&dto).await;
            set_saving.set(false);
            match result {
                Ok(_) => {
                    toast.success(format!("Price list {} saved", dto.description));
                    on_saved.run(());
                    handle.close();
                }
                Err(e) => {
                    toast.error(format!("Failed to save price list: {}", e));
                    set_error.set(Some(e));
                }
            }
        });
    };

    view! {
        <ModalHeader title=title on_close=Callback::new(move |_| handle.close()) />
        <div class="modal-body">
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            <FormField label="Name" required=true>
                <Input value=name />
            </FormField>
            <div class="form__row">
                <FormField label="Policy type" required=true>
                    <CodeSelect value=policy_type options=code_options!(PolicyType) />
                </FormField>
                <FormField label="Currency" required=true>
                    <CodeSelect value=currency options=code_options!(Currency) />
                </FormField>
            </div>
            <div class="form__row">
                <FormField label="Valid from" required=true>
                    <DateInput value=valid_from />
                </FormField>
                <FormField label="Valid to" required=true>
                    <DateInput value=valid_to />
                </FormField>
            </div>
            {version.get_value().map(|v| view! {
                <p class="form__hint">
                    {format!("Current version v{}. A new version is assigned when the validity window overlaps another list.", v)}
                </p>
            })}
            <FormField label="Rates" required=true>
                <RatesEditor rows=rates />
            </FormField>
            <FormField label="Comment">
                <Textarea value=comment />
            </FormField>
        </div>
        <div class="modal-footer">
            <Button appearance=ButtonAppearance::Secondary on_click=move |_| handle.close()>
                "Cancel"
            </Button>
            <Button appearance=ButtonAppearance::Primary on_click=submit loading=saving>
                "Save"
            </Button>
        </div>
    }
}

/// Загрузка тарифов из CSV-файла (`tier,premium`), заменяет текущие.
#[component]
pub fn RatesImportForm(price_list: PriceList, handle: ModalHandle, on_saved: Callback<()>) -> impl IntoView {
    let toast = use_toast();
    let id = StoredValue::new(price_list.to_string_id());
    let title = format!("Import rates: {} v{}", price_list.base.description, price_list.version);

    let file = StoredValue::new_local(None::<web_sys::File>);
    let (file_name, set_file_name) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (importing, set_importing) = signal(false);

    let on_file = move |ev: web_sys::Event| {
        let picked = selected_file(&ev);
        set_file_name.set(picked.as_ref().map(|f| f.name()).unwrap_or_default());
        file.set_value(picked);
    };

    let submit = move |_| {
        let Some(picked) = file.get_value() else {
            set_error.set(Some("Choose a CSV file first".to_string()));
            return;
        };
        set_error.set(None);
        set_importing.set(true);
        spawn_local(async move {
            let result = match read_file_text(&picked).await {
                Ok(text) => api::import_csv(&id.get_value(), text).await,
                Err(e) => Err(e),
            };
            set_importing.set(false);
            match result {
                Ok(imported) => {
                    toast.success(format!("Imported {} rates", imported.imported));
                    on_saved.run(());
                    handle.close();
                }
                Err(e) => {
                    toast.error(format!("Import failed: {}", e));
                    set_error.set(Some(e));
                }
            }
        });
    };

    view! {
        <ModalHeader title=title on_close=Callback::new(move |_| handle.close()) />
        <div class="modal-body">
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
            <p class="form__hint">
                "The file needs a header row with tier and premium columns. Existing rates are replaced."
            </p>
            <input type="file" accept=".csv,text/csv" on:change=on_file />
            <Show when=move || !file_name.get().is_empty()>
                <div class="form__hint">{move || file_name.get()}</div>
            </Show>
        </div>
        <div class="modal-footer">
            <Button appearance=ButtonAppearance::Secondary on_click=move |_| handle.close()>
                "Cancel"
            </Button>
            <Button appearance=ButtonAppearance::Primary on_click=submit loading=importing>
                "Import"
            </Button>
        </div>
    }
}
