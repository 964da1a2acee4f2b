use chrono::Months;
use contracts::domain::a004_price_list::aggregate::QuoteRequest;
use contracts::domain::a006_policy::aggregate::{Policy, PolicyDto};
use contracts::enums::{Currency, PolicyType};
use contracts::shared::lookup::LookupItem;
use contracts::shared::validation::parse_date;
use contracts::system::roles::Role;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a002_customer::ui::picker::CustomerPicker;
use crate::domain::a004_price_list::ui::quote::quote_label;
use crate::domain::{a001_dealer, a003_vehicle, a004_price_list, a006_policy::api};
use crate::shared::components::lookup_select::code_options;
use crate::shared::components::{CodeSelect, DateInput, FormField, LookupSelect};
use crate::shared::date_utils::today_iso;
use crate::shared::form_utils::{non_empty, or_empty};
use crate::shared::modal_stack::{ModalHandle, ModalHeader};
use crate::shared::toast::use_toast;
use crate::system::auth::context::use_auth;

/// Конец срока по умолчанию: ровно год от начала.
pub fn default_end_date(start: &str) -> String {
    parse_date(start)
        .and_then(|d| d.checked_add_months(Months::new(12)))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[component]
pub fn PolicyForm(policy: Option<Policy>, handle: ModalHandle, on_saved: Callback<()>) -> impl IntoView {
    let toast = use_toast();
    let (auth_state, _) = use_auth();
    let auth = auth_state.get_untracked();
    let own_dealer = match auth.role() {
        Some(Role::Dealer) => auth.dealer_id(),
        _ => None,
    };

    let mut dto = policy.as_ref().map(|p| p.to_dto()).unwrap_or_default();
    if dto.id.is_none() {
        dto.start_date = today_iso();
        dto.end_date = default_end_date(&dto.start_date);
        if let Some(dealer) = &own_dealer {
            dto.dealer_id = dealer.clone();
        }
    }
    let title = match &policy {
        Some(p) => format!("Policy draft {}", p.base.code),
        None => "New policy".to_string(),
    };

    let id = StoredValue::new(dto.id.clone());
    let code = StoredValue::new(dto.code.clone());
    let policy_type = RwSignal::new(dto.policy_type.code().to_string());
    let currency = RwSignal::new(dto.currency.code().to_string());
    let dealer_id = RwSignal::new(dto.dealer_id.clone());
    let customer_id = RwSignal::new(dto.customer_id.clone());
    let vehicle_id = RwSignal::new(or_empty(&dto.vehicle_id));
    let start_date = RwSignal::new(dto.start_date.clone());
    let end_date = RwSignal::new(dto.end_date.clone());
    let comment = RwSignal::new(or_empty(&dto.comment));
    let dealer_locked = own_dealer.is_some();

    let selected_type = Signal::derive(move || PolicyType::from_code(&policy_type.get()).unwrap_or_default());
    let needs_vehicle = Signal::derive(move || selected_type.get().requires_vehicle());

    let dealers = RwSignal::new(Vec::<LookupItem>::new());
    spawn_local(async move {
        match a001_dealer::api::lookup().await {
            Ok(items) => dealers.set(items),
            Err(e) => log::warn!("dealer lookup failed: {}", e),
        }
    });

    // клиенты фильтруются по выбранному дилеру
    let dealer_scope = Signal::derive(move || non_empty(dealer_id.get()));

    let vehicles = RwSignal::new(Vec::<LookupItem>::new());
    Effect::new(move |prev: Option<String>| {
        let customer = customer_id.get();
        if prev.as_ref().is_some_and(|p| *p != customer) {
            vehicle_id.set(String::new());
        }
        if customer.is_empty() {
            vehicles.set(Vec::new());
        } else {
            let for_lookup = customer.clone();
            spawn_local(async move {
                match a003_vehicle::api::lookup_by_customer(&for_lookup).await {
                    Ok(items) => vehicles.set(items),
                    Err(e) => log::warn!("vehicle lookup failed: {}", e),
                }
            });
        }
        customer
    });

    // предварительный расчёт премии; окончательная фиксируется сервером при записи
    let quote = RwSignal::new(None::<Result<String, String>>);
    Effect::new(move |_| {
        let request_type = selected_type.get();
        let request_currency = Currency::from_code(&currency.get()).unwrap_or_default();
        let date = start_date.get();
        let vehicle = if needs_vehicle.get() { non_empty(vehicle_id.get()) } else { None };
        if date.is_empty() {
            quote.set(None);
            return;
        }
        spawn_local(async move {
            let tier = match vehicle {
                Some(v) => a003_vehicle::api::get(&v)
                    .await
                    .ok()
                    .map(|v| v.usage.code().to_string()),
                None => None,
            };
            let request = QuoteRequest {
                policy_type: request_type,
                currency: request_currency,
                date,
                tier,
            };
            let result = a004_price_list::api::quote(&request).await;
            quote.set(Some(result.map(|q| quote_label(&q))));
        });
    });

    let on_start_change = move |_| {
        let start = start_date.get_untracked();
        if end_date.get_untracked().is_empty() || id.get_value().is_none() {
            end_date.set(default_end_date(&start));
        }
    };

    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    let submit = move |_| {
        let dto = PolicyDto {
            id: id.get_value(),
            code: code.get_value(),
            policy_no: None,
            policy_type: selected_type.get_untracked(),
            customer_id: customer_id.get_untracked(),
            vehicle_id: if needs_vehicle.get_untracked() {
                non_empty(vehicle_id.get_untracked())
            } else {
                None
            },
            dealer_id: dealer_id.get_untracked(),
            currency: Currency::from_code(&currency.get_untracked()).unwrap_or_default(),
            start_date: start_date.get_untracked(),
            end_date: end_date.get_untracked(),
            premium: None,
            commission: None,
            status: None,
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
                    toast.success("Policy draft saved");
                    on_saved.run(());
                    handle.close();
                }
                Err(e) => {
                    toast.error(format!("Failed to save policy: {}", e));
                    set_error.set(Some(e));
                }
            }
        });
    };

    view! {
        <ModalHeader title=title on_close=Callback::new(move |_| handle.close()) />
        <div class="modal-body">
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            <div class="form__row">
                <FormField label="Policy type" required=true>
                    <CodeSelect value=policy_type options=code_options!(PolicyType) />
                </FormField>
                <FormField label="Currency" required=true>
                    <CodeSelect value=currency options=code_options!(Currency) />
                </FormField>
            </div>
            <FormField label="Dealer" required=true>
                <LookupSelect value=dealer_id items=dealers disabled=dealer_locked />
            </FormField>
            <FormField label="Customer" required=true>
                <CustomerPicker value=customer_id dealer_id=dealer_scope />
            </FormField>
            <Show when=move || needs_vehicle.get()>
                <FormField label="Vehicle" required=true>
                    <LookupSelect
                        value=vehicle_id
                        items=vehicles
                        empty_label="-- select a vehicle --"
                        disabled=Signal::derive(move || customer_id.get().is_empty())
                    />
                </FormField>
            </Show>
            <div class="form__row">
                <FormField label="Start date" required=true>
                    <div on:change=on_start_change>
                        <DateInput value=start_date />
                    </div>
                </FormField>
                <FormField label="End date" required=true>
                    <DateInput value=end_date />
                </FormField>
            </div>
            <div class="quote-result">
                <span class="quote-result__label">"Premium"</span>
                {move || match quote.get() {
                    Some(Ok(label)) => view! { <strong class="quote-result__value">{label}</strong> }.into_any(),
                    Some(Err(e)) => view! { <span class="quote-result__error">{e}</span> }.into_any(),
                    None => view! { <span class="quote-result__empty">"-"</span> }.into_any(),
                }}
            </div>
            <FormField label="Comment">
                <Textarea value=comment />
            </FormField>
        </div>
        <div class="modal-footer">
            <Button appearance=ButtonAppearance::Secondary on_click=move |_| handle.close()>
                "Cancel"
            </Button>
            <Button appearance=ButtonAppearance::Primary on_click=submit loading=saving>
                "Save draft"
            </Button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_end_date() {
        assert_eq!(default_end_date("2024-03-01"), "2025-03-01");
        assert_eq!(default_end_date("2024-02-29"), "2025-02-28");
        assert_eq!(default_end_date(""), "");
    }
}
