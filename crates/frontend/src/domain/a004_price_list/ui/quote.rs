use contracts::domain::a004_price_list::aggregate::{QuoteRequest, QuoteResponse};
use contracts::enums::{Currency, PolicyType, VehicleUsage};
use contracts::shared::money::format_amount;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a004_price_list::api;
use crate::shared::components::lookup_select::code_options;
use crate::shared::components::{CodeSelect, DateInput, FormField};
use crate::shared::date_utils::today_iso;
use crate::shared::form_utils::non_empty;
use crate::shared::modal_stack::{ModalHandle, ModalHeader};

pub fn quote_label(quote: &QuoteResponse) -> String {
    format!(
        "{} {} (price list v{})",
        format_amount(quote.premium),
        quote.currency.code(),
        quote.price_list_version
    )
}

/// Расчёт премии по действующему прайс-листу без создания полиса.
#[component]
pub fn QuoteForm(handle: ModalHandle) -> impl IntoView {
    let policy_type = RwSignal::new(PolicyType::default().code().to_string());
    let currency = RwSignal::new(Currency::default().code().to_string());
    let date = RwSignal::new(today_iso());
    let tier = RwSignal::new(String::new());

    let (result, set_result) = signal::<Option<QuoteResponse>>(None);
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);

    let calculate = move |_| {
        let request = QuoteRequest {
            policy_type: PolicyType::from_code(&policy_type.get_untracked()).unwrap_or_default(),
            currency: Currency::from_code(&currency.get_untracked()).unwrap_or_default(),
            date: date.get_untracked(),
            tier: non_empty(tier.get_untracked()),
        };
        set_error.set(None);
        set_result.set(None);
        set_loading.set(true);
        spawn_local(async move {
            match api::quote(&request).await {
                Ok(quote) => set_result.set(Some(quote)),
                Err(e) => set_error.set(Some(e)),
            }
            set_loading.set(false);
        });
    };

    view! {
        <ModalHeader title="Premium quote" on_close=Callback::new(move |_| handle.close()) />
        <div class="modal-body">
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
            <div class="form__row">
                <FormField label="Policy type">
                    <CodeSelect value=policy_type options=code_options!(PolicyType) />
                </FormField>
                <FormField label="Currency">
                    <CodeSelect value=currency options=code_options!(Currency) />
                </FormField>
            </div>
            <div class="form__row">
                <FormField label="Start date">
                    <DateInput value=date />
                </FormField>
                <FormField label="Vehicle usage">
                    <CodeSelect value=tier options=code_options!(VehicleUsage) empty_label="Default rate" />
                </FormField>
            </div>
            {move || result.get().map(|quote| view! {
                <div class="quote-result">
                    <span class="quote-result__label">"Premium"</span>
                    <strong class="quote-result__value">{quote_label(&quote)}</strong>
                </div>
            })}
        </div>
        <div class="modal-footer">
            <Button appearance=ButtonAppearance::Secondary on_click=move |_| handle.close()>
                "Close"
            </Button>
            <Button appearance=ButtonAppearance::Primary on_click=calculate loading=loading>
                "Calculate"
            </Button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_label() {
        let quote = QuoteResponse {
            price_list_id: "p1".into(),
            price_list_version: 3,
            premium: 1250.5,
            currency: Currency::Usd,
        };
        assert_eq!(quote_label(&quote), format!("{} USD (price list v3)", format_amount(1250.5)));
    }
}
