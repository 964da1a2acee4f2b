use contracts::domain::a005_policy_series::aggregate::{
    format_policy_number, PolicySeries, PolicySeriesDto,
};
use contracts::enums::PolicyType;
use contracts::shared::lookup::LookupItem;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::{a001_dealer, a005_policy_series::api};
use crate::shared::components::lookup_select::code_options;
use crate::shared::components::{CodeSelect, FormField, LookupSelect};
use crate::shared::form_utils::{non_empty, or_empty};
use crate::shared::modal_stack::{ModalHandle, ModalHeader};
use crate::shared::toast::use_toast;

fn parse_number_field(label: &str, value: &str) -> Result<i64, String> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("{}: not a whole number", label))
}

/// Диапазон номеров серии. Уже выданные номера не переиспользуются:
/// при редактировании `next_number` остаётся прежним.
#[component]
pub fn PolicySeriesForm(
    series: Option<PolicySeries>,
    handle: ModalHandle,
    on_saved: Callback<()>,
) -> impl IntoView {
    let toast = use_toast();
    let dto = series.as_ref().map(|s| s.to_dto()).unwrap_or_default();
    let used = series.as_ref().map(|s| s.used_count()).unwrap_or(0);
    let title = match &series {
        Some(s) => format!("Policy series {}", s.prefix),
        None => "New policy series".to_string(),
    };

    let id = StoredValue::new(dto.id.clone());
    let next_number = StoredValue::new(dto.next_number);
    let dealer_id = RwSignal::new(dto.dealer_id.clone());
    let policy_type = RwSignal::new(dto.policy_type.code().to_string());
    let prefix = RwSignal::new(dto.prefix.clone());
    let range_start = RwSignal::new(dto.range_start.to_string());
    let range_end = RwSignal::new(dto.range_end.to_string());
    let comment = RwSignal::new(or_empty(&dto.comment));

    let dealers = RwSignal::new(Vec::<LookupItem>::new());
    spawn_local(async move {
        match a001_dealer::api::lookup().await {
            Ok(items) => dealers.set(items),
            Err(e) => log::warn!("dealer lookup failed: {}", e),
        }
    });

    let sample = Signal::derive(move || {
        let start = range_start.get().trim().parse::<i64>().unwrap_or(1);
        format_policy_number(&prefix.get().trim().to_uppercase(), start)
    });

    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    let submit = move |_| {
        let range = parse_number_field("Range start", &range_start.get_untracked()).and_then(|start| {
            parse_number_field("Range end", &range_end.get_untracked()).map(|end| (start, end))
        });
        let (start, end) = match range {
            Ok(r) => r,
            Err(e) => {
                set_error.set(Some(e));
                return;
            }
        };
        let dto = PolicySeriesDto {
            id: id.get_value(),
            dealer_id: dealer_id.get_untracked(),
            policy_type: PolicyType::from_code(&policy_type.get_untracked()).unwrap_or_default(),
            prefix: prefix.get_untracked().trim().to_uppercase(),
            range_start: start,
            range_end: end,
            next_number: next_number.get_value(),
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
                    toast.success(format!("Series {} saved", dto.prefix));
                    on_saved.run(());
                    handle.close();
                }
                Err(e) => {
                    toast.error(format!("Failed to save series: {}", e));
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
                <FormField label="Dealer" required=true>
                    <LookupSelect value=dealer_id items=dealers />
                </FormField>
                <FormField label="Policy type" required=true>
                    <CodeSelect value=policy_type options=code_options!(PolicyType) />
                </FormField>
            </div>
            <div class="form__row">
                <FormField label="Prefix" required=true>
                    <Input value=prefix placeholder="TRF" />
                </FormField>
                <FormField label="Range start" required=true>
                    <Input value=range_start />
                </FormField>
                <FormField label="Range end" required=true>
                    <Input value=range_end />
                </FormField>
            </div>
            <p class="form__hint">
                "First number: " {move || sample.get()}
                {(used > 0).then(|| format!(". {} numbers already issued.", used))}
            </p>
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_field() {
        assert_eq!(parse_number_field("Range start", " 42 "), Ok(42));
        assert_eq!(
            parse_number_field("Range end", ""),
            Err("Range end: not a whole number".to_string())
        );
    }
}
