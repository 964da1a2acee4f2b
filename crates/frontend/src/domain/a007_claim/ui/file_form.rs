use contracts::domain::a006_policy::aggregate::PolicyListItem;
use contracts::domain::a007_claim::aggregate::ClaimDto;
use contracts::enums::PolicyStatus;
use contracts::shared::lookup::LookupItem;
use contracts::shared::pagination::ListQuery;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::{a006_policy, a007_claim::api};
use crate::shared::components::{DateInput, FormField, LookupSelect, SearchBox};
use crate::shared::date_utils::{today, today_iso};
use crate::shared::form_utils::parse_number;
use crate::shared::modal_stack::{ModalHandle, ModalHeader};
use crate::shared::toast::use_toast;

const PICKER_PAGE_SIZE: usize = 20;

fn policy_item(p: PolicyListItem) -> LookupItem {
    LookupItem {
        id: p.id,
        code: p.policy_no,
        name: format!("{}, {}", p.customer_name, p.policy_type.display_name()),
    }
}

/// Только действующие полисы: убыток по черновику или аннулированному не подаётся.
#[component]
fn ActivePolicyPicker(value: RwSignal<String>) -> impl IntoView {
    let items = RwSignal::new(Vec::<LookupItem>::new());
    let load = move |search: Option<String>| {
        let query = ListQuery {
            page_size: PICKER_PAGE_SIZE,
            search,
            status: Some(PolicyStatus::Active.code().to_string()),
            ..Default::default()
        };
        spawn_local(async move {
            match a006_policy::api::list(query).await {
                Ok(page) => items.set(page.items.into_iter().map(policy_item).collect()),
                Err(e) => log::warn!("policy lookup failed: {}", e),
            }
        });
    };
    load(None);

    view! {
        <div class="picker">
            <SearchBox
                placeholder="Policy number or customer..."
                on_search=Callback::new(move |text: String| load(Some(text).filter(|t| !t.trim().is_empty())))
            />
            <LookupSelect value=value items=items empty_label="-- select a policy --" />
        </div>
    }
}

#[component]
pub fn ClaimFileForm(
    #[prop(optional)] policy_id: Option<String>,
    handle: ModalHandle,
    on_saved: Callback<()>,
) -> impl IntoView {
    let toast = use_toast();
    let fixed_policy = policy_id.is_some();
    let policy = RwSignal::new(policy_id.unwrap_or_default());
    let incident_date = RwSignal::new(today_iso());
    let description = RwSignal::new(String::new());
    let amount = RwSignal::new(String::new());

    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    let submit = move |_| {
        let claimed_amount = match parse_number("Claimed amount", &amount.get_untracked()) {
            Ok(v) => v,
            Err(e) => {
                set_error.set(Some(e));
                return;
            }
        };
        let dto = ClaimDto {
            id: None,
            policy_id: policy.get_untracked(),
            incident_date: incident_date.get_untracked(),
            description: description.get_untracked().trim().to_string(),
            claimed_amount,
        };
        if let Err(errors) = dto.validate(today()) {
            set_error.set(Some(errors.to_string()));
            return;
        }

        set_error.set(None);
        set_saving.set(true);
        spawn_local(async move {
            let result = api::file(&dto).await;
            set_saving.set(false);
            match result {
                Ok(_) => {
                    toast.success("Claim filed");
                    on_saved.run(());
                    handle.close();
                }
                Err(e) => {
                    toast.error(format!("Failed to file claim: {}", e));
                    set_error.set(Some(e));
                }
            }
        });
    };

    view! {
        <ModalHeader title="File a claim" on_close=Callback::new(move |_| handle.close()) />
        <div class="modal-body">
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            {(!fixed_policy).then(|| view! {
                <FormField label="Policy" required=true>
                    <ActivePolicyPicker value=policy />
                </FormField>
            })}
            <div class="form__row">
                <FormField label="Incident date" required=true>
                    <DateInput value=incident_date max=today_iso() />
                </FormField>
                <FormField label="Claimed amount" required=true>
                    <Input value=amount />
                </FormField>
            </div>
            <FormField label="What happened" required=true>
                <Textarea value=description />
            </FormField>
        </div>
        <div class="modal-footer">
            <Button appearance=ButtonAppearance::Secondary on_click=move |_| handle.close()>
                "Cancel"
            </Button>
            <Button appearance=ButtonAppearance::Primary on_click=submit loading=saving>
                "File claim"
            </Button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::enums::{Currency, PolicyType};

    #[test]
    fn test_policy_item_label() {
        let item = policy_item(PolicyListItem {
            id: "p1".into(),
            code: "POL-000001".into(),
            policy_no: "TRF-00000042".into(),
            policy_type: PolicyType::Traffic,
            status: PolicyStatus::Active,
            customer_id: "c1".into(),
            customer_name: "Ayse Kaya".into(),
            vehicle_plate: None,
            dealer_id: "d1".into(),
            dealer_name: "Anka".into(),
            currency: Currency::Try,
            premium: 1000.0,
            commission: 100.0,
            start_date: "2024-01-01".into(),
            end_date: "2024-12-31".into(),
        });
        assert_eq!(item.code, "TRF-00000042");
        assert_eq!(item.name, "Ayse Kaya, Compulsory traffic");
    }
}
