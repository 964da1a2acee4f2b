use contracts::domain::a007_claim::aggregate::{Claim, ClaimStatusChangeDto};
use contracts::enums::ClaimStatus;
use contracts::shared::money::format_amount;
use contracts::system::navigation::detail_key;
use contracts::system::roles::Permission;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a006_policy::ui::list::policy_tab_title;
use crate::domain::{a002_customer, a006_policy, a007_claim::api};
use crate::layout::global_context::use_app_context;
use crate::shared::components::{claim_status_tone, FormField, StatusBadge};
use crate::shared::date_utils::format_datetime;
use crate::shared::form_utils::{non_empty, parse_number};
use crate::shared::icons::icon;
use crate::shared::modal_stack::{use_modals, ModalHandle, ModalHeader};
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use crate::shared::toast::use_toast;
use crate::system::auth::context::use_auth;

fn action_label(status: ClaimStatus) -> &'static str {
    match status {
        ClaimStatus::Submitted => "Reopen",
        ClaimStatus::UnderReview => "Start review",
        ClaimStatus::Approved => "Approve",
        ClaimStatus::Rejected => "Reject",
        ClaimStatus::Paid => "Mark paid",
    }
}

#[component]
pub fn ClaimDetails(id: String) -> impl IntoView {
    let modals = use_modals();
    let ctx = use_app_context();
    let (auth_state, _) = use_auth();
    let id = StoredValue::new(id);

    let claim = RwSignal::new(None::<Claim>);
    let policy_label = RwSignal::new(String::new());
    let customer_name = RwSignal::new(String::new());
    let (error, set_error) = signal::<Option<String>>(None);

    let load = move || {
        set_error.set(None);
        spawn_local(async move {
            let loaded = match api::get(&id.get_value()).await {
                Ok(c) => c,
                Err(e) => {
                    set_error.set(Some(e));
                    return;
                }
            };
            claim.set(Some(loaded.clone()));
            if let Ok(p) = a006_policy::api::get(&loaded.policy_id).await {
                policy_label.set(policy_tab_title(&p.policy_no, &p.base.code));
            }
            if let Ok(c) = a002_customer::api::get(&loaded.customer_id).await {
                customer_name.set(c.base.description);
            }
        });
    };
    load();

    let open_policy = move |_| {
        if let Some(c) = claim.get_untracked() {
            ctx.open_tab(&detail_key("a006_policy", &c.policy_id), &policy_label.get_untracked());
        }
    };

    let change_to = move |target: ClaimStatus| {
        let Some(current) = claim.get_untracked() else {
            return;
        };
        let on_changed = Callback::new(move |updated: Claim| claim.set(Some(updated)));
        modals.push(move |handle| {
            view! {
                <ClaimStatusForm claim=current.clone() target=target handle=handle on_changed=on_changed />
            }
            .into_any()
        });
    };

    let can_process = move || auth_state.get().can(Permission::ProcessClaims);

    view! {
        <PageFrame page_id="a007_claim--detail" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">
                        {move || claim.with(|c| c.as_ref().map(|c| format!("Claim {}", c.base.code)))}
                    </h1>
                    {move || claim.with(|c| c.as_ref().map(|c| view! {
                        <StatusBadge label=c.status.display_name() tone=claim_status_tone(c.status) />
                    }))}
                </div>
                <div class="page__header-right">
                    <Show when=can_process>
                        {move || {
                            claim
                                .with(|c| c.as_ref().map(|c| c.status.next_statuses()).unwrap_or_default())
                                .into_iter()
                                .map(|target| {
                                    let appearance = if target == ClaimStatus::Rejected {
                                        ButtonAppearance::Secondary
                                    } else {
                                        ButtonAppearance::Primary
                                    };
                                    view! {
                                        <Button appearance=appearance on_click=move |_| change_to(target)>
                                            {action_label(target)}
                                        </Button>
                                    }
                                })
                                .collect_view()
                        }}
                    </Show>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| load()>
                        {icon("refresh")}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                {move || claim.get().map(|c| view! {
                    <Card>
                        <dl class="details-grid">
                            <dt>"Policy"</dt>
                            <dd>
                                <a class="link" on:click=open_policy>{move || policy_label.get()}</a>
                            </dd>
                            <dt>"Customer"</dt><dd>{move || customer_name.get()}</dd>
                            <dt>"Incident date"</dt><dd>{c.incident_date.format("%d.%m.%Y").to_string()}</dd>
                            <dt>"Claimed amount"</dt><dd>{format_amount(c.claimed_amount)}</dd>
                            {c.approved_amount.map(|a| view! { <dt>"Approved amount"</dt><dd>{format_amount(a)}</dd> })}
                            <dt>"Filed"</dt><dd>{format_datetime(&c.base.metadata.created_at.to_rfc3339())}</dd>
                            {c.decided_at.map(|at| view! { <dt>"Decided"</dt><dd>{format_datetime(&at.to_rfc3339())}</dd> })}
                            {c.resolution_note.clone().map(|n| view! { <dt>"Resolution note"</dt><dd>{n}</dd> })}
                        </dl>
                        <h3 class="card__title">"Description"</h3>
                        <p class="details-text">{c.base.description.clone()}</p>
                    </Card>
                })}
            </div>
        </PageFrame>
    }
}

/// Перевод заявления в следующий статус. Для одобрения нужна сумма,
/// для отказа комментарий.
#[component]
pub fn ClaimStatusForm(
    claim: Claim,
    target: ClaimStatus,
    handle: ModalHandle,
    on_changed: Callback<Claim>,
) -> impl IntoView {
    let toast = use_toast();
    let id = StoredValue::new(claim.to_string_id());
    let amount = RwSignal::new(format!("{}", claim.claimed_amount));
    let note = RwSignal::new(String::new());
    let title = format!("{}: claim {}", action_label(target), claim.base.code);

    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    let submit = move |_| {
        let approved_amount = if target == ClaimStatus::Approved {
            match parse_number("Approved amount", &amount.get_untracked()) {
                Ok(v) => Some(v),
                Err(e) => {
                    set_error.set(Some(e));
                    return;
                }
            }
        } else {
            None
        };
        let change = ClaimStatusChangeDto {
            status: target,
            approved_amount,
            note: non_empty(note.get_untracked()),
        };
        if target == ClaimStatus::Rejected && change.note.is_none() {
            set_error.set(Some("A rejection note is required".to_string()));
            return;
        }

        set_error.set(None);
        set_saving.set(true);
        spawn_local(async move {
            let result = api::change_status(&id.get_value(), &change).await;
            set_saving.set(false);
            match result {
                Ok(updated) => {
                    toast.success(format!("Claim is now {}", updated.status.display_name()));
                    on_changed.run(updated);
                    handle.close();
                }
                Err(e) => {
                    toast.error(format!("Failed to change status: {}", e));
                    set_error.set(Some(e));
                }
            }
        });
    };

    view! {
        <ModalHeader title=title on_close=Callback::new(move |_| handle.close()) />
        <div class="modal-body">
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
            {(target == ClaimStatus::Approved).then(|| view! {
                <FormField label="Approved amount" required=true>
                    <Input value=amount />
                </FormField>
            })}
            <FormField label="Note" required=target == ClaimStatus::Rejected>
                <Textarea value=note />
            </FormField>
        </div>
        <div class="modal-footer">
            <Button appearance=ButtonAppearance::Secondary on_click=move |_| handle.close()>
                "Cancel"
            </Button>
            <Button appearance=ButtonAppearance::Primary on_click=submit loading=saving>
                {action_label(target)}
            </Button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_next_status_has_an_action() {
        for status in ClaimStatus::ALL {
            for next in status.next_statuses() {
                assert!(!action_label(next).is_empty());
            }
        }
        assert_eq!(action_label(ClaimStatus::Paid), "Mark paid");
    }
}
