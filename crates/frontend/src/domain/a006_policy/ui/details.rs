//! Карточка полиса в отдельном табе: реквизиты, выпуск, аннулирование,
//! подача убытка по действующему полису.

use contracts::domain::a006_policy::aggregate::Policy;
use contracts::enums::PolicyStatus;
use contracts::shared::money::format_amount;
use contracts::system::navigation::detail_key;
use contracts::system::roles::Permission;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::form::PolicyForm;
use super::list::policy_tab_title;
use crate::domain::a007_claim::ui::file_form::ClaimFileForm;
use crate::domain::{a001_dealer, a002_customer, a003_vehicle, a006_policy::api};
use crate::layout::global_context::use_app_context;
use crate::shared::components::{lookup_name, policy_status_tone, FormField, StatusBadge};
use crate::shared::confirm::confirm;
use crate::shared::date_utils::format_datetime;
use crate::shared::icons::icon;
use crate::shared::modal_stack::{use_modals, ModalHandle, ModalHeader};
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use crate::shared::toast::use_toast;
use crate::system::auth::context::use_auth;

#[derive(Clone, Debug, Default, PartialEq)]
struct RelatedNames {
    customer: String,
    vehicle: Option<String>,
    dealer: String,
}

async fn load_names(policy: &Policy) -> RelatedNames {
    let customer = match a002_customer::api::get(&policy.customer_id).await {
        Ok(c) => c.base.description,
        Err(_) => policy.customer_id.clone(),
    };
    let vehicle = match &policy.vehicle_id {
        Some(id) => Some(match a003_vehicle::api::get(id).await {
            Ok(v) => format!("{} ({} {})", v.plate_number, v.brand, v.model),
            Err(_) => id.clone(),
        }),
        None => None,
    };
    let dealer = match a001_dealer::api::lookup().await {
        Ok(items) => lookup_name(&items, &policy.dealer_id),
        Err(_) => policy.dealer_id.clone(),
    };
    RelatedNames {
        customer,
        vehicle,
        dealer,
    }
}

#[component]
pub fn PolicyDetails(id: String) -> impl IntoView {
    let toast = use_toast();
    let modals = use_modals();
    let ctx = use_app_context();
    let (auth_state, _) = use_auth();
    let tab_key = StoredValue::new(detail_key("a006_policy", &id));
    let id = StoredValue::new(id);

    let policy = RwSignal::new(None::<Policy>);
    let names = RwSignal::new(RelatedNames::default());
    let (error, set_error) = signal::<Option<String>>(None);
    let (busy, set_busy) = signal(false);

    let show = move |p: Policy| {
        ctx.update_tab_title(&tab_key.get_value(), &policy_tab_title(&p.policy_no, &p.base.code));
        let for_names = p.clone();
        policy.set(Some(p));
        spawn_local(async move {
            let loaded = load_names(&for_names).await;
            let _ = names.try_set(loaded);
        });
    };

    let load = move || {
        set_error.set(None);
        spawn_local(async move {
            match api::get(&id.get_value()).await {
                Ok(p) => show(p),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };
    load();

    let can_issue = move || auth_state.get().can(Permission::IssuePolicies);
    let status = move || policy.with(|p| p.as_ref().map(|p| p.status));
    let is_draft = move || status() == Some(PolicyStatus::Draft);
    let is_active = move || status() == Some(PolicyStatus::Active);

    let edit = move |_| {
        let Some(current) = policy.get_untracked() else {
            return;
        };
        let on_saved = Callback::new(move |_| load());
        modals.push(move |handle| {
            view! { <PolicyForm policy=Some(current.clone()) handle=handle on_saved=on_saved /> }.into_any()
        });
    };

    let issue = move |_| {
        if !confirm("Issue this policy? A number is taken from the dealer's series and the draft can no longer be edited.") {
            return;
        }
        set_busy.set(true);
        spawn_local(async move {
            match api::issue(&id.get_value()).await {
                Ok(p) => {
                    toast.success(format!("Policy {} issued", p.policy_no));
                    show(p);
                }
                Err(e) => toast.error(format!("Failed to issue policy: {}", e)),
            }
            set_busy.set(false);
        });
    };

    let cancel = move |_| {
        let on_cancelled = Callback::new(move |p: Policy| show(p));
        let policy_id = id.get_value();
        modals.push(move |handle| {
            view! { <CancelPolicyForm policy_id=policy_id.clone() handle=handle on_cancelled=on_cancelled /> }.into_any()
        });
    };

    let delete = move |_| {
        if !confirm("Delete this draft?") {
            return;
        }
        spawn_local(async move {
            match api::delete(&id.get_value()).await {
                Ok(()) => {
                    toast.success("Draft deleted");
                    ctx.close_tab(&tab_key.get_value());
                }
                Err(e) => toast.error(format!("Failed to delete draft: {}", e)),
            }
        });
    };

    let file_claim = move |_| {
        let policy_id = id.get_value();
        let on_saved = Callback::new(move |_| ());
        modals.push(move |handle| {
            view! { <ClaimFileForm policy_id=policy_id.clone() handle=handle on_saved=on_saved /> }.into_any()
        });
    };

    view! {
        <PageFrame page_id="a006_policy--detail" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">
                        {move || policy.with(|p| p.as_ref().map(|p| policy_tab_title(&p.policy_no, &p.base.code)))}
                    </h1>
                    {move || policy.with(|p| p.as_ref().map(|p| view! {
                        <StatusBadge label=p.status.display_name() tone=policy_status_tone(p.status) />
                    }))}
                </div>
                <div class="page__header-right">
                    <Show when=move || can_issue() && is_draft()>
                        <Button appearance=ButtonAppearance::Secondary on_click=edit>
                            {icon("edit")}
                            " Edit"
                        </Button>
                        <Button appearance=ButtonAppearance::Primary on_click=issue loading=busy>
                            {icon("check")}
                            " Issue"
                        </Button>
                        <Button appearance=ButtonAppearance::Subtle on_click=delete>
                            {icon("trash")}
                        </Button>
                    </Show>
                    <Show when=move || can_issue() && is_active()>
                        <Button appearance=ButtonAppearance::Secondary on_click=cancel>
                            {icon("x")}
                            " Cancel policy"
                        </Button>
                    </Show>
                    <Show when=move || is_active() && auth_state.get().can(Permission::FileClaims)>
                        <Button appearance=ButtonAppearance::Secondary on_click=file_claim>
                            {icon("alert-triangle")}
                            " File claim"
                        </Button>
                    </Show>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| load()>
                        {icon("refresh")}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                {move || policy.get().map(|p| {
                    let n = names.get();
                    let premium = format!("{} {}", format_amount(p.premium), p.currency.code());
                    let commission = format!("{} {}", format_amount(p.commission), p.currency.code());
                    view! {
                        <Card>
                            <dl class="details-grid">
                                <dt>"Code"</dt><dd>{p.base.code.clone()}</dd>
                                <dt>"Policy number"</dt>
                                <dd>{if p.policy_no.is_empty() { "not issued yet".to_string() } else { p.policy_no.clone() }}</dd>
                                <dt>"Type"</dt><dd>{p.policy_type.display_name()}</dd>
                                <dt>"Customer"</dt><dd>{n.customer}</dd>
                                {n.vehicle.map(|v| view! { <dt>"Vehicle"</dt><dd>{v}</dd> })}
                                <dt>"Dealer"</dt><dd>{n.dealer}</dd>
                                <dt>"Term"</dt>
                                <dd>{format!("{} - {}", p.start_date.format("%d.%m.%Y"), p.end_date.format("%d.%m.%Y"))}</dd>
                                <dt>"Premium"</dt><dd>{premium}</dd>
                                <dt>"Commission"</dt><dd>{commission}</dd>
                                {p.issued_at.map(|at| view! { <dt>"Issued"</dt><dd>{format_datetime(&at.to_rfc3339())}</dd> })}
                                {p.cancelled_at.map(|at| view! { <dt>"Cancelled"</dt><dd>{format_datetime(&at.to_rfc3339())}</dd> })}
                                {p.cancel_reason.clone().map(|r| view! { <dt>"Cancellation reason"</dt><dd>{r}</dd> })}
                                {p.base.comment.clone().map(|c| view! { <dt>"Comment"</dt><dd>{c}</dd> })}
                            </dl>
                        </Card>
                    }
                })}
            </div>
        </PageFrame>
    }
}

#[component]
pub fn CancelPolicyForm(policy_id: String, handle: ModalHandle, on_cancelled: Callback<Policy>) -> impl IntoView {
    let toast = use_toast();
    let policy_id = StoredValue::new(policy_id);
    let reason = RwSignal::new(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    let submit = move |_| {
        let text = reason.get_untracked().trim().to_string();
        if text.is_empty() {
            set_error.set(Some("Cancellation reason is required".to_string()));
            return;
        }
        set_error.set(None);
        set_saving.set(true);
        spawn_local(async move {
            let result = api::cancel(&policy_id.get_value(), text).await;
            set_saving.set(false);
            match result {
                Ok(p) => {
                    toast.success("Policy cancelled");
                    on_cancelled.run(p);
                    handle.close();
                }
                Err(e) => {
                    toast.error(format!("Failed to cancel policy: {}", e));
                    set_error.set(Some(e));
                }
            }
        });
    };

    view! {
        <ModalHeader title="Cancel policy" on_close=Callback::new(move |_| handle.close()) />
        <div class="modal-body">
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
            <FormField label="Reason" required=true>
                <Textarea value=reason placeholder="Why the policy is cancelled" />
            </FormField>
        </div>
        <div class="modal-footer">
            <Button appearance=ButtonAppearance::Secondary on_click=move |_| handle.close()>
                "Back"
            </Button>
            <Button appearance=ButtonAppearance::Primary on_click=submit loading=saving>
                "Cancel policy"
            </Button>
        </div>
    }
}
