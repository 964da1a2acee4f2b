use contracts::domain::a002_customer::aggregate::{Customer, CustomerDto};
use contracts::enums::CustomerKind;
use contracts::shared::lookup::LookupItem;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::{a001_dealer, a002_customer::api};
use crate::shared::components::lookup_select::code_options;
use crate::shared::components::{CodeSelect, DateInput, FormField, LookupSelect};
use crate::shared::date_utils::{today, today_iso};
use crate::shared::form_utils::{non_empty, or_empty};
use crate::shared::modal_stack::{ModalHandle, ModalHeader};
use crate::shared::toast::use_toast;
use crate::system::auth::context::use_auth;

#[component]
pub fn CustomerForm(customer: Option<Customer>, handle: ModalHandle, on_saved: Callback<()>) -> impl IntoView {
    let toast = use_toast();
    let (auth_state, _) = use_auth();
    let own_dealer = auth_state.get_untracked().dealer_id();

    let mut dto = customer.as_ref().map(|c| c.to_dto()).unwrap_or_default();
    if dto.id.is_none() {
        if let Some(dealer) = own_dealer.clone() {
            dto.dealer_id = dealer;
        }
    }
    let title = match &customer {
        Some(c) => format!("Customer {}", c.base.code),
        None => "New customer".to_string(),
    };

    let id = StoredValue::new(dto.id.clone());
    let code = StoredValue::new(dto.code.clone());
    let name = RwSignal::new(dto.description.clone());
    let dealer_id = RwSignal::new(dto.dealer_id.clone());
    let kind = RwSignal::new(dto.kind.code().to_string());
    let national_id = RwSignal::new(dto.national_id.clone());
    let phone = RwSignal::new(or_empty(&dto.phone));
    let email = RwSignal::new(or_empty(&dto.email));
    let address = RwSignal::new(or_empty(&dto.address));
    let birth_date = RwSignal::new(or_empty(&dto.birth_date));
    let comment = RwSignal::new(or_empty(&dto.comment));

    let dealers = RwSignal::new(Vec::<LookupItem>::new());
    spawn_local(async move {
        match a001_dealer::api::lookup().await {
            Ok(items) => dealers.set(items),
            Err(e) => log::warn!("dealer lookup failed: {}", e),
        }
    });

    let is_individual = move || CustomerKind::from_code(&kind.get()) == Some(CustomerKind::Individual);
    let dealer_locked = own_dealer.is_some();

    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    let submit = move |_| {
        let kind = CustomerKind::from_code(&kind.get_untracked()).unwrap_or_default();
        let dto = CustomerDto {
            id: id.get_value(),
            code: code.get_value(),
            description: name.get_untracked().trim().to_string(),
            dealer_id: dealer_id.get_untracked(),
            kind,
            national_id: national_id.get_untracked().trim().to_string(),
            phone: non_empty(phone.get_untracked()),
            email: non_empty(email.get_untracked()),
            address: non_empty(address.get_untracked()),
            birth_date: (kind == CustomerKind::Individual)
                .then(|| non_empty(birth_date.get_untracked()))
                .flatten(),
            comment: non_empty(comment.get_untracked()),
        };
        if let Err(errors) = dto.validate(today()) {
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
                    toast.success(format!("Customer {} saved", dto.description));
                    on_saved.run(());
                    handle.close();
                }
                Err(e) => {
                    toast.error(format!("Failed to save customer: {}", e));
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
                <FormField label="Kind" required=true>
                    <CodeSelect value=kind options=code_options!(CustomerKind) />
                </FormField>
                <FormField label="National id" required=true>
                    <Input value=national_id placeholder="digits only" />
                </FormField>
            </div>
            <FormField label="Full name" required=true>
                <Input value=name />
            </FormField>
            <FormField label="Dealer" required=true>
                <LookupSelect value=dealer_id items=dealers disabled=dealer_locked />
            </FormField>
            <div class="form__row">
                <FormField label="Phone">
                    <Input value=phone />
                </FormField>
                <FormField label="Email">
                    <Input value=email />
                </FormField>
            </div>
            <FormField label="Address">
                <Input value=address />
            </FormField>
            <Show when=is_individual>
                <FormField label="Birth date">
                    <DateInput value=birth_date max=today_iso() />
                </FormField>
            </Show>
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
