use contracts::domain::a001_dealer::aggregate::{Dealer, DealerDto};
use contracts::shared::lookup::LookupItem;
use contracts::system::roles::Role;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a001_dealer::api;
use crate::shared::components::{FormField, LookupSelect};
use crate::shared::form_utils::{non_empty, or_empty, parse_number};
use crate::shared::modal_stack::{ModalHandle, ModalHeader};
use crate::shared::toast::use_toast;
use crate::system::users;

#[component]
pub fn DealerForm(dealer: Option<Dealer>, handle: ModalHandle, on_saved: Callback<()>) -> impl IntoView {
    let toast = use_toast();
    let dto = dealer.as_ref().map(|d| d.to_dto()).unwrap_or_default();
    let title = match &dealer {
        Some(d) => format!("Dealer {}", d.base.code),
        None => "New dealer".to_string(),
    };

    let id = StoredValue::new(dto.id.clone());
    let code = RwSignal::new(or_empty(&dto.code));
    let name = RwSignal::new(dto.description.clone());
    let tax_number = RwSignal::new(dto.tax_number.clone());
    let phone = RwSignal::new(or_empty(&dto.phone));
    let email = RwSignal::new(or_empty(&dto.email));
    let address = RwSignal::new(or_empty(&dto.address));
    let commission = RwSignal::new(dto.commission_rate.to_string());
    let observer = RwSignal::new(or_empty(&dto.observer_user_id));
    let is_active = RwSignal::new(dto.is_active);
    let comment = RwSignal::new(or_empty(&dto.comment));

    let observers = RwSignal::new(Vec::<LookupItem>::new());
    spawn_local(async move {
        match users::api::options().await {
            Ok(options) => observers.set(
                options
                    .into_iter()
                    .filter(|o| o.role == Role::Observer)
                    .map(|o| LookupItem {
                        id: o.id,
                        code: String::new(),
                        name: o.name,
                    })
                    .collect(),
            ),
            Err(e) => log::warn!("user options failed: {}", e),
        }
    });

    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    let submit = move |_| {
        let commission_rate = match parse_number("Commission", &commission.get_untracked()) {
            Ok(v) => v,
            Err(e) => {
                set_error.set(Some(e));
                return;
            }
        };
        let dto = DealerDto {
            id: id.get_value(),
            code: non_empty(code.get_untracked()),
            description: name.get_untracked().trim().to_string(),
            tax_number: tax_number.get_untracked().trim().to_string(),
            phone: non_empty(phone.get_untracked()),
            email: non_empty(email.get_untracked()),
            address: non_empty(address.get_untracked()),
            commission_rate,
            observer_user_id: non_empty(observer.get_untracked()),
            is_active: is_active.get_untracked(),
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
                    toast.success(format!("Dealer {} saved", dto.description));
                    on_saved.run(());
                    handle.close();
                }
                Err(e) => {
                    toast.error(format!("Failed to save dealer: {}", e));
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
                <FormField label="Code">
                    <Input value=code placeholder="assigned automatically" />
                </FormField>
                <FormField label="Tax number" required=true>
                    <Input value=tax_number placeholder="10 digits" />
                </FormField>
            </div>
            <FormField label="Name" required=true>
                <Input value=name />
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
            <div class="form__row">
                <FormField label="Commission, %" required=true>
                    <Input value=commission />
                </FormField>
                <FormField label="Observer">
                    <LookupSelect value=observer items=observers empty_label="-- none --" />
                </FormField>
            </div>
            <FormField label="Comment">
                <Textarea value=comment />
            </FormField>
            <div class="form__group">
                <Switch checked=is_active label="Active" />
            </div>
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
