use contracts::domain::a003_vehicle::aggregate::{Vehicle, VehicleDto};
use contracts::enums::VehicleUsage;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a002_customer::ui::picker::CustomerPicker;
use crate::domain::a003_vehicle::api;
use crate::shared::components::lookup_select::code_options;
use crate::shared::components::{CodeSelect, FormField};
use crate::shared::date_utils::current_year;
use crate::shared::form_utils::{non_empty, or_empty, parse_int};
use crate::shared::modal_stack::{ModalHandle, ModalHeader};
use crate::shared::toast::use_toast;
use crate::system::auth::context::use_auth;

#[component]
pub fn VehicleForm(
    vehicle: Option<Vehicle>,
    /// Клиент по умолчанию для новой записи
    #[prop(optional)]
    customer_id: Option<String>,
    handle: ModalHandle,
    on_saved: Callback<()>,
) -> impl IntoView {
    let toast = use_toast();
    let (auth_state, _) = use_auth();
    let own_customer = auth_state.get_untracked().customer_id();

    let mut dto = vehicle.as_ref().map(|v| v.to_dto()).unwrap_or_else(|| VehicleDto {
        model_year: current_year(),
        ..Default::default()
    });
    if dto.id.is_none() {
        if let Some(customer) = own_customer.clone().or(customer_id) {
            dto.customer_id = customer;
        }
    }
    let title = match &vehicle {
        Some(v) => v.title(),
        None => "New vehicle".to_string(),
    };

    let id = StoredValue::new(dto.id.clone());
    let customer = RwSignal::new(dto.customer_id.clone());
    let plate = RwSignal::new(dto.plate_number.clone());
    let vin = RwSignal::new(dto.vin.clone());
    let brand = RwSignal::new(dto.brand.clone());
    let model = RwSignal::new(dto.model.clone());
    let model_year = RwSignal::new(dto.model_year.to_string());
    let usage = RwSignal::new(dto.usage.code().to_string());
    let comment = RwSignal::new(or_empty(&dto.comment));
    let customer_locked = own_customer.is_some();

    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    let submit = move |_| {
        let year = match parse_int("Model year", &model_year.get_untracked()) {
            Ok(y) => y,
            Err(e) => {
                set_error.set(Some(e));
                return;
            }
        };
        let dto = VehicleDto {
            id: id.get_value(),
            customer_id: customer.get_untracked(),
            dealer_id: None,
            plate_number: plate.get_untracked().trim().to_uppercase(),
            vin: vin.get_untracked().trim().to_uppercase(),
            brand: brand.get_untracked().trim().to_string(),
            model: model.get_untracked().trim().to_string(),
            model_year: year,
            usage: VehicleUsage::from_code(&usage.get_untracked()).unwrap_or_default(),
            comment: non_empty(comment.get_untracked()),
        };
        if let Err(errors) = dto.validate(current_year()) {
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
                    toast.success(format!("Vehicle {} saved", dto.plate_number));
                    on_saved.run(());
                    handle.close();
                }
                Err(e) => {
                    toast.error(format!("Failed to save vehicle: {}", e));
                    set_error.set(Some(e));
                }
            }
        });
    };

    view! {
        <ModalHeader title=title on_close=Callback::new(move |_| handle.close()) />
        <div class="modal-body">
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            <FormField label="Customer" required=true>
                <CustomerPicker value=customer disabled=customer_locked />
            </FormField>
            <div class="form__row">
                <FormField label="Plate number" required=true>
                    <Input value=plate placeholder="34ABC123" />
                </FormField>
                <FormField label="VIN" required=true>
                    <Input value=vin placeholder="17 characters" />
                </FormField>
            </div>
            <div class="form__row">
                <FormField label="Brand" required=true>
                    <Input value=brand />
                </FormField>
                <FormField label="Model" required=true>
                    <Input value=model />
                </FormField>
            </div>
            <div class="form__row">
                <FormField label="Model year" required=true>
                    <Input value=model_year />
                </FormField>
                <FormField label="Usage" required=true>
                    <CodeSelect value=usage options=code_options!(VehicleUsage) />
                </FormField>
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
                "Save"
            </Button>
        </div>
    }
}
