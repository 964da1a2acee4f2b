use contracts::domain::a003_vehicle::aggregate::Vehicle;
use contracts::enums::VehicleUsage;
use contracts::shared::pagination::ListQuery;
use contracts::system::roles::{Permission, Resource};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::details::VehicleForm;
use crate::domain::a002_customer::ui::picker::CustomerPicker;
use crate::domain::a003_vehicle::api;
use crate::shared::components::lookup_select::code_options;
use crate::shared::components::{CodeSelect, ListFeedback, ListPager, SearchBox, SortableHeader, StatusBadge, Tone};
use crate::shared::confirm::confirm;
use crate::shared::form_utils::non_empty;
use crate::shared::icons::icon;
use crate::shared::list_state::ListController;
use crate::shared::modal_stack::use_modals;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::shared::toast::use_toast;
use crate::system::auth::context::use_auth;
use crate::system::auth::guard::{RequirePermission, RequireView};

fn usage_tone(usage: VehicleUsage) -> Tone {
    match usage {
        VehicleUsage::Private => Tone::Neutral,
        VehicleUsage::Commercial => Tone::Info,
        VehicleUsage::Taxi => Tone::Warning,
    }
}

#[component]
pub fn VehicleList() -> impl IntoView {
    view! {
        <RequireView resource=Resource::Vehicles>
            <VehicleTable />
        </RequireView>
    }
}

#[component]
fn VehicleTable() -> impl IntoView {
    let modals = use_modals();
    let toast = use_toast();
    let (auth_state, _) = use_auth();
    let is_customer = auth_state.get_untracked().customer_id().is_some();

    let list = ListController::new(ListQuery::default(), |q| Box::pin(api::list(q)));
    list.reload();

    let usage_filter = RwSignal::new(String::new());
    let customer_filter = RwSignal::new(String::new());
    Effect::new(move |prev: Option<()>| {
        let usage = usage_filter.get();
        let customer = customer_filter.get();
        if prev.is_some() {
            list.update_filters(|q| {
                q.status = non_empty(usage);
                q.customer_id = non_empty(customer);
            });
        }
    });

    let on_saved = Callback::new(move |_| list.reload());
    let open_form = move |vehicle: Option<Vehicle>| {
        let preset_customer = non_empty(customer_filter.get_untracked());
        modals.push(move |handle| {
            match preset_customer.clone() {
                Some(customer) => view! {
                    <VehicleForm vehicle=vehicle.clone() customer_id=customer handle=handle on_saved=on_saved />
                }
                .into_any(),
                None => view! {
                    <VehicleForm vehicle=vehicle.clone() handle=handle on_saved=on_saved />
                }
                .into_any(),
            }
        });
    };

    let delete_vehicle = move |vehicle: Vehicle| {
        if !confirm(&format!("Delete vehicle {}?", vehicle.plate_number)) {
            return;
        }
        spawn_local(async move {
            match api::delete(&vehicle.to_string_id()).await {
                Ok(()) => {
                    toast.success("Vehicle deleted");
                    list.reload();
                }
                Err(e) => toast.error(format!("Failed to delete vehicle: {}", e)),
            }
        });
    };

    view! {
        <PageFrame page_id="a003_vehicle--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Vehicles"</h1>
                    <Badge>{move || list.total().get().to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <RequirePermission permission=Permission::ManageVehicles>
                        <Button appearance=ButtonAppearance::Primary on_click=move |_| open_form(None)>
                            {icon("plus")}
                            " New"
                        </Button>
                    </RequirePermission>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| list.reload() disabled=list.loading()>
                        {icon("refresh")}
                        " Refresh"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                <div class="filter-panel">
                    <div class="filter-panel-header">
                        <div class="filter-panel-header__left">
                            {icon("filter")}
                            <span class="filter-panel__title">"Filters"</span>
                        </div>
                        <div class="filter-panel-header__center">
                            <ListPager list=list />
                        </div>
                    </div>
                    <div class="filter-panel-content">
                        <Flex gap=FlexGap::Small align=FlexAlign::End>
                            <div class="filter-panel__search">
                                <SearchBox
                                    placeholder="Plate, VIN, brand or model..."
                                    on_search=Callback::new(move |text| list.set_search(text))
                                />
                            </div>
                            <CodeSelect value=usage_filter options=code_options!(VehicleUsage) empty_label="Any usage" />
                            <Show when=move || !is_customer>
                                <CustomerPicker value=customer_filter />
                            </Show>
                        </Flex>
                    </div>
                </div>

                <ListFeedback list=list empty_text="No vehicles found." />

                <div class="table-wrapper">
                    <Table>
                        <TableHeader>
                            <TableRow>
                                <SortableHeader label="Plate" indicator=list.sort_indicator("plate_number") on_sort=list.sort_by("plate_number") />
                                <TableHeaderCell>"VIN"</TableHeaderCell>
                                <SortableHeader label="Brand / model" indicator=list.sort_indicator("brand") on_sort=list.sort_by("brand") />
                                <SortableHeader label="Year" indicator=list.sort_indicator("model_year") on_sort=list.sort_by("model_year") />
                                <TableHeaderCell>"Usage"</TableHeaderCell>
                                <TableHeaderCell>""</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || list.items()
                                key=|v| (v.to_string_id(), v.base.metadata.updated_at)
                                children=move |vehicle: Vehicle| {
                                    let can_manage = auth_state.get_untracked().can(Permission::ManageVehicles);
                                    let for_edit = vehicle.clone();
                                    let for_delete = vehicle.clone();
                                    view! {
                                        <TableRow>
                                            <TableCell><span class="table__cell--strong">{vehicle.plate_number.clone()}</span></TableCell>
                                            <TableCell><span class="table__cell--mono">{vehicle.vin.clone()}</span></TableCell>
                                            <TableCell>{format!("{} {}", vehicle.brand, vehicle.model)}</TableCell>
                                            <TableCell>{vehicle.model_year.to_string()}</TableCell>
                                            <TableCell>
                                                <StatusBadge label=vehicle.usage.display_name() tone=usage_tone(vehicle.usage) />
                                            </TableCell>
                                            <TableCell>
                                                <Show when=move || can_manage>
                                                    <div class="table__actions">
                                                        <Button
                                                            size=ButtonSize::Small
                                                            appearance=ButtonAppearance::Subtle
                                                            on_click={
                                                                let vehicle = for_edit.clone();
                                                                move |_| open_form(Some(vehicle.clone()))
                                                            }
                                                        >
                                                            {icon("edit")}
                                                        </Button>
                                                        <Button
                                                            size=ButtonSize::Small
                                                            appearance=ButtonAppearance::Subtle
                                                            on_click={
                                                                let vehicle = for_delete.clone();
                                                                move |_| delete_vehicle(vehicle.clone())
                                                            }
                                                        >
                                                            {icon("trash")}
                                                        </Button>
                                                    </div>
                                                </Show>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                </div>
            </div>
        </PageFrame>
    }
}
