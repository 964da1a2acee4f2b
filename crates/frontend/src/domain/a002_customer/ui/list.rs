use contracts::domain::a002_customer::aggregate::Customer;
use contracts::enums::CustomerKind;
use contracts::shared::lookup::LookupItem;
use contracts::shared::pagination::ListQuery;
use contracts::system::roles::{Permission, Resource, Role};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::details::CustomerForm;
use crate::domain::{a001_dealer, a002_customer::api};
use crate::shared::components::lookup_select::code_options;
use crate::shared::components::{
    lookup_name, CodeSelect, ListFeedback, ListPager, LookupSelect, SearchBox, SortableHeader,
};
use crate::shared::confirm::confirm;
use crate::shared::date_utils::format_date_opt;
use crate::shared::form_utils::non_empty;
use crate::shared::icons::icon;
use crate::shared::list_state::ListController;
use crate::shared::modal_stack::use_modals;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::shared::toast::use_toast;
use crate::system::auth::context::use_auth;
use crate::system::auth::guard::{RequirePermission, RequireView};

#[component]
pub fn CustomerList() -> impl IntoView {
    view! {
        <RequireView resource=Resource::Customers>
            <CustomerTable />
        </RequireView>
    }
}

#[component]
fn CustomerTable() -> impl IntoView {
    let modals = use_modals();
    let toast = use_toast();
    let (auth_state, _) = use_auth();
    let show_dealer_filter = auth_state.get_untracked().role() != Some(Role::Dealer);

    let list = ListController::new(ListQuery::default(), |q| Box::pin(api::list(q)));
    list.reload();

    let dealers = RwSignal::new(Vec::<LookupItem>::new());
    spawn_local(async move {
        if let Ok(items) = a001_dealer::api::lookup().await {
            dealers.set(items);
        }
    });

    let dealer_filter = RwSignal::new(String::new());
    let kind_filter = RwSignal::new(String::new());
    Effect::new(move |prev: Option<()>| {
        let dealer = dealer_filter.get();
        let kind = kind_filter.get();
        if prev.is_some() {
            list.update_filters(|q| {
                q.dealer_id = non_empty(dealer);
                q.status = non_empty(kind);
            });
        }
    });

    let on_saved = Callback::new(move |_| list.reload());
    let open_form = move |customer: Option<Customer>| {
        modals.push(move |handle| {
            view! { <CustomerForm customer=customer.clone() handle=handle on_saved=on_saved /> }.into_any()
        });
    };

    let delete_customer = move |customer: Customer| {
        if !confirm(&format!("Delete customer {}?", customer.base.description)) {
            return;
        }
        spawn_local(async move {
            match api::delete(&customer.to_string_id()).await {
                Ok(()) => {
                    toast.success("Customer deleted");
                    list.reload();
                }
                Err(e) => toast.error(format!("Failed to delete customer: {}", e)),
            }
        });
    };

    view! {
        <PageFrame page_id="a002_customer--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Customers"</h1>
                    <Badge>{move || list.total().get().to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <RequirePermission permission=Permission::ManageCustomers>
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
                                    placeholder="Name, code, national id or phone..."
                                    on_search=Callback::new(move |text| list.set_search(text))
                                />
                            </div>
                            <CodeSelect value=kind_filter options=code_options!(CustomerKind) empty_label="All kinds" />
                            <Show when=move || show_dealer_filter>
                                <LookupSelect value=dealer_filter items=dealers empty_label="All dealers" />
                            </Show>
                        </Flex>
                    </div>
                </div>

                <ListFeedback list=list empty_text="No customers found." />

                <div class="table-wrapper">
                    <Table>
                        <TableHeader>
                            <TableRow>
                                <SortableHeader label="Code" indicator=list.sort_indicator("code") on_sort=list.sort_by("code") />
                                <SortableHeader label="Name" indicator=list.sort_indicator("description") on_sort=list.sort_by("description") />
                                <TableHeaderCell>"Kind"</TableHeaderCell>
                                <SortableHeader label="National id" indicator=list.sort_indicator("national_id") on_sort=list.sort_by("national_id") />
                                <TableHeaderCell>"Phone"</TableHeaderCell>
                                <TableHeaderCell>"Email"</TableHeaderCell>
                                <TableHeaderCell>"Birth date"</TableHeaderCell>
                                <TableHeaderCell>"Dealer"</TableHeaderCell>
                                <TableHeaderCell>""</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || list.items()
                                key=|c| (c.to_string_id(), c.base.metadata.updated_at)
                                children=move |customer: Customer| {
                                    let can_manage = auth_state.get_untracked().can(Permission::ManageCustomers);
                                    let dealer_id = customer.dealer_id.clone();
                                    let birth = format_date_opt(&customer.birth_date.map(|d| d.to_string()));
                                    let for_edit = customer.clone();
                                    let for_delete = customer.clone();
                                    view! {
                                        <TableRow>
                                            <TableCell>{customer.base.code.clone()}</TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{customer.base.description.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>{customer.kind.display_name()}</TableCell>
                                            <TableCell>{customer.national_id.clone()}</TableCell>
                                            <TableCell>{customer.phone.clone().unwrap_or_default()}</TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{customer.email.clone().unwrap_or_default()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>{birth}</TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    {move || dealers.with(|d| lookup_name(d, &dealer_id))}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <Show when=move || can_manage>
                                                    <div class="table__actions">
                                                        <Button
                                                            size=ButtonSize::Small
                                                            appearance=ButtonAppearance::Subtle
                                                            on_click={
                                                                let customer = for_edit.clone();
                                                                move |_| open_form(Some(customer.clone()))
                                                            }
                                                        >
                                                            {icon("edit")}
                                                        </Button>
                                                        <Button
                                                            size=ButtonSize::Small
                                                            appearance=ButtonAppearance::Subtle
                                                            on_click={
                                                                let customer = for_delete.clone();
                                                                move |_| delete_customer(customer.clone())
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
