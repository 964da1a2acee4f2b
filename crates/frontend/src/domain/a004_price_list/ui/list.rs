use contracts::domain::a004_price_list::aggregate::PriceList;
use contracts::enums::{Currency, PolicyType};
use contracts::shared::pagination::ListQuery;
use contracts::system::roles::{Permission, Resource};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::details::{PriceListForm, RatesImportForm};
use super::quote::QuoteForm;
use crate::domain::a004_price_list::api;
use crate::shared::components::lookup_select::code_options;
use crate::shared::components::{
    CodeSelect, DateRange, ListFeedback, ListPager, SearchBox, SortableHeader,
};
use crate::shared::confirm::confirm;
use crate::shared::date_utils::format_date;
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
pub fn PriceListList() -> impl IntoView {
    view! {
        <RequireView resource=Resource::PriceLists>
            <PriceListTable />
        </RequireView>
    }
}

#[component]
fn PriceListTable() -> impl IntoView {
    let modals = use_modals();
    let toast = use_toast();
    let (auth_state, _) = use_auth();

    let list = ListController::new(ListQuery::default(), |q| Box::pin(api::list(q)));
    list.reload();

    let type_filter = RwSignal::new(String::new());
    let currency_filter = RwSignal::new(String::new());
    let date_from = RwSignal::new(String::new());
    let date_to = RwSignal::new(String::new());
    Effect::new(move |prev: Option<()>| {
        let policy_type = type_filter.get();
        let currency = currency_filter.get();
        let from = date_from.get();
        let to = date_to.get();
        if prev.is_some() {
            list.update_filters(|q| {
                q.policy_type = non_empty(policy_type);
                q.status = non_empty(currency);
                q.date_from = non_empty(from);
                q.date_to = non_empty(to);
            });
        }
    });

    let on_saved = Callback::new(move |_| list.reload());
    let open_form = move |price_list: Option<PriceList>| {
        modals.push(move |handle| {
            view! { <PriceListForm price_list=price_list.clone() handle=handle on_saved=on_saved /> }.into_any()
        });
    };
    let open_import = move |price_list: PriceList| {
        modals.push(move |handle| {
            view! { <RatesImportForm price_list=price_list.clone() handle=handle on_saved=on_saved /> }.into_any()
        });
    };
    let open_quote = move |_| {
        modals.push(move |handle| view! { <QuoteForm handle=handle /> }.into_any());
    };

    let delete_price_list = move |price_list: PriceList| {
        if !confirm(&format!(
            "Delete price list {} v{}?",
            price_list.base.description, price_list.version
        )) {
            return;
        }
        spawn_local(async move {
            match api::delete(&price_list.to_string_id()).await {
                Ok(()) => {
                    toast.success("Price list deleted");
                    list.reload();
                }
                Err(e) => toast.error(format!("Failed to delete price list: {}", e)),
            }
        });
    };

    view! {
        <PageFrame page_id="a004_price_list--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Price lists"</h1>
                    <Badge>{move || list.total().get().to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <RequirePermission permission=Permission::ManagePriceLists>
                        <Button appearance=ButtonAppearance::Primary on_click=move |_| open_form(None)>
                            {icon("plus")}
                            " New"
                        </Button>
                    </RequirePermission>
                    <Button appearance=ButtonAppearance::Secondary on_click=open_quote>
                        {icon("calculator")}
                        " Quote"
                    </Button>
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
                                    placeholder="Code or name..."
                                    on_search=Callback::new(move |text| list.set_search(text))
                                />
                            </div>
                            <CodeSelect value=type_filter options=code_options!(PolicyType) empty_label="All types" />
                            <CodeSelect value=currency_filter options=code_options!(Currency) empty_label="All currencies" />
                            <DateRange from=date_from to=date_to />
                        </Flex>
                    </div>
                </div>

                <ListFeedback list=list empty_text="No price lists found." />

                <div class="table-wrapper">
                    <Table>
                        <TableHeader>
                            <TableRow>
                                <SortableHeader label="Code" indicator=list.sort_indicator("code") on_sort=list.sort_by("code") />
                                <TableHeaderCell>"Name"</TableHeaderCell>
                                <SortableHeader label="Type" indicator=list.sort_indicator("policy_type") on_sort=list.sort_by("policy_type") />
                                <TableHeaderCell>"Currency"</TableHeaderCell>
                                <SortableHeader label="Valid from" indicator=list.sort_indicator("valid_from") on_sort=list.sort_by("valid_from") />
                                <TableHeaderCell>"Valid to"</TableHeaderCell>
                                <SortableHeader label="Version" indicator=list.sort_indicator("list_version") on_sort=list.sort_by("list_version") />
                                <TableHeaderCell>"Rates"</TableHeaderCell>
                                <TableHeaderCell>""</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || list.items()
                                key=|p| (p.to_string_id(), p.base.metadata.updated_at)
                                children=move |price_list: PriceList| {
                                    let can_manage = auth_state.get_untracked().can(Permission::ManagePriceLists);
                                    let for_edit = price_list.clone();
                                    let for_import = price_list.clone();
                                    let for_delete = price_list.clone();
                                    view! {
                                        <TableRow>
                                            <TableCell>{price_list.base.code.clone()}</TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{price_list.base.description.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>{price_list.policy_type.display_name()}</TableCell>
                                            <TableCell>{price_list.currency.code()}</TableCell>
                                            <TableCell>{format_date(&price_list.valid_from.to_string())}</TableCell>
                                            <TableCell>{format_date(&price_list.valid_to.to_string())}</TableCell>
                                            <TableCell class="table__cell--number">{format!("v{}", price_list.version)}</TableCell>
                                            <TableCell class="table__cell--number">{price_list.rates.len().to_string()}</TableCell>
                                            <TableCell>
                                                <Show when=move || can_manage>
                                                    <div class="table__actions">
                                                        <Button
                                                            size=ButtonSize::Small
                                                            appearance=ButtonAppearance::Subtle
                                                            on_click={
                                                                let price_list = for_edit.clone();
                                                                move |_| open_form(Some(price_list.clone()))
                                                            }
                                                        >
                                                            {icon("edit")}
                                                        </Button>
                                                        <Button
                                                            size=ButtonSize::Small
                                                            appearance=ButtonAppearance::Subtle
                                                            on_click={
                                                                let price_list = for_import.clone();
                                                                move |_| open_import(price_list.clone())
                                                            }
                                                        >
                                                            {icon("upload")}
                                                        </Button>
                                                        <Button
                                                            size=ButtonSize::Small
                                                            appearance=ButtonAppearance::Subtle
                                                            on_click={
                                                                let price_list = for_delete.clone();
                                                                move |_| delete_price_list(price_list.clone())
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
