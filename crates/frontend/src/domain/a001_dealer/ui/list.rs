use contracts::domain::a001_dealer::aggregate::Dealer;
use contracts::shared::money::format_amount;
use contracts::shared::pagination::ListQuery;
use contracts::system::roles::{Permission, Resource};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::details::DealerForm;
use crate::domain::a001_dealer::api;
use crate::shared::components::{ListFeedback, ListPager, SearchBox, SortableHeader, StatusBadge, Tone};
use crate::shared::confirm::confirm;
use crate::shared::icons::icon;
use crate::shared::list_state::ListController;
use crate::shared::modal_stack::use_modals;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::shared::toast::use_toast;
use crate::system::auth::context::use_auth;
use crate::system::auth::guard::{RequirePermission, RequireView};

#[component]
pub fn DealerList() -> impl IntoView {
    view! {
        <RequireView resource=Resource::Dealers>
            <DealerTable />
        </RequireView>
    }
}

#[component]
fn DealerTable() -> impl IntoView {
    let modals = use_modals();
    let toast = use_toast();
    let (auth_state, _) = use_auth();

    let list = ListController::new(ListQuery::default(), |q| Box::pin(api::list(q)));
    list.reload();

    let on_saved = Callback::new(move |_| list.reload());
    let open_form = move |dealer: Option<Dealer>| {
        modals.push(move |handle| {
            view! { <DealerForm dealer=dealer.clone() handle=handle on_saved=on_saved /> }.into_any()
        });
    };

    let delete_dealer = move |dealer: Dealer| {
        if !confirm(&format!("Delete dealer {}?", dealer.base.description)) {
            return;
        }
        spawn_local(async move {
            match api::delete(&dealer.to_string_id()).await {
                Ok(()) => {
                    toast.success("Dealer deleted");
                    list.reload();
                }
                Err(e) => toast.error(format!("Failed to delete dealer: {}", e)),
            }
        });
    };

    view! {
        <PageFrame page_id="a001_dealer--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Dealers"</h1>
                    <Badge>{move || list.total().get().to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <RequirePermission permission=Permission::ManageDealers>
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
                        <div class="filter-panel__search">
                            <SearchBox
                                placeholder="Code, name, tax number or email..."
                                on_search=Callback::new(move |text| list.set_search(text))
                            />
                        </div>
                    </div>
                </div>

                <ListFeedback list=list empty_text="No dealers yet." />

                <div class="table-wrapper">
                    <Table>
                        <TableHeader>
                            <TableRow>
                                <SortableHeader label="Code" indicator=list.sort_indicator("code") on_sort=list.sort_by("code") />
                                <SortableHeader label="Name" indicator=list.sort_indicator("description") on_sort=list.sort_by("description") />
                                <TableHeaderCell>"Tax number"</TableHeaderCell>
                                <TableHeaderCell>"Phone"</TableHeaderCell>
                                <TableHeaderCell>"Email"</TableHeaderCell>
                                <SortableHeader label="Commission, %" indicator=list.sort_indicator("commission_rate") on_sort=list.sort_by("commission_rate") />
                                <TableHeaderCell>"Status"</TableHeaderCell>
                                <TableHeaderCell>""</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || list.items()
                                key=|d| (d.to_string_id(), d.base.metadata.updated_at)
                                children=move |dealer: Dealer| {
                                    let can_manage = auth_state.get_untracked().can(Permission::ManageDealers);
                                    let (status_label, tone) = if dealer.is_active {
                                        ("Active", Tone::Success)
                                    } else {
                                        ("Inactive", Tone::Neutral)
                                    };
                                    let for_edit = dealer.clone();
                                    let for_delete = dealer.clone();
                                    view! {
                                        <TableRow>
                                            <TableCell>{dealer.base.code.clone()}</TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{dealer.base.description.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>{dealer.tax_number.clone()}</TableCell>
                                            <TableCell>{dealer.phone.clone().unwrap_or_default()}</TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{dealer.email.clone().unwrap_or_default()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell class="table__cell--number">{format_amount(dealer.commission_rate)}</TableCell>
                                            <TableCell><StatusBadge label=status_label tone=tone /></TableCell>
                                            <TableCell>
                                                <Show when=move || can_manage>
                                                    <div class="table__actions">
                                                        <Button
                                                            size=ButtonSize::Small
                                                            appearance=ButtonAppearance::Subtle
                                                            on_click={
                                                                let dealer = for_edit.clone();
                                                                move |_| open_form(Some(dealer.clone()))
                                                            }
                                                        >
                                                            {icon("edit")}
                                                        </Button>
                                                        <Button
                                                            size=ButtonSize::Small
                                                            appearance=ButtonAppearance::Subtle
                                                            on_click={
                                                                let dealer = for_delete.clone();
                                                                move |_| delete_dealer(dealer.clone())
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
