use contracts::domain::a007_claim::aggregate::ClaimListItem;
use contracts::enums::ClaimStatus;
use contracts::shared::lookup::LookupItem;
use contracts::shared::money::format_amount;
use contracts::shared::pagination::ListQuery;
use contracts::system::navigation::detail_key;
use contracts::system::roles::{Permission, Resource, Role};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::file_form::ClaimFileForm;
use crate::domain::{a001_dealer, a007_claim::api};
use crate::layout::global_context::use_app_context;
use crate::shared::components::lookup_select::code_options;
use crate::shared::components::{
    claim_status_tone, CodeSelect, DateRange, ListFeedback, ListPager, LookupSelect, SearchBox,
    SortableHeader, StatusBadge,
};
use crate::shared::date_utils::{format_date, format_datetime};
use crate::shared::form_utils::non_empty;
use crate::shared::icons::icon;
use crate::shared::list_state::ListController;
use crate::shared::modal_stack::use_modals;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::system::auth::context::use_auth;
use crate::system::auth::guard::{RequirePermission, RequireView};

#[component]
pub fn ClaimList() -> impl IntoView {
    view! {
        <RequireView resource=Resource::Claims>
            <ClaimTable />
        </RequireView>
    }
}

#[component]
fn ClaimTable() -> impl IntoView {
    let modals = use_modals();
    let ctx = use_app_context();
    let (auth_state, _) = use_auth();
    let show_dealer_filter = matches!(
        auth_state.get_untracked().role(),
        Some(Role::SuperAdmin | Role::Admin | Role::Observer)
    );

    let list = ListController::new(ListQuery::default(), |q| Box::pin(api::list(q)));
    list.reload();

    let dealers = RwSignal::new(Vec::<LookupItem>::new());
    if show_dealer_filter {
        spawn_local(async move {
            if let Ok(items) = a001_dealer::api::lookup().await {
                dealers.set(items);
            }
        });
    }

    let status_filter = RwSignal::new(String::new());
    let dealer_filter = RwSignal::new(String::new());
    let date_from = RwSignal::new(String::new());
    let date_to = RwSignal::new(String::new());
    Effect::new(move |prev: Option<()>| {
        let status = status_filter.get();
        let dealer = dealer_filter.get();
        let from = date_from.get();
        let to = date_to.get();
        if prev.is_some() {
            list.update_filters(|q| {
                q.status = non_empty(status);
                q.dealer_id = non_empty(dealer);
                q.date_from = non_empty(from);
                q.date_to = non_empty(to);
            });
        }
    });

    let on_saved = Callback::new(move |_| list.reload());
    let open_new = move |_| {
        modals.push(move |handle| view! { <ClaimFileForm handle=handle on_saved=on_saved /> }.into_any());
    };

    view! {
        <PageFrame page_id="a007_claim--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Claims"</h1>
                    <Badge>{move || list.total().get().to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <RequirePermission permission=Permission::FileClaims>
                        <Button appearance=ButtonAppearance::Primary on_click=open_new>
                            {icon("plus")}
                            " File claim"
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
                                    placeholder="Claim code, policy number or customer..."
                                    on_search=Callback::new(move |text| list.set_search(text))
                                />
                            </div>
                            <CodeSelect value=status_filter options=code_options!(ClaimStatus) empty_label="All statuses" />
                            <Show when=move || show_dealer_filter>
                                <LookupSelect value=dealer_filter items=dealers empty_label="All dealers" />
                            </Show>
                            <DateRange from=date_from to=date_to />
                        </Flex>
                    </div>
                </div>

                <ListFeedback list=list empty_text="No claims found." />

                <div class="table-wrapper">
                    <Table>
                        <TableHeader>
                            <TableRow>
                                <SortableHeader label="Code" indicator=list.sort_indicator("code") on_sort=list.sort_by("code") />
                                <TableHeaderCell>"Policy"</TableHeaderCell>
                                <TableHeaderCell>"Customer"</TableHeaderCell>
                                <SortableHeader label="Incident" indicator=list.sort_indicator("incident_date") on_sort=list.sort_by("incident_date") />
                                <SortableHeader label="Claimed" indicator=list.sort_indicator("claimed_amount") on_sort=list.sort_by("claimed_amount") />
                                <TableHeaderCell>"Approved"</TableHeaderCell>
                                <SortableHeader label="Status" indicator=list.sort_indicator("status") on_sort=list.sort_by("status") />
                                <SortableHeader label="Filed" indicator=list.sort_indicator("created_at") on_sort=list.sort_by("created_at") />
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || list.items()
                                key=|c| (c.id.clone(), c.status)
                                children=move |claim: ClaimListItem| {
                                    let tab_key = detail_key("a007_claim", &claim.id);
                                    let tab_title = format!("Claim {}", claim.code);
                                    view! {
                                        <TableRow
                                            on:click=move |_| ctx.open_tab(&tab_key, &tab_title)
                                            attr:style="cursor: pointer;"
                                        >
                                            <TableCell><strong>{claim.code.clone()}</strong></TableCell>
                                            <TableCell>{claim.policy_no.clone()}</TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{claim.customer_name.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>{format_date(&claim.incident_date)}</TableCell>
                                            <TableCell class="table__cell--number">{format_amount(claim.claimed_amount)}</TableCell>
                                            <TableCell class="table__cell--number">
                                                {claim.approved_amount.map(format_amount).unwrap_or_default()}
                                            </TableCell>
                                            <TableCell>
                                                <StatusBadge label=claim.status.display_name() tone=claim_status_tone(claim.status) />
                                            </TableCell>
                                            <TableCell>{format_datetime(&claim.created_at)}</TableCell>
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
