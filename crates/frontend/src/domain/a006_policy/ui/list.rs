use contracts::domain::a006_policy::aggregate::PolicyListItem;
use contracts::enums::{PolicyStatus, PolicyType};
use contracts::shared::lookup::LookupItem;
use contracts::shared::money::format_amount;
use contracts::shared::pagination::ListQuery;
use contracts::system::navigation::detail_key;
use contracts::system::roles::{Permission, Resource, Role};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::form::PolicyForm;
use crate::domain::{a001_dealer, a006_policy::api};
use crate::layout::global_context::use_app_context;
use crate::shared::components::lookup_select::code_options;
use crate::shared::components::{
    policy_status_tone, CodeSelect, DateRange, ListFeedback, ListPager, LookupSelect, SearchBox,
    SortableHeader, StatusBadge,
};
use crate::shared::date_utils::{format_date, today_iso};
use crate::shared::export::download_csv;
use crate::shared::form_utils::non_empty;
use crate::shared::icons::icon;
use crate::shared::list_state::ListController;
use crate::shared::modal_stack::use_modals;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::shared::toast::use_toast;
use crate::system::auth::context::use_auth;
use crate::system::auth::guard::{RequirePermission, RequireView};

pub fn policy_tab_title(policy_no: &str, code: &str) -> String {
    if policy_no.is_empty() {
        format!("Policy {}", code)
    } else {
        format!("Policy {}", policy_no)
    }
}

#[component]
pub fn PolicyList() -> impl IntoView {
    view! {
        <RequireView resource=Resource::Policies>
            <PolicyTable />
        </RequireView>
    }
}

#[component]
fn PolicyTable() -> impl IntoView {
    let modals = use_modals();
    let toast = use_toast();
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
    let type_filter = RwSignal::new(String::new());
    let dealer_filter = RwSignal::new(String::new());
    let date_from = RwSignal::new(String::new());
    let date_to = RwSignal::new(String::new());
    Effect::new(move |prev: Option<()>| {
        let status = status_filter.get();
        let policy_type = type_filter.get();
        let dealer = dealer_filter.get();
        let from = date_from.get();
        let to = date_to.get();
        if prev.is_some() {
            list.update_filters(|q| {
                q.status = non_empty(status);
                q.policy_type = non_empty(policy_type);
                q.dealer_id = non_empty(dealer);
                q.date_from = non_empty(from);
                q.date_to = non_empty(to);
            });
        }
    });

    let on_saved = Callback::new(move |_| list.reload());
    let open_new = move |_| {
        modals.push(move |handle| view! { <PolicyForm policy=None handle=handle on_saved=on_saved /> }.into_any());
    };

    let open_details = move |item: &PolicyListItem| {
        ctx.open_tab(
            &detail_key("a006_policy", &item.id),
            &policy_tab_title(&item.policy_no, &item.code),
        );
    };

    let (exporting, set_exporting) = signal(false);
    let export = move |_| {
        let query = list.query();
        set_exporting.set(true);
        spawn_local(async move {
            match api::export_csv(&query).await {
                Ok(csv) => {
                    let filename = format!("policies_{}.csv", today_iso());
                    if let Err(e) = download_csv(&csv, &filename) {
                        toast.error(e);
                    }
                }
                Err(e) => toast.error(format!("Export failed: {}", e)),
            }
            set_exporting.set(false);
        });
    };

    view! {
        <PageFrame page_id="a006_policy--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Policies"</h1>
                    <Badge>{move || list.total().get().to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <RequirePermission permission=Permission::IssuePolicies>
                        <Button appearance=ButtonAppearance::Primary on_click=open_new>
                            {icon("plus")}
                            " New"
                        </Button>
                    </RequirePermission>
                    <Button appearance=ButtonAppearance::Secondary on_click=export loading=exporting>
                        {icon("download")}
                        " Export CSV"
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
                                    placeholder="Policy number, code or customer..."
                                    on_search=Callback::new(move |text| list.set_search(text))
                                />
                            </div>
                            <CodeSelect value=status_filter options=code_options!(PolicyStatus) empty_label="All statuses" />
                            <CodeSelect value=type_filter options=code_options!(PolicyType) empty_label="All types" />
                            <Show when=move || show_dealer_filter>
                                <LookupSelect value=dealer_filter items=dealers empty_label="All dealers" />
                            </Show>
                            <DateRange from=date_from to=date_to />
                        </Flex>
                    </div>
                </div>

                <ListFeedback list=list empty_text="No policies found." />

                <div class="table-wrapper">
                    <Table>
                        <TableHeader>
                            <TableRow>
                                <SortableHeader label="Number" indicator=list.sort_indicator("policy_no") on_sort=list.sort_by("policy_no") />
                                <TableHeaderCell>"Type"</TableHeaderCell>
                                <SortableHeader label="Customer" indicator=list.sort_indicator("customer_name") on_sort=list.sort_by("customer_name") />
                                <TableHeaderCell>"Vehicle"</TableHeaderCell>
                                <TableHeaderCell>"Dealer"</TableHeaderCell>
                                <SortableHeader label="Start" indicator=list.sort_indicator("start_date") on_sort=list.sort_by("start_date") />
                                <SortableHeader label="End" indicator=list.sort_indicator("end_date") on_sort=list.sort_by("end_date") />
                                <SortableHeader label="Premium" indicator=list.sort_indicator("premium") on_sort=list.sort_by("premium") />
                                <SortableHeader label="Status" indicator=list.sort_indicator("status") on_sort=list.sort_by("status") />
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || list.items()
                                key=|p| (p.id.clone(), p.status, p.premium.to_bits())
                                children=move |item: PolicyListItem| {
                                    let number = if item.policy_no.is_empty() {
                                        item.code.clone()
                                    } else {
                                        item.policy_no.clone()
                                    };
                                    let premium = format!("{} {}", format_amount(item.premium), item.currency.code());
                                    let for_open = item.clone();
                                    view! {
                                        <TableRow on:click=move |_| open_details(&for_open) attr:style="cursor: pointer;">
                                            <TableCell><strong>{number}</strong></TableCell>
                                            <TableCell>{item.policy_type.display_name()}</TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{item.customer_name.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>{item.vehicle_plate.clone().unwrap_or_default()}</TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{item.dealer_name.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>{format_date(&item.start_date)}</TableCell>
                                            <TableCell>{format_date(&item.end_date)}</TableCell>
                                            <TableCell class="table__cell--number">{premium}</TableCell>
                                            <TableCell>
                                                <StatusBadge label=item.status.display_name() tone=policy_status_tone(item.status) />
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_tab_title() {
        assert_eq!(policy_tab_title("", "POL-000007"), "Policy POL-000007");
        assert_eq!(policy_tab_title("TRF-00000042", "POL-000007"), "Policy TRF-00000042");
    }
}
