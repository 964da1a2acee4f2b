use contracts::domain::a005_policy_series::aggregate::{format_policy_number, PolicySeries};
use contracts::enums::PolicyType;
use contracts::shared::lookup::LookupItem;
use contracts::shared::pagination::ListQuery;
use contracts::system::roles::{Permission, Resource, Role};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::details::PolicySeriesForm;
use crate::domain::{a001_dealer, a005_policy_series::api};
use crate::shared::components::lookup_select::code_options;
use crate::shared::components::{
    lookup_name, CodeSelect, ListFeedback, ListPager, LookupSelect, SearchBox, SortableHeader,
    StatusBadge, Tone,
};
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

/// Остаток менее 10% диапазона подсвечивается.
fn remaining_tone(series: &PolicySeries) -> Tone {
    let size = series.range_end - series.range_start + 1;
    if series.is_exhausted() {
        Tone::Error
    } else if series.remaining() * 10 < size {
        Tone::Warning
    } else {
        Tone::Success
    }
}

#[component]
pub fn PolicySeriesList() -> impl IntoView {
    view! {
        <RequireView resource=Resource::PolicySeries>
            <PolicySeriesTable />
        </RequireView>
    }
}

#[component]
fn PolicySeriesTable() -> impl IntoView {
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
    let type_filter = RwSignal::new(String::new());
    Effect::new(move |prev: Option<()>| {
        let dealer = dealer_filter.get();
        let policy_type = type_filter.get();
        if prev.is_some() {
            list.update_filters(|q| {
                q.dealer_id = non_empty(dealer);
                q.policy_type = non_empty(policy_type);
            });
        }
    });

    let on_saved = Callback::new(move |_| list.reload());
    let open_form = move |series: Option<PolicySeries>| {
        modals.push(move |handle| {
            view! { <PolicySeriesForm series=series.clone() handle=handle on_saved=on_saved /> }.into_any()
        });
    };

    let delete_series = move |series: PolicySeries| {
        if !confirm(&format!("Delete policy series {}?", series.prefix)) {
            return;
        }
        spawn_local(async move {
            match api::delete(&series.to_string_id()).await {
                Ok(()) => {
                    toast.success("Policy series deleted");
                    list.reload();
                }
                Err(e) => toast.error(format!("Failed to delete series: {}", e)),
            }
        });
    };

    view! {
        <PageFrame page_id="a005_policy_series--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Policy series"</h1>
                    <Badge>{move || list.total().get().to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <RequirePermission permission=Permission::ManagePolicySeries>
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
                                    placeholder="Prefix..."
                                    on_search=Callback::new(move |text| list.set_search(text))
                                />
                            </div>
                            <CodeSelect value=type_filter options=code_options!(PolicyType) empty_label="All types" />
                            <Show when=move || show_dealer_filter>
                                <LookupSelect value=dealer_filter items=dealers empty_label="All dealers" />
                            </Show>
                        </Flex>
                    </div>
                </div>

                <ListFeedback list=list empty_text="No policy series yet." />

                <div class="table-wrapper">
                    <Table>
                        <TableHeader>
                            <TableRow>
                                <SortableHeader label="Prefix" indicator=list.sort_indicator("prefix") on_sort=list.sort_by("prefix") />
                                <TableHeaderCell>"Dealer"</TableHeaderCell>
                                <SortableHeader label="Type" indicator=list.sort_indicator("policy_type") on_sort=list.sort_by("policy_type") />
                                <SortableHeader label="Range" indicator=list.sort_indicator("range_start") on_sort=list.sort_by("range_start") />
                                <TableHeaderCell>"Next number"</TableHeaderCell>
                                <TableHeaderCell>"Used"</TableHeaderCell>
                                <TableHeaderCell>"Remaining"</TableHeaderCell>
                                <TableHeaderCell>""</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || list.items()
                                key=|s| (s.to_string_id(), s.base.metadata.updated_at)
                                children=move |series: PolicySeries| {
                                    let can_manage = auth_state.get_untracked().can(Permission::ManagePolicySeries);
                                    let dealer_id = series.dealer_id.clone();
                                    let dealer_name = move || dealers.with(|d| lookup_name(d, &dealer_id));
                                    let next = if series.is_exhausted() {
                                        "-".to_string()
                                    } else {
                                        format_policy_number(&series.prefix, series.next_number)
                                    };
                                    let for_edit = series.clone();
                                    let for_delete = series.clone();
                                    let prefix = series.prefix.clone();
                                    let policy_type_name = series.policy_type.display_name();
                                    let range = format!("{} - {}", series.range_start, series.range_end);
                                    let used = series.used_count().to_string();
                                    let remaining = series.remaining().to_string();
                                    let tone = remaining_tone(&series);
                                    view! {
                                        <TableRow>
                                            <TableCell><strong>{prefix}</strong></TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{dealer_name}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>{policy_type_name}</TableCell>
                                            <TableCell class="table__cell--number">
                                                {range}
                                            </TableCell>
                                            <TableCell>{next}</TableCell>
                                            <TableCell class="table__cell--number">{used}</TableCell>
                                            <TableCell>
                                                <StatusBadge label=remaining tone=tone />
                                            </TableCell>
                                            <TableCell>
                                                <Show when=move || can_manage>
                                                    <div class="table__actions">
                                                        <Button
                                                            size=ButtonSize::Small
                                                            appearance=ButtonAppearance::Subtle
                                                            on_click={
                                                                let series = for_edit.clone();
                                                                move |_| open_form(Some(series.clone()))
                                                            }
                                                        >
                                                            {icon("edit")}
                                                        </Button>
                                                        <Button
                                                            size=ButtonSize::Small
                                                            appearance=ButtonAppearance::Subtle
                                                            on_click={
                                                                let series = for_delete.clone();
                                                                move |_| delete_series(series.clone())
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
