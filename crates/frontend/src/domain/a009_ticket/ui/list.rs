use contracts::domain::a009_ticket::aggregate::TicketListItem;
use contracts::enums::TicketStatus;
use contracts::shared::pagination::ListQuery;
use contracts::system::navigation::detail_key;
use contracts::system::roles::Resource;
use leptos::prelude::*;
use thaw::*;

use super::new_form::NewTicketForm;
use crate::domain::a009_ticket::api;
use crate::layout::global_context::use_app_context;
use crate::shared::components::lookup_select::code_options;
use crate::shared::components::{
    priority_tone, ticket_status_tone, CodeSelect, ListFeedback, ListPager, SearchBox,
    SortableHeader, StatusBadge,
};
use crate::shared::date_utils::format_datetime;
use crate::shared::form_utils::non_empty;
use crate::shared::icons::icon;
use crate::shared::list_state::ListController;
use crate::shared::modal_stack::use_modals;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::system::auth::guard::RequireView;

pub fn ticket_tab_title(code: &str) -> String {
    format!("Ticket {}", code)
}

#[component]
pub fn TicketList() -> impl IntoView {
    view! {
        <RequireView resource=Resource::Tickets>
            <TicketTable />
        </RequireView>
    }
}

#[component]
fn TicketTable() -> impl IntoView {
    let modals = use_modals();
    let ctx = use_app_context();

    let list = ListController::new(ListQuery::default(), |q| Box::pin(api::list(q)));
    list.reload();

    let status_filter = RwSignal::new(String::new());
    Effect::new(move |prev: Option<()>| {
        let status = status_filter.get();
        if prev.is_some() {
            list.update_filters(|q| q.status = non_empty(status));
        }
    });

    // новый тикет сразу открывается в своём табе
    let on_opened = Callback::new(move |id: String| {
        list.reload();
        ctx.open_tab(&detail_key("a009_ticket", &id), "Ticket");
    });
    let open_new = move |_| {
        modals.push(move |handle| view! { <NewTicketForm handle=handle on_opened=on_opened /> }.into_any());
    };

    view! {
        <PageFrame page_id="a009_ticket--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Support tickets"</h1>
                    <Badge>{move || list.total().get().to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Primary on_click=open_new>
                        {icon("plus")}
                        " New ticket"
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
                                    placeholder="Code or subject..."
                                    on_search=Callback::new(move |text| list.set_search(text))
                                />
                            </div>
                            <CodeSelect value=status_filter options=code_options!(TicketStatus) empty_label="All statuses" />
                        </Flex>
                    </div>
                </div>

                <ListFeedback list=list empty_text="No tickets." />

                <div class="table-wrapper">
                    <Table>
                        <TableHeader>
                            <TableRow>
                                <SortableHeader label="Code" indicator=list.sort_indicator("code") on_sort=list.sort_by("code") />
                                <TableHeaderCell>"Subject"</TableHeaderCell>
                                <TableHeaderCell>"Category"</TableHeaderCell>
                                <SortableHeader label="Priority" indicator=list.sort_indicator("priority") on_sort=list.sort_by("priority") />
                                <SortableHeader label="Status" indicator=list.sort_indicator("status") on_sort=list.sort_by("status") />
                                <TableHeaderCell>"Author"</TableHeaderCell>
                                <TableHeaderCell>"Messages"</TableHeaderCell>
                                <SortableHeader label="Updated" indicator=list.sort_indicator("updated_at") on_sort=list.sort_by("updated_at") />
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || list.items()
                                key=|t| (t.id.clone(), t.updated_at.clone())
                                children=move |ticket: TicketListItem| {
                                    let tab_key = detail_key("a009_ticket", &ticket.id);
                                    let tab_title = ticket_tab_title(&ticket.code);
                                    view! {
                                        <TableRow
                                            on:click=move |_| ctx.open_tab(&tab_key, &tab_title)
                                            attr:style="cursor: pointer;"
                                        >
                                            <TableCell>{ticket.code.clone()}</TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{ticket.subject.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>{ticket.category.display_name()}</TableCell>
                                            <TableCell>
                                                <StatusBadge label=ticket.priority.display_name() tone=priority_tone(ticket.priority) />
                                            </TableCell>
                                            <TableCell>
                                                <StatusBadge label=ticket.status.display_name() tone=ticket_status_tone(ticket.status) />
                                            </TableCell>
                                            <TableCell>{ticket.created_by_name.clone()}</TableCell>
                                            <TableCell class="table__cell--number">{ticket.messages.to_string()}</TableCell>
                                            <TableCell>{format_datetime(&ticket.updated_at)}</TableCell>
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
