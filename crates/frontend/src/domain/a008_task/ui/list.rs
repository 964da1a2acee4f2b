use contracts::domain::a008_task::aggregate::Task;
use contracts::enums::TaskStatus;
use contracts::shared::lookup::LookupItem;
use contracts::shared::pagination::ListQuery;
use contracts::system::roles::{Permission, Resource};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::details::TaskForm;
use crate::domain::a008_task::api;
use crate::shared::components::lookup_select::code_options;
use crate::shared::components::{
    lookup_name, priority_tone, task_status_tone, CodeSelect, DateRange, ListFeedback, ListPager,
    SearchBox, SortableHeader, StatusBadge, Tone,
};
use crate::shared::confirm::confirm;
use crate::shared::date_utils::{format_date, today};
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
pub fn TaskList() -> impl IntoView {
    view! {
        <RequireView resource=Resource::Tasks>
            <TaskTable />
        </RequireView>
    }
}

#[component]
fn TaskTable() -> impl IntoView {
    let modals = use_modals();
    let toast = use_toast();
    let (auth_state, _) = use_auth();

    let list = ListController::new(ListQuery::default(), |q| Box::pin(api::list(q)));
    list.reload();

    let assignees = RwSignal::new(Vec::<LookupItem>::new());
    spawn_local(async move {
        if let Ok(items) = api::assignees().await {
            assignees.set(items);
        }
    });

    let status_filter = RwSignal::new(String::new());
    let date_from = RwSignal::new(String::new());
    let date_to = RwSignal::new(String::new());
    Effect::new(move |prev: Option<()>| {
        let status = status_filter.get();
        let from = date_from.get();
        let to = date_to.get();
        if prev.is_some() {
            list.update_filters(|q| {
                q.status = non_empty(status);
                q.date_from = non_empty(from);
                q.date_to = non_empty(to);
            });
        }
    });

    let on_saved = Callback::new(move |_| list.reload());
    let open_form = move |task: Option<Task>| {
        modals.push(move |handle| {
            view! { <TaskForm task=task.clone() handle=handle on_saved=on_saved /> }.into_any()
        });
    };

    let set_status = move |task_id: String, status: TaskStatus| {
        spawn_local(async move {
            match api::set_status(&task_id, status).await {
                Ok(_) => list.reload(),
                Err(e) => toast.error(format!("Failed to change status: {}", e)),
            }
        });
    };

    let delete_task = move |task: Task| {
        if !confirm(&format!("Delete task {}?", task.base.description)) {
            return;
        }
        spawn_local(async move {
            match api::delete(&task.to_string_id()).await {
                Ok(()) => {
                    toast.success("Task deleted");
                    list.reload();
                }
                Err(e) => toast.error(format!("Failed to delete task: {}", e)),
            }
        });
    };

    view! {
        <PageFrame page_id="a008_task--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Tasks"</h1>
                    <Badge>{move || list.total().get().to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <RequirePermission permission=Permission::ManageTasks>
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
                                    placeholder="Code or title..."
                                    on_search=Callback::new(move |text| list.set_search(text))
                                />
                            </div>
                            <CodeSelect value=status_filter options=code_options!(TaskStatus) empty_label="All statuses" />
                            <DateRange from=date_from to=date_to />
                        </Flex>
                    </div>
                </div>

                <ListFeedback list=list empty_text="No tasks." />

                <div class="table-wrapper">
                    <Table>
                        <TableHeader>
                            <TableRow>
                                <SortableHeader label="Code" indicator=list.sort_indicator("code") on_sort=list.sort_by("code") />
                                <TableHeaderCell>"Title"</TableHeaderCell>
                                <TableHeaderCell>"Assignee"</TableHeaderCell>
                                <SortableHeader label="Due" indicator=list.sort_indicator("due_date") on_sort=list.sort_by("due_date") />
                                <SortableHeader label="Priority" indicator=list.sort_indicator("priority") on_sort=list.sort_by("priority") />
                                <SortableHeader label="Status" indicator=list.sort_indicator("status") on_sort=list.sort_by("status") />
                                <TableHeaderCell>""</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || list.items()
                                key=|t| (t.to_string_id(), t.base.metadata.updated_at)
                                children=move |task: Task| {
                                    let can_manage = auth_state.get_untracked().can(Permission::ManageTasks);
                                    let overdue = task.is_overdue(today());
                                    let assignee_id = task.assignee_user_id.clone();
                                    let assignee_name = move || assignees.with(|a| lookup_name(a, &assignee_id));
                                    let task_id = task.to_string_id();
                                    let status_value = RwSignal::new(task.status.code().to_string());
                                    let initial_status = task.status;
                                    Effect::new(move |prev: Option<()>| {
                                        let code = status_value.get();
                                        if prev.is_some() {
                                            if let Some(status) = TaskStatus::from_code(&code).filter(|s| *s != initial_status) {
                                                set_status(task_id.clone(), status);
                                            }
                                        }
                                    });
                                    let for_edit = task.clone();
                                    let for_delete = task.clone();
                                    view! {
                                        <TableRow>
                                            <TableCell>{task.base.code.clone()}</TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{task.base.description.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{assignee_name}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                {format_date(&task.due_date.to_string())}
                                                {overdue.then(|| view! { " " <StatusBadge label="Overdue" tone=Tone::Error /> })}
                                            </TableCell>
                                            <TableCell>
                                                <StatusBadge label=task.priority.display_name() tone=priority_tone(task.priority) />
                                            </TableCell>
                                            <TableCell>
                                                {if can_manage {
                                                    view! { <CodeSelect value=status_value options=code_options!(TaskStatus) /> }.into_any()
                                                } else {
                                                    view! {
                                                        <StatusBadge label=task.status.display_name() tone=task_status_tone(task.status) />
                                                    }
                                                    .into_any()
                                                }}
                                            </TableCell>
                                            <TableCell>
                                                <Show when=move || can_manage>
                                                    <div class="table__actions">
                                                        <Button
                                                            size=ButtonSize::Small
                                                            appearance=ButtonAppearance::Subtle
                                                            on_click={
                                                                let task = for_edit.clone();
                                                                move |_| open_form(Some(task.clone()))
                                                            }
                                                        >
                                                            {icon("edit")}
                                                        </Button>
                                                        <Button
                                                            size=ButtonSize::Small
                                                            appearance=ButtonAppearance::Subtle
                                                            on_click={
                                                                let task = for_delete.clone();
                                                                move |_| delete_task(task.clone())
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
