use contracts::domain::a008_task::aggregate::{Task, TaskDto};
use contracts::enums::{TaskPriority, TaskStatus};
use contracts::shared::lookup::LookupItem;
use contracts::system::roles::Role;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::{a001_dealer, a008_task::api};
use crate::shared::components::lookup_select::code_options;
use crate::shared::components::{CodeSelect, DateInput, FormField, LookupSelect};
use crate::shared::date_utils::today_iso;
use crate::shared::form_utils::{non_empty, or_empty};
use crate::shared::modal_stack::{ModalHandle, ModalHeader};
use crate::shared::toast::use_toast;
use crate::system::auth::context::use_auth;

#[component]
pub fn TaskForm(task: Option<Task>, handle: ModalHandle, on_saved: Callback<()>) -> impl IntoView {
    let toast = use_toast();
    let (auth_state, _) = use_auth();
    let auth = auth_state.get_untracked();
    let is_dealer = auth.role() == Some(Role::Dealer);

    let mut dto = task.as_ref().map(|t| t.to_dto()).unwrap_or_default();
    if dto.id.is_none() {
        dto.due_date = today_iso();
        dto.assignee_user_id = auth.user_id().unwrap_or_default();
        if is_dealer {
            dto.dealer_id = auth.dealer_id();
        }
    }
    let editing = dto.id.is_some();
    let title = match &task {
        Some(t) => format!("Task {}", t.base.code),
        None => "New task".to_string(),
    };

    let id = StoredValue::new(dto.id.clone());
    let task_title = RwSignal::new(dto.title.clone());
    let details = RwSignal::new(or_empty(&dto.details));
    let assignee = RwSignal::new(dto.assignee_user_id.clone());
    let dealer_id = RwSignal::new(or_empty(&dto.dealer_id));
    let due_date = RwSignal::new(dto.due_date.clone());
    let priority = RwSignal::new(dto.priority.code().to_string());
    let status = RwSignal::new(dto.status.unwrap_or(TaskStatus::Open).code().to_string());

    let assignees = RwSignal::new(Vec::<LookupItem>::new());
    let dealers = RwSignal::new(Vec::<LookupItem>::new());
    spawn_local(async move {
        match api::assignees().await {
            Ok(items) => assignees.set(items),
            Err(e) => log::warn!("assignee options failed: {}", e),
        }
        if let Ok(items) = a001_dealer::api::lookup().await {
            dealers.set(items);
        }
    });

    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    let submit = move |_| {
        let dto = TaskDto {
            id: id.get_value(),
            title: task_title.get_untracked().trim().to_string(),
            details: non_empty(details.get_untracked()),
            assignee_user_id: assignee.get_untracked(),
            dealer_id: non_empty(dealer_id.get_untracked()),
            due_date: due_date.get_untracked(),
            priority: TaskPriority::from_code(&priority.get_untracked()).unwrap_or_default(),
            status: if editing {
                TaskStatus::from_code(&status.get_untracked())
            } else {
                None
            },
        };
        if let Err(errors) = dto.validate() {
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
                    toast.success("Task saved");
                    on_saved.run(());
                    handle.close();
                }
                Err(e) => {
                    toast.error(format!("Failed to save task: {}", e));
                    set_error.set(Some(e));
                }
            }
        });
    };

    view! {
        <ModalHeader title=title on_close=Callback::new(move |_| handle.close()) />
        <div class="modal-body">
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            <FormField label="Title" required=true>
                <Input value=task_title />
            </FormField>
            <FormField label="Details">
                <Textarea value=details />
            </FormField>
            <div class="form__row">
                <FormField label="Assignee" required=true>
                    <LookupSelect value=assignee items=assignees />
                </FormField>
                <FormField label="Dealer">
                    <LookupSelect value=dealer_id items=dealers empty_label="-- none --" disabled=is_dealer />
                </FormField>
            </div>
            <div class="form__row">
                <FormField label="Due date" required=true>
                    <DateInput value=due_date />
                </FormField>
                <FormField label="Priority">
                    <CodeSelect value=priority options=code_options!(TaskPriority) />
                </FormField>
                {editing.then(|| view! {
                    <FormField label="Status">
                        <CodeSelect value=status options=code_options!(TaskStatus) />
                    </FormField>
                })}
            </div>
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
