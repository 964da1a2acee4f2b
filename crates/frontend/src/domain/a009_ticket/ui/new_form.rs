use contracts::domain::a009_ticket::aggregate::NewTicketDto;
use contracts::enums::{TaskPriority, TicketCategory};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a009_ticket::api;
use crate::shared::components::lookup_select::code_options;
use crate::shared::components::{CodeSelect, FormField};
use crate::shared::modal_stack::{ModalHandle, ModalHeader};
use crate::shared::toast::use_toast;

/// Новое обращение; `on_opened` получает id созданного тикета.
#[component]
pub fn NewTicketForm(handle: ModalHandle, on_opened: Callback<String>) -> impl IntoView {
    let toast = use_toast();
    let subject = RwSignal::new(String::new());
    let category = RwSignal::new(TicketCategory::default().code().to_string());
    let priority = RwSignal::new(TaskPriority::default().code().to_string());
    let body = RwSignal::new(String::new());

    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    let submit = move |_| {
        let dto = NewTicketDto {
            subject: subject.get_untracked().trim().to_string(),
            category: TicketCategory::from_code(&category.get_untracked()).unwrap_or_default(),
            priority: TaskPriority::from_code(&priority.get_untracked()).unwrap_or_default(),
            body: body.get_untracked().trim().to_string(),
        };
        if let Err(errors) = dto.validate() {
            set_error.set(Some(errors.to_string()));
            return;
        }

        set_error.set(None);
        set_saving.set(true);
        spawn_local(async move {
            let result = api::open(&dto).await;
            set_saving.set(false);
            match result {
                Ok(id) => {
                    toast.success("Ticket opened");
                    on_opened.run(id);
                    handle.close();
                }
                Err(e) => {
                    toast.error(format!("Failed to open ticket: {}", e));
                    set_error.set(Some(e));
                }
            }
        });
    };

    view! {
        <ModalHeader title="New support ticket" on_close=Callback::new(move |_| handle.close()) />
        <div class="modal-body">
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
            <FormField label="Subject" required=true>
                <Input value=subject />
            </FormField>
            <div class="form__row">
                <FormField label="Category">
                    <CodeSelect value=category options=code_options!(TicketCategory) />
                </FormField>
                <FormField label="Priority">
                    <CodeSelect value=priority options=code_options!(TaskPriority) />
                </FormField>
            </div>
            <FormField label="Message" required=true>
                <Textarea value=body />
            </FormField>
        </div>
        <div class="modal-footer">
            <Button appearance=ButtonAppearance::Secondary on_click=move |_| handle.close()>
                "Cancel"
            </Button>
            <Button appearance=ButtonAppearance::Primary on_click=submit loading=saving>
                "Open ticket"
            </Button>
        </div>
    }
}
