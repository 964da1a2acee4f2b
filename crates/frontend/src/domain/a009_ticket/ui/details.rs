//! Переписка по тикету: сообщения по порядку, ответ и закрытие.

use contracts::domain::a009_ticket::aggregate::{Ticket, TicketMessage, TicketReplyDto};
use contracts::enums::TicketStatus;
use contracts::system::navigation::detail_key;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::list::ticket_tab_title;
use crate::domain::a009_ticket::api;
use crate::layout::global_context::use_app_context;
use crate::shared::components::{priority_tone, ticket_status_tone, StatusBadge};
use crate::shared::confirm::confirm;
use crate::shared::date_utils::format_datetime;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use crate::shared::toast::use_toast;
use crate::system::auth::context::use_auth;

fn message_class(message: &TicketMessage, own_user: Option<&str>) -> &'static str {
    if own_user == Some(message.author_id.as_str()) {
        "ticket-message ticket-message--own"
    } else if message.is_staff {
        "ticket-message ticket-message--staff"
    } else {
        "ticket-message"
    }
}

#[component]
pub fn TicketConversation(id: String) -> impl IntoView {
    let toast = use_toast();
    let ctx = use_app_context();
    let (auth_state, _) = use_auth();
    let own_user = StoredValue::new(auth_state.get_untracked().user_id());
    let tab_key = StoredValue::new(detail_key("a009_ticket", &id));
    let id = StoredValue::new(id);

    let ticket = RwSignal::new(None::<Ticket>);
    let reply_text = RwSignal::new(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (sending, set_sending) = signal(false);

    let show = move |t: Ticket| {
        ctx.update_tab_title(&tab_key.get_value(), &ticket_tab_title(&t.base.code));
        ticket.set(Some(t));
    };

    let load = move || {
        spawn_local(async move {
            match api::get(&id.get_value()).await {
                Ok(t) => {
                    set_error.set(None);
                    show(t);
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    };
    load();

    let is_closed = move || ticket.with(|t| t.as_ref().map(|t| t.status == TicketStatus::Closed).unwrap_or(true));

    let send = move |_| {
        let dto = TicketReplyDto {
            body: reply_text.get_untracked().trim().to_string(),
        };
        if let Err(errors) = dto.validate() {
            toast.error(errors.to_string());
            return;
        }
        set_sending.set(true);
        spawn_local(async move {
            match api::reply(&id.get_value(), dto.body).await {
                Ok(t) => {
                    reply_text.set(String::new());
                    show(t);
                }
                Err(e) => toast.error(format!("Failed to send reply: {}", e)),
            }
            set_sending.set(false);
        });
    };

    let close = move |_| {
        if !confirm("Close this ticket? Closed tickets accept no more replies.") {
            return;
        }
        spawn_local(async move {
            match api::close(&id.get_value()).await {
                Ok(t) => {
                    toast.success("Ticket closed");
                    show(t);
                }
                Err(e) => toast.error(format!("Failed to close ticket: {}", e)),
            }
        });
    };

    view! {
        <PageFrame page_id="a009_ticket--detail" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">
                        {move || ticket.with(|t| t.as_ref().map(|t| format!("{}: {}", t.base.code, t.subject())))}
                    </h1>
                    {move || ticket.with(|t| t.as_ref().map(|t| view! {
                        <StatusBadge label=t.status.display_name() tone=ticket_status_tone(t.status) />
                        <StatusBadge label=t.priority.display_name() tone=priority_tone(t.priority) />
                    }))}
                </div>
                <div class="page__header-right">
                    <Show when=move || !is_closed()>
                        <Button appearance=ButtonAppearance::Secondary on_click=close>
                            {icon("lock")}
                            " Close ticket"
                        </Button>
                    </Show>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| load()>
                        {icon("refresh")}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                <div class="ticket-thread">
                    {move || {
                        let own = own_user.get_value();
                        ticket
                            .with(|t| t.as_ref().map(|t| t.messages.clone()).unwrap_or_default())
                            .into_iter()
                            .map(|m| {
                                let class = message_class(&m, own.as_deref());
                                let author = if m.is_staff {
                                    format!("{} (support)", m.author_name)
                                } else {
                                    m.author_name.clone()
                                };
                                view! {
                                    <div class=class>
                                        <div class="ticket-message__meta">
                                            <strong>{author}</strong>
                                            <span>{format_datetime(&m.created_at.to_rfc3339())}</span>
                                        </div>
                                        <div class="ticket-message__body" inner_html=m.body></div>
                                    </div>
                                }
                            })
                            .collect_view()
                    }}
                </div>

                <Show
                    when=move || !is_closed()
                    fallback=|| view! { <div class="alert alert--info">"This ticket is closed."</div> }
                >
                    <div class="ticket-reply">
                        <Textarea value=reply_text placeholder="Write a reply..." />
                        <Button appearance=ButtonAppearance::Primary on_click=send loading=sending>
                            {icon("send")}
                            " Send"
                        </Button>
                    </div>
                </Show>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn message(author: &str, is_staff: bool) -> TicketMessage {
        TicketMessage {
            author_id: author.into(),
            author_name: author.into(),
            is_staff,
            body: "hi".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_message_class() {
        assert_eq!(message_class(&message("u1", true), Some("u1")), "ticket-message ticket-message--own");
        assert_eq!(message_class(&message("u2", true), Some("u1")), "ticket-message ticket-message--staff");
        assert_eq!(message_class(&message("u3", false), None), "ticket-message");
    }
}
