use contracts::domain::a010_notification::aggregate::Notification;
use contracts::enums::NotificationKind;
use contracts::shared::pagination::ListQuery;
use contracts::system::roles::Resource;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a010_notification::api;
use crate::layout::global_context::use_app_context;
use crate::layout::top_header::notification_bell::use_notification_badge;
use crate::shared::components::{ListFeedback, ListPager};
use crate::shared::date_utils::format_datetime;
use crate::shared::icons::icon;
use crate::shared::list_state::ListController;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::shared::toast::use_toast;
use crate::system::auth::guard::RequireView;

fn kind_icon(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::System => "server",
        NotificationKind::PolicyIssued => "shield",
        NotificationKind::ClaimUpdated => "alert-triangle",
        NotificationKind::TaskAssigned | NotificationKind::TaskOverdue => "check-square",
        NotificationKind::TicketReplied => "message-square",
    }
}

#[component]
pub fn NotificationList() -> impl IntoView {
    view! {
        <RequireView resource=Resource::Notifications>
            <NotificationFeed />
        </RequireView>
    }
}

#[component]
fn NotificationFeed() -> impl IntoView {
    let toast = use_toast();
    let ctx = use_app_context();
    let badge = use_notification_badge();

    let list = ListController::new(ListQuery::default(), |q| Box::pin(api::list(q)));
    list.reload();

    let unread_only = RwSignal::new(false);
    Effect::new(move |prev: Option<()>| {
        let only = unread_only.get();
        if prev.is_some() {
            list.update_filters(|q| q.unread_only = only);
        }
    });

    let open = move |n: Notification| {
        if !n.is_read {
            let id = n.id.clone();
            spawn_local(async move {
                match api::mark_read(&id).await {
                    Ok(()) => {
                        list.reload();
                        badge.refresh();
                    }
                    Err(e) => log::warn!("mark read failed: {}", e),
                }
            });
        }
        if let Some(link) = n.link.as_deref().filter(|l| !l.is_empty()) {
            ctx.open_page(link);
        }
    };

    let mark_all = move |_| {
        spawn_local(async move {
            match api::mark_all_read().await {
                Ok(()) => {
                    toast.success("All notifications marked as read");
                    list.reload();
                    badge.refresh();
                }
                Err(e) => toast.error(format!("Failed to mark notifications: {}", e)),
            }
        });
    };

    view! {
        <PageFrame page_id="a010_notification--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Notifications"</h1>
                    {move || badge.unread.get().badge().map(|text| view! { <Badge>{text}</Badge> })}
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Secondary on_click=mark_all>
                        {icon("check")}
                        " Mark all read"
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
                            <Switch checked=unread_only label="Unread only" />
                        </div>
                        <div class="filter-panel-header__center">
                            <ListPager list=list />
                        </div>
                    </div>
                </div>

                <ListFeedback list=list empty_text="Nothing new." />

                <div class="notification-feed">
                    <For
                        each=move || list.items()
                        key=|n| (n.id.clone(), n.is_read)
                        children=move |n: Notification| {
                            let class = if n.is_read {
                                "notification-item"
                            } else {
                                "notification-item notification-item--unread"
                            };
                            let for_open = n.clone();
                            view! {
                                <div class=class on:click=move |_| open(for_open.clone())>
                                    <div class="notification-item__icon">{icon(kind_icon(n.kind))}</div>
                                    <div class="notification-item__content">
                                        <div class="notification-item__title">{n.title.clone()}</div>
                                        {(!n.body.is_empty()).then(|| view! {
                                            <div class="notification-item__body">{n.body.clone()}</div>
                                        })}
                                        <div class="notification-item__meta">
                                            {n.kind.display_name()}
                                            " - "
                                            {format_datetime(&n.created_at)}
                                        </div>
                                    </div>
                                </div>
                            }
                        }
                    />
                </div>
            </div>
        </PageFrame>
    }
}
