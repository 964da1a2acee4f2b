use contracts::shared::pagination::ListQuery;
use contracts::system::roles::{Permission, Resource, Role};
use contracts::system::users::User;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::details::{ChangePasswordForm, UserForm};
use crate::shared::components::{CodeSelect, ListFeedback, ListPager, SearchBox, SortableHeader, StatusBadge, Tone};
use crate::shared::confirm::confirm;
use crate::shared::date_utils::{format_datetime, format_date_opt};
use crate::shared::form_utils::non_empty;
use crate::shared::icons::icon;
use crate::shared::list_state::ListController;
use crate::shared::modal_stack::use_modals;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_SYSTEM;
use crate::shared::toast::use_toast;
use crate::system::auth::context::use_auth;
use crate::system::auth::guard::{RequirePermission, RequireView};
use crate::system::users::api;

fn role_tone(role: Role) -> Tone {
    match role {
        Role::SuperAdmin => Tone::Error,
        Role::Admin => Tone::Warning,
        Role::Dealer => Tone::Info,
        Role::Observer | Role::Customer => Tone::Neutral,
    }
}

#[component]
pub fn UsersPage() -> impl IntoView {
    view! {
        <RequireView resource=Resource::Users>
            <UsersList />
        </RequireView>
    }
}

#[component]
fn UsersList() -> impl IntoView {
    let modals = use_modals();
    let toast = use_toast();
    let (auth_state, _) = use_auth();

    let list = ListController::new(ListQuery::default(), |q| Box::pin(api::list(q)));
    list.reload();

    let role_filter = RwSignal::new(String::new());
    Effect::new(move |prev: Option<()>| {
        let code = role_filter.get();
        if prev.is_some() {
            list.update_filters(|q| q.status = non_empty(code));
        }
    });

    let role_options: Vec<(&'static str, &'static str)> =
        Role::ALL.iter().map(|r| (r.code(), r.display_name())).collect();

    let on_saved = Callback::new(move |_| list.reload());

    let open_form = move |user: Option<User>| {
        modals.push(move |handle| {
            view! { <UserForm user=user.clone() handle=handle on_saved=on_saved /> }.into_any()
        });
    };

    let open_password = move |user: User| {
        let own = auth_state.get_untracked().user_id().as_deref() == Some(user.id.as_str());
        modals.push(move |handle| {
            view! {
                <ChangePasswordForm
                    user_id=user.id.clone()
                    username=user.username.clone()
                    own=own
                    handle=handle
                />
            }
            .into_any()
        });
    };

    let delete_user = move |user: User| {
        if !confirm(&format!("Delete user {}?", user.username)) {
            return;
        }
        spawn_local(async move {
            match api::delete(&user.id).await {
                Ok(()) => {
                    toast.success(format!("User {} deleted", user.username));
                    list.reload();
                }
                Err(e) => toast.error(format!("Failed to delete user: {}", e)),
            }
        });
    };

    view! {
        <PageFrame page_id="sys_users--list" category=PAGE_CAT_SYSTEM>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Users"</h1>
                    <Badge>{move || list.total().get().to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <RequirePermission permission=Permission::ManageUsers>
                        <Button appearance=ButtonAppearance::Primary on_click=move |_| open_form(None)>
                            {icon("plus")}
                            " New"
                        </Button>
                    </RequirePermission>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| list.reload()
                        disabled=list.loading()
                    >
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
                                    placeholder="Username, name or email..."
                                    on_search=Callback::new(move |text| list.set_search(text))
                                />
                            </div>
                            <CodeSelect value=role_filter options=role_options empty_label="All roles" />
                        </Flex>
                    </div>
                </div>

                <ListFeedback list=list empty_text="No users found." />

                <div class="table-wrapper">
                    <Table>
                        <TableHeader>
                            <TableRow>
                                <SortableHeader label="Username" indicator=list.sort_indicator("username") on_sort=list.sort_by("username") />
                                <SortableHeader label="Full name" indicator=list.sort_indicator("full_name") on_sort=list.sort_by("full_name") />
                                <TableHeaderCell>"Email"</TableHeaderCell>
                                <SortableHeader label="Role" indicator=list.sort_indicator("role") on_sort=list.sort_by("role") />
                                <TableHeaderCell>"Status"</TableHeaderCell>
                                <SortableHeader label="Created" indicator=list.sort_indicator("created_at") on_sort=list.sort_by("created_at") />
                                <SortableHeader label="Last login" indicator=list.sort_indicator("last_login_at") on_sort=list.sort_by("last_login_at") />
                                <TableHeaderCell>""</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || list.items()
                                key=|u| (u.id.clone(), u.updated_at.clone())
                                children=move |user: User| {
                                    let is_self = auth_state.get_untracked().user_id().as_deref() == Some(user.id.as_str());
                                    let can_manage = auth_state.get_untracked().can(Permission::ManageUsers);
                                    let (status_label, status_tone) = if user.is_active {
                                        ("Active", Tone::Success)
                                    } else {
                                        ("Blocked", Tone::Error)
                                    };
                                    let for_edit = user.clone();
                                    let for_password = user.clone();
                                    let for_delete = user.clone();
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    <span class="table__cell--strong">{user.username.clone()}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{user.full_name.clone().unwrap_or_default()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{user.email.clone().unwrap_or_default()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <StatusBadge label=user.role.display_name() tone=role_tone(user.role) />
                                            </TableCell>
                                            <TableCell>
                                                <StatusBadge label=status_label tone=status_tone />
                                            </TableCell>
                                            <TableCell>{format_datetime(&user.created_at)}</TableCell>
                                            <TableCell>{format_date_opt(&user.last_login_at)}</TableCell>
                                            <TableCell>
                                                <div class="table__actions">
                                                    <Show when=move || can_manage>
                                                        <Button
                                                            size=ButtonSize::Small
                                                            appearance=ButtonAppearance::Subtle
                                                            on_click={
                                                                let user = for_edit.clone();
                                                                move |_| open_form(Some(user.clone()))
                                                            }
                                                        >
                                                            {icon("edit")}
                                                        </Button>
                                                    </Show>
                                                    <Show when=move || can_manage || is_self>
                                                        <Button
                                                            size=ButtonSize::Small
                                                            appearance=ButtonAppearance::Subtle
                                                            on_click={
                                                                let user = for_password.clone();
                                                                move |_| open_password(user.clone())
                                                            }
                                                        >
                                                            {icon("lock")}
                                                        </Button>
                                                    </Show>
                                                    <Show when=move || can_manage && !is_self>
                                                        <Button
                                                            size=ButtonSize::Small
                                                            appearance=ButtonAppearance::Subtle
                                                            on_click={
                                                                let user = for_delete.clone();
                                                                move |_| delete_user(user.clone())
                                                            }
                                                        >
                                                            {icon("trash")}
                                                        </Button>
                                                    </Show>
                                                </div>
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
