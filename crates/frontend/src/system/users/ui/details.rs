use contracts::shared::lookup::LookupItem;
use contracts::system::roles::Role;
use contracts::system::users::{ChangePasswordDto, CreateUserDto, UpdateUserDto, User, MIN_PASSWORD_LEN};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::{a001_dealer, a002_customer};
use crate::shared::components::{CodeSelect, FormField, LookupSelect};
use crate::shared::form_utils::{non_empty, or_empty};
use crate::shared::icons::icon;
use crate::shared::modal_stack::{ModalHandle, ModalHeader};
use crate::shared::toast::use_toast;
use crate::system::auth::context::use_auth;
use crate::system::users::api;

/// Создание (`user = None`) и редактирование пользователя.
#[component]
pub fn UserForm(user: Option<User>, handle: ModalHandle, on_saved: Callback<()>) -> impl IntoView {
    let toast = use_toast();
    let (auth_state, _) = use_auth();

    let editing_id = StoredValue::new(user.as_ref().map(|u| u.id.clone()));
    let is_new = user.is_none();
    let title = match &user {
        Some(u) => format!("User {}", u.username),
        None => "New user".to_string(),
    };

    let username = RwSignal::new(user.as_ref().map(|u| u.username.clone()).unwrap_or_default());
    let password = RwSignal::new(String::new());
    let email = RwSignal::new(user.as_ref().map(|u| or_empty(&u.email)).unwrap_or_default());
    let full_name = RwSignal::new(user.as_ref().map(|u| or_empty(&u.full_name)).unwrap_or_default());
    let role = RwSignal::new(
        user.as_ref()
            .map(|u| u.role)
            .unwrap_or(Role::Customer)
            .code()
            .to_string(),
    );
    let dealer_id = RwSignal::new(user.as_ref().map(|u| or_empty(&u.dealer_id)).unwrap_or_default());
    let customer_id = RwSignal::new(user.as_ref().map(|u| or_empty(&u.customer_id)).unwrap_or_default());
    let is_active = RwSignal::new(user.as_ref().map(|u| u.is_active).unwrap_or(true));

    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    let dealers = RwSignal::new(Vec::<LookupItem>::new());
    let customers = RwSignal::new(Vec::<LookupItem>::new());
    spawn_local(async move {
        match a001_dealer::api::lookup().await {
            Ok(items) => dealers.set(items),
            Err(e) => log::warn!("dealer lookup failed: {}", e),
        }
        match a002_customer::api::lookup(None, None).await {
            Ok(items) => customers.set(items),
            Err(e) => log::warn!("customer lookup failed: {}", e),
        }
    });

    // свою роль и выше назначить нельзя, но текущую роль редактируемого показываем
    let role_options = {
        let mut roles = auth_state
            .get_untracked()
            .role()
            .map(|r| r.assignable_roles())
            .unwrap_or_default();
        if let Some(current) = user.as_ref().map(|u| u.role) {
            if !roles.contains(&current) {
                roles.push(current);
            }
        }
        roles
            .into_iter()
            .map(|r| (r.code(), r.display_name()))
            .collect::<Vec<_>>()
    };

    let selected_role = move || Role::from_code(&role.get()).unwrap_or_default();

    let submit = move |_| {
        let role = Role::from_code(&role.get_untracked()).unwrap_or_default();
        let dealer = (role == Role::Dealer)
            .then(|| non_empty(dealer_id.get_untracked()))
            .flatten();
        let customer = (role == Role::Customer)
            .then(|| non_empty(customer_id.get_untracked()))
            .flatten();

        let result = match editing_id.get_value() {
            None => {
                let dto = CreateUserDto {
                    username: username.get_untracked().trim().to_string(),
                    password: password.get_untracked(),
                    email: non_empty(email.get_untracked()),
                    full_name: non_empty(full_name.get_untracked()),
                    role,
                    dealer_id: dealer,
                    customer_id: customer,
                };
                dto.validate().map(|_| SaveRequest::Create(dto))
            }
            Some(id) => {
                let dto = UpdateUserDto {
                    id,
                    email: non_empty(email.get_untracked()),
                    full_name: non_empty(full_name.get_untracked()),
                    role,
                    dealer_id: dealer,
                    customer_id: customer,
                    is_active: is_active.get_untracked(),
                };
                dto.validate().map(|_| SaveRequest::Update(dto))
            }
        };

        let request = match result {
            Ok(request) => request,
            Err(errors) => {
                set_error.set(Some(errors.to_string()));
                return;
            }
        };

        set_error.set(None);
        set_saving.set(true);
        spawn_local(async move {
            let outcome = match &request {
                SaveRequest::Create(dto) => api::create(dto).await.map(|_| ()),
                SaveRequest::Update(dto) => api::update(dto).await,
            };
            set_saving.set(false);
            match outcome {
                Ok(()) => {
                    toast.success("User saved");
                    on_saved.run(());
                    handle.close();
                }
                Err(e) => {
                    toast.error(format!("Failed to save user: {}", e));
                    set_error.set(Some(e));
                }
            }
        });
    };

    view! {
        <ModalHeader title=title on_close=Callback::new(move |_| handle.close()) />
        <div class="modal-body">
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            <FormField label="Username" required=true>
                <Input value=username disabled=!is_new placeholder="login" />
            </FormField>
            <Show when=move || is_new>
                <FormField label="Password" required=true>
                    <Input
                        value=password
                        input_type=InputType::Password
                        placeholder=format!("at least {} characters", MIN_PASSWORD_LEN)
                    />
                </FormField>
            </Show>
            <FormField label="Full name">
                <Input value=full_name />
            </FormField>
            <FormField label="Email">
                <Input value=email placeholder="name@example.com" />
            </FormField>
            <FormField label="Role" required=true>
                <CodeSelect value=role options=role_options />
            </FormField>
            <Show when=move || selected_role() == Role::Dealer>
                <FormField label="Dealer" required=true>
                    <LookupSelect value=dealer_id items=dealers />
                </FormField>
            </Show>
            <Show when=move || selected_role() == Role::Customer>
                <FormField label="Customer" required=true>
                    <LookupSelect value=customer_id items=customers />
                </FormField>
            </Show>
            <Show when=move || !is_new>
                <div class="form__group">
                    <Switch checked=is_active label="Active" />
                </div>
            </Show>
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

enum SaveRequest {
    Create(CreateUserDto),
    Update(UpdateUserDto),
}

/// Смена пароля. Для своей учётной записи нужен текущий пароль.
#[component]
pub fn ChangePasswordForm(user_id: String, username: String, own: bool, handle: ModalHandle) -> impl IntoView {
    let toast = use_toast();
    let user_id = StoredValue::new(user_id);
    let old_password = RwSignal::new(String::new());
    let new_password = RwSignal::new(String::new());
    let repeat = RwSignal::new(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    let submit = move |_| {
        let new_value = new_password.get_untracked();
        if new_value.chars().count() < MIN_PASSWORD_LEN {
            set_error.set(Some(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
            return;
        }
        if new_value != repeat.get_untracked() {
            set_error.set(Some("Passwords do not match".to_string()));
            return;
        }
        let dto = ChangePasswordDto {
            user_id: user_id.get_value(),
            old_password: own.then(|| old_password.get_untracked()),
            new_password: new_value,
        };
        set_error.set(None);
        set_saving.set(true);
        spawn_local(async move {
            let result = api::change_password(&dto).await;
            set_saving.set(false);
            match result {
                Ok(()) => {
                    toast.success("Password changed");
                    handle.close();
                }
                Err(e) => {
                    toast.error(format!("Failed to change password: {}", e));
                    set_error.set(Some(e));
                }
            }
        });
    };

    view! {
        <ModalHeader
            title=format!("Password for {}", username)
            on_close=Callback::new(move |_| handle.close())
        />
        <div class="modal-body">
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
            <Show when=move || own>
                <FormField label="Current password" required=true>
                    <Input value=old_password input_type=InputType::Password />
                </FormField>
            </Show>
            <FormField label="New password" required=true>
                <Input value=new_password input_type=InputType::Password />
            </FormField>
            <FormField label="Repeat new password" required=true>
                <Input value=repeat input_type=InputType::Password />
            </FormField>
        </div>
        <div class="modal-footer">
            <Button appearance=ButtonAppearance::Secondary on_click=move |_| handle.close()>
                "Cancel"
            </Button>
            <Button appearance=ButtonAppearance::Primary on_click=submit loading=saving>
                {icon("lock")}
                " Change"
            </Button>
        </div>
    }
}
