use contracts::system::auth::UserInfo;
use contracts::system::roles::{Permission, Resource, Role};
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{api, storage};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub user_info: Option<UserInfo>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.user_info.is_some()
    }

    /// Токен есть, профиль ещё не получен (восстановление сессии)
    pub fn is_restoring(&self) -> bool {
        self.access_token.is_some() && self.user_info.is_none()
    }

    pub fn role(&self) -> Option<Role> {
        self.user_info.as_ref().map(|u| u.role)
    }

    pub fn can(&self, permission: Permission) -> bool {
        self.role().map(|r| r.has(permission)).unwrap_or(false)
    }

    pub fn can_view(&self, resource: Resource) -> bool {
        self.role().map(|r| r.can_view(resource)).unwrap_or(false)
    }

    pub fn is_staff(&self) -> bool {
        self.role().map(|r| r.is_staff()).unwrap_or(false)
    }

    pub fn user_id(&self) -> Option<String> {
        self.user_info.as_ref().map(|u| u.id.clone())
    }

    /// Дилер пользователя с ролью Dealer; в формах подставляется и блокируется
    pub fn dealer_id(&self) -> Option<String> {
        self.user_info.as_ref().and_then(|u| u.dealer_id.clone())
    }

    pub fn customer_id(&self) -> Option<String> {
        self.user_info.as_ref().and_then(|u| u.customer_id.clone())
    }
}

async fn restore_session(set_auth_state: WriteSignal<AuthState>) {
    let Some(access_token) = storage::get_access_token() else {
        return;
    };

    if let Ok(user_info) = api::get_current_user(&access_token).await {
        set_auth_state.set(AuthState {
            access_token: Some(access_token),
            user_info: Some(user_info),
        });
        return;
    }

    // access token протух, пробуем refresh
    if let Some(refresh_token) = storage::get_refresh_token() {
        if let Ok(response) = api::refresh_token(refresh_token).await {
            storage::save_access_token(&response.access_token);
            if let Ok(user_info) = api::get_current_user(&response.access_token).await {
                set_auth_state.set(AuthState {
                    access_token: Some(response.access_token),
                    user_info: Some(user_info),
                });
                return;
            }
        }
    }

    log::info!("Stored session is no longer valid");
    storage::clear_tokens();
    set_auth_state.set(AuthState::default());
}

#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    let (auth_state, set_auth_state) = signal(AuthState {
        access_token: storage::get_access_token(),
        user_info: None,
    });

    Effect::new(move |_| {
        spawn_local(restore_session(set_auth_state));
    });

    provide_context(auth_state);
    provide_context(set_auth_state);

    children()
}

pub fn use_auth() -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
    let auth_state =
        use_context::<ReadSignal<AuthState>>().expect("AuthProvider not found in component tree");
    let set_auth_state =
        use_context::<WriteSignal<AuthState>>().expect("AuthProvider not found in component tree");

    (auth_state, set_auth_state)
}

pub async fn do_login(
    set_auth_state: WriteSignal<AuthState>,
    username: String,
    password: String,
) -> Result<(), String> {
    let response = api::login(username, password).await?;

    storage::save_session(&response.access_token, &response.refresh_token);

    log::info!(
        "Signed in as {} ({})",
        response.user.username,
        response.user.role.display_name()
    );
    set_auth_state.set(AuthState {
        access_token: Some(response.access_token),
        user_info: Some(response.user),
    });

    Ok(())
}

pub async fn do_logout(set_auth_state: WriteSignal<AuthState>) -> Result<(), String> {
    if let Some(refresh_token) = storage::get_refresh_token() {
        if let Err(e) = api::logout(refresh_token).await {
            log::warn!("Logout request failed: {}", e);
        }
    }

    storage::clear_tokens();
    set_auth_state.set(AuthState::default());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(role: Role) -> AuthState {
        AuthState {
            access_token: Some("token".into()),
            user_info: Some(UserInfo {
                id: "u1".into(),
                username: "user".into(),
                full_name: None,
                email: None,
                role,
                dealer_id: None,
                customer_id: None,
            }),
        }
    }

    #[test]
    fn test_anonymous_state_has_no_rights() {
        let anon = AuthState::default();
        assert!(!anon.is_authenticated());
        assert!(!anon.is_restoring());
        assert!(!anon.can(Permission::FileClaims));
        assert!(!anon.can_view(Resource::Policies));
    }

    #[test]
    fn test_restoring_state() {
        let restoring = AuthState {
            access_token: Some("t".into()),
            user_info: None,
        };
        assert!(restoring.is_restoring());
        assert!(!restoring.is_authenticated());
    }

    #[test]
    fn test_role_helpers_follow_matrix() {
        let dealer = state(Role::Dealer);
        assert!(dealer.is_authenticated());
        assert!(dealer.can(Permission::IssuePolicies));
        assert!(!dealer.can(Permission::ManageUsers));
        assert!(!dealer.is_staff());
        assert!(state(Role::Admin).is_staff());
        assert!(!state(Role::Customer).can_view(Resource::Customers));
    }
}
