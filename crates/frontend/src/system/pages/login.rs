use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::system::auth::context::{do_login, use_auth};

#[component]
pub fn LoginPage() -> impl IntoView {
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let (error_message, set_error_message) = signal::<Option<String>>(None);
    let (is_loading, set_is_loading) = signal(false);

    let (_, set_auth_state) = use_auth();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let username_val = username.get_untracked().trim().to_string();
        let password_val = password.get_untracked();
        if username_val.is_empty() || password_val.is_empty() {
            set_error_message.set(Some("Enter username and password".to_string()));
            return;
        }

        set_is_loading.set(true);
        set_error_message.set(None);

        spawn_local(async move {
            // при успехе AuthState переключит оболочку на MainLayout
            if let Err(e) = do_login(set_auth_state, username_val, password_val).await {
                set_error_message.set(Some(e));
            }
            set_is_loading.set(false);
        });
    };

    view! {
        <div class="login-container">
            <div class="login-box">
                <h1>"Insurance Agency"</h1>
                <h2>"Sign in"</h2>

                {move || error_message.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <form on:submit=on_submit>
                    <div class="form__group">
                        <Label>"Username"</Label>
                        <Input value=username disabled=is_loading />
                    </div>
                    <div class="form__group">
                        <Label>"Password"</Label>
                        <Input value=password input_type=InputType::Password disabled=is_loading />
                    </div>
                    <Button
                        appearance=ButtonAppearance::Primary
                        button_type=ButtonType::Submit
                        disabled=is_loading
                        loading=is_loading
                    >
                        "Sign in"
                    </Button>
                </form>
            </div>
        </div>
    }
}
