use crate::app_shell::AppShell;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::top_header::notification_bell::NotificationBadge;
use crate::shared::modal_stack::{ModalHost, ModalStackService};
use crate::shared::toast::{ToastHost, ToastService};
use crate::system::auth::context::AuthProvider;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppGlobalContext::new());
    provide_context(ModalStackService::new());
    provide_context(ToastService::new());
    provide_context(NotificationBadge::new());

    view! {
        <ConfigProvider>
            <AuthProvider>
                <AppShell />
                <ModalHost />
                <ToastHost />
            </AuthProvider>
        </ConfigProvider>
    }
}
