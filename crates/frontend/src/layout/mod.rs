pub mod center;
pub mod cookie_consent;
pub mod global_context;
pub mod left;
pub mod maintenance_banner;
pub mod tabs;
pub mod top_header;

use cookie_consent::CookieConsentBanner;
use leptos::prelude::*;
use maintenance_banner::MaintenanceBanner;
use top_header::TopHeader;

/// Каркас приложения:
/// ```text
/// +------------------------------------+
/// |             TopHeader              |
/// |        (maintenance banner)        |
/// +---------+--------------------------+
/// | Sidebar |  TabBar + tab contents   |
/// +---------+--------------------------+
/// ```
#[component]
pub fn Shell<L, C>(left: L, center: C) -> impl IntoView
where
    L: Fn() -> AnyView + 'static + Send,
    C: Fn() -> AnyView + 'static + Send,
{
    view! {
        <div class="app-layout">
            <TopHeader />
            <MaintenanceBanner />
            <div class="app-body">
                <left::Left>{left()}</left::Left>
                <main class="app-main">
                    <center::Center>{center()}</center::Center>
                </main>
            </div>
            <CookieConsentBanner />
        </div>
    }
}
