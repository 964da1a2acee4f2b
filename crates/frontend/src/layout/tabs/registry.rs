//! Единственное место, где ключ таба превращается в страницу.
//!
//! Ключи совпадают с `contracts::system::navigation`; детальные табы
//! имеют вид `<base>_detail_<id>`.

use contracts::system::navigation::page_allowed;
use contracts::system::roles::Role;
use leptos::prelude::*;

use crate::dashboards::d400_overview::ui::OverviewDashboard;
use crate::dashboards::d401_dealer_performance::ui::DealerPerformanceDashboard;
use crate::domain::a001_dealer::ui::list::DealerList;
use crate::domain::a002_customer::ui::list::CustomerList;
use crate::domain::a003_vehicle::ui::list::VehicleList;
use crate::domain::a004_price_list::ui::list::PriceListList;
use crate::domain::a005_policy_series::ui::list::PolicySeriesList;
use crate::domain::a006_policy::ui::details::PolicyDetails;
use crate::domain::a006_policy::ui::list::PolicyList;
use crate::domain::a007_claim::ui::details::ClaimDetails;
use crate::domain::a007_claim::ui::list::ClaimList;
use crate::domain::a008_task::ui::list::TaskList;
use crate::domain::a009_ticket::ui::details::TicketConversation;
use crate::domain::a009_ticket::ui::list::TicketList;
use crate::domain::a010_notification::ui::list::NotificationList;
use crate::system::pages::status::SystemStatusPage;
use crate::system::users::ui::list::UsersPage;

fn not_available(text: &'static str) -> AnyView {
    view! { <div class="page"><div class="alert alert--error">{text}</div></div> }.into_any()
}

fn render_detail(base: &str, id: String) -> AnyView {
    match base {
        "a006_policy" => view! { <PolicyDetails id=id /> }.into_any(),
        "a007_claim" => view! { <ClaimDetails id=id /> }.into_any(),
        "a009_ticket" => view! { <TicketConversation id=id /> }.into_any(),
        _ => not_available("This page has no detail view."),
    }
}

pub fn render_tab_content(key: &str, role: Option<Role>) -> AnyView {
    let allowed = role.map(|r| page_allowed(r, key)).unwrap_or(false);
    if !allowed {
        log::warn!("tab '{}' is not available for the current role", key);
        return not_available("You do not have access to this page.");
    }

    if let Some((base, id)) = key.split_once("_detail_") {
        return render_detail(base, id.to_string());
    }

    match key {
        "d400_overview" => view! { <OverviewDashboard /> }.into_any(),
        "d401_dealer_performance" => view! { <DealerPerformanceDashboard /> }.into_any(),
        "a001_dealer" => view! { <DealerList /> }.into_any(),
        "a002_customer" => view! { <CustomerList /> }.into_any(),
        "a003_vehicle" => view! { <VehicleList /> }.into_any(),
        "a004_price_list" => view! { <PriceListList /> }.into_any(),
        "a005_policy_series" => view! { <PolicySeriesList /> }.into_any(),
        "a006_policy" => view! { <PolicyList /> }.into_any(),
        "a007_claim" => view! { <ClaimList /> }.into_any(),
        "a008_task" => view! { <TaskList /> }.into_any(),
        "a009_ticket" => view! { <TicketList /> }.into_any(),
        "a010_notification" => view! { <NotificationList /> }.into_any(),
        "sys_users" => view! { <UsersPage /> }.into_any(),
        "sys_status" => view! { <SystemStatusPage /> }.into_any(),
        _ => not_available("Unknown page."),
    }
}
