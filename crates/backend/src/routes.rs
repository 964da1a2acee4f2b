use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, system};

/// Без авторизации: вход, обновление токена, состояние обслуживания
fn public_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/system/auth/login", post(system::handlers::auth::login))
        .route("/api/system/auth/refresh", post(system::handlers::auth::refresh))
        .route("/api/system/auth/logout", post(system::handlers::auth::logout))
        .route(
            "/api/system/maintenance",
            get(system::handlers::status::get_maintenance),
        )
}

fn system_routes() -> Router {
    Router::new()
        .route("/api/system/auth/me", get(system::handlers::auth::current_user))
        .route(
            "/api/system/users",
            get(system::handlers::users::list).post(system::handlers::users::create),
        )
        .route(
            "/api/system/users/options",
            get(system::handlers::users::options),
        )
        .route(
            "/api/system/users/:id",
            get(system::handlers::users::get_by_id)
                .put(system::handlers::users::update)
                .delete(system::handlers::users::delete),
        )
        .route(
            "/api/system/users/:id/change-password",
            post(system::handlers::users::change_password),
        )
        .route("/api/system/status", get(system::handlers::status::system_status))
        .route(
            "/api/system/maintenance",
            axum::routing::put(system::handlers::status::set_maintenance),
        )
}

fn business_routes() -> Router {
    Router::new()
        // ========================================
        // A001 Dealer
        // ========================================
        .route(
            "/api/dealer",
            get(handlers::a001_dealer::list).post(handlers::a001_dealer::upsert),
        )
        .route("/api/dealer/lookup", get(handlers::a001_dealer::lookup))
        .route(
            "/api/dealer/:id",
            get(handlers::a001_dealer::get_by_id).delete(handlers::a001_dealer::delete),
        )
        // ========================================
        // A002 Customer
        // ========================================
        .route(
            "/api/customer",
            get(handlers::a002_customer::list).post(handlers::a002_customer::upsert),
        )
        .route("/api/customer/lookup", get(handlers::a002_customer::lookup))
        .route(
            "/api/customer/:id",
            get(handlers::a002_customer::get_by_id).delete(handlers::a002_customer::delete),
        )
        // ========================================
        // A003 Vehicle
        // ========================================
        .route(
            "/api/vehicle",
            get(handlers::a003_vehicle::list).post(handlers::a003_vehicle::upsert),
        )
        .route(
            "/api/vehicle/lookup/:customer_id",
            get(handlers::a003_vehicle::lookup_by_customer),
        )
        .route(
            "/api/vehicle/:id",
            get(handlers::a003_vehicle::get_by_id).delete(handlers::a003_vehicle::delete),
        )
        // ========================================
        // A004 Price list
        // ========================================
        .route(
            "/api/price_list",
            get(handlers::a004_price_list::list).post(handlers::a004_price_list::upsert),
        )
        .route("/api/price_list/quote", post(handlers::a004_price_list::quote))
        .route(
            "/api/price_list/:id",
            get(handlers::a004_price_list::get_by_id).delete(handlers::a004_price_list::delete),
        )
        .route(
            "/api/price_list/:id/import-csv",
            post(handlers::a004_price_list::import_csv),
        )
        // ========================================
        // A005 Policy series
        // ========================================
        .route(
            "/api/policy_series",
            get(handlers::a005_policy_series::list).post(handlers::a005_policy_series::upsert),
        )
        .route(
            "/api/policy_series/:id",
            get(handlers::a005_policy_series::get_by_id).delete(handlers::a005_policy_series::delete),
        )
        // ========================================
        // A006 Policy
        // ========================================
        .route(
            "/api/policy",
            get(handlers::a006_policy::list).post(handlers::a006_policy::upsert),
        )
        .route("/api/policy/export.csv", get(handlers::a006_policy::export_csv))
        .route(
            "/api/policy/:id",
            get(handlers::a006_policy::get_by_id).delete(handlers::a006_policy::delete),
        )
        .route("/api/policy/:id/issue", post(handlers::a006_policy::issue))
        .route("/api/policy/:id/cancel", post(handlers::a006_policy::cancel))
        // ========================================
        // A007 Claim
        // ========================================
        .route(
            "/api/claim",
            get(handlers::a007_claim::list).post(handlers::a007_claim::file),
        )
        .route("/api/claim/:id", get(handlers::a007_claim::get_by_id))
        .route("/api/claim/:id/status", post(handlers::a007_claim::change_status))
        // ========================================
        // A008 Task
        // ========================================
        .route(
            "/api/task",
            get(handlers::a008_task::list).post(handlers::a008_task::upsert),
        )
        .route(
            "/api/task/:id",
            get(handlers::a008_task::get_by_id).delete(handlers::a008_task::delete),
        )
        .route("/api/task/:id/status", post(handlers::a008_task::set_status))
        // ========================================
        // A009 Ticket
        // ========================================
        .route(
            "/api/ticket",
            get(handlers::a009_ticket::list).post(handlers::a009_ticket::open),
        )
        .route("/api/ticket/:id", get(handlers::a009_ticket::get_by_id))
        .route("/api/ticket/:id/reply", post(handlers::a009_ticket::reply))
        .route("/api/ticket/:id/close", post(handlers::a009_ticket::close))
        // ========================================
        // A010 Notification
        // ========================================
        .route("/api/notification", get(handlers::a010_notification::list))
        .route(
            "/api/notification/unread-count",
            get(handlers::a010_notification::unread_count),
        )
        .route(
            "/api/notification/read-all",
            post(handlers::a010_notification::mark_all_read),
        )
        .route(
            "/api/notification/:id/read",
            post(handlers::a010_notification::mark_read),
        )
        // ========================================
        // DASHBOARDS
        // ========================================
        .route("/api/d400/overview", get(handlers::d400_overview::get_overview))
        .route(
            "/api/d401/dealer-performance",
            get(handlers::d401_dealer_performance::get_dealer_performance),
        )
}

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    let protected = system_routes()
        .merge(business_routes())
        .route_layer(middleware::from_fn(system::auth::middleware::require_auth));

    public_routes().merge(protected)
}
