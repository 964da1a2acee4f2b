pub mod auth;
pub mod handlers;
pub mod housekeeping;
pub mod initialization;
pub mod maintenance;
pub mod middleware;
pub mod status;
pub mod tracing;
pub mod users;
