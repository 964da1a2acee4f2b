pub mod auth;
pub mod maintenance;
pub mod navigation;
pub mod roles;
pub mod users;
