pub mod auth;
pub mod pages;
pub mod status;
pub mod users;
