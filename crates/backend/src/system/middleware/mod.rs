pub mod maintenance;
pub mod request_logger;
