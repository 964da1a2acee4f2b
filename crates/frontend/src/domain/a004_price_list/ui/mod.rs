pub mod details;
pub mod list;
pub mod quote;
pub mod rates;
