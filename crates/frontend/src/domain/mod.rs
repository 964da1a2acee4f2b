pub mod a001_dealer;
pub mod a002_customer;
pub mod a003_vehicle;
pub mod a004_price_list;
pub mod a005_policy_series;
pub mod a006_policy;
pub mod a007_claim;
pub mod a008_task;
pub mod a009_ticket;
pub mod a010_notification;
