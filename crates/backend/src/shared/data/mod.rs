pub mod db;
pub mod migration_runner;
pub mod query;
pub mod settings;
