pub mod details;
pub mod file_form;
pub mod list;
