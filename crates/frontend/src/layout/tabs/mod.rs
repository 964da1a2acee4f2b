//! Табы рабочей области.
//!
//! - `page` - обёртка контента таба (показ/скрытие)
//! - `registry` - ключ таба -> страница

pub mod page;
pub mod registry;

pub use page::TabPage;
