pub mod lookup;
pub mod money;
pub mod pagination;
pub mod validation;
