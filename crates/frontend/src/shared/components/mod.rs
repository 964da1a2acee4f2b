pub mod bar_chart;
pub mod date_input;
pub mod form_field;
pub mod list_status;
pub mod list_toolbar;
pub mod lookup_select;
pub mod pagination_controls;
pub mod search_box;
pub mod stat_card;
pub mod status_badge;

pub use bar_chart::{BarChart, BarPoint};
pub use date_input::{DateInput, DateRange};
pub use form_field::FormField;
pub use list_status::ListStatus;
pub use list_toolbar::{ListFeedback, ListPager, SortableHeader};
pub use lookup_select::{lookup_name, CodeSelect, LookupSelect};
pub use pagination_controls::PaginationControls;
pub use search_box::SearchBox;
pub use stat_card::StatCard;
pub use status_badge::{
    claim_status_tone, policy_status_tone, priority_tone, task_status_tone, ticket_status_tone,
    StatusBadge, Tone,
};
