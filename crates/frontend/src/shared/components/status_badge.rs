use contracts::enums::{ClaimStatus, PolicyStatus, TaskPriority, TaskStatus, TicketStatus};
use leptos::prelude::*;

/// Оттенок бейджа статуса
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Success,
    Warning,
    Error,
    Info,
}

impl Tone {
    pub fn class(&self) -> &'static str {
        match self {
            Tone::Neutral => "badge badge--neutral",
            Tone::Success => "badge badge--success",
            Tone::Warning => "badge badge--warning",
            Tone::Error => "badge badge--error",
            Tone::Info => "badge badge--primary",
        }
    }
}

#[component]
pub fn StatusBadge(#[prop(into)] label: String, tone: Tone) -> impl IntoView {
    view! { <span class=tone.class()>{label}</span> }
}

pub fn policy_status_tone(status: PolicyStatus) -> Tone {
    match status {
        PolicyStatus::Draft => Tone::Neutral,
        PolicyStatus::Active => Tone::Success,
        PolicyStatus::Cancelled => Tone::Error,
        PolicyStatus::Expired => Tone::Warning,
    }
}

pub fn claim_status_tone(status: ClaimStatus) -> Tone {
    match status {
        ClaimStatus::Submitted => Tone::Info,
        ClaimStatus::UnderReview => Tone::Warning,
        ClaimStatus::Approved => Tone::Success,
        ClaimStatus::Rejected => Tone::Error,
        ClaimStatus::Paid => Tone::Neutral,
    }
}

pub fn task_status_tone(status: TaskStatus) -> Tone {
    match status {
        TaskStatus::Open => Tone::Info,
        TaskStatus::InProgress => Tone::Warning,
        TaskStatus::Done => Tone::Success,
        TaskStatus::Cancelled => Tone::Neutral,
    }
}

pub fn priority_tone(priority: TaskPriority) -> Tone {
    match priority {
        TaskPriority::Low => Tone::Neutral,
        TaskPriority::Normal => Tone::Info,
        TaskPriority::High => Tone::Error,
    }
}

pub fn ticket_status_tone(status: TicketStatus) -> Tone {
    match status {
        TicketStatus::Open => Tone::Warning,
        TicketStatus::Answered => Tone::Info,
        TicketStatus::Closed => Tone::Neutral,
    }
}
