use super::code_enum;

code_enum! {
    /// Статус страхового случая (убытка)
    pub enum ClaimStatus {
        Submitted => ("submitted", "Submitted"),
        UnderReview => ("under_review", "Under review"),
        Approved => ("approved", "Approved"),
        Rejected => ("rejected", "Rejected"),
        Paid => ("paid", "Paid"),
    }
}

impl ClaimStatus {
    pub fn can_transition_to(&self, next: ClaimStatus) -> bool {
        use ClaimStatus::*;
        matches!(
            (self, next),
            (Submitted, UnderReview)
                | (Submitted, Rejected)
                | (UnderReview, Approved)
                | (UnderReview, Rejected)
                | (Approved, Paid)
        )
    }

    /// Statuses reachable from the current one, for action buttons.
    pub fn next_statuses(&self) -> Vec<ClaimStatus> {
        ClaimStatus::ALL
            .iter()
            .copied()
            .filter(|s| self.can_transition_to(*s))
            .collect()
    }

    pub fn is_open(&self) -> bool {
        matches!(
            self,
            ClaimStatus::Submitted | ClaimStatus::UnderReview | ClaimStatus::Approved
        )
    }
}

code_enum! {
    pub enum TaskPriority {
        Normal => ("normal", "Normal"),
        Low => ("low", "Low"),
        High => ("high", "High"),
    }
}

code_enum! {
    pub enum TaskStatus {
        Open => ("open", "Open"),
        InProgress => ("in_progress", "In progress"),
        Done => ("done", "Done"),
        Cancelled => ("cancelled", "Cancelled"),
    }
}

impl TaskStatus {
    pub fn is_closed(&self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Cancelled)
    }
}

code_enum! {
    pub enum TicketCategory {
        General => ("general", "General"),
        Policy => ("policy", "Policy"),
        Claim => ("claim", "Claim"),
        Billing => ("billing", "Billing"),
        Technical => ("technical", "Technical"),
    }
}

code_enum! {
    /// Статус обращения в поддержку
    pub enum TicketStatus {
        Open => ("open", "Open"),
        Answered => ("answered", "Answered"),
        Closed => ("closed", "Closed"),
    }
}

code_enum! {
    pub enum NotificationKind {
        System => ("system", "System"),
        PolicyIssued => ("policy_issued", "Policy issued"),
        ClaimUpdated => ("claim_updated", "Claim updated"),
        TaskAssigned => ("task_assigned", "Task assigned"),
        TaskOverdue => ("task_overdue", "Task overdue"),
        TicketReplied => ("ticket_replied", "Ticket replied"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_workflow() {
        assert_eq!(
            ClaimStatus::Submitted.next_statuses(),
            vec![ClaimStatus::UnderReview, ClaimStatus::Rejected]
        );
        assert_eq!(ClaimStatus::Approved.next_statuses(), vec![ClaimStatus::Paid]);
        assert!(ClaimStatus::Paid.next_statuses().is_empty());
        assert!(ClaimStatus::Rejected.next_statuses().is_empty());
        assert!(!ClaimStatus::Submitted.can_transition_to(ClaimStatus::Paid));
    }

    #[test]
    fn test_open_and_closed_flags() {
        assert!(ClaimStatus::UnderReview.is_open());
        assert!(!ClaimStatus::Paid.is_open());
        assert!(TaskStatus::Done.is_closed());
        assert!(!TaskStatus::InProgress.is_closed());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(TaskPriority::default(), TaskPriority::Normal);
        assert_eq!(TicketStatus::default(), TicketStatus::Open);
        assert_eq!(NotificationKind::from_code("task_overdue"), Some(NotificationKind::TaskOverdue));
    }
}
