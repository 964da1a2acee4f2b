use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{uuid_aggregate_id, AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use crate::enums::{TaskPriority, TicketCategory, TicketStatus};
use crate::shared::validation::{is_blank, FieldErrors};

uuid_aggregate_id!(TicketId);

pub const MAX_BODY_LEN: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketMessage {
    pub author_id: String,
    pub author_name: String,
    pub is_staff: bool,
    /// Очищенный HTML
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Обращение в поддержку с перепиской
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(flatten)]
    pub base: BaseAggregate<TicketId>,

    pub category: TicketCategory,
    pub priority: TaskPriority,
    pub status: TicketStatus,
    pub created_by: String,
    pub dealer_id: Option<String>,
    pub messages: Vec<TicketMessage>,
}

impl Ticket {
    /// Subject goes to `description`; the first message is the opening body.
    pub fn open(code: String, dto: &NewTicketDto, first: TicketMessage, dealer_id: Option<String>) -> Self {
        let base = BaseAggregate::new(TicketId::new_v4(), code, dto.subject.trim().to_string());
        Self {
            base,
            category: dto.category,
            priority: dto.priority,
            status: TicketStatus::Open,
            created_by: first.author_id.clone(),
            dealer_id,
            messages: vec![first],
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn subject(&self) -> &str {
        &self.base.description
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }

    /// Читать и отвечать могут автор и сотрудники поддержки
    pub fn can_access(&self, user_id: &str, is_support: bool) -> bool {
        is_support || self.created_by == user_id
    }

    /// Ответ сотрудника переводит в `Answered`, ответ автора снова в `Open`
    pub fn reply(&mut self, message: TicketMessage) -> Result<(), String> {
        if self.status == TicketStatus::Closed {
            return Err("Ticket is closed".into());
        }
        self.status = if message.is_staff && message.author_id != self.created_by {
            TicketStatus::Answered
        } else {
            TicketStatus::Open
        };
        self.messages.push(message);
        Ok(())
    }

    pub fn close(&mut self) -> Result<(), String> {
        if self.status == TicketStatus::Closed {
            return Err("Ticket is already closed".into());
        }
        self.status = TicketStatus::Closed;
        Ok(())
    }

    pub fn last_message_at(&self) -> Option<DateTime<Utc>> {
        self.messages.last().map(|m| m.created_at)
    }
}

impl AggregateRoot for Ticket {
    type Id = TicketId;

    fn id(&self) -> Self::Id {
        self.base.id
    }

    fn code(&self) -> &str {
        &self.base.code
    }

    fn description(&self) -> &str {
        &self.base.description
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn table_name() -> &'static str {
        "a009_ticket"
    }

    fn list_name() -> &'static str {
        "Tickets"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewTicketDto {
    pub subject: String,
    pub category: TicketCategory,
    pub priority: TaskPriority,
    pub body: String,
}

impl NewTicketDto {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("subject", &self.subject, "Subject");
        if self.subject.chars().count() > 200 {
            errors.add("subject", "Subject must be at most 200 characters");
        }
        validate_body(&mut errors, &self.body);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketReplyDto {
    pub body: String,
}

impl TicketReplyDto {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        validate_body(&mut errors, &self.body);
        errors.into_result()
    }
}

fn validate_body(errors: &mut FieldErrors, body: &str) {
    if is_blank(body) {
        errors.add("body", "Message is required");
    } else if body.chars().count() > MAX_BODY_LEN {
        errors.add("body", format!("Message must be at most {} characters", MAX_BODY_LEN));
    }
}

/// Строка списка обращений (без переписки)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketListItem {
    pub id: String,
    pub code: String,
    pub subject: String,
    pub category: TicketCategory,
    pub priority: TaskPriority,
    pub status: TicketStatus,
    pub created_by: String,
    pub created_by_name: String,
    pub messages: i64,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(author: &str, is_staff: bool) -> TicketMessage {
        TicketMessage {
            author_id: author.into(),
            author_name: author.into(),
            is_staff,
            body: "<p>hello</p>".into(),
            created_at: Utc::now(),
        }
    }

    fn ticket() -> Ticket {
        let dto = NewTicketDto {
            subject: "Cannot download policy PDF".into(),
            body: "hello".into(),
            ..Default::default()
        };
        Ticket::open("TCK-000001".into(), &dto, message("u1", false), None)
    }

    #[test]
    fn test_reply_status_flow() {
        let mut t = ticket();
        assert_eq!(t.status, TicketStatus::Open);
        t.reply(message("admin", true)).unwrap();
        assert_eq!(t.status, TicketStatus::Answered);
        t.reply(message("u1", false)).unwrap();
        assert_eq!(t.status, TicketStatus::Open);
        assert_eq!(t.messages.len(), 3);
    }

    #[test]
    fn test_closed_ticket_rejects_replies() {
        let mut t = ticket();
        t.close().unwrap();
        assert!(t.reply(message("admin", true)).is_err());
        assert!(t.close().is_err());
        assert_eq!(t.messages.len(), 1);
    }

    #[test]
    fn test_access_and_validation() {
        let t = ticket();
        assert!(t.can_access("u1", false));
        assert!(!t.can_access("u2", false));
        assert!(t.can_access("u2", true));

        let long = TicketReplyDto {
            body: "x".repeat(MAX_BODY_LEN + 1),
        };
        assert!(long.validate().is_err());
        assert!(TicketReplyDto::default().validate().is_err());
        assert_eq!(t.subject(), "Cannot download policy PDF");
    }
}
