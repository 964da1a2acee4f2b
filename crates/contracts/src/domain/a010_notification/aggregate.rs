use serde::{Deserialize, Serialize};

use crate::enums::NotificationKind;

/// Уведомление пользователю. Создаётся только сервисами backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    /// Ключ страницы (таба), которую открыть по клику
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: String,
}

/// Черновик уведомления до записи в БД
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub user_id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub link: Option<String>,
}

impl NewNotification {
    pub fn new(user_id: impl Into<String>, kind: NotificationKind, title: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            kind,
            title: title.into(),
            body: String::new(),
            link: None,
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCount {
    pub unread: i64,
}

impl UnreadCount {
    /// Badge text: nothing for zero, "99+" above 99.
    pub fn badge(&self) -> Option<String> {
        match self.unread {
            n if n <= 0 => None,
            n if n > 99 => Some("99+".to_string()),
            n => Some(n.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let n = NewNotification::new("u1", NotificationKind::PolicyIssued, "Policy issued")
            .body("TRF-00000001")
            .link("a006_policy_detail_p1");
        assert_eq!(n.user_id, "u1");
        assert_eq!(n.link.as_deref(), Some("a006_policy_detail_p1"));
    }

    #[test]
    fn test_badge() {
        assert_eq!(UnreadCount { unread: 0 }.badge(), None);
        assert_eq!(UnreadCount { unread: 7 }.badge().as_deref(), Some("7"));
        assert_eq!(UnreadCount { unread: 120 }.badge().as_deref(), Some("99+"));
    }
}
