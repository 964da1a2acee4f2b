use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::{uuid_aggregate_id, AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use crate::enums::{TaskPriority, TaskStatus};
use crate::shared::validation::{is_blank, parse_date, FieldErrors};

uuid_aggregate_id!(TaskId);

/// Рабочая задача сотрудника или дилера
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(flatten)]
    pub base: BaseAggregate<TaskId>,

    pub details: Option<String>,
    pub assignee_user_id: String,
    pub dealer_id: Option<String>,
    pub due_date: NaiveDate,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub created_by: String,
    /// Уведомление о просрочке уже отправлено
    pub overdue_notified: bool,
}

impl Task {
    pub fn new_for_insert(code: String, dto: &TaskDto, created_by: String) -> Self {
        let base = BaseAggregate::new(TaskId::new_v4(), code, String::new());
        let mut task = Self {
            base,
            details: None,
            assignee_user_id: String::new(),
            dealer_id: None,
            due_date: NaiveDate::MIN,
            priority: TaskPriority::default(),
            status: TaskStatus::Open,
            created_by,
            overdue_notified: false,
        };
        task.update(dto);
        task
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Returns true when the assignee changed.
    pub fn update(&mut self, dto: &TaskDto) -> bool {
        let assignee = dto.assignee_user_id.trim().to_string();
        let reassigned = assignee != self.assignee_user_id;
        self.base.description = dto.title.trim().to_string();
        self.details = dto.details.clone().filter(|d| !is_blank(d));
        self.assignee_user_id = assignee;
        self.dealer_id = dto.dealer_id.clone().filter(|d| !is_blank(d));
        let due_date = parse_date(&dto.due_date).unwrap_or(NaiveDate::MIN);
        if due_date != self.due_date {
            self.overdue_notified = false;
        }
        self.due_date = due_date;
        self.priority = dto.priority;
        if let Some(status) = dto.status {
            self.status = status;
        }
        reassigned
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        self.to_dto().validate()
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.status.is_closed() && self.due_date < today
    }

    /// Просроченная задача, о которой ещё не напоминали
    pub fn needs_overdue_notice(&self, today: NaiveDate) -> bool {
        self.is_overdue(today) && !self.overdue_notified
    }

    pub fn to_dto(&self) -> TaskDto {
        TaskDto {
            id: Some(self.to_string_id()),
            title: self.base.description.clone(),
            details: self.details.clone(),
            assignee_user_id: self.assignee_user_id.clone(),
            dealer_id: self.dealer_id.clone(),
            due_date: self.due_date.format("%Y-%m-%d").to_string(),
            priority: self.priority,
            status: Some(self.status),
        }
    }
}

impl AggregateRoot for Task {
    type Id = TaskId;

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
        "a008_task"
    }

    fn list_name() -> &'static str {
        "Tasks"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDto {
    pub id: Option<String>,
    pub title: String,
    pub details: Option<String>,
    pub assignee_user_id: String,
    pub dealer_id: Option<String>,
    pub due_date: String,
    pub priority: TaskPriority,
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

impl TaskDto {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("title", &self.title, "Title");
        if self.title.chars().count() > 200 {
            errors.add("title", "Title must be at most 200 characters");
        }
        errors.require("assignee_user_id", &self.assignee_user_id, "Assignee");
        errors.date("due_date", &self.due_date, "Due date");
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatusDto {
    pub status: TaskStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto() -> TaskDto {
        TaskDto {
            title: "Call customer about renewal".into(),
            assignee_user_id: "u1".into(),
            due_date: "2024-05-10".into(),
            ..Default::default()
        }
    }

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_overdue_only_when_open() {
        let mut task = Task::new_for_insert("TSK-000001".into(), &dto(), "admin".into());
        assert!(!task.is_overdue(date("2024-05-10")));
        assert!(task.is_overdue(date("2024-05-11")));
        assert!(task.needs_overdue_notice(date("2024-05-11")));
        task.overdue_notified = true;
        assert!(!task.needs_overdue_notice(date("2024-05-11")));
        task.status = TaskStatus::Done;
        assert!(!task.is_overdue(date("2024-06-01")));
    }

    #[test]
    fn test_update_reports_reassignment_and_resets_notice() {
        let mut task = Task::new_for_insert("TSK-000001".into(), &dto(), "admin".into());
        task.overdue_notified = true;
        let mut d = task.to_dto();
        assert!(!task.update(&d));
        assert!(task.overdue_notified);

        d.assignee_user_id = "u2".into();
        d.due_date = "2024-06-01".into();
        assert!(task.update(&d));
        assert!(!task.overdue_notified);
    }

    #[test]
    fn test_validation() {
        let mut d = dto();
        d.title = " ".into();
        d.due_date = "tomorrow".into();
        let errors = d.validate().unwrap_err();
        assert!(errors.get("title").is_some());
        assert!(errors.get("due_date").is_some());
    }
}
