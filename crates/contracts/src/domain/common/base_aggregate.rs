use super::EntityMetadata;
use serde::{Deserialize, Serialize};

/// Поля, общие для всех записей; в JSON разворачиваются на верхний уровень
/// через `#[serde(flatten)]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseAggregate<Id> {
    pub id: Id,
    pub code: String,
    /// Наименование: имя дилера, ФИО клиента, заголовок задачи
    pub description: String,
    pub comment: Option<String>,
    pub metadata: EntityMetadata,
}

impl<Id> BaseAggregate<Id> {
    pub fn new(id: Id, code: String, description: String) -> Self {
        Self {
            id,
            code,
            description,
            comment: None,
            metadata: EntityMetadata::new(),
        }
    }

    /// Запись, прочитанная из БД
    pub fn with_metadata(
        id: Id,
        code: String,
        description: String,
        comment: Option<String>,
        metadata: EntityMetadata,
    ) -> Self {
        Self {
            id,
            code,
            description,
            comment,
            metadata,
        }
    }

    /// Код из формы заменяет текущий, только если он не пустой
    pub fn set_code_from(&mut self, code: Option<&str>) {
        if let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) {
            self.code = code.to_string();
        }
    }

    /// Пустой комментарий хранится как NULL
    pub fn set_comment(&mut self, comment: Option<&str>) {
        self.comment = comment
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
    }

    pub fn touch(&mut self) {
        self.metadata.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_and_comment_normalised() {
        let mut base = BaseAggregate::new(1u32, "DLR-0001".to_string(), "Anka".to_string());
        base.set_code_from(Some("  "));
        assert_eq!(base.code, "DLR-0001");
        base.set_code_from(Some(" DLR-0042 "));
        assert_eq!(base.code, "DLR-0042");

        base.set_comment(Some("   "));
        assert_eq!(base.comment, None);
        base.set_comment(Some(" call first "));
        assert_eq!(base.comment.as_deref(), Some("call first"));
    }
}
