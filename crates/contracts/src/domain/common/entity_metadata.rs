use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Служебные поля каждой записи
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMetadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Мягкое удаление: строка остаётся для ссылок из полисов и убытков
    pub is_deleted: bool,
    /// 0 у новой записи, +1 на каждое обновление
    pub version: i32,
}

impl EntityMetadata {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            is_deleted: false,
            version: 0,
        }
    }

    /// Из колонок таблицы. Пустые даты (строки, вставленные миграцией)
    /// заменяются на `updated_at`, а если нет и её, на текущий момент.
    pub fn restore(
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
        is_deleted: bool,
        version: i32,
    ) -> Self {
        let updated_at = updated_at.or(created_at).unwrap_or_else(Utc::now);
        Self {
            created_at: created_at.unwrap_or(updated_at),
            updated_at,
            is_deleted,
            version,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn increment_version(&mut self) {
        self.version += 1;
    }
}

impl Default for EntityMetadata {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_restore_fills_missing_dates() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let m = EntityMetadata::restore(None, Some(at), false, 3);
        assert_eq!(m.created_at, at);
        assert_eq!(m.updated_at, at);
        assert_eq!(m.version, 3);

        let m = EntityMetadata::restore(Some(at), None, true, 0);
        assert_eq!(m.updated_at, at);
        assert!(m.is_deleted);
    }

    #[test]
    fn test_new_record() {
        let mut m = EntityMetadata::new();
        assert_eq!(m.version, 0);
        assert!(!m.is_deleted);
        m.increment_version();
        assert_eq!(m.version, 1);
    }
}
