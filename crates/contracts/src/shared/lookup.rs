use serde::{Deserialize, Serialize};

/// Элемент выпадающего списка для ссылочного поля
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupItem {
    pub id: String,
    pub code: String,
    pub name: String,
}

impl LookupItem {
    /// `CODE - Name`, или только имя если кода нет
    pub fn label(&self) -> String {
        if self.code.is_empty() {
            self.name.clone()
        } else {
            format!("{} - {}", self.code, self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label() {
        let item = LookupItem {
            id: "1".into(),
            code: "DLR-000001".into(),
            name: "Anka".into(),
        };
        assert_eq!(item.label(), "DLR-000001 - Anka");
        let bare = LookupItem { code: String::new(), ..item };
        assert_eq!(bare.label(), "Anka");
    }
}
