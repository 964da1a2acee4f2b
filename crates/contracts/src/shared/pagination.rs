use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const MAX_PAGE_SIZE: usize = 500;

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

/// Параметры серверного списка: страница (с нуля), поиск, сортировка, фильтры.
///
/// Плоская структура: одинаково читается `serde_qs` на фронте и `Query` в axum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_desc: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dealer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[serde(default)]
    pub unread_only: bool,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
            sort_by: None,
            sort_desc: false,
            status: None,
            policy_type: None,
            dealer_id: None,
            customer_id: None,
            date_from: None,
            date_to: None,
            unread_only: false,
        }
    }
}

/// Offsets above this are past any real table; fits i64 on every target
const MAX_OFFSET: usize = i32::MAX as usize;

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ListQuery {
    pub fn limit(&self) -> usize {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    /// Номер страницы приходит из query string, поэтому без переполнения
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.limit()).min(MAX_OFFSET)
    }

    /// `%term%` in lower case for `LIKE ... ESCAPE '\'`, or None when search is empty.
    /// `%`, `_` and `\` in the term match literally.
    pub fn search_pattern(&self) -> Option<String> {
        non_empty(&self.search).map(|s| format!("%{}%", escape_like(&s.to_lowercase())))
    }

    pub fn status(&self) -> Option<&str> {
        non_empty(&self.status)
    }

    pub fn policy_type(&self) -> Option<&str> {
        non_empty(&self.policy_type)
    }

    pub fn dealer_id(&self) -> Option<&str> {
        non_empty(&self.dealer_id)
    }

    pub fn customer_id(&self) -> Option<&str> {
        non_empty(&self.customer_id)
    }

    pub fn date_from(&self) -> Option<&str> {
        non_empty(&self.date_from)
    }

    pub fn date_to(&self) -> Option<&str> {
        non_empty(&self.date_to)
    }

    /// Sort column restricted to `allowed`, falling back to `default`.
    /// Клиент передаёт имя поля без алиаса таблицы: `premium` для `t.premium`.
    pub fn sort_column<'a>(&self, allowed: &[&'a str], default: &'a str) -> &'a str {
        self.sort_by
            .as_deref()
            .and_then(|s| {
                allowed
                    .iter()
                    .find(|a| **a == s || a.rsplit('.').next() == Some(s))
                    .copied()
            })
            .unwrap_or(default)
    }

    pub fn sort_direction(&self) -> &'static str {
        if self.sort_desc {
            "DESC"
        } else {
            "ASC"
        }
    }
}

/// Страница результатов списка
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: usize, query: &ListQuery) -> Self {
        let page_size = query.limit();
        Self {
            items,
            total,
            page: query.page,
            page_size,
            total_pages: total_pages(total, page_size),
        }
    }

    pub fn empty(query: &ListQuery) -> Self {
        Self::new(Vec::new(), 0, query)
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            total_pages: 1,
        }
    }
}

/// An empty result still has one (empty) page.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if total == 0 || page_size == 0 {
        1
    } else {
        total.div_ceil(page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 50), 1);
        assert_eq!(total_pages(50, 50), 1);
        assert_eq!(total_pages(51, 50), 2);
        assert_eq!(total_pages(10, 0), 1);
    }

    #[test]
    fn test_limit_and_offset_are_clamped() {
        let query = ListQuery {
            page: 3,
            page_size: 10_000,
            ..Default::default()
        };
        assert_eq!(query.limit(), MAX_PAGE_SIZE);
        assert_eq!(query.offset(), 3 * MAX_PAGE_SIZE);

        let query = ListQuery {
            page_size: 0,
            ..Default::default()
        };
        assert_eq!(query.limit(), 1);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let query: ListQuery =
            serde_json::from_str(r#"{"page":18446744073709551615,"page_size":50}"#).unwrap();
        assert_eq!(query.offset(), MAX_OFFSET);
        assert!(i64::try_from(query.offset()).is_ok());
    }

    #[test]
    fn test_search_pattern_escapes_wildcards() {
        let query = ListQuery {
            search: Some("50%_A\\b".into()),
            ..Default::default()
        };
        assert_eq!(query.search_pattern().as_deref(), Some("%50\\%\\_a\\\\b%"));
    }

    #[test]
    fn test_blank_filters_are_ignored() {
        let query = ListQuery {
            search: Some("  ".into()),
            status: Some("".into()),
            dealer_id: Some(" d1 ".into()),
            ..Default::default()
        };
        assert_eq!(query.search_pattern(), None);
        assert_eq!(query.status(), None);
        assert_eq!(query.dealer_id(), Some("d1"));

        let query = ListQuery {
            search: Some("AbC".into()),
            ..Default::default()
        };
        assert_eq!(query.search_pattern().as_deref(), Some("%abc%"));
    }

    #[test]
    fn test_sort_column_whitelist() {
        let query = ListQuery {
            sort_by: Some("premium; DROP TABLE x".into()),
            sort_desc: true,
            ..Default::default()
        };
        assert_eq!(query.sort_column(&["premium", "code"], "code"), "code");
        assert_eq!(query.sort_direction(), "DESC");

        let query = ListQuery {
            sort_by: Some("premium".into()),
            ..Default::default()
        };
        assert_eq!(query.sort_column(&["premium", "code"], "code"), "premium");
        assert_eq!(query.sort_column(&["t.code", "t.premium"], "t.code"), "t.premium");
    }

    #[test]
    fn test_page_new() {
        let query = ListQuery {
            page: 1,
            page_size: 2,
            ..Default::default()
        };
        let page = Page::new(vec![1, 2], 5, &query);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 2);
    }

    #[test]
    fn test_query_deserializes_with_defaults() {
        let query: ListQuery = serde_json::from_str(r#"{"search":"x"}"#).unwrap();
        assert_eq!(query.page, 0);
        assert_eq!(query.page_size, DEFAULT_PAGE_SIZE);
        assert!(!query.sort_desc);
    }
}
