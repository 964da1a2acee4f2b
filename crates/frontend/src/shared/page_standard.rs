//! Категории страниц внутри табов.
//!
//! Корневой элемент страницы получает `id = "{page_key}--{category}"` и
//! `data-page-category`, по id страницу легко найти в DOM-инспекторе.

pub const PAGE_CAT_LIST: &str = "list";
pub const PAGE_CAT_DETAIL: &str = "detail";
pub const PAGE_CAT_DASHBOARD: &str = "dashboard";
pub const PAGE_CAT_SYSTEM: &str = "system";

/// CSS class of the page root for a category.
pub fn page_class(category: &str) -> &'static str {
    match category {
        PAGE_CAT_DETAIL => "page page--detail",
        PAGE_CAT_DASHBOARD => "page page--dashboard",
        _ => "page",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_class() {
        assert_eq!(page_class(PAGE_CAT_LIST), "page");
        assert_eq!(page_class(PAGE_CAT_SYSTEM), "page");
        assert_eq!(page_class(PAGE_CAT_DASHBOARD), "page page--dashboard");
        assert_eq!(page_class(PAGE_CAT_DETAIL), "page page--detail");
    }
}
