//! Состояние серверного списка: запрос (страница, поиск, сортировка,
//! фильтры) + последняя загруженная страница.
//!
//! `ListState` чистый и тестируется без браузера; `ListController`
//! связывает его с сигналом и функцией загрузки.

use contracts::shared::pagination::{ListQuery, Page};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub const PAGE_SIZE_OPTIONS: [usize; 4] = [25, 50, 100, 200];

#[derive(Clone, Debug, PartialEq)]
pub struct ListState<T> {
    pub query: ListQuery,
    pub items: Vec<T>,
    pub total: usize,
    pub total_pages: usize,
    pub loading: bool,
    pub loaded: bool,
    pub error: Option<String>,
    /// Номер последнего запроса; ответы старых запросов отбрасываются
    pub request_seq: u64,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self::new(ListQuery::default())
    }
}

impl<T> ListState<T> {
    pub fn new(query: ListQuery) -> Self {
        Self {
            query,
            items: Vec::new(),
            total: 0,
            total_pages: 1,
            loading: false,
            loaded: false,
            error: None,
            request_seq: 0,
        }
    }

    /// Marks a new request as in flight and returns its sequence number.
    pub fn begin(&mut self) -> u64 {
        self.request_seq += 1;
        self.loading = true;
        self.error = None;
        self.request_seq
    }

    /// Returns false when the response belongs to an outdated request.
    pub fn apply_page(&mut self, seq: u64, page: Page<T>) -> bool {
        if seq != self.request_seq {
            return false;
        }
        self.items = page.items;
        self.total = page.total;
        self.total_pages = page.total_pages.max(1);
        self.query.page = page.page;
        self.loading = false;
        self.loaded = true;
        self.error = None;
        true
    }

    /// Ошибка не затирает ранее загруженные строки
    pub fn fail(&mut self, seq: u64, error: String) -> bool {
        if seq != self.request_seq {
            return false;
        }
        self.loading = false;
        self.loaded = true;
        self.error = Some(error);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.loaded && !self.loading && self.error.is_none() && self.items.is_empty()
    }

    pub fn set_search(&mut self, text: &str) {
        let trimmed = text.trim();
        self.query.search = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self.query.page = 0;
    }

    pub fn update_filters(&mut self, f: impl FnOnce(&mut ListQuery)) {
        f(&mut self.query);
        self.query.page = 0;
    }

    /// Same column flips the direction, a new column starts ascending.
    pub fn toggle_sort(&mut self, field: &str) {
        if self.query.sort_by.as_deref() == Some(field) {
            self.query.sort_desc = !self.query.sort_desc;
        } else {
            self.query.sort_by = Some(field.to_string());
            self.query.sort_desc = false;
        }
        self.query.page = 0;
    }

    pub fn sort_indicator(&self, field: &str) -> &'static str {
        match (self.query.sort_by.as_deref() == Some(field), self.query.sort_desc) {
            (true, false) => " ▲",
            (true, true) => " ▼",
            _ => "",
        }
    }

    pub fn go_to(&mut self, page: usize) {
        self.query.page = page.min(self.total_pages.saturating_sub(1));
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.query.page_size = size.max(1);
        self.query.page = 0;
    }
}

pub type LocalBoxFuture<T> = Pin<Box<dyn Future<Output = T>>>;
type Fetcher<T> = Arc<dyn Fn(ListQuery) -> LocalBoxFuture<Result<Page<T>, String>> + Send + Sync>;

/// Реактивная обёртка над `ListState` с функцией загрузки страницы.
pub struct ListController<T: Send + Sync + 'static> {
    pub state: RwSignal<ListState<T>>,
    fetch: StoredValue<Fetcher<T>>,
}

impl<T: Send + Sync + 'static> Clone for ListController<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for ListController<T> {}

impl<T: Clone + Send + Sync + 'static> ListController<T> {
    pub fn new<F>(query: ListQuery, fetch: F) -> Self
    where
        F: Fn(ListQuery) -> LocalBoxFuture<Result<Page<T>, String>> + Send + Sync + 'static,
    {
        Self {
            state: RwSignal::new(ListState::new(query)),
            fetch: StoredValue::new(Arc::new(fetch)),
        }
    }

    pub fn reload(&self) {
        let state = self.state;
        let mut seq = 0;
        state.update(|s| seq = s.begin());
        let query = state.with_untracked(|s| s.query.clone());
        let Some(fetch) = self.fetch.try_get_value() else {
            return;
        };

        spawn_local(async move {
            let result = fetch(query).await;
            let _ = state.try_update(|s| match result {
                Ok(page) => {
                    s.apply_page(seq, page);
                }
                Err(e) => {
                    s.fail(seq, e);
                }
            });
        });
    }

    pub fn set_search(&self, text: String) {
        self.state.update(|s| s.set_search(&text));
        self.reload();
    }

    pub fn update_filters(&self, f: impl FnOnce(&mut ListQuery)) {
        self.state.update(|s| s.update_filters(f));
        self.reload();
    }

    pub fn toggle_sort(&self, field: &str) {
        self.state.update(|s| s.toggle_sort(field));
        self.reload();
    }

    pub fn go_to(&self, page: usize) {
        self.state.update(|s| s.go_to(page));
        self.reload();
    }

    pub fn set_page_size(&self, size: usize) {
        self.state.update(|s| s.set_page_size(size));
        self.reload();
    }

    /// Текущие фильтры и сортировка (для выгрузки)
    pub fn query(&self) -> ListQuery {
        self.state.with_untracked(|s| s.query.clone())
    }

    pub fn items(&self) -> Vec<T> {
        self.state.with(|s| s.items.clone())
    }

    pub fn page(&self) -> Signal<usize> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.query.page))
    }

    pub fn total_pages(&self) -> Signal<usize> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.total_pages))
    }

    pub fn total(&self) -> Signal<usize> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.total))
    }

    pub fn page_size(&self) -> Signal<usize> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.query.page_size))
    }

    pub fn loading(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.loading))
    }

    pub fn error(&self) -> Signal<Option<String>> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.error.clone()))
    }

    pub fn empty(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.is_empty()))
    }

    pub fn sort_indicator(&self, field: &'static str) -> Signal<&'static str> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.sort_indicator(field)))
    }

    /// Обработчик клика по заголовку колонки
    pub fn sort_by(&self, field: &'static str) -> Callback<()> {
        let list = *self;
        Callback::new(move |_| list.toggle_sort(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(items: Vec<u32>, total: usize, page: usize, page_size: usize) -> Page<u32> {
        let query = ListQuery {
            page,
            page_size,
            ..Default::default()
        };
        Page::new(items, total, &query)
    }

    #[test]
    fn test_apply_page() {
        let mut state: ListState<u32> = ListState::default();
        let seq = state.begin();
        assert!(state.loading);
        assert!(state.apply_page(seq, page(vec![1, 2], 12, 1, 2)));
        assert_eq!(state.items, vec![1, 2]);
        assert_eq!(state.total, 12);
        assert_eq!(state.total_pages, 6);
        assert_eq!(state.query.page, 1);
        assert!(!state.loading);
        assert!(!state.is_empty());
    }

    #[test]
    fn test_outdated_response_is_ignored() {
        let mut state: ListState<u32> = ListState::default();
        let first = state.begin();
        let second = state.begin();
        assert!(!state.apply_page(first, page(vec![9], 1, 0, 50)));
        assert!(state.items.is_empty());
        assert!(state.loading);
        assert!(state.apply_page(second, page(vec![], 0, 0, 50)));
        assert!(state.is_empty());
    }

    #[test]
    fn test_failure_keeps_rows() {
        let mut state: ListState<u32> = ListState::default();
        let seq = state.begin();
        state.apply_page(seq, page(vec![1], 1, 0, 50));
        let seq = state.begin();
        assert!(state.fail(seq, "boom".into()));
        assert_eq!(state.items, vec![1]);
        assert_eq!(state.error.as_deref(), Some("boom"));
        assert!(!state.is_empty());
    }

    #[test]
    fn test_search_and_filters_reset_page() {
        let mut state: ListState<u32> = ListState::default();
        state.query.page = 3;
        state.set_search("  ali ");
        assert_eq!(state.query.search.as_deref(), Some("ali"));
        assert_eq!(state.query.page, 0);

        state.set_search("   ");
        assert_eq!(state.query.search, None);

        state.query.page = 2;
        state.update_filters(|q| q.status = Some("active".into()));
        assert_eq!(state.query.status.as_deref(), Some("active"));
        assert_eq!(state.query.page, 0);
    }

    #[test]
    fn test_toggle_sort() {
        let mut state: ListState<u32> = ListState::default();
        state.toggle_sort("premium");
        assert_eq!(state.query.sort_by.as_deref(), Some("premium"));
        assert!(!state.query.sort_desc);
        assert_eq!(state.sort_indicator("premium"), " ▲");
        state.toggle_sort("premium");
        assert!(state.query.sort_desc);
        assert_eq!(state.sort_indicator("premium"), " ▼");
        state.toggle_sort("code");
        assert!(!state.query.sort_desc);
        assert_eq!(state.sort_indicator("premium"), "");
    }

    #[test]
    fn test_go_to_clamps() {
        let mut state: ListState<u32> = ListState::default();
        state.total_pages = 3;
        state.go_to(10);
        assert_eq!(state.query.page, 2);
        state.set_page_size(0);
        assert_eq!(state.query.page_size, 1);
        assert_eq!(state.query.page, 0);
    }
}
