//! Глобальное состояние оболочки: открытые табы, активный таб, видимость
//! боковой панели. Активный таб синхронизируется с `?active=` в URL.

use contracts::system::navigation::{page_allowed, page_title};
use contracts::system::roles::Role;
use leptos::prelude::*;
use std::collections::HashMap;
use web_sys::window;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub key: String,
    pub title: String,
}

#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    pub opened: RwSignal<Vec<Tab>>,
    pub active: RwSignal<Option<String>>,
    pub left_open: RwSignal<bool>,
}

/// Таб, который станет активным после закрытия `closing`.
fn next_active(tabs: &[Tab], closing: &str, active: Option<&str>) -> Option<String> {
    if active != Some(closing) {
        return active.map(str::to_string);
    }
    let pos = tabs.iter().position(|t| t.key == closing)?;
    let remaining: Vec<&Tab> = tabs.iter().filter(|t| t.key != closing).collect();
    if remaining.is_empty() {
        return None;
    }
    // соседний слева, иначе первый
    let idx = pos.saturating_sub(1).min(remaining.len() - 1);
    Some(remaining[idx].key.clone())
}

impl AppGlobalContext {
    pub fn new() -> Self {
        Self {
            opened: RwSignal::new(vec![]),
            active: RwSignal::new(None),
            left_open: RwSignal::new(true),
        }
    }

    /// Opens the tab saved in `?active=` (when the role may see it) and keeps
    /// the URL in sync with the active tab afterwards.
    pub fn init_router_integration(&self, role: Role) {
        let search = window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let params: HashMap<String, String> =
            serde_qs::from_str(search.trim_start_matches('?')).unwrap_or_default();
        if let Some(key) = params.get("active") {
            if page_allowed(role, key) {
                self.open_page(key);
            }
        }

        let this = *self;
        Effect::new(move |_| {
            let Some(active_key) = this.active.get() else {
                return;
            };
            let query = serde_qs::to_string(&HashMap::from([("active", active_key)]))
                .unwrap_or_default();
            let new_url = format!("?{}", query);
            let current = window()
                .and_then(|w| w.location().search().ok())
                .unwrap_or_default();
            if current != new_url {
                if let Some(history) = window().and_then(|w| w.history().ok()) {
                    let _ = history.replace_state_with_url(
                        &wasm_bindgen::JsValue::NULL,
                        "",
                        Some(&new_url),
                    );
                }
            }
        });
    }

    pub fn open_tab(&self, key: &str, title: &str) {
        let exists = self
            .opened
            .with_untracked(|tabs| tabs.iter().any(|t| t.key == key));
        if !exists {
            log::debug!("open tab '{}'", key);
            self.opened.update(|tabs| {
                tabs.push(Tab {
                    key: key.to_string(),
                    title: title.to_string(),
                })
            });
        }
        self.activate_tab(key);
    }

    /// Открыть страницу по ключу навигации с заголовком из меню
    pub fn open_page(&self, key: &str) {
        self.open_tab(key, &page_title(key));
    }

    pub fn activate_tab(&self, key: &str) {
        self.active.set(Some(key.to_string()));
    }

    pub fn update_tab_title(&self, key: &str, new_title: &str) {
        self.opened.update(|tabs| {
            if let Some(tab) = tabs.iter_mut().find(|t| t.key == key) {
                tab.title = new_title.to_string();
            }
        });
    }

    pub fn close_tab(&self, key: &str) {
        let next = self.opened.with_untracked(|tabs| {
            self.active
                .with_untracked(|active| next_active(tabs, key, active.as_deref()))
        });
        self.opened.update(|tabs| tabs.retain(|t| t.key != key));
        self.active.set(next);
    }

    pub fn close_all(&self) {
        self.opened.set(Vec::new());
        self.active.set(None);
    }

    pub fn toggle_left(&self) {
        self.left_open.update(|v| *v = !*v);
    }
}

pub fn use_app_context() -> AppGlobalContext {
    use_context::<AppGlobalContext>().expect("AppGlobalContext not found")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tabs(keys: &[&str]) -> Vec<Tab> {
        keys.iter()
            .map(|k| Tab {
                key: k.to_string(),
                title: k.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_closing_inactive_tab_keeps_active() {
        let t = tabs(&["a", "b", "c"]);
        assert_eq!(next_active(&t, "a", Some("c")).as_deref(), Some("c"));
    }

    #[test]
    fn test_closing_active_tab_moves_left() {
        let t = tabs(&["a", "b", "c"]);
        assert_eq!(next_active(&t, "b", Some("b")).as_deref(), Some("a"));
        assert_eq!(next_active(&t, "a", Some("a")).as_deref(), Some("b"));
        assert_eq!(next_active(&t, "c", Some("c")).as_deref(), Some("b"));
    }

    #[test]
    fn test_closing_last_tab() {
        let t = tabs(&["a"]);
        assert_eq!(next_active(&t, "a", Some("a")), None);
    }
}
