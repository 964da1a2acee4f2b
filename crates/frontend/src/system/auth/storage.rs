//! Сессия в localStorage: пара токенов под общим префиксом.
//! Ключи `cookie_consent` и прочие настройки сюда не относятся.

use web_sys::window;

const ACCESS_TOKEN_KEY: &str = "insurance.access_token";
const REFRESH_TOKEN_KEY: &str = "insurance.refresh_token";

pub(crate) fn local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

fn read(key: &str) -> Option<String> {
    local_storage()?
        .get_item(key)
        .ok()?
        .filter(|value| !value.is_empty())
}

fn write(key: &str, value: &str) {
    match local_storage() {
        Some(storage) => {
            if storage.set_item(key, value).is_err() {
                log::warn!("localStorage refused to store {}", key);
            }
        }
        None => log::warn!("localStorage is not available, session will not survive reload"),
    }
}

pub fn get_access_token() -> Option<String> {
    read(ACCESS_TOKEN_KEY)
}

pub fn get_refresh_token() -> Option<String> {
    read(REFRESH_TOKEN_KEY)
}

/// После refresh меняется только access token
pub fn save_access_token(token: &str) {
    write(ACCESS_TOKEN_KEY, token);
}

/// После входа
pub fn save_session(access_token: &str, refresh_token: &str) {
    write(ACCESS_TOKEN_KEY, access_token);
    write(REFRESH_TOKEN_KEY, refresh_token);
}

pub fn clear_tokens() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(ACCESS_TOKEN_KEY);
        let _ = storage.remove_item(REFRESH_TOKEN_KEY);
    }
}
