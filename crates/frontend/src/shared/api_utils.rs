//! HTTP-слой фронтенда: построение URL, Bearer-токен, повтор после refresh.
//!
//! Все функции возвращают `Result<T, String>`; текст ошибки берётся из поля
//! `error` тела ответа, иначе `"<status> <status text>"`.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::system::auth::{api as auth_api, storage};

/// Base URL of the backend: same host as the page, port 3000.
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// `path?query` через serde_qs; пустой query не добавляет `?`
pub fn with_query<Q: Serialize>(path: &str, query: &Q) -> Result<String, String> {
    let qs = serde_qs::to_string(query).map_err(|e| format!("Failed to encode query: {}", e))?;
    if qs.is_empty() {
        Ok(path.to_string())
    } else {
        Ok(format!("{}?{}", path, qs))
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct IdResponse {
    id: String,
}

/// Error text for a failed response.
pub fn error_message(status: u16, status_text: &str, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.error.trim().is_empty() => parsed.error,
        _ => format!("{} {}", status, status_text).trim().to_string(),
    }
}

#[derive(Clone, Copy)]
enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

enum Body {
    Empty,
    Json(String),
    Text(String),
}

fn builder(verb: Verb, url: &str) -> RequestBuilder {
    match verb {
        Verb::Get => Request::get(url),
        Verb::Post => Request::post(url),
        Verb::Put => Request::put(url),
        Verb::Delete => Request::delete(url),
    }
}

async fn send_once(verb: Verb, url: &str, body: &Body) -> Result<Response, String> {
    let mut req = builder(verb, url);
    if let Some(token) = storage::get_access_token() {
        req = req.header("Authorization", &format!("Bearer {}", token));
    }
    let request = match body {
        Body::Empty => req.build(),
        Body::Json(json) => req
            .header("Content-Type", "application/json")
            .body(json.clone()),
        Body::Text(text) => req
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(text.clone()),
    }
    .map_err(|e| format!("Failed to build request: {}", e))?;

    request
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))
}

/// Один раз пробуем обновить access token. Неудача = сессия закончилась.
async fn try_refresh() -> bool {
    let Some(refresh_token) = storage::get_refresh_token() else {
        return false;
    };
    match auth_api::refresh_token(refresh_token).await {
        Ok(response) => {
            storage::save_access_token(&response.access_token);
            true
        }
        Err(e) => {
            log::warn!("Token refresh failed: {}", e);
            false
        }
    }
}

fn end_session() {
    storage::clear_tokens();
    if let Some(window) = web_sys::window() {
        let _ = window.location().reload();
    }
}

async fn send(verb: Verb, path: &str, body: Body) -> Result<Response, String> {
    let url = api_url(path);
    let response = send_once(verb, &url, &body).await?;
    if response.status() != 401 || storage::get_access_token().is_none() {
        return check(response).await;
    }

    if try_refresh().await {
        let retried = send_once(verb, &url, &body).await?;
        if retried.status() != 401 {
            return check(retried).await;
        }
    }
    end_session();
    Err("Session expired, please sign in again".to_string())
}

async fn check(response: Response) -> Result<Response, String> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let status_text = response.status_text();
    let body = response.text().await.unwrap_or_default();
    Err(error_message(status, &status_text, &body))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    response
        .json::<T>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

fn encode<B: Serialize>(body: &B) -> Result<Body, String> {
    serde_json::to_string(body)
        .map(Body::Json)
        .map_err(|e| format!("Failed to serialize request: {}", e))
}

pub async fn get<T: DeserializeOwned>(path: &str) -> Result<T, String> {
    read_json(send(Verb::Get, path, Body::Empty).await?).await
}

pub async fn get_with_query<T: DeserializeOwned, Q: Serialize>(
    path: &str,
    query: &Q,
) -> Result<T, String> {
    get(&with_query(path, query)?).await
}

pub async fn get_text<Q: Serialize>(path: &str, query: &Q) -> Result<String, String> {
    send(Verb::Get, &with_query(path, query)?, Body::Empty)
        .await?
        .text()
        .await
        .map_err(|e| format!("Failed to read response: {}", e))
}

pub async fn post<T: DeserializeOwned, B: Serialize>(path: &str, body: &B) -> Result<T, String> {
    read_json(send(Verb::Post, path, encode(body)?).await?).await
}

/// POST без тела (действия вида `/:id/issue`)
pub async fn post_action<T: DeserializeOwned>(path: &str) -> Result<T, String> {
    read_json(send(Verb::Post, path, Body::Empty).await?).await
}

pub async fn post_no_content(path: &str) -> Result<(), String> {
    send(Verb::Post, path, Body::Empty).await.map(|_| ())
}

/// POST с телом, ответ без содержимого
pub async fn post_json_no_content<B: Serialize>(path: &str, body: &B) -> Result<(), String> {
    send(Verb::Post, path, encode(body)?).await.map(|_| ())
}

pub async fn post_text<T: DeserializeOwned>(path: &str, text: String) -> Result<T, String> {
    read_json(send(Verb::Post, path, Body::Text(text)).await?).await
}

pub async fn put<T: DeserializeOwned, B: Serialize>(path: &str, body: &B) -> Result<T, String> {
    read_json(send(Verb::Put, path, encode(body)?).await?).await
}

pub async fn put_no_content<B: Serialize>(path: &str, body: &B) -> Result<(), String> {
    send(Verb::Put, path, encode(body)?).await.map(|_| ())
}

pub async fn delete(path: &str) -> Result<(), String> {
    send(Verb::Delete, path, Body::Empty).await.map(|_| ())
}

/// Upsert: POST, ответ `{"id": "..."}`
pub async fn save<B: Serialize>(path: &str, body: &B) -> Result<String, String> {
    let response: IdResponse = post(path, body).await?;
    Ok(response.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::pagination::ListQuery;

    #[test]
    fn test_error_message_prefers_body() {
        assert_eq!(
            error_message(422, "Unprocessable Entity", r#"{"error":"email: invalid"}"#),
            "email: invalid"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_status() {
        assert_eq!(
            error_message(500, "Internal Server Error", "<html>oops</html>"),
            "500 Internal Server Error"
        );
        assert_eq!(error_message(404, "", r#"{"error":"  "}"#), "404");
    }

    #[test]
    fn test_with_query() {
        let query = ListQuery {
            page: 2,
            search: Some("ali".into()),
            ..Default::default()
        };
        let url = with_query("/api/customer", &query).unwrap();
        assert!(url.starts_with("/api/customer?"));
        assert!(url.contains("page=2"));
        assert!(url.contains("search=ali"));
        assert!(!url.contains("status="));
    }
}
