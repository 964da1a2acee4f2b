//! Запросы авторизации. Идут мимо общего HTTP-слоя: им не нужен повтор после refresh.

use contracts::system::auth::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, UserInfo,
};
use gloo_net::http::{Request, Response};
use serde::Serialize;

use crate::shared::api_utils::{api_url, error_message};

async fn failure(response: Response) -> String {
    let status = response.status();
    let status_text = response.status_text();
    let body = response.text().await.unwrap_or_default();
    error_message(status, &status_text, &body)
}

async fn post_public<B: Serialize>(path: &str, body: &B) -> Result<Response, String> {
    Request::post(&api_url(path))
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))
}

pub async fn login(username: String, password: String) -> Result<LoginResponse, String> {
    let response = post_public(
        "/api/system/auth/login",
        &LoginRequest { username, password },
    )
    .await?;

    if !response.ok() {
        return Err(failure(response).await);
    }

    response
        .json::<LoginResponse>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn refresh_token(refresh_token: String) -> Result<RefreshResponse, String> {
    let response =
        post_public("/api/system/auth/refresh", &RefreshRequest { refresh_token }).await?;

    if !response.ok() {
        return Err(failure(response).await);
    }

    response
        .json::<RefreshResponse>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Revokes the refresh token on the server.
pub async fn logout(refresh_token: String) -> Result<(), String> {
    let response =
        post_public("/api/system/auth/logout", &RefreshRequest { refresh_token }).await?;

    if !response.ok() {
        return Err(failure(response).await);
    }
    Ok(())
}

pub async fn get_current_user(access_token: &str) -> Result<UserInfo, String> {
    let response = Request::get(&api_url("/api/system/auth/me"))
        .header("Authorization", &format!("Bearer {}", access_token))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(failure(response).await);
    }

    response
        .json::<UserInfo>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}
