use axum::{body::Body, extract::Request, http::HeaderMap, middleware::Next, response::Response};
use contracts::system::auth::TokenClaims;

use crate::shared::error::AppError;

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Claims of a valid token, if the request carries one
pub async fn optional_claims(headers: &HeaderMap) -> Option<TokenClaims> {
    let token = bearer_token(headers)?;
    super::jwt::validate_token(token).await.ok()
}

/// Пропускает запрос дальше только с действующим access token;
/// иначе 401 с JSON-телом, по которому фронтенд делает refresh.
pub async fn require_auth(mut req: Request<Body>, next: Next) -> Result<Response, AppError> {
    let token = bearer_token(req.headers()).ok_or(AppError::Unauthorized)?;

    let claims = super::jwt::validate_token(token).await.map_err(|e| {
        tracing::debug!("Rejected access token: {}", e);
        AppError::Unauthorized
    })?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);
        headers.insert("Authorization", HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);
        headers.insert("Authorization", HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }
}
