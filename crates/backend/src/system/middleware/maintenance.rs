use axum::{body::Body, extract::Request, http::Method, middleware::Next, response::IntoResponse, response::Response};

use crate::shared::error::AppError;
use crate::system::auth::middleware::optional_claims;
use crate::system::maintenance;

/// Запросы, которые режим обслуживания блокирует: изменения данных через API,
/// кроме входа и выхода
pub fn is_guarded(method: &Method, path: &str) -> bool {
    let mutating = matches!(*method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE);
    mutating && path.starts_with("/api/") && !path.starts_with("/api/system/auth/")
}

pub async fn maintenance_guard(req: Request<Body>, next: Next) -> Response {
    if is_guarded(req.method(), req.uri().path()) {
        let state = maintenance::current();
        if state.enabled {
            let role = optional_claims(req.headers()).await.map(|c| c.role);
            if state.blocks_writes_for(role) {
                return AppError::Unavailable(state.banner_text()).into_response();
            }
        }
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guarded_requests() {
        assert!(is_guarded(&Method::POST, "/api/policy"));
        assert!(is_guarded(&Method::DELETE, "/api/customer/1"));
        assert!(is_guarded(&Method::PUT, "/api/system/maintenance"));
        assert!(!is_guarded(&Method::GET, "/api/policy"));
        assert!(!is_guarded(&Method::POST, "/api/system/auth/login"));
        assert!(!is_guarded(&Method::POST, "/api/system/auth/logout"));
        assert!(!is_guarded(&Method::POST, "/assets/app.js"));
    }
}
