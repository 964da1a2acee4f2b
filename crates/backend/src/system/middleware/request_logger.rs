use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::shared::format::format_bytes;

/// Ответы больше этого размера не буферизуются, размер берётся из заголовка
const MAX_BUFFERED_BODY: usize = 16 * 1024 * 1024;

/// Журнал запросов: метод, путь, статус, размер ответа, длительность.
/// Ответы с ошибкой пишутся уровнем warn/error.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();
    let status = parts.status;

    let bytes = match to_bytes(body, MAX_BUFFERED_BODY).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(
                status = status.as_u16(),
                duration_ms = start.elapsed().as_millis() as u64,
                "{} {} response body not readable: {}",
                method,
                path,
                e
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    let duration_ms = start.elapsed().as_millis() as u64;
    let size = format_bytes(bytes.len());
    let code = status.as_u16();
    if status.is_server_error() {
        tracing::error!(status = code, duration_ms, size = %size, "{} {}", method, path);
    } else if status.is_client_error() {
        tracing::warn!(status = code, duration_ms, size = %size, "{} {}", method, path);
    } else {
        tracing::debug!(status = code, duration_ms, size = %size, "{} {}", method, path);
    }

    Response::from_parts(parts, Body::from(bytes))
}
