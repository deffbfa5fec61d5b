//! HTTP Middleware
//!
//! 访问失败日志：按路由模板记录 4xx/5xx 与耗时

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use super::auth::{cookie_value, ACCESS_TOKEN_COOKIE};

/// 失败请求日志中间件
///
/// 4xx 记 warn，5xx 记 error；`route` 取路由模板（如 `/articles/:id`），
/// 不记录查询串。500 的内部细节由 `ApiError::into_response` 另行记录
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let route = route_label(&request);
    let has_session = cookie_value(request.headers(), ACCESS_TOKEN_COOKIE).is_some();

    let response = next.run(request).await;
    let status = response.status();
    let latency_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            route = %route,
            status = status.as_u16(),
            latency_ms,
            "Request failed"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            route = %route,
            status = status.as_u16(),
            latency_ms,
            auth = auth_hint(status, has_session).unwrap_or("-"),
            "Request rejected"
        );
    }

    response
}

/// 已匹配的路由模板；未匹配（fallback、静态文件）时退回请求路径
fn route_label(request: &Request) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

/// 401/403 的会话状态：带着过期令牌的 401 提示客户端应先刷新
fn auth_hint(status: StatusCode, has_session: bool) -> Option<&'static str> {
    match (status, has_session) {
        (StatusCode::UNAUTHORIZED, true) => Some("stale-session"),
        (StatusCode::UNAUTHORIZED, false) => Some("no-session"),
        (StatusCode::FORBIDDEN, _) => Some("not-owner"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http::ApiError;
    use axum::{
        body::Body,
        http::{header, Request as HttpRequest},
        routing::get,
        Router,
    };
    use tower::util::ServiceExt;

    async fn listed() -> &'static str {
        "[]"
    }

    async fn forbidden() -> Result<(), ApiError> {
        Err(ApiError::Forbidden("Should be the owner of the article".into()))
    }

    async fn broken() -> Result<(), ApiError> {
        Err(ApiError::Persistence("database is locked".into()))
    }

    fn router() -> Router {
        Router::new()
            .route("/articles", get(listed))
            .route("/articles/:id", get(forbidden))
            .route("/products", get(broken))
            .layer(axum::middleware::from_fn(error_logging_middleware))
    }

    async fn status_of(uri: &str) -> StatusCode {
        let request = HttpRequest::builder()
            .uri(uri)
            .header(header::COOKIE, "access-token=expired")
            .body(Body::empty())
            .unwrap();
        router().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_passes_responses_through_unchanged() {
        assert_eq!(status_of("/articles?keyword=lamp").await, StatusCode::OK);
        assert_eq!(status_of("/articles/1").await, StatusCode::FORBIDDEN);
        assert_eq!(status_of("/products").await, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_of("/nowhere").await, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_route_label_drops_query_string() {
        let request = HttpRequest::builder()
            .uri("/articles?keyword=secret")
            .body(Body::empty())
            .unwrap();
        assert_eq!(route_label(&request), "/articles");
    }

    #[test]
    fn test_auth_hint_separates_stale_and_missing_sessions() {
        assert_eq!(auth_hint(StatusCode::UNAUTHORIZED, true), Some("stale-session"));
        assert_eq!(auth_hint(StatusCode::UNAUTHORIZED, false), Some("no-session"));
        assert_eq!(auth_hint(StatusCode::FORBIDDEN, true), Some("not-owner"));
        assert_eq!(auth_hint(StatusCode::NOT_FOUND, true), None);
    }
}
