//! 校验型提取器
//!
//! 在 axum 自带提取器之上追加 [`Validate`] 校验，所有拒绝统一转为 400

use axum::{
    async_trait,
    extract::{
        rejection::JsonRejection, FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::domain::Validate;

/// 经过校验的 JSON 请求体
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| match rejection {
                JsonRejection::JsonSyntaxError(_) => ApiError::BadRequest("Invalid JSON".into()),
                other => ApiError::validation(other.body_text()),
            })?;

        value
            .validate()
            .map_err(|e| ApiError::validation(e.to_string()))?;

        Ok(ValidJson(value))
    }
}

/// 经过校验的查询参数
#[derive(Debug)]
pub struct ValidQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::validation(rejection.body_text()))?;

        value
            .validate()
            .map_err(|e| ApiError::validation(e.to_string()))?;

        Ok(ValidQuery(value))
    }
}

/// 路径中的正整数 id
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let invalid = || ApiError::validation("id: must be a positive integer");

        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|_| invalid())?;

        if id < 1 {
            return Err(invalid());
        }
        Ok(IdPath(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{validation, ValidationError};
    use axum::{
        body::Body,
        http::{header, Request as HttpRequest, StatusCode},
        response::IntoResponse,
        routing::{get, post},
        Router,
    };
    use serde::Deserialize;
    use tower::util::ServiceExt;

    #[derive(Deserialize)]
    struct Named {
        name: String,
    }

    impl Validate for Named {
        fn validate(&self) -> Result<(), ValidationError> {
            validation::text("name", &self.name, 5)
        }
    }

    async fn echo_body(ValidJson(body): ValidJson<Named>) -> String {
        body.name
    }

    async fn echo_query(ValidQuery(query): ValidQuery<Named>) -> String {
        query.name
    }

    async fn echo_id(IdPath(id): IdPath) -> impl IntoResponse {
        id.to_string()
    }

    fn router() -> Router {
        Router::new()
            .route("/body", post(echo_body))
            .route("/query", get(echo_query))
            .route("/items/:id", get(echo_id))
    }

    async fn send(request: HttpRequest<Body>) -> (StatusCode, String) {
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn json_post(body: &'static str) -> HttpRequest<Body> {
        HttpRequest::builder()
            .method("POST")
            .uri("/body")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        let (status, body) = send(json_post(r#"{"name":"ok"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let (status, body) = send(json_post(r#"{"name":"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, r#"{"message":"Invalid JSON"}"#);
    }

    #[tokio::test]
    async fn test_schema_and_rule_violations() {
        let (status, _) = send(json_post(r#"{"title":"x"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(json_post(r#"{"name":"too long"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("name: must be at most 5 characters"));
    }

    #[tokio::test]
    async fn test_query_and_path() {
        let request = HttpRequest::builder()
            .uri("/query?name=abc")
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(request).await, (StatusCode::OK, "abc".to_string()));

        let request = HttpRequest::builder()
            .uri("/items/abc")
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(request).await.0, StatusCode::BAD_REQUEST);

        let request = HttpRequest::builder()
            .uri("/items/0")
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(request).await.0, StatusCode::BAD_REQUEST);

        let request = HttpRequest::builder()
            .uri("/items/12")
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(request).await, (StatusCode::OK, "12".to_string()));
    }
}
