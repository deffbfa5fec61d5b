//! Image HTTP Handlers - 图片上传
//!
//! multipart 字段 `image`，保存后返回可公开访问的 URL

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::application::UploadImage;
use crate::infrastructure::http::auth::AuthUser;
use crate::infrastructure::http::dto::ImageUploadResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

const IMAGE_FIELD: &str = "image";

/// 上传图片
pub async fn upload_image(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ImageUploadResponse>), ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::validation(e.body_text()))?;

    let mut upload: Option<(Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(format!("Failed to read file: {}", e)))?;
        upload = Some((file_name, data.to_vec()));
    }

    let (file_name, data) =
        upload.ok_or_else(|| ApiError::validation("image: file is required"))?;

    let stored = state
        .upload_image_handler
        .handle(UploadImage {
            user_id: user.id,
            file_name,
            data,
        })
        .await?;

    let url = state.config.server.public_url(&stored);
    Ok((StatusCode::CREATED, Json(ImageUploadResponse { url })))
}
