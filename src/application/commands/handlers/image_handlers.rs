//! Image Command Handlers

use std::path::Path;
use std::sync::Arc;

use crate::application::commands::UploadImage;
use crate::application::error::ApplicationError;
use crate::application::ports::ImageStoragePort;

/// 允许上传的图片扩展名
const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// 上传图片处理器，返回存储后的文件名
pub struct UploadImageHandler {
    storage: Arc<dyn ImageStoragePort>,
    max_bytes: usize,
}

impl UploadImageHandler {
    pub fn new(storage: Arc<dyn ImageStoragePort>, max_bytes: usize) -> Self {
        Self { storage, max_bytes }
    }

    pub async fn handle(&self, cmd: UploadImage) -> Result<String, ApplicationError> {
        if cmd.data.is_empty() {
            return Err(ApplicationError::ValidationError(
                "image: file is empty".to_string(),
            ));
        }
        if cmd.data.len() > self.max_bytes {
            return Err(ApplicationError::ValidationError(format!(
                "image: file exceeds {} bytes",
                self.max_bytes
            )));
        }

        let extension = cmd
            .file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
            .ok_or_else(|| {
                ApplicationError::ValidationError(format!(
                    "image: allowed extensions are {}",
                    ALLOWED_EXTENSIONS.join(", ")
                ))
            })?;

        let file_name = self
            .storage
            .save_image(&extension, &cmd.data)
            .await
            .map_err(|e| ApplicationError::internal(e.to_string()))?;

        tracing::info!(
            user_id = cmd.user_id,
            file_name = %file_name,
            size = cmd.data.len(),
            "Image uploaded"
        );

        Ok(file_name)
    }
}
