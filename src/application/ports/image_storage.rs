//! Image Storage Port - 出站端口
//!
//! 上传图片的持久化抽象，具体实现见 infrastructure/adapters/storage

use async_trait::async_trait;
use thiserror::Error;

/// 图片存储错误
#[derive(Debug, Error)]
pub enum ImageStorageError {
    #[error("IO error: {0}")]
    IoError(String),
}

/// Image Storage Port
#[async_trait]
pub trait ImageStoragePort: Send + Sync {
    /// 保存图片，返回生成的文件名（不含目录）
    async fn save_image(&self, extension: &str, data: &[u8]) -> Result<String, ImageStorageError>;
}
