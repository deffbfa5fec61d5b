//! File Image Storage - 文件系统图片存储实现
//!
//! 实现 ImageStoragePort trait，文件直接写入静态资源目录

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::{ImageStorageError, ImageStoragePort};

/// 文件系统图片存储
pub struct FileImageStorage {
    /// 存储根目录（即静态资源目录）
    base_dir: PathBuf,
}

impl FileImageStorage {
    /// 创建新的文件存储
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self, ImageStorageError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        // 确保目录存在
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| ImageStorageError::IoError(e.to_string()))?;

        Ok(Self { base_dir })
    }

    /// 获取存储根目录
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[async_trait]
impl ImageStoragePort for FileImageStorage {
    async fn save_image(&self, extension: &str, data: &[u8]) -> Result<String, ImageStorageError> {
        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        let path = self.base_dir.join(&file_name);

        fs::write(&path, data)
            .await
            .map_err(|e| ImageStorageError::IoError(e.to_string()))?;

        tracing::debug!("Saved image: {:?}, size={} bytes", path, data.len());

        Ok(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_image() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileImageStorage::new(temp_dir.path().join("public"))
            .await
            .unwrap();

        let name = storage.save_image("png", b"fake image").await.unwrap();

        assert!(name.ends_with(".png"));
        let saved = fs::read(storage.base_dir().join(&name)).await.unwrap();
        assert_eq!(saved, b"fake image");
    }

    #[tokio::test]
    async fn test_names_are_unique() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileImageStorage::new(temp_dir.path()).await.unwrap();

        let a = storage.save_image("jpg", b"a").await.unwrap();
        let b = storage.save_image("jpg", b"b").await.unwrap();
        assert_ne!(a, b);
    }
}
