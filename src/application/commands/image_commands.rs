//! Image Commands - 图片上传

/// 上传图片
#[derive(Debug, Clone)]
pub struct UploadImage {
    pub user_id: i64,
    /// 客户端提供的原始文件名，仅用于取扩展名
    pub file_name: Option<String>,
    pub data: Vec<u8>,
}
