//! Storage Adapters - 文件存储

mod file_image_storage;

pub use file_image_storage::FileImageStorage;
