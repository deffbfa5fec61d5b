//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：处理所有写操作

mod article_commands;
mod auth_commands;
mod comment_commands;
mod image_commands;
mod product_commands;
mod user_commands;

pub mod handlers;

pub use article_commands::*;
pub use auth_commands::*;
pub use comment_commands::*;
pub use image_commands::*;
pub use product_commands::*;
pub use user_commands::*;
