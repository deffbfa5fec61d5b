//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod article_handlers;
mod auth_handlers;
mod comment_handlers;
mod image_handlers;
mod product_handlers;
mod user_handlers;

pub use article_handlers::*;
pub use auth_handlers::*;
pub use comment_handlers::*;
pub use image_handlers::*;
pub use product_handlers::*;
pub use user_handlers::*;
