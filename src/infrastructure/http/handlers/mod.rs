//! HTTP Handlers
//!
//! 每个资源一个模块，handler 只负责 DTO 与命令/查询之间的转换

mod articles;
mod auth;
mod comments;
mod images;
mod ping;
mod products;
mod users;

pub use articles::*;
pub use auth::*;
pub use comments::*;
pub use images::*;
pub use ping::*;
pub use products::*;
pub use users::*;
