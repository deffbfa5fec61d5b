//! Query Handlers 实现

mod article_handlers;
mod product_handlers;
mod user_handlers;

pub use article_handlers::*;
pub use product_handlers::*;
pub use user_handlers::*;
