//! HTTP Layer - RESTful API
//!
//! Cookie 认证、请求校验、统一错误映射

pub mod auth;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;


pub use auth::{AuthUser, MaybeAuthUser};
pub use error::ApiError;
pub use routes::create_routes;
pub use server::HttpServer;
pub use state::{AppState, Ports};
