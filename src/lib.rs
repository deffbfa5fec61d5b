//! Marketboard - 社区文章 + 二手商品 REST 后端
//!
//! 架构设计: CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - pagination: 偏移分页与游标分页
//! - ownership: 所有权校验
//! - validation: 输入校验
//!
//! 应用层 (application/):
//! - Ports: Repositories, TokenService, PasswordHasher, ImageStorage
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API + Cookie 认证
//! - Persistence: SQLite 存储
//! - Adapters: JWT, Argon2, 本地图片存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
mod test_support;

pub use config::{load_config, AppConfig};
