//! Domain Layer - 领域层
//!
//! 与存储和 HTTP 无关的规则:
//! - pagination: 偏移分页与游标分页
//! - ownership: 所有权校验
//! - validation: 输入校验

pub mod ownership;
pub mod pagination;
pub mod validation;

pub use ownership::{ensure_owner, NotOwner, Owned};
pub use pagination::{CursorPage, CursorRequest, OrderBy, Page, PageRequest};
pub use validation::{Validate, ValidationError};
