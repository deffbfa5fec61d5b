//! User Queries

/// 获取当前用户
#[derive(Debug, Clone)]
pub struct GetMe {
    pub user_id: i64,
}
