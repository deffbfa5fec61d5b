//! Comment Commands

/// 修改评论命令（仅所有者）
#[derive(Debug, Clone)]
pub struct UpdateComment {
    pub comment_id: i64,
    pub user_id: i64,
    pub content: Option<String>,
}

/// 删除评论命令（仅所有者）
#[derive(Debug, Clone)]
pub struct DeleteComment {
    pub comment_id: i64,
    pub user_id: i64,
}
