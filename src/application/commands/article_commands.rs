//! Article Commands - 文章、评论创建与点赞

/// 创建文章命令
#[derive(Debug, Clone)]
pub struct CreateArticle {
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
}

/// 修改文章命令（仅所有者）
#[derive(Debug, Clone)]
pub struct UpdateArticle {
    pub article_id: i64,
    pub user_id: i64,
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<Option<String>>,
}

/// 删除文章命令（仅所有者）
#[derive(Debug, Clone)]
pub struct DeleteArticle {
    pub article_id: i64,
    pub user_id: i64,
}

/// 在文章下发表评论
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub article_id: i64,
    pub user_id: i64,
    pub content: String,
}

/// 点赞文章
#[derive(Debug, Clone)]
pub struct LikeArticle {
    pub article_id: i64,
    pub user_id: i64,
}

/// 取消点赞
#[derive(Debug, Clone)]
pub struct UnlikeArticle {
    pub article_id: i64,
    pub user_id: i64,
}
