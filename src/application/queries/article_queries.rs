//! Article Queries

use crate::domain::{CursorRequest, PageRequest};

/// 获取文章详情
#[derive(Debug, Clone)]
pub struct GetArticle {
    pub article_id: i64,
    /// 已登录时用于计算 isLiked
    pub viewer_id: Option<i64>,
}

/// 文章偏移分页列表
#[derive(Debug, Clone)]
pub struct ListArticles {
    pub page: PageRequest,
    pub viewer_id: Option<i64>,
}

/// 文章评论游标分页列表
#[derive(Debug, Clone)]
pub struct ListComments {
    pub article_id: i64,
    pub cursor: CursorRequest,
}
