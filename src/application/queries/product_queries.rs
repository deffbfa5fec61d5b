//! Product Queries

use crate::application::ports::ProductScope;
use crate::domain::PageRequest;

#[derive(Debug, Clone)]
pub struct GetProduct {
    pub product_id: i64,
    pub viewer_id: Option<i64>,
}

/// 商品偏移分页列表（全部 / 我发布的 / 我收藏的）
#[derive(Debug, Clone)]
pub struct ListProducts {
    pub scope: ProductScope,
    pub page: PageRequest,
    pub viewer_id: Option<i64>,
}
