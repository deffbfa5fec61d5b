//! Product Commands - 商品与收藏

#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub user_id: i64,
    pub name: String,
    pub description: String,
    pub price: i64,
}

/// 修改商品命令（仅所有者）
#[derive(Debug, Clone)]
pub struct UpdateProduct {
    pub product_id: i64,
    pub user_id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
}

/// 删除商品命令（仅所有者）
#[derive(Debug, Clone)]
pub struct DeleteProduct {
    pub product_id: i64,
    pub user_id: i64,
}

#[derive(Debug, Clone)]
pub struct FavoriteProduct {
    pub product_id: i64,
    pub user_id: i64,
}

#[derive(Debug, Clone)]
pub struct UnfavoriteProduct {
    pub product_id: i64,
    pub user_id: i64,
}
