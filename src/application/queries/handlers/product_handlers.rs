//! Product Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{ProductRecord, ProductRepositoryPort, ProductWithFavorites};
use crate::application::queries::{GetProduct, ListProducts};
use crate::domain::Page;

/// 商品详情：收藏数 + 当前查看者是否收藏
#[derive(Debug, Clone)]
pub struct ProductDetail {
    pub product: ProductRecord,
    pub favorite_count: i64,
    /// 匿名查看时为 None
    pub is_favorited: Option<bool>,
}

impl ProductDetail {
    fn for_viewer(row: ProductWithFavorites, viewer_id: Option<i64>) -> Self {
        Self {
            is_favorited: viewer_id.map(|_| row.favorited_by_viewer),
            favorite_count: row.favorite_count,
            product: row.product,
        }
    }
}

pub struct GetProductHandler {
    product_repo: Arc<dyn ProductRepositoryPort>,
}

impl GetProductHandler {
    pub fn new(product_repo: Arc<dyn ProductRepositoryPort>) -> Self {
        Self { product_repo }
    }

    pub async fn handle(&self, query: GetProduct) -> Result<ProductDetail, ApplicationError> {
        let row = self
            .product_repo
            .find_with_favorites(query.product_id, query.viewer_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("product", query.product_id))?;

        Ok(ProductDetail::for_viewer(row, query.viewer_id))
    }
}

pub struct ListProductsHandler {
    product_repo: Arc<dyn ProductRepositoryPort>,
}

impl ListProductsHandler {
    pub fn new(product_repo: Arc<dyn ProductRepositoryPort>) -> Self {
        Self { product_repo }
    }

    pub async fn handle(&self, query: ListProducts) -> Result<Page<ProductDetail>, ApplicationError> {
        let total_count = self.product_repo.count(query.scope, &query.page).await?;
        let rows = self
            .product_repo
            .find_page(query.scope, &query.page, query.viewer_id)
            .await?;

        Ok(Page {
            list: rows
                .into_iter()
                .map(|row| ProductDetail::for_viewer(row, query.viewer_id))
                .collect(),
            total_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ProductScope;
    use crate::domain::{OrderBy, PageRequest};
    use crate::test_support::TestContext;

    #[tokio::test]
    async fn test_keyword_matches_name_or_description() {
        let ctx = TestContext::new().await;
        let seller = ctx.user("seller@example.com").await;
        ctx.product(seller.id, "Desk lamp", "Warm light").await;
        ctx.product(seller.id, "Chair", "Goes well with a LAMP").await;
        ctx.product(seller.id, "Mug", "Ceramic").await;

        let page = ListProductsHandler::new(ctx.products.clone())
            .handle(ListProducts {
                scope: ProductScope::All,
                page: PageRequest {
                    keyword: Some("lamp".into()),
                    order_by: OrderBy::Recent,
                    ..Default::default()
                },
                viewer_id: None,
            })
            .await
            .unwrap();

        assert_eq!(page.total_count, 2);
        let names: Vec<&str> = page.list.iter().map(|p| p.product.name.as_str()).collect();
        assert_eq!(names, vec!["Chair", "Desk lamp"]);
    }

    #[tokio::test]
    async fn test_my_products_and_favorites_scopes() {
        let ctx = TestContext::new().await;
        let seller = ctx.user("seller@example.com").await;
        let buyer = ctx.user("buyer@example.com").await;
        let lamp = ctx.product(seller.id, "Lamp", "Light").await;
        ctx.product(seller.id, "Mug", "Ceramic").await;
        ctx.product(buyer.id, "Bike", "Used").await;
        ctx.products.create_favorite(lamp.id, buyer.id).await.unwrap();

        let handler = ListProductsHandler::new(ctx.products.clone());

        let mine = handler
            .handle(ListProducts {
                scope: ProductScope::OwnedBy(seller.id),
                page: PageRequest::default(),
                viewer_id: Some(seller.id),
            })
            .await
            .unwrap();
        assert_eq!(mine.total_count, 2);
        assert!(mine.list.iter().all(|p| p.product.user_id == seller.id));

        let favorites = handler
            .handle(ListProducts {
                scope: ProductScope::FavoritedBy(buyer.id),
                page: PageRequest::default(),
                viewer_id: Some(buyer.id),
            })
            .await
            .unwrap();
        assert_eq!(favorites.total_count, 1);
        assert_eq!(favorites.list[0].product.id, lamp.id);
        assert_eq!(favorites.list[0].favorite_count, 1);
        assert_eq!(favorites.list[0].is_favorited, Some(true));
    }
}
