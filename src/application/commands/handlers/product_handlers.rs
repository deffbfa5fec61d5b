//! Product Command Handlers

use std::sync::Arc;

use crate::application::commands::{
    CreateProduct, DeleteProduct, FavoriteProduct, UnfavoriteProduct, UpdateProduct,
};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    NewProduct, ProductChanges, ProductRecord, ProductRepositoryPort,
};
use crate::domain::ensure_owner;

async fn require_product(
    repo: &dyn ProductRepositoryPort,
    product_id: i64,
) -> Result<ProductRecord, ApplicationError> {
    repo.find_by_id(product_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("product", product_id))
}

pub struct CreateProductHandler {
    product_repo: Arc<dyn ProductRepositoryPort>,
}

impl CreateProductHandler {
    pub fn new(product_repo: Arc<dyn ProductRepositoryPort>) -> Self {
        Self { product_repo }
    }

    pub async fn handle(&self, command: CreateProduct) -> Result<ProductRecord, ApplicationError> {
        let product = self
            .product_repo
            .create(&NewProduct {
                name: command.name,
                description: command.description,
                price: command.price,
                user_id: command.user_id,
            })
            .await?;

        tracing::info!(
            product_id = product.id,
            user_id = product.user_id,
            "Product created"
        );

        Ok(product)
    }
}

pub struct UpdateProductHandler {
    product_repo: Arc<dyn ProductRepositoryPort>,
}

impl UpdateProductHandler {
    pub fn new(product_repo: Arc<dyn ProductRepositoryPort>) -> Self {
        Self { product_repo }
    }

    pub async fn handle(&self, command: UpdateProduct) -> Result<ProductRecord, ApplicationError> {
        let existing = require_product(self.product_repo.as_ref(), command.product_id).await?;
        ensure_owner(&existing, command.user_id)?;

        let changes = ProductChanges {
            name: command.name,
            description: command.description,
            price: command.price,
        };
        let product = self.product_repo.update(existing.id, &changes).await?;

        tracing::info!(product_id = product.id, "Product updated");

        Ok(product)
    }
}

pub struct DeleteProductHandler {
    product_repo: Arc<dyn ProductRepositoryPort>,
}

impl DeleteProductHandler {
    pub fn new(product_repo: Arc<dyn ProductRepositoryPort>) -> Self {
        Self { product_repo }
    }

    pub async fn handle(&self, command: DeleteProduct) -> Result<(), ApplicationError> {
        let existing = require_product(self.product_repo.as_ref(), command.product_id).await?;
        ensure_owner(&existing, command.user_id)?;

        self.product_repo.delete(existing.id).await?;

        tracing::info!(product_id = existing.id, "Product deleted");

        Ok(())
    }
}

/// 收藏
///
/// 与点赞相同：先查再插，并发重复由唯一约束拦截
pub struct FavoriteProductHandler {
    product_repo: Arc<dyn ProductRepositoryPort>,
}

impl FavoriteProductHandler {
    pub fn new(product_repo: Arc<dyn ProductRepositoryPort>) -> Self {
        Self { product_repo }
    }

    pub async fn handle(&self, command: FavoriteProduct) -> Result<(), ApplicationError> {
        let product = require_product(self.product_repo.as_ref(), command.product_id).await?;

        if self
            .product_repo
            .find_favorite(product.id, command.user_id)
            .await?
            .is_some()
        {
            return Err(ApplicationError::bad_request("Already favorited"));
        }

        self.product_repo
            .create_favorite(product.id, command.user_id)
            .await?;

        tracing::info!(product_id = product.id, user_id = command.user_id, "Product favorited");

        Ok(())
    }
}

pub struct UnfavoriteProductHandler {
    product_repo: Arc<dyn ProductRepositoryPort>,
}

impl UnfavoriteProductHandler {
    pub fn new(product_repo: Arc<dyn ProductRepositoryPort>) -> Self {
        Self { product_repo }
    }

    pub async fn handle(&self, command: UnfavoriteProduct) -> Result<(), ApplicationError> {
        let product = require_product(self.product_repo.as_ref(), command.product_id).await?;

        let favorite = self
            .product_repo
            .find_favorite(product.id, command.user_id)
            .await?
            .ok_or_else(|| ApplicationError::bad_request("Not favorited"))?;

        self.product_repo.delete_favorite(favorite.id).await?;

        tracing::info!(product_id = product.id, user_id = command.user_id, "Product unfavorited");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestContext;

    #[tokio::test]
    async fn test_favorite_toggle() {
        let ctx = TestContext::new().await;
        let seller = ctx.user("seller@example.com").await;
        let buyer = ctx.user("buyer@example.com").await;
        let product = ctx.product(seller.id, "Lamp", "Desk lamp").await;

        let favorite = FavoriteProductHandler::new(ctx.products.clone());
        let unfavorite = UnfavoriteProductHandler::new(ctx.products.clone());
        let command = FavoriteProduct {
            product_id: product.id,
            user_id: buyer.id,
        };

        favorite.handle(command.clone()).await.unwrap();
        let err = favorite.handle(command).await.unwrap_err();
        assert!(matches!(err, ApplicationError::BadRequest(ref m) if m == "Already favorited"));

        let command = UnfavoriteProduct {
            product_id: product.id,
            user_id: buyer.id,
        };
        unfavorite.handle(command.clone()).await.unwrap();
        let err = unfavorite.handle(command).await.unwrap_err();
        assert!(matches!(err, ApplicationError::BadRequest(ref m) if m == "Not favorited"));
    }

    #[tokio::test]
    async fn test_non_owner_cannot_update_product() {
        let ctx = TestContext::new().await;
        let seller = ctx.user("seller@example.com").await;
        let other = ctx.user("other@example.com").await;
        let product = ctx.product(seller.id, "Lamp", "Desk lamp").await;

        let err = UpdateProductHandler::new(ctx.products.clone())
            .handle(UpdateProduct {
                product_id: product.id,
                user_id: other.id,
                name: None,
                description: None,
                price: Some(1),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Forbidden(_)));
    }
}
