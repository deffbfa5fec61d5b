//! Product HTTP Handlers - 商品与收藏

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::application::{
    CreateProduct, DeleteProduct, FavoriteProduct, GetProduct, ListProducts, ProductScope,
    UnfavoriteProduct, UpdateProduct,
};
use crate::domain::Page;
use crate::infrastructure::http::auth::{AuthUser, MaybeAuthUser};
use crate::infrastructure::http::dto::{
    CreateProductRequest, ListQuery, ProductDetailResponse, ProductResponse,
    UpdateProductRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{IdPath, ValidJson, ValidQuery};
use crate::infrastructure::http::state::AppState;

pub async fn create_product(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let product = state
        .create_product_handler
        .handle(CreateProduct {
            user_id: user.id,
            name: req.name,
            description: req.description,
            price: req.price,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(product.into())))
}

/// 商品列表（名称/描述关键字）
pub async fn list_products(
    viewer: MaybeAuthUser,
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<ListQuery>,
) -> Result<Json<Page<ProductDetailResponse>>, ApiError> {
    list_scoped(&state, ProductScope::All, query, viewer.id()).await
}

/// 按范围查询商品列表，`/users/me/*` 复用
pub(crate) async fn list_scoped(
    state: &AppState,
    scope: ProductScope,
    query: ListQuery,
    viewer_id: Option<i64>,
) -> Result<Json<Page<ProductDetailResponse>>, ApiError> {
    let page = state
        .list_products_handler
        .handle(ListProducts {
            scope,
            page: query.into(),
            viewer_id,
        })
        .await?;

    Ok(Json(page.map(ProductDetailResponse::from)))
}

pub async fn get_product(
    viewer: MaybeAuthUser,
    State(state): State<Arc<AppState>>,
    IdPath(product_id): IdPath,
) -> Result<Json<ProductDetailResponse>, ApiError> {
    let detail = state
        .get_product_handler
        .handle(GetProduct {
            product_id,
            viewer_id: viewer.id(),
        })
        .await?;

    Ok(Json(detail.into()))
}

pub async fn update_product(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    IdPath(product_id): IdPath,
    ValidJson(req): ValidJson<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state
        .update_product_handler
        .handle(UpdateProduct {
            product_id,
            user_id: user.id,
            name: req.name,
            description: req.description,
            price: req.price,
        })
        .await?;

    Ok(Json(product.into()))
}

pub async fn delete_product(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    IdPath(product_id): IdPath,
) -> Result<StatusCode, ApiError> {
    state
        .delete_product_handler
        .handle(DeleteProduct {
            product_id,
            user_id: user.id,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn favorite_product(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    IdPath(product_id): IdPath,
) -> Result<StatusCode, ApiError> {
    state
        .favorite_product_handler
        .handle(FavoriteProduct {
            product_id,
            user_id: user.id,
        })
        .await?;

    Ok(StatusCode::CREATED)
}

pub async fn unfavorite_product(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    IdPath(product_id): IdPath,
) -> Result<StatusCode, ApiError> {
    state
        .unfavorite_product_handler
        .handle(UnfavoriteProduct {
            product_id,
            user_id: user.id,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
