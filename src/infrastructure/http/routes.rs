//! HTTP Routes
//!
//! API Endpoints:
//! - /ping                          GET          健康检查
//! - /auth/register                 POST         注册
//! - /auth/login                    POST         登录（写入 cookie）
//! - /auth/refresh                  POST         刷新令牌
//! - /auth/logout                   POST         登出（清除 cookie）
//! - /articles                      GET, POST    文章列表 / 创建
//! - /articles/:id                  GET, PATCH, DELETE
//! - /articles/:id/comments         GET, POST    评论游标列表 / 发表评论
//! - /articles/:id/likes            POST, DELETE 点赞 / 取消
//! - /comments/:id                  PATCH, DELETE
//! - /products                      GET, POST    商品列表 / 创建
//! - /products/:id                  GET, PATCH, DELETE
//! - /products/:id/favorites        POST, DELETE 收藏 / 取消
//! - /users/me                      GET, PATCH
//! - /users/me/password             PATCH
//! - /users/me/products             GET          我发布的商品
//! - /users/me/favorites            GET          我收藏的商品
//! - /image/upload                  POST         上传图片（multipart `image`）
//! - {public_path}/*                GET          静态文件（缺失文件返回 JSON 404）

use axum::{
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;

use super::error::ErrorResponse;
use super::handlers;
use super::state::AppState;

/// multipart 头部与边界的额外开销
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// 创建所有路由
pub fn create_routes(state: Arc<AppState>) -> Router {
    let public_path = state.config.server.public_path.trim_end_matches('/').to_string();
    let public_dir = state.config.server.public_dir.clone();
    let upload_limit = state.config.upload.max_image_bytes + MULTIPART_OVERHEAD;
    let static_files = ServeDir::new(public_dir).not_found_service(not_found.into_service());

    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/auth", auth_routes())
        .nest("/articles", article_routes())
        .nest("/comments", comment_routes())
        .nest("/products", product_routes())
        .nest("/users", user_routes())
        .route(
            "/image/upload",
            post(handlers::upload_image).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .nest_service(&public_path, static_files)
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not found")))
}

fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .route("/logout", post(handlers::logout))
}

fn article_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(handlers::list_articles).post(handlers::create_article),
        )
        .route(
            "/:id",
            get(handlers::get_article)
                .patch(handlers::update_article)
                .delete(handlers::delete_article),
        )
        .route(
            "/:id/comments",
            get(handlers::list_comments).post(handlers::create_comment),
        )
        .route(
            "/:id/likes",
            post(handlers::like_article).delete(handlers::unlike_article),
        )
}

fn comment_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/:id",
        patch(handlers::update_comment).delete(handlers::delete_comment),
    )
}

fn product_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/:id",
            get(handlers::get_product)
                .patch(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route(
            "/:id/favorites",
            post(handlers::favorite_product).delete(handlers::unfavorite_product),
        )
}

fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/me", get(handlers::get_me).patch(handlers::update_me))
        .route("/me/password", patch(handlers::change_password))
        .route("/me/products", get(handlers::list_my_products))
        .route("/me/favorites", get(handlers::list_my_favorites))
}
