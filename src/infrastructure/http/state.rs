//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    ChangePasswordHandler, CreateArticleHandler, CreateCommentHandler, CreateProductHandler,
    DeleteArticleHandler, DeleteCommentHandler, DeleteProductHandler, FavoriteProductHandler,
    LikeArticleHandler, LoginHandler, RefreshTokensHandler, RegisterHandler,
    UnfavoriteProductHandler, UnlikeArticleHandler, UpdateArticleHandler, UpdateCommentHandler,
    UpdateMeHandler, UpdateProductHandler, UploadImageHandler,
    // Query handlers
    GetArticleHandler, GetMeHandler, GetProductHandler, ListArticlesHandler, ListCommentsHandler,
    ListProductsHandler,
    // Ports
    ArticleRepositoryPort, CommentRepositoryPort, ImageStoragePort, PasswordHasherPort,
    ProductRepositoryPort, TokenServicePort, UserRepositoryPort,
};
use crate::config::AppConfig;

/// 启动时构建状态所需的全部端口实现
pub struct Ports {
    pub users: Arc<dyn UserRepositoryPort>,
    pub articles: Arc<dyn ArticleRepositoryPort>,
    pub comments: Arc<dyn CommentRepositoryPort>,
    pub products: Arc<dyn ProductRepositoryPort>,
    pub hasher: Arc<dyn PasswordHasherPort>,
    pub tokens: Arc<dyn TokenServicePort>,
    pub images: Arc<dyn ImageStoragePort>,
}

/// 应用状态
pub struct AppState {
    pub config: AppConfig,

    // ========== Ports ==========
    /// 认证提取器直接使用
    pub user_repo: Arc<dyn UserRepositoryPort>,
    pub token_service: Arc<dyn TokenServicePort>,

    // ========== Command Handlers ==========
    pub register_handler: RegisterHandler,
    pub login_handler: LoginHandler,
    pub refresh_tokens_handler: RefreshTokensHandler,
    pub create_article_handler: CreateArticleHandler,
    pub update_article_handler: UpdateArticleHandler,
    pub delete_article_handler: DeleteArticleHandler,
    pub create_comment_handler: CreateCommentHandler,
    pub like_article_handler: LikeArticleHandler,
    pub unlike_article_handler: UnlikeArticleHandler,
    pub update_comment_handler: UpdateCommentHandler,
    pub delete_comment_handler: DeleteCommentHandler,
    pub create_product_handler: CreateProductHandler,
    pub update_product_handler: UpdateProductHandler,
    pub delete_product_handler: DeleteProductHandler,
    pub favorite_product_handler: FavoriteProductHandler,
    pub unfavorite_product_handler: UnfavoriteProductHandler,
    pub update_me_handler: UpdateMeHandler,
    pub change_password_handler: ChangePasswordHandler,
    pub upload_image_handler: UploadImageHandler,

    // ========== Query Handlers ==========
    pub get_article_handler: GetArticleHandler,
    pub list_articles_handler: ListArticlesHandler,
    pub list_comments_handler: ListCommentsHandler,
    pub get_product_handler: GetProductHandler,
    pub list_products_handler: ListProductsHandler,
    pub get_me_handler: GetMeHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(config: AppConfig, ports: Ports) -> Self {
        let Ports {
            users,
            articles,
            comments,
            products,
            hasher,
            tokens,
            images,
        } = ports;
        let max_image_bytes = config.upload.max_image_bytes;

        Self {
            config,

            // Ports
            user_repo: users.clone(),
            token_service: tokens.clone(),

            // Command handlers
            register_handler: RegisterHandler::new(users.clone(), hasher.clone()),
            login_handler: LoginHandler::new(users.clone(), hasher.clone(), tokens.clone()),
            refresh_tokens_handler: RefreshTokensHandler::new(users.clone(), tokens.clone()),
            create_article_handler: CreateArticleHandler::new(articles.clone()),
            update_article_handler: UpdateArticleHandler::new(articles.clone()),
            delete_article_handler: DeleteArticleHandler::new(articles.clone()),
            create_comment_handler: CreateCommentHandler::new(articles.clone(), comments.clone()),
            like_article_handler: LikeArticleHandler::new(articles.clone()),
            unlike_article_handler: UnlikeArticleHandler::new(articles.clone()),
            update_comment_handler: UpdateCommentHandler::new(comments.clone()),
            delete_comment_handler: DeleteCommentHandler::new(comments.clone()),
            create_product_handler: CreateProductHandler::new(products.clone()),
            update_product_handler: UpdateProductHandler::new(products.clone()),
            delete_product_handler: DeleteProductHandler::new(products.clone()),
            favorite_product_handler: FavoriteProductHandler::new(products.clone()),
            unfavorite_product_handler: UnfavoriteProductHandler::new(products.clone()),
            update_me_handler: UpdateMeHandler::new(users.clone()),
            change_password_handler: ChangePasswordHandler::new(users.clone(), hasher),
            upload_image_handler: UploadImageHandler::new(images, max_image_bytes),

            // Query handlers
            get_article_handler: GetArticleHandler::new(articles.clone()),
            list_articles_handler: ListArticlesHandler::new(articles.clone()),
            list_comments_handler: ListCommentsHandler::new(articles, comments),
            get_product_handler: GetProductHandler::new(products.clone()),
            list_products_handler: ListProductsHandler::new(products),
            get_me_handler: GetMeHandler::new(users),
        }
    }
}
