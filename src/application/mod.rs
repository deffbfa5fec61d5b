//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Repository、TokenService、PasswordHasher）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Article commands
    CreateArticle,
    CreateComment,
    DeleteArticle,
    LikeArticle,
    UnlikeArticle,
    UpdateArticle,
    // Comment commands
    DeleteComment,
    UpdateComment,
    // Product commands
    CreateProduct,
    DeleteProduct,
    FavoriteProduct,
    UnfavoriteProduct,
    UpdateProduct,
    // Image commands
    UploadImage,
    // User commands
    ChangePassword,
    UpdateMe,
    // Auth commands
    Login,
    RefreshTokens,
    Register,
    // Handlers
    handlers::{
        ChangePasswordHandler, CreateArticleHandler, CreateCommentHandler, CreateProductHandler,
        DeleteArticleHandler, DeleteCommentHandler, DeleteProductHandler, FavoriteProductHandler,
        LikeArticleHandler, LoginHandler, LoginResponse, RefreshTokensHandler, RegisterHandler,
        UnfavoriteProductHandler, UnlikeArticleHandler, UpdateArticleHandler,
        UpdateCommentHandler, UpdateMeHandler, UpdateProductHandler, UploadImageHandler,
    },
};

pub use error::ApplicationError;

pub use ports::{
    ArticleRecord, ArticleRepositoryPort, CommentRecord, CommentRepositoryPort, ImageStoragePort,
    PasswordHasherPort, ProductRecord, ProductRepositoryPort, ProductScope, RepositoryError,
    TokenPair, TokenServicePort, UserRecord, UserRepositoryPort,
};

pub use queries::{
    // Article queries
    GetArticle,
    ListArticles,
    ListComments,
    // Product queries
    GetProduct,
    ListProducts,
    // User queries
    GetMe,
    // Handlers
    handlers::{
        ArticleDetail, GetArticleHandler, GetMeHandler, GetProductHandler, ListArticlesHandler,
        ListCommentsHandler, ListProductsHandler, ProductDetail,
    },
};
