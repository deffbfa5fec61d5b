//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod credentials;
mod image_storage;
mod repositories;

pub use credentials::{
    PasswordError, PasswordHasherPort, TokenError, TokenPair, TokenServicePort,
};
pub use image_storage::{ImageStorageError, ImageStoragePort};
pub use repositories::{
    ArticleChanges, ArticleRecord, ArticleRepositoryPort, ArticleWithLikes, CommentChanges,
    CommentRecord, CommentRepositoryPort, FavoriteRecord, LikeRecord, NewArticle, NewComment,
    NewProduct, NewUser, ProductChanges, ProductRecord, ProductRepositoryPort, ProductScope,
    ProductWithFavorites, RepositoryError, UserChanges, UserRecord, UserRepositoryPort,
};
