//! SQLite Product Repository（含收藏）

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;

use super::{db_error, format_timestamp, parse_timestamp, DbPool};
use crate::application::ports::{
    FavoriteRecord, NewProduct, ProductChanges, ProductRecord, ProductRepositoryPort,
    ProductScope, ProductWithFavorites, RepositoryError,
};
use crate::domain::pagination::fold_case;
use crate::domain::{OrderBy, PageRequest};

const PRODUCT_COLUMNS: &str =
    "p.id, p.name, p.description, p.price, p.user_id, p.created_at, p.updated_at";

/// 收藏统计列，需绑定一个查看者 id（匿名时为 NULL）
const FAVORITE_COLUMNS: &str = r#"
    (SELECT COUNT(*) FROM favorites f WHERE f.product_id = p.id) AS favorite_count,
    EXISTS(SELECT 1 FROM favorites f WHERE f.product_id = p.id AND f.user_id = ?) AS favorited_by_viewer
"#;

/// 范围 + 关键字过滤（关键字比较折叠列）
///
/// 绑定顺序：owner, owner, favoriter, favoriter, keyword, keyword, keyword
const LIST_FILTER: &str = r#"
    (? IS NULL OR p.user_id = ?)
    AND (? IS NULL OR EXISTS(SELECT 1 FROM favorites f WHERE f.product_id = p.id AND f.user_id = ?))
    AND (? IS NULL OR p.name_folded LIKE ? ESCAPE '\' OR p.description_folded LIKE ? ESCAPE '\')
"#;

/// SQLite Product Repository
pub struct SqliteProductRepository {
    pool: DbPool,
}

impl SqliteProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn order_clause(order_by: OrderBy) -> &'static str {
    match order_by {
        OrderBy::Recent => "p.id DESC",
        OrderBy::Oldest => "p.id ASC",
    }
}

/// 范围拆成 (owner, favoriter) 两个可空过滤参数
fn scope_params(scope: ProductScope) -> (Option<i64>, Option<i64>) {
    match scope {
        ProductScope::All => (None, None),
        ProductScope::OwnedBy(user_id) => (Some(user_id), None),
        ProductScope::FavoritedBy(user_id) => (None, Some(user_id)),
    }
}

#[derive(FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: i64,
    user_id: i64,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ProductRow> for ProductRecord {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(ProductRecord {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            user_id: row.user_id,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[derive(FromRow)]
struct ProductWithFavoritesRow {
    #[sqlx(flatten)]
    product: ProductRow,
    favorite_count: i64,
    favorited_by_viewer: bool,
}

impl TryFrom<ProductWithFavoritesRow> for ProductWithFavorites {
    type Error = RepositoryError;

    fn try_from(row: ProductWithFavoritesRow) -> Result<Self, Self::Error> {
        Ok(ProductWithFavorites {
            product: row.product.try_into()?,
            favorite_count: row.favorite_count,
            favorited_by_viewer: row.favorited_by_viewer,
        })
    }
}

#[derive(FromRow)]
struct FavoriteRow {
    id: i64,
    product_id: i64,
    user_id: i64,
    created_at: String,
}

impl TryFrom<FavoriteRow> for FavoriteRecord {
    type Error = RepositoryError;

    fn try_from(row: FavoriteRow) -> Result<Self, Self::Error> {
        Ok(FavoriteRecord {
            id: row.id,
            product_id: row.product_id,
            user_id: row.user_id,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

#[async_trait]
impl ProductRepositoryPort for SqliteProductRepository {
    async fn create(&self, product: &NewProduct) -> Result<ProductRecord, RepositoryError> {
        let now = format_timestamp(Utc::now());
        let id = sqlx::query(
            r#"
            INSERT INTO products
                (name, name_folded, description, description_folded, price, user_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product.name)
        .bind(fold_case(&product.name))
        .bind(&product.description)
        .bind(fold_case(&product.description))
        .bind(product.price)
        .bind(product.user_id)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(db_error)?
        .last_insert_rowid();

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("product {}", id)))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ProductRecord>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {} FROM products p WHERE p.id = ?",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(ProductRecord::try_from).transpose()
    }

    async fn find_with_favorites(
        &self,
        id: i64,
        viewer_id: Option<i64>,
    ) -> Result<Option<ProductWithFavorites>, RepositoryError> {
        let row: Option<ProductWithFavoritesRow> = sqlx::query_as(&format!(
            "SELECT {}, {} FROM products p WHERE p.id = ?",
            PRODUCT_COLUMNS, FAVORITE_COLUMNS
        ))
        .bind(viewer_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(ProductWithFavorites::try_from).transpose()
    }

    async fn find_page(
        &self,
        scope: ProductScope,
        page: &PageRequest,
        viewer_id: Option<i64>,
    ) -> Result<Vec<ProductWithFavorites>, RepositoryError> {
        let (owner, favoriter) = scope_params(scope);
        let keyword = page.keyword_pattern();
        let sql = format!(
            "SELECT {}, {} FROM products p WHERE {} ORDER BY {} LIMIT ? OFFSET ?",
            PRODUCT_COLUMNS,
            FAVORITE_COLUMNS,
            LIST_FILTER,
            order_clause(page.order_by)
        );

        let rows: Vec<ProductWithFavoritesRow> = sqlx::query_as(&sql)
            .bind(viewer_id)
            .bind(owner)
            .bind(owner)
            .bind(favoriter)
            .bind(favoriter)
            .bind(&keyword)
            .bind(&keyword)
            .bind(&keyword)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        rows.into_iter().map(ProductWithFavorites::try_from).collect()
    }

    async fn count(&self, scope: ProductScope, page: &PageRequest) -> Result<i64, RepositoryError> {
        let (owner, favoriter) = scope_params(scope);
        let keyword = page.keyword_pattern();
        let sql = format!("SELECT COUNT(*) FROM products p WHERE {}", LIST_FILTER);

        let count: (i64,) = sqlx::query_as(&sql)
            .bind(owner)
            .bind(owner)
            .bind(favoriter)
            .bind(favoriter)
            .bind(&keyword)
            .bind(&keyword)
            .bind(&keyword)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(count.0)
    }

    async fn update(
        &self,
        id: i64,
        changes: &ProductChanges,
    ) -> Result<ProductRecord, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = COALESCE(?, name),
                name_folded = COALESCE(?, name_folded),
                description = COALESCE(?, description),
                description_folded = COALESCE(?, description_folded),
                price = COALESCE(?, price),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&changes.name)
        .bind(changes.name.as_deref().map(fold_case))
        .bind(&changes.description)
        .bind(changes.description.as_deref().map(fold_case))
        .bind(changes.price)
        .bind(format_timestamp(Utc::now()))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("product {}", id)));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("product {}", id)))
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query("DELETE FROM favorites WHERE product_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        Ok(())
    }

    async fn find_favorite(
        &self,
        product_id: i64,
        user_id: i64,
    ) -> Result<Option<FavoriteRecord>, RepositoryError> {
        let row: Option<FavoriteRow> = sqlx::query_as(
            "SELECT id, product_id, user_id, created_at FROM favorites WHERE product_id = ? AND user_id = ?",
        )
        .bind(product_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(FavoriteRecord::try_from).transpose()
    }

    async fn create_favorite(
        &self,
        product_id: i64,
        user_id: i64,
    ) -> Result<FavoriteRecord, RepositoryError> {
        let created_at = Utc::now();
        let id = sqlx::query(
            "INSERT INTO favorites (product_id, user_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(product_id)
        .bind(user_id)
        .bind(format_timestamp(created_at))
        .execute(&self.pool)
        .await
        .map_err(db_error)?
        .last_insert_rowid();

        Ok(FavoriteRecord {
            id,
            product_id,
            user_id,
            created_at,
        })
    }

    async fn delete_favorite(&self, favorite_id: i64) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM favorites WHERE id = ?")
            .bind(favorite_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(())
    }
}
