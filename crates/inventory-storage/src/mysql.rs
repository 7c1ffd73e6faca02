use async_trait::async_trait;
use inventory_core::error::{Result, StorageError};
use inventory_core::{NewProduct, Product, ProductId, ProductPatch, ProductRepository};
use jiff::Timestamp;
use rust_decimal::Decimal;
use sqlx::mysql::{MySqlPoolOptions, MySqlRow};
use sqlx::{MySqlPool, Row};
use std::time::Duration;
use tracing::debug;
use typed_builder::TypedBuilder;

/// DDL for the `products` table. Safe to apply repeatedly.
pub const PRODUCTS_DDL: &str = include_str!("../ddl/mysql/products.sql");

/// Connection pool limits for [`MySqlRepository::connect_with`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct PoolSettings {
    #[builder(default = 10)]
    pub max_connections: u32,
    #[builder(default = Duration::from_secs(5))]
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// MySQL implementation of the repository contract.
///
/// Rows are hard-deleted. `created_at` is stored as unix milliseconds.
/// `update` reads the row with `FOR UPDATE` and writes the merged values in
/// the same transaction, so a concurrent delete either happens before (and the
/// update reports not found) or waits for the update to commit.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        Self::connect_with(database_url, PoolSettings::default()).await
    }

    /// Creates a repository by opening a pool with the given limits.
    pub async fn connect_with(database_url: &str, settings: PoolSettings) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the `products` table if it does not exist yet.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(PRODUCTS_DDL)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn now_unix_millis() -> i64 {
    Timestamp::now().as_millisecond()
}

fn parse_created_at(millis: i64) -> Result<Timestamp> {
    Timestamp::from_millisecond(millis).map_err(|e| {
        StorageError::InvalidData(format!("invalid created_at timestamp '{millis}': {e}"))
    })
}

fn product_from_row(row: &MySqlRow) -> Result<Product> {
    let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
    let name: String = row.try_get("name").map_err(map_sqlx_error)?;
    let description: Option<String> = row.try_get("description").map_err(map_sqlx_error)?;
    let price: Decimal = row.try_get("price").map_err(map_sqlx_error)?;
    let created_at_raw: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;

    Ok(Product {
        id: ProductId::new(id),
        name,
        description,
        price,
        created_at: parse_created_at(created_at_raw)?,
    })
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ProductRepository for MySqlRepository {
    async fn list(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, price, created_at
            FROM products
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(product_from_row).collect()
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, price, created_at
            FROM products
            WHERE id = ?
            LIMIT 1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(product_from_row).transpose()
    }

    async fn insert(&self, product: NewProduct) -> Result<Product> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, description, price, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(now_unix_millis())
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let id = i64::try_from(result.last_insert_id()).map_err(|e| {
            StorageError::InvalidData(format!(
                "generated id '{}' is out of range: {e}",
                result.last_insert_id()
            ))
        })?;

        let row = sqlx::query(
            r#"
            SELECT id, name, description, price, created_at
            FROM products
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let created = product_from_row(&row)?;
        tx.commit().await.map_err(map_sqlx_error)?;
        debug!(product_id = id, "inserted product");

        Ok(created)
    }

    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Option<Product>> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let row = sqlx::query(
            r#"
            SELECT id, name, description, price, created_at
            FROM products
            WHERE id = ?
            FOR UPDATE
            "#,
        )
        .bind(id.get())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            tx.rollback().await.map_err(map_sqlx_error)?;
            return Ok(None);
        };

        let mut product = product_from_row(&row)?;
        if patch.is_empty() {
            tx.commit().await.map_err(map_sqlx_error)?;
            return Ok(Some(product));
        }

        patch.apply(&mut product);

        sqlx::query(
            r#"
            UPDATE products
            SET name = ?, description = ?, price = ?
            WHERE id = ?
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(id.get())
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(Some(product))
    }

    async fn delete(&self, id: ProductId) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM products
            WHERE id = ?
            "#,
        )
        .bind(id.get())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
