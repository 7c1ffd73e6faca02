use crate::error::Result;
use crate::product::{NewProduct, Product, ProductId, ProductPatch};
use async_trait::async_trait;

/// Durable storage of [`Product`] rows.
///
/// Every method is a single atomic storage call. A missing row is a normal
/// outcome (`Ok(None)` / `Ok(false)`), while `Err` is reserved for backend
/// failures.
#[async_trait]
pub trait ProductRepository: Send + Sync + 'static {
    /// Returns all products ordered by ascending id.
    async fn list(&self) -> Result<Vec<Product>>;

    /// Retrieves the product with the given id.
    /// Returns `None` if no such product exists.
    async fn get(&self, id: ProductId) -> Result<Option<Product>>;

    /// Stores a new product, assigning its id and creation time.
    async fn insert(&self, product: NewProduct) -> Result<Product>;

    /// Merges `patch` onto the stored product and returns the result.
    /// Returns `None` if no such product exists.
    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Option<Product>>;

    /// Removes the product with the given id.
    /// Returns `true` if the product existed and was removed.
    async fn delete(&self, id: ProductId) -> Result<bool>;

    /// Releases backend resources. Calls made afterwards may fail.
    async fn close(&self) {}
}
