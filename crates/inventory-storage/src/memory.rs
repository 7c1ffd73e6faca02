use async_trait::async_trait;
use inventory_core::error::{Result, StorageError};
use inventory_core::{NewProduct, Product, ProductId, ProductPatch, ProductRepository};
use jiff::Timestamp;
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<ProductId, Product>,
    /// Highest id ever handed out; survives deletes so ids are never reused.
    last_id: i64,
}

/// In-memory implementation of [`ProductRepository`].
///
/// Rows live in a `BTreeMap` keyed by id, so listing is naturally ordered.
/// Each operation holds the lock for its whole duration and is therefore
/// atomic with respect to the others.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    table: RwLock<Table>,
}

impl InMemoryRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with existing rows.
    ///
    /// New ids continue after the largest id among `products`.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let rows: BTreeMap<_, _> = products
            .into_iter()
            .map(|product| (product.id, product))
            .collect();
        let last_id = rows.keys().next_back().map_or(0, |id| id.get().max(0));

        Self {
            table: RwLock::new(Table { rows, last_id }),
        }
    }

    /// Number of stored products.
    pub fn len(&self) -> usize {
        self.table.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ProductRepository for InMemoryRepository {
    async fn list(&self) -> Result<Vec<Product>> {
        Ok(self.table.read().rows.values().cloned().collect())
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>> {
        Ok(self.table.read().rows.get(&id).cloned())
    }

    async fn insert(&self, product: NewProduct) -> Result<Product> {
        let mut table = self.table.write();
        let next = table.last_id.checked_add(1).ok_or_else(|| {
            StorageError::Operation("product id space is exhausted".to_string())
        })?;
        table.last_id = next;

        let id = ProductId::new(next);
        let product = product.into_product(id, Timestamp::now());
        table.rows.insert(id, product.clone());

        Ok(product)
    }

    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Option<Product>> {
        let mut table = self.table.write();

        let Some(product) = table.rows.get_mut(&id) else {
            return Ok(None);
        };

        patch.apply(product);
        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: ProductId) -> Result<bool> {
        Ok(self.table.write().rows.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn new_product(name: &str, price: Decimal) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: None,
            price,
        }
    }

    fn existing(id: i64, name: &str) -> Product {
        new_product(name, dec!(1.00)).into_product(ProductId::new(id), Timestamp::UNIX_EPOCH)
    }

    #[tokio::test]
    async fn insert_and_get() {
        let repo = InMemoryRepository::new();

        let created = repo
            .insert(new_product("Webcam HD", dec!(25.50)))
            .await
            .unwrap();

        let got = repo.get(created.id).await.unwrap().unwrap();
        assert_eq!(got, created);
        assert_eq!(got.name, "Webcam HD");
        assert_eq!(got.price, dec!(25.50));
    }

    #[tokio::test]
    async fn get_nonexistent() {
        let repo = InMemoryRepository::new();

        let result = repo.get(ProductId::new(1)).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn ids_are_increasing_and_never_reused() {
        let repo = InMemoryRepository::new();

        let first = repo.insert(new_product("a", dec!(1))).await.unwrap();
        let second = repo.insert(new_product("b", dec!(1))).await.unwrap();
        assert!(second.id > first.id);

        assert!(repo.delete(second.id).await.unwrap());
        let third = repo.insert(new_product("c", dec!(1))).await.unwrap();
        assert!(third.id > second.id);
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let repo = InMemoryRepository::with_products([
            existing(5, "cinco"),
            existing(2, "dos"),
            existing(9, "nueve"),
        ]);

        let ids: Vec<i64> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|product| product.id.get())
            .collect();
        assert_eq!(ids, vec![2, 5, 9]);
    }

    #[tokio::test]
    async fn ids_continue_after_seeded_rows() {
        let repo = InMemoryRepository::with_products([existing(5, "cinco"), existing(2, "dos")]);

        let created = repo.insert(new_product("seis", dec!(1))).await.unwrap();
        assert_eq!(created.id, ProductId::new(6));
    }

    #[tokio::test]
    async fn insert_fails_once_ids_are_exhausted() {
        let repo = InMemoryRepository::with_products([existing(i64::MAX, "ultimo")]);

        let err = repo.insert(new_product("otro", dec!(1))).await.unwrap_err();
        assert!(matches!(err, StorageError::Operation(_)));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn update_merges_supplied_fields() {
        let repo = InMemoryRepository::new();
        let created = repo
            .insert(NewProduct {
                name: "Webcam HD".to_string(),
                description: Some("720p".to_string()),
                price: dec!(25.50),
            })
            .await
            .unwrap();

        let patch = ProductPatch {
            price: Some(dec!(30)),
            ..Default::default()
        };
        let updated = repo.update(created.id, patch).await.unwrap().unwrap();

        assert_eq!(updated.price, dec!(30));
        assert_eq!(updated.name, "Webcam HD");
        assert_eq!(updated.description.as_deref(), Some("720p"));
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(repo.get(created.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn empty_update_returns_record_unchanged() {
        let repo = InMemoryRepository::new();
        let created = repo.insert(new_product("Mouse", dec!(10))).await.unwrap();

        let updated = repo
            .update(created.id, ProductPatch::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated, created);
    }

    #[tokio::test]
    async fn update_nonexistent() {
        let repo = InMemoryRepository::new();

        let result = repo
            .update(ProductId::new(42), ProductPatch::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn delete_existing_then_again() {
        let repo = InMemoryRepository::new();
        let created = repo.insert(new_product("Mouse", dec!(10))).await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(repo.get(created.id).await.unwrap().is_none());
        assert!(!repo.delete(created.id).await.unwrap());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn concurrent_inserts_get_distinct_ids() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut handles = vec![];

        for i in 0..10u64 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.insert(new_product(&format!("product-{i:02}"), Decimal::from(i)))
                    .await
                    .unwrap()
                    .id
            }));
        }

        let mut ids = vec![];
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort();
        ids.dedup();

        assert_eq!(ids.len(), 10);
        assert_eq!(repo.len(), 10);
    }
}
