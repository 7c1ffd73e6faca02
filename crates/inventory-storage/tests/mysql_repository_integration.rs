use inventory_core::{NewProduct, ProductId, ProductPatch};
use inventory_storage::mysql::PRODUCTS_DDL;
use inventory_storage::{MySqlRepository, ProductRepository};
use inventory_test_infra::mysql::{MySqlServer, MysqlConfig};
use rust_decimal::dec;
use rust_decimal::Decimal;

struct Fixture {
    _mysql: MySqlServer,
    repo: MySqlRepository,
}

impl Fixture {
    async fn start() -> Self {
        let mysql = MySqlServer::new(MysqlConfig::builder().build())
            .await
            .expect("start mysql");
        let pool = mysql
            .pool_with_schema(PRODUCTS_DDL)
            .await
            .expect("create schema");

        Self {
            _mysql: mysql,
            repo: MySqlRepository::new(pool),
        }
    }
}

fn product(name: &str, description: Option<&str>, price: Decimal) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        description: description.map(str::to_string),
        price,
    }
}

#[tokio::test]
async fn insert_and_get_product() {
    let fixture = Fixture::start().await;

    let created = fixture
        .repo
        .insert(product("Webcam HD", Some("720p"), dec!(25.50)))
        .await
        .unwrap();

    let got = fixture.repo.get(created.id).await.unwrap().unwrap();
    assert_eq!(got.name, "Webcam HD");
    assert_eq!(got.description.as_deref(), Some("720p"));
    assert_eq!(got.price, dec!(25.50));
    assert_eq!(got.created_at, created.created_at);
}

#[tokio::test]
async fn insert_returns_the_stored_row() {
    let fixture = Fixture::start().await;

    let created = fixture
        .repo
        .insert(product("Teclado", None, dec!(12.5)))
        .await
        .unwrap();

    assert_eq!(created.price.scale(), 2);
    let got = fixture.repo.get(created.id).await.unwrap().unwrap();
    assert_eq!(got, created);
}

#[tokio::test]
async fn get_returns_none_for_unknown_id() {
    let fixture = Fixture::start().await;

    let got = fixture.repo.get(ProductId::new(999)).await.unwrap();
    assert!(got.is_none());
}

#[tokio::test]
async fn list_is_ordered_by_id() {
    let fixture = Fixture::start().await;

    for (id, name) in [(5, "cinco"), (2, "dos"), (9, "nueve")] {
        sqlx::query("INSERT INTO products (id, name, price, created_at) VALUES (?, ?, 1.00, 0)")
            .bind(id)
            .bind(name)
            .execute(fixture.repo.pool())
            .await
            .unwrap();
    }

    let ids: Vec<i64> = fixture
        .repo
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|product| product.id.get())
        .collect();
    assert_eq!(ids, vec![2, 5, 9]);
}

#[tokio::test]
async fn update_merges_only_supplied_fields() {
    let fixture = Fixture::start().await;
    let created = fixture
        .repo
        .insert(product("Webcam HD", Some("720p"), dec!(25.50)))
        .await
        .unwrap();

    let patch = ProductPatch {
        price: Some(dec!(30.00)),
        ..Default::default()
    };
    let updated = fixture
        .repo
        .update(created.id, patch)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.price, dec!(30.00));
    assert_eq!(updated.name, "Webcam HD");
    assert_eq!(updated.description.as_deref(), Some("720p"));
    assert_eq!(fixture.repo.get(created.id).await.unwrap(), Some(updated));
}

#[tokio::test]
async fn empty_update_is_a_no_op() {
    let fixture = Fixture::start().await;
    let created = fixture
        .repo
        .insert(product("Mouse", None, dec!(10.00)))
        .await
        .unwrap();

    let updated = fixture
        .repo
        .update(created.id, ProductPatch::default())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated, created);
}

#[tokio::test]
async fn update_can_clear_description() {
    let fixture = Fixture::start().await;
    let created = fixture
        .repo
        .insert(product("Mouse", Some("RGB"), dec!(10.00)))
        .await
        .unwrap();

    let patch = ProductPatch {
        description: Some(None),
        ..Default::default()
    };
    fixture.repo.update(created.id, patch).await.unwrap();

    let got = fixture.repo.get(created.id).await.unwrap().unwrap();
    assert_eq!(got.description, None);
}

#[tokio::test]
async fn update_returns_none_for_unknown_id() {
    let fixture = Fixture::start().await;

    let patch = ProductPatch {
        name: Some("nuevo".to_string()),
        ..Default::default()
    };
    let got = fixture
        .repo
        .update(ProductId::new(999), patch)
        .await
        .unwrap();
    assert!(got.is_none());
}

#[tokio::test]
async fn delete_is_final() {
    let fixture = Fixture::start().await;
    let created = fixture
        .repo
        .insert(product("Mouse", None, dec!(10.00)))
        .await
        .unwrap();

    assert!(fixture.repo.delete(created.id).await.unwrap());
    assert!(fixture.repo.get(created.id).await.unwrap().is_none());
    assert!(!fixture.repo.delete(created.id).await.unwrap());
}

#[tokio::test]
async fn ids_are_not_reused_after_delete() {
    let fixture = Fixture::start().await;

    let first = fixture
        .repo
        .insert(product("a", None, dec!(1.00)))
        .await
        .unwrap();
    fixture.repo.delete(first.id).await.unwrap();
    let second = fixture
        .repo
        .insert(product("b", None, dec!(1.00)))
        .await
        .unwrap();

    assert!(second.id > first.id);
}

#[tokio::test]
async fn migrate_is_idempotent() {
    let fixture = Fixture::start().await;

    fixture.repo.migrate().await.unwrap();
    fixture.repo.migrate().await.unwrap();
}
