use crate::database::core::{Repository, RepositoryResult, TransactionManager};
use crate::database::product::{NewProduct, ProductRepository};
use sea_orm::DatabaseConnection;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

pub const CATEGORY_COUNT: u64 = 100;
pub const BASE_PRICE: f64 = 10.0;

pub struct ProductSeed;

impl ProductSeed {
    /// Product `index` of a seed run. Names and serials are unique by construction.
    pub fn generate(index: u64) -> NewProduct {
        let name_part = Uuid::new_v4().simple().to_string();
        NewProduct::create(
            format!("Product {}_{}", &name_part[..8], index),
            Uuid::new_v4().to_string(),
            format!("Category {}", index % CATEGORY_COUNT),
            BASE_PRICE + index as f64,
        )
    }

    pub fn generate_batch(start: u64, len: u64) -> Vec<NewProduct> {
        (start..start + len).map(Self::generate).collect()
    }
}

/// Inserts `records` generated products in a single transaction and returns
/// the table's row count afterwards.
pub async fn seed_products(
    db: &DatabaseConnection,
    records: u64,
    batch_size: usize,
) -> RepositoryResult<u64> {
    let repo = ProductRepository::new(db);
    if records == 0 {
        info!("Nothing to seed");
        return repo.count().await;
    }

    info!("Seeding {} products (batch size {})...", records, batch_size);
    let started = Instant::now();
    let products = ProductSeed::generate_batch(0, records);

    let inserted = TransactionManager::new(db)
        .execute(move |txn| {
            Box::pin(async move { ProductRepository::new(txn).save_all(products, batch_size).await })
        })
        .await?;

    let total = repo.count().await?;
    info!(
        "Seeded {} products in {:?}. Total rows: {}",
        inserted,
        started.elapsed(),
        total
    );
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::core::RepositoryError;
    use crate::test::test_utils::memory_db;
    use std::collections::HashSet;

    #[test]
    fn test_generate_layout() {
        let product = ProductSeed::generate(205);

        assert!(product.product_name.starts_with("Product "));
        assert!(product.product_name.ends_with("_205"));
        assert_eq!(product.product_name.len(), "Product ".len() + 8 + "_205".len());
        assert_eq!(product.category.as_deref(), Some("Category 5"));
        assert_eq!(product.price, 215.0);
        assert!(Uuid::parse_str(&product.serial_number).is_ok());
    }

    #[test]
    fn test_generate_batch_is_unique() {
        let batch = ProductSeed::generate_batch(10, 50);

        assert_eq!(batch.len(), 50);
        assert!(batch[0].product_name.ends_with("_10"));
        let serials: HashSet<_> = batch.iter().map(|p| p.serial_number.clone()).collect();
        let names: HashSet<_> = batch.iter().map(|p| p.product_name.clone()).collect();
        assert_eq!(serials.len(), 50);
        assert_eq!(names.len(), 50);
    }

    #[tokio::test]
    async fn test_seed_products() {
        let db = memory_db().await;

        assert_eq!(seed_products(&db, 0, 10).await.unwrap(), 0);
        assert_eq!(seed_products(&db, 123, 50).await.unwrap(), 123);
        assert_eq!(seed_products(&db, 7, 50).await.unwrap(), 130);
    }

    #[tokio::test]
    async fn test_seed_rolls_back_on_failure() {
        let db = memory_db().await;

        let err = seed_products(&db, 10, 0).await.unwrap_err();

        assert!(matches!(err, RepositoryError::InvalidData { .. }));
        assert_eq!(ProductRepository::new(&db).count().await.unwrap(), 0);
    }
}
