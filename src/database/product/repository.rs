use crate::database::core::{
    BatchOperations, Paginate, Repository, RepositoryError, RepositoryResult,
};
use crate::database::product::model::{self, NewProduct};
use crate::database::product::{Product, ProductTable};
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use tracing::debug;

const ENTITY: &str = "product";

/// Bound parameters per inserted row (`id` is generated by the database).
const PARAMS_PER_ROW: usize = 4;

/// Largest multi-row insert that stays within SQLite's default limit of
/// 32766 bound parameters (PostgreSQL and MySQL allow 65535).
pub const MAX_BATCH_ROWS: usize = 32_766 / PARAMS_PER_ROW;

pub struct ProductRepository<'a, C: ConnectionTrait = DatabaseConnection> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ProductRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &'a C {
        self.db
    }

    /// Lookup on the unindexed column.
    ///
    /// Every matching row is fetched (no `LIMIT`), so the database has to
    /// visit the whole table. More than one match is an error.
    pub async fn find_by_product_name(&self, product_name: &str) -> RepositoryResult<Option<Product>> {
        let mut matches = self.find_all_by_product_name(product_name).await?;
        match matches.len() {
            0 | 1 => Ok(matches.pop()),
            count => Err(RepositoryError::NonUniqueResult {
                entity: ENTITY.to_string(),
                count,
            }),
        }
    }

    pub async fn find_all_by_product_name(&self, product_name: &str) -> RepositoryResult<Vec<Product>> {
        ProductTable::find()
            .filter(model::Column::ProductName.eq(product_name))
            .all(self.db)
            .await
            .map_err(map_err)
    }

    /// Lookup on the column backed by `idx_serial_number`.
    pub async fn find_by_serial_number(&self, serial_number: &str) -> RepositoryResult<Option<Product>> {
        ProductTable::find()
            .filter(model::Column::SerialNumber.eq(serial_number))
            .one(self.db)
            .await
            .map_err(map_err)
    }

    pub async fn insert(&self, product: NewProduct) -> RepositoryResult<Product> {
        self.create(product.into()).await
    }

    /// Inserts `products` in chunks of at most `batch_size` rows, capped at
    /// `MAX_BATCH_ROWS`.
    pub async fn save_all(&self, products: Vec<NewProduct>, batch_size: usize) -> RepositoryResult<u64> {
        if batch_size == 0 {
            return Err(RepositoryError::InvalidData {
                message: "batch size must be greater than zero".to_string(),
            });
        }

        let batch_size = batch_size.min(MAX_BATCH_ROWS);
        let total = products.len();
        let mut inserted = 0u64;
        let mut products = products.into_iter().peekable();

        while products.peek().is_some() {
            let chunk: Vec<model::ActiveModel> = products
                .by_ref()
                .take(batch_size)
                .map(model::ActiveModel::from)
                .collect();
            inserted += self.batch_create(chunk).await?;
            debug!("Saved {}/{} products", inserted, total);
        }

        Ok(inserted)
    }
}

fn map_err(err: sea_orm::DbErr) -> RepositoryError {
    RepositoryError::from_db(ENTITY, err)
}

#[async_trait]
impl<'a, C: ConnectionTrait> Repository<model::Entity> for ProductRepository<'a, C> {
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Product>> {
        ProductTable::find_by_id(id).one(self.db).await.map_err(map_err)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Product>> {
        ProductTable::find()
            .order_by_asc(model::Column::Id)
            .all(self.db)
            .await
            .map_err(map_err)
    }

    async fn create(&self, model: model::ActiveModel) -> RepositoryResult<Product> {
        model.insert(self.db).await.map_err(map_err)
    }

    async fn update(&self, model: model::ActiveModel) -> RepositoryResult<Product> {
        model.update(self.db).await.map_err(map_err)
    }

    async fn delete(&self, id: i32) -> RepositoryResult<bool> {
        let result = ProductTable::delete_by_id(id).exec(self.db).await.map_err(map_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn count(&self) -> RepositoryResult<u64> {
        ProductTable::find().count(self.db).await.map_err(map_err)
    }
}

#[async_trait]
impl<'a, C: ConnectionTrait> Paginate<model::Entity> for ProductRepository<'a, C> {
    async fn paginate(&self, page: u64, per_page: u64) -> RepositoryResult<(Vec<Product>, u64)> {
        if page == 0 || per_page == 0 {
            return Err(RepositoryError::InvalidData {
                message: format!("page ({}) and per_page ({}) must be positive", page, per_page),
            });
        }

        let paginator = ProductTable::find()
            .order_by_asc(model::Column::Id)
            .paginate(self.db, per_page);

        let total_pages = paginator.num_pages().await.map_err(map_err)?;
        let items = paginator.fetch_page(page - 1).await.map_err(map_err)?;

        Ok((items, total_pages))
    }

    async fn find_nth(&self, index: u64) -> RepositoryResult<Option<Product>> {
        ProductTable::find()
            .order_by_asc(model::Column::Id)
            .offset(index)
            .limit(1)
            .one(self.db)
            .await
            .map_err(map_err)
    }
}

#[async_trait]
impl<'a, C: ConnectionTrait> BatchOperations<model::Entity> for ProductRepository<'a, C> {
    async fn batch_create(&self, models: Vec<model::ActiveModel>) -> RepositoryResult<u64> {
        if models.is_empty() {
            return Ok(0);
        }
        ProductTable::insert_many(models)
            .exec_without_returning(self.db)
            .await
            .map_err(map_err)
    }

    async fn batch_delete(&self, ids: Vec<i32>) -> RepositoryResult<u64> {
        let result = ProductTable::delete_many()
            .filter(model::Column::Id.is_in(ids))
            .exec(self.db)
            .await
            .map_err(map_err)?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::test_utils::{memory_db, sample_products};

    #[tokio::test]
    async fn test_save_all_and_count() {
        let db = memory_db().await;
        let repo = ProductRepository::new(&db);

        let inserted = repo.save_all(sample_products(25), 10).await.unwrap();

        assert_eq!(inserted, 25);
        assert_eq!(repo.count().await.unwrap(), 25);
    }

    #[tokio::test]
    async fn test_save_all_rejects_zero_batch() {
        let db = memory_db().await;
        let repo = ProductRepository::new(&db);

        let err = repo.save_all(sample_products(1), 0).await.unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidData { .. }));
        assert_eq!(repo.save_all(Vec::new(), 10).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_save_all_caps_oversized_batches() {
        let db = memory_db().await;
        let repo = ProductRepository::new(&db);
        let rows = MAX_BATCH_ROWS + 9;

        let inserted = repo.save_all(sample_products(rows), usize::MAX).await.unwrap();

        assert_eq!(inserted, rows as u64);
        assert_eq!(repo.count().await.unwrap(), rows as u64);
    }

    #[tokio::test]
    async fn test_lookups_by_both_columns() {
        let db = memory_db().await;
        let repo = ProductRepository::new(&db);
        repo.save_all(sample_products(10), 4).await.unwrap();

        let by_name = repo.find_by_product_name("Product 7").await.unwrap().unwrap();
        let by_serial = repo.find_by_serial_number("SN-0007").await.unwrap().unwrap();

        assert_eq!(by_name, by_serial);
        assert_eq!(by_name.category.as_deref(), Some("Category 7"));
        assert_eq!(by_name.price, 17.0);

        assert!(repo.find_by_product_name("missing").await.unwrap().is_none());
        assert!(repo.find_by_serial_number("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_serial_is_rejected() {
        let db = memory_db().await;
        let repo = ProductRepository::new(&db);
        repo.insert(NewProduct::create("First", "SN-DUP", "Category 0", 1.0))
            .await
            .unwrap();

        let err = repo
            .insert(NewProduct::create("Second", "SN-DUP", "Category 0", 2.0))
            .await
            .unwrap_err();

        assert!(err.is_duplicate(), "unexpected error: {err}");
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_not_unique_result() {
        let db = memory_db().await;
        let repo = ProductRepository::new(&db);
        repo.insert(NewProduct::create("Twin", "SN-A", "Category 0", 1.0))
            .await
            .unwrap();
        repo.insert(NewProduct::create("Twin", "SN-B", "Category 0", 1.0))
            .await
            .unwrap();

        let err = repo.find_by_product_name("Twin").await.unwrap_err();
        assert!(matches!(err, RepositoryError::NonUniqueResult { count: 2, .. }));
        assert_eq!(repo.find_all_by_product_name("Twin").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_find_nth_and_paginate() {
        let db = memory_db().await;
        let repo = ProductRepository::new(&db);
        repo.save_all(sample_products(7), 3).await.unwrap();

        let third = repo.find_nth(2).await.unwrap().unwrap();
        assert_eq!(third.serial_number, "SN-0002");
        assert!(repo.find_nth(7).await.unwrap().is_none());

        let (page, total_pages) = repo.paginate(2, 3).await.unwrap();
        assert_eq!(total_pages, 3);
        assert_eq!(
            page.iter().map(|p| p.serial_number.as_str()).collect::<Vec<_>>(),
            vec!["SN-0003", "SN-0004", "SN-0005"]
        );
        assert!(repo.paginate(0, 3).await.is_err());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = memory_db().await;
        let repo = ProductRepository::new(&db);
        let saved = repo
            .insert(NewProduct::create("Lamp", "SN-LAMP", "Category 3", 30.0))
            .await
            .unwrap();

        let mut active: model::ActiveModel = saved.clone().into();
        active.price = sea_orm::ActiveValue::Set(35.5);
        let updated = repo.update(active).await.unwrap();
        assert_eq!(updated.price, 35.5);
        assert_eq!(repo.find_by_id(saved.id).await.unwrap().unwrap().price, 35.5);

        assert!(repo.delete(saved.id).await.unwrap());
        assert!(!repo.delete(saved.id).await.unwrap());
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_batch_delete() {
        let db = memory_db().await;
        let repo = ProductRepository::new(&db);
        repo.save_all(sample_products(5), 5).await.unwrap();

        let ids: Vec<i32> = repo.find_all().await.unwrap().iter().take(3).map(|p| p.id).collect();
        assert_eq!(repo.batch_delete(ids).await.unwrap(), 3);
        assert_eq!(repo.count().await.unwrap(), 2);
    }
}
