use crate::database::core::error::RepositoryResult;
use async_trait::async_trait;
use sea_orm::EntityTrait;

/// CRUD surface shared by entity repositories keyed by an `i32` id.
#[async_trait]
pub trait Repository<T: EntityTrait> {
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<T::Model>>;
    async fn find_all(&self) -> RepositoryResult<Vec<T::Model>>;
    async fn create(&self, model: T::ActiveModel) -> RepositoryResult<T::Model>;
    async fn update(&self, model: T::ActiveModel) -> RepositoryResult<T::Model>;
    async fn delete(&self, id: i32) -> RepositoryResult<bool>;
    async fn count(&self) -> RepositoryResult<u64>;
}

#[async_trait]
pub trait Paginate<T: EntityTrait> {
    /// `page` is 1-based. Returns the page items and the total number of pages.
    async fn paginate(&self, page: u64, per_page: u64) -> RepositoryResult<(Vec<T::Model>, u64)>;

    /// The single row at `index` in primary-key order.
    async fn find_nth(&self, index: u64) -> RepositoryResult<Option<T::Model>>;
}

#[async_trait]
pub trait BatchOperations<T: EntityTrait> {
    /// Returns the number of inserted rows.
    async fn batch_create(&self, models: Vec<T::ActiveModel>) -> RepositoryResult<u64>;
    async fn batch_delete(&self, ids: Vec<i32>) -> RepositoryResult<u64>;
}
