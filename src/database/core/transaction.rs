use crate::database::core::error::{RepositoryError, RepositoryResult};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub type TxFuture<'c, R> = Pin<Box<dyn Future<Output = RepositoryResult<R>> + Send + 'c>>;

pub struct TransactionManager<'a> {
    conn: &'a DatabaseConnection,
}

impl<'a> TransactionManager<'a> {
    pub fn new(conn: &'a DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Commits when `f` succeeds, rolls back when it fails.
    pub async fn execute<F, R>(&self, f: F) -> RepositoryResult<R>
    where
        F: for<'c> FnOnce(&'c DatabaseTransaction) -> TxFuture<'c, R>,
    {
        let txn = self
            .conn
            .begin()
            .await
            .map_err(|e| RepositoryError::TransactionFailed {
                message: format!("Failed to begin transaction: {}", e),
            })?;

        match f(&txn).await {
            Ok(result) => {
                txn.commit()
                    .await
                    .map_err(|e| RepositoryError::TransactionFailed {
                        message: format!("Failed to commit transaction: {}", e),
                    })?;
                Ok(result)
            }
            Err(e) => {
                txn.rollback()
                    .await
                    .map_err(|e| RepositoryError::TransactionFailed {
                        message: format!("Failed to rollback transaction: {}", e),
                    })?;
                Err(e)
            }
        }
    }

    pub async fn execute_with_retry<F, R>(&self, f: F, max_retries: u32) -> RepositoryResult<R>
    where
        F: for<'c> Fn(&'c DatabaseTransaction) -> TxFuture<'c, R>,
    {
        let mut attempts = 0;

        loop {
            match self.execute(&f).await {
                Ok(result) => return Ok(result),
                Err(e) if attempts < max_retries => {
                    attempts += 1;
                    tracing::warn!(
                        "Transaction failed (attempt {}/{}): {:?}",
                        attempts,
                        max_retries,
                        e
                    );
                    tokio::time::sleep(Duration::from_millis(100 * attempts as u64)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
