use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(DbErr),

    #[error("Entity not found: {entity}")]
    NotFound { entity: String },

    #[error("Duplicate entry: {entity} ({detail})")]
    DuplicateEntry { entity: String, detail: String },

    #[error("Expected at most one {entity}, found {count}")]
    NonUniqueResult { entity: String, count: usize },

    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    #[error("Transaction failed: {message}")]
    TransactionFailed { message: String },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),
}

impl RepositoryError {
    /// Maps a driver error, lifting unique-constraint violations out of `DbErr`.
    pub fn from_db(entity: &str, err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => RepositoryError::DuplicateEntry {
                entity: entity.to_string(),
                detail,
            },
            _ => RepositoryError::Database(err),
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, RepositoryError::DuplicateEntry { .. })
    }
}

impl From<DbErr> for RepositoryError {
    fn from(err: DbErr) -> Self {
        RepositoryError::from_db("row", err)
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_db_error_is_wrapped() {
        let err = RepositoryError::from(DbErr::Custom("boom".to_string()));

        assert!(matches!(err, RepositoryError::Database(_)));
        assert!(!err.is_duplicate());
        assert!(err.to_string().starts_with("Database error:"));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_non_unique_message() {
        let err = RepositoryError::NonUniqueResult {
            entity: "product".to_string(),
            count: 2,
        };
        assert_eq!(err.to_string(), "Expected at most one product, found 2");
    }
}
