pub mod error;
pub mod traits;
pub mod transaction;

pub use error::{RepositoryError, RepositoryResult};
pub use traits::{BatchOperations, Paginate, Repository};
pub use transaction::{TransactionManager, TxFuture};
