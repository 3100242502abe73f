pub mod model;
pub mod repository;
pub mod seed;

pub use model::{NewProduct, SERIAL_NUMBER_INDEX};
pub use model::Entity as ProductTable;
pub use model::Model as Product;
pub use repository::ProductRepository;
pub use seed::{seed_products, ProductSeed};
