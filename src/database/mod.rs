pub mod core;
pub mod product;
pub mod query_plan;
pub mod schema;
