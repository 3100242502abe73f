use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{NotSet, Set};
use serde::{Deserialize, Serialize};

pub const SERIAL_NUMBER_INDEX: &str = "idx_serial_number";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Deliberately left without an index.
    pub product_name: String,
    /// Unique; backed by `idx_serial_number`, created in `database::schema`.
    pub serial_number: String,
    pub category: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A product that has not been persisted yet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub product_name: String,
    pub serial_number: String,
    pub category: Option<String>,
    pub price: f64,
}

impl NewProduct {
    pub fn create(
        product_name: impl Into<String>,
        serial_number: impl Into<String>,
        category: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            serial_number: serial_number.into(),
            category: Some(category.into()),
            price,
        }
    }
}

impl From<NewProduct> for ActiveModel {
    fn from(product: NewProduct) -> Self {
        ActiveModel {
            id: NotSet,
            product_name: Set(product.product_name),
            serial_number: Set(product.serial_number),
            category: Set(product.category),
            price: Set(product.price),
        }
    }
}
