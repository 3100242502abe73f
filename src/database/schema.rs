use crate::database::product::{model, ProductTable, SERIAL_NUMBER_INDEX};
use anyhow::{Context, Result};
use sea_orm::sea_query::{Index, Table};
use sea_orm::{ConnectionTrait, Schema};
use tracing::info;

/// Creates `products` and its unique index on `serial_number` if missing.
pub async fn create_schema<C: ConnectionTrait>(db: &C) -> Result<()> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut table = schema.create_table_from_entity(ProductTable);
    table.if_not_exists();
    db.execute(backend.build(&table))
        .await
        .context("Failed to create products table")?;

    let index = Index::create()
        .name(SERIAL_NUMBER_INDEX)
        .table(ProductTable)
        .col(model::Column::SerialNumber)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(backend.build(&index))
        .await
        .with_context(|| format!("Failed to create index {}", SERIAL_NUMBER_INDEX))?;

    info!("Schema ready on {:?}", backend);
    Ok(())
}

pub async fn drop_schema<C: ConnectionTrait>(db: &C) -> Result<()> {
    let backend = db.get_database_backend();
    let table = Table::drop().table(ProductTable).if_exists().to_owned();
    db.execute(backend.build(&table))
        .await
        .context("Failed to drop products table")?;
    info!("Dropped products table");
    Ok(())
}

pub async fn reset_schema<C: ConnectionTrait>(db: &C) -> Result<()> {
    drop_schema(db).await?;
    create_schema(db).await
}
