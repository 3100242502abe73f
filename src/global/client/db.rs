use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::info;

static DB_CONNECTION: OnceCell<DatabaseConnection> = OnceCell::const_new();

fn is_sqlite(database_url: &str) -> bool {
    database_url.starts_with("sqlite:")
}

pub fn connect_options(database_url: &str) -> ConnectOptions {
    let mut opt = ConnectOptions::new(database_url.to_string());
    if is_sqlite(database_url) {
        // an in-memory database lives and dies with its connection
        opt.max_connections(1).min_connections(1);
    } else {
        opt.max_connections(50)
            .min_connections(5)
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(3600));
    }
    opt.connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(3))
        .sqlx_logging(false);
    opt
}

pub async fn connect(database_url: &str) -> Result<DatabaseConnection> {
    let connection = Database::connect(connect_options(database_url)).await?;
    info!("Connected to {:?} database", connection.get_database_backend());
    Ok(connection)
}

/// Opens the process-wide pool on first call; later calls return the same pool.
pub async fn init_db(database_url: &str) -> Result<&'static DatabaseConnection> {
    DB_CONNECTION
        .get_or_try_init(|| async { connect(database_url).await })
        .await
}
