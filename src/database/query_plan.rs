use crate::database::product::{model, ProductTable};
use crate::lined_err;
use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbBackend, EntityTrait, QueryFilter, QueryResult, QuerySelect,
    QueryTrait,
};
use serde::Serialize;
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum LookupColumn {
    ProductName,
    SerialNumber,
}

impl LookupColumn {
    pub fn column_name(&self) -> &'static str {
        match self {
            LookupColumn::ProductName => "product_name",
            LookupColumn::SerialNumber => "serial_number",
        }
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self, LookupColumn::SerialNumber)
    }

    /// A key no seeded row can carry, used to warm the connection up.
    pub fn warm_up_key(&self) -> String {
        format!("some-non-existing-warm-up-{}-to-avoid-cache", self.column_name())
    }
}

impl fmt::Display for LookupColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QueryPlan {
    pub column: LookupColumn,
    pub lines: Vec<String>,
}

impl QueryPlan {
    pub fn uses_index(&self, index_name: &str) -> bool {
        self.lines.iter().any(|line| line.contains(index_name))
    }

    pub fn summary(&self) -> String {
        self.lines.join(" | ")
    }
}

/// Runs the repository's lookup statement for `column` under the backend's
/// `EXPLAIN` and collects the plan lines.
pub async fn explain_lookup<C: ConnectionTrait>(
    db: &C,
    column: LookupColumn,
    value: &str,
) -> Result<QueryPlan> {
    let backend = db.get_database_backend();
    let select = match column {
        LookupColumn::ProductName => {
            ProductTable::find().filter(model::Column::ProductName.eq(value))
        }
        LookupColumn::SerialNumber => ProductTable::find()
            .filter(model::Column::SerialNumber.eq(value))
            .limit(1),
    };

    let mut statement = select.build(backend);
    statement.sql = format!("{} {}", explain_prefix(backend), statement.sql);

    let rows = db
        .query_all(statement)
        .await
        .with_context(|| format!("Failed to explain lookup by {}", column))?;

    let lines = rows
        .iter()
        .map(|row| plan_line(backend, row))
        .collect::<Result<Vec<_>>>()?;

    Ok(QueryPlan { column, lines })
}

fn explain_prefix(backend: DbBackend) -> &'static str {
    match backend {
        DbBackend::Sqlite => "EXPLAIN QUERY PLAN",
        DbBackend::Postgres | DbBackend::MySql => "EXPLAIN",
    }
}

fn plan_line(backend: DbBackend, row: &QueryResult) -> Result<String> {
    let line = match backend {
        DbBackend::Sqlite => row.try_get::<String>("", "detail"),
        DbBackend::Postgres => row.try_get::<String>("", "QUERY PLAN"),
        DbBackend::MySql => {
            let access = row.try_get::<Option<String>>("", "type")?;
            let key = row.try_get::<Option<String>>("", "key")?;
            return Ok(format!(
                "type={} key={}",
                access.unwrap_or_else(|| "-".to_string()),
                key.unwrap_or_else(|| "-".to_string())
            ));
        }
    };
    line.map_err(|e| lined_err!("Unreadable plan row: {}", e))
}
