use crate::bench::report::{BenchReport, BenchTarget, LookupTiming};
use crate::database::core::{Paginate, Repository, RepositoryResult};
use crate::database::product::{seed_products, Product, ProductRepository};
use crate::database::query_plan::{explain_lookup, LookupColumn};
use crate::database::schema::{create_schema, reset_schema};
use crate::util::env::EnvConfig;
use crate::util::random::random_offset;
use crate::util::traits::OptionExt;
use crate::{ensure_lined, lined_err};
use anyhow::Result;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend};
use std::time::Instant;
use tracing::{debug, error, info, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchOptions {
    pub records: u64,
    pub batch_size: usize,
    pub samples: usize,
    pub reset: bool,
    pub skip_seed: bool,
}

impl BenchOptions {
    pub fn from_config(config: &EnvConfig) -> Self {
        Self {
            records: config.bench_records,
            batch_size: config.bench_batch_size,
            samples: config.bench_samples,
            reset: false,
            skip_seed: false,
        }
    }
}

pub fn backend_label(backend: DbBackend) -> &'static str {
    match backend {
        DbBackend::Postgres => "PostgreSQL",
        DbBackend::MySql => "MySQL",
        DbBackend::Sqlite => "SQLite",
    }
}

async fn lookup<C: ConnectionTrait>(
    repo: &ProductRepository<'_, C>,
    column: LookupColumn,
    value: &str,
) -> RepositoryResult<Option<Product>> {
    match column {
        LookupColumn::ProductName => repo.find_by_product_name(value).await,
        LookupColumn::SerialNumber => repo.find_by_serial_number(value).await,
    }
}

/// Chooses a uniformly random stored product to look up. `None` when the table is empty.
pub async fn pick_target<C: ConnectionTrait>(
    repo: &ProductRepository<'_, C>,
) -> Result<Option<BenchTarget>> {
    let total = repo.count().await?;
    let Some(offset) = random_offset(total) else {
        error!("No products in the database, nothing to sample");
        return Ok(None);
    };
    debug!("Total products: {}. Random offset: {}", total, offset);

    let Some(product) = repo.find_nth(offset).await? else {
        error!("No product at offset {} of {}", offset, total);
        return Ok(None);
    };
    info!(
        "Randomly selected target - name: '{}', serial: '{}'",
        product.product_name, product.serial_number
    );

    if repo.find_by_serial_number(&product.serial_number).await?.is_none() {
        return Err(lined_err!(
            "Serial '{}' selected at offset {} cannot be read back",
            product.serial_number,
            offset
        ));
    }

    Ok(Some(BenchTarget {
        product_name: product.product_name,
        serial_number: product.serial_number,
    }))
}

/// Warms up with a key that cannot match, then times `samples` lookups of `value`.
pub async fn time_lookup<C: ConnectionTrait>(
    repo: &ProductRepository<'_, C>,
    column: LookupColumn,
    value: &str,
    samples: usize,
) -> Result<LookupTiming> {
    ensure_lined!(samples > 0, "At least one sample is required");

    lookup(repo, column, &column.warm_up_key()).await?;

    let mut samples_ns = Vec::with_capacity(samples);
    let mut found = true;
    for _ in 0..samples {
        let started = Instant::now();
        let product = lookup(repo, column, value).await?;
        samples_ns.push(started.elapsed().as_nanos() as u64);
        found &= product.is_some();
    }

    Ok(LookupTiming {
        column,
        value: value.to_string(),
        found,
        samples_ns,
    })
}

fn log_timing(backend: &str, timing: &LookupTiming) {
    let mean = timing.mean();
    let label = if timing.column.is_indexed() { "index" } else { "no index" };
    info!(
        "[{} - {}] {} '{}' lookup: {} ms ({} ns) over {} sample(s)",
        backend,
        label,
        timing.column,
        timing.value,
        mean.as_millis(),
        mean.as_nanos(),
        timing.samples_ns.len()
    );
}

/// Prepares the table, seeds it, and times the unindexed then the indexed lookup.
pub async fn run(db: &DatabaseConnection, options: &BenchOptions) -> Result<BenchReport> {
    let backend = backend_label(db.get_database_backend());

    if options.reset {
        reset_schema(db).await?;
    } else {
        create_schema(db).await?;
    }

    if options.skip_seed {
        info!("Skipping seed, reusing existing rows");
    } else {
        seed_products(db, options.records, options.batch_size).await?;
    }

    let repo = ProductRepository::new(db);
    let rows = repo.count().await?;
    let target = pick_target(&repo)
        .await?
        .or_err("No target product could be selected; seed the table first")?;

    let unindexed = time_lookup(
        &repo,
        LookupColumn::ProductName,
        &target.product_name,
        options.samples,
    )
    .await?;
    log_timing(backend, &unindexed);

    let indexed = time_lookup(
        &repo,
        LookupColumn::SerialNumber,
        &target.serial_number,
        options.samples,
    )
    .await?;
    log_timing(backend, &indexed);

    for timing in [&unindexed, &indexed] {
        if !timing.found {
            return Err(lined_err!(
                "Product with {} '{}' not found",
                timing.column,
                timing.value
            ));
        }
    }

    let mut plans = Vec::new();
    for (column, value) in [
        (LookupColumn::ProductName, &target.product_name),
        (LookupColumn::SerialNumber, &target.serial_number),
    ] {
        match explain_lookup(db, column, value).await {
            Ok(plan) => plans.push(plan),
            Err(e) => warn!("Could not capture plan for {}: {:#}", column, e),
        }
    }

    Ok(BenchReport {
        backend: backend.to_string(),
        rows,
        target,
        unindexed,
        indexed,
        plans,
    })
}
