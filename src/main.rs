use anyhow::Result;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use db_indexing_bench::bench::{self, BenchOptions};
use db_indexing_bench::global::client::db::init_db;
use db_indexing_bench::util::env::EnvConfig;
use db_indexing_bench::util::logging;
use std::path::Path;
use tracing::info;

fn cli() -> Command {
    Command::new("db-indexing-bench")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Seeds a products table and times lookups on an indexed vs an unindexed column")
        .arg(
            Arg::new("database-url")
                .long("database-url")
                .value_name("URL")
                .help("Overrides DATABASE_URL"),
        )
        .arg(
            Arg::new("records")
                .short('n')
                .long("records")
                .value_name("N")
                .value_parser(value_parser!(u64))
                .help("Number of products to seed (default: BENCH_RECORDS or 100000)"),
        )
        .arg(
            Arg::new("batch-size")
                .long("batch-size")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Rows per INSERT statement (default: BENCH_BATCH_SIZE or 1000)"),
        )
        .arg(
            Arg::new("samples")
                .short('s')
                .long("samples")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Timed lookups per column (default: BENCH_SAMPLES or 1)"),
        )
        .arg(
            Arg::new("reset")
                .long("reset")
                .action(ArgAction::SetTrue)
                .help("Drop and recreate the products table before seeding"),
        )
        .arg(
            Arg::new("skip-seed")
                .long("skip-seed")
                .action(ArgAction::SetTrue)
                .conflicts_with("reset")
                .help("Reuse the rows already in the table"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the report as JSON on stdout"),
        )
        .arg(
            Arg::new("logs-dir")
                .long("logs-dir")
                .value_name("DIR")
                .default_value("logs"),
        )
}

fn apply_overrides(mut config: EnvConfig, matches: &ArgMatches) -> Result<(EnvConfig, BenchOptions)> {
    if let Some(url) = matches.get_one::<String>("database-url") {
        config.database_url = Some(url.clone());
    }
    if let Some(records) = matches.get_one::<u64>("records") {
        config.bench_records = *records;
    }
    if let Some(batch_size) = matches.get_one::<usize>("batch-size") {
        config.bench_batch_size = *batch_size;
    }
    if let Some(samples) = matches.get_one::<usize>("samples") {
        config.bench_samples = *samples;
    }
    config.validate()?;

    let mut options = BenchOptions::from_config(&config);
    options.reset = matches.get_flag("reset");
    options.skip_seed = matches.get_flag("skip-seed");
    Ok((config, options))
}

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG may come from .env, so load it before logging starts
    dotenv::dotenv().ok();
    let matches = cli().get_matches();

    let logs_dir = matches
        .get_one::<String>("logs-dir")
        .map(String::as_str)
        .unwrap_or("logs");
    logging::init(Path::new(logs_dir))?;

    let (config, options) = apply_overrides(EnvConfig::load()?, &matches)?;
    info!(
        "Starting index benchmark: {} records, batch size {}, {} sample(s)",
        options.records, options.batch_size, options.samples
    );

    let db = init_db(config.database_url()?).await?;
    let report = bench::run(db, &options).await?;
    report.log_summary();

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
