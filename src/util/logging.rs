use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing::{info, Event, Subscriber};
use tracing_subscriber::{
    fmt::{
        format::{self, FormatEvent, FormatFields},
        time::FormatTime,
        FmtContext,
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

const CRATE_TARGET_PREFIX: &str = "db_indexing_bench::";
const DEFAULT_FILTER: &str = "info,sqlx=warn,sea_orm=warn";

struct UtcMillisTimer;

impl FormatTime for UtcMillisTimer {
    fn format_time(&self, w: &mut format::Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        write!(w, "{}", now.format("%Y-%m-%dT%H:%M:%S%.3f"))
    }
}

/// `<timestamp>  <LEVEL> <module:path>:<line>: <fields>`
struct CompactTargetFormatter;

impl<S, N> FormatEvent<S, N> for CompactTargetFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();

        UtcMillisTimer.format_time(&mut writer)?;
        write!(writer, "  {} {}", meta.level(), short_target(meta.target()))?;

        if let Some(line) = meta.line() {
            write!(writer, ":{}", line)?;
        }

        write!(writer, ": ")?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

fn short_target(target: &str) -> String {
    target
        .strip_prefix(CRATE_TARGET_PREFIX)
        .unwrap_or(target)
        .replace("::", ":")
}

fn filter_directives(rust_log: Option<String>) -> String {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Installs console + file logging and returns the log file path.
///
/// The filter comes from `RUST_LOG` as it is set when this runs, so `.env`
/// has to be loaded first.
pub fn init(logs_dir: &Path) -> Result<String> {
    if !logs_dir.exists() {
        fs::create_dir_all(logs_dir)?;
    }

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_file_path = logs_dir
        .join(format!("bench_{}.log", timestamp))
        .to_string_lossy()
        .into_owned();
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .event_format(CompactTargetFormatter);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .event_format(CompactTargetFormatter);

    let filter =
        tracing_subscriber::EnvFilter::new(filter_directives(std::env::var("RUST_LOG").ok()));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(filter)
        .try_init()?;

    info!("Logs are being written to: {}", log_file_path);

    Ok(log_file_path)
}
