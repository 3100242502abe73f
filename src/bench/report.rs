use crate::database::query_plan::{LookupColumn, QueryPlan};
use serde::Serialize;
use std::time::Duration;
use tracing::info;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BenchTarget {
    pub product_name: String,
    pub serial_number: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LookupTiming {
    pub column: LookupColumn,
    pub value: String,
    pub found: bool,
    pub samples_ns: Vec<u64>,
}

impl LookupTiming {
    pub fn min(&self) -> Duration {
        Duration::from_nanos(self.samples_ns.iter().copied().min().unwrap_or_default())
    }

    pub fn max(&self) -> Duration {
        Duration::from_nanos(self.samples_ns.iter().copied().max().unwrap_or_default())
    }

    pub fn mean(&self) -> Duration {
        if self.samples_ns.is_empty() {
            return Duration::ZERO;
        }
        let total: u128 = self.samples_ns.iter().map(|ns| *ns as u128).sum();
        Duration::from_nanos((total / self.samples_ns.len() as u128) as u64)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BenchReport {
    pub backend: String,
    pub rows: u64,
    pub target: BenchTarget,
    pub unindexed: LookupTiming,
    pub indexed: LookupTiming,
    pub plans: Vec<QueryPlan>,
}

impl BenchReport {
    /// Mean unindexed lookup time over mean indexed lookup time.
    pub fn speedup(&self) -> Option<f64> {
        let indexed = self.indexed.mean().as_nanos();
        if indexed == 0 {
            return None;
        }
        Some(self.unindexed.mean().as_nanos() as f64 / indexed as f64)
    }

    pub fn log_summary(&self) {
        info!(
            "{} rows on {}: {} mean {:?} (min {:?}, max {:?}) vs {} mean {:?} (min {:?}, max {:?})",
            self.rows,
            self.backend,
            self.unindexed.column,
            self.unindexed.mean(),
            self.unindexed.min(),
            self.unindexed.max(),
            self.indexed.column,
            self.indexed.mean(),
            self.indexed.min(),
            self.indexed.max(),
        );
        match self.speedup() {
            Some(speedup) => info!("Indexed lookup speedup: {:.1}x", speedup),
            None => info!("Indexed lookup too fast to measure a speedup"),
        }
        for plan in &self.plans {
            info!("Plan for {}: {}", plan.column, plan.summary());
        }
    }
}
