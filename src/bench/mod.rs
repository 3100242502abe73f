pub mod harness;
pub mod report;

pub use harness::{run, BenchOptions};
pub use report::{BenchReport, BenchTarget, LookupTiming};
