//! Runtime bootstrap for IPL Plots: tracing, record sources and run metrics.

use tracing_subscriber::EnvFilter;

pub mod metrics;
pub mod slicer;
pub mod source;

pub use metrics::{MetricsRegistry, MetricsSnapshot, RunTimer};
pub use source::{open_source, CsvDirectorySource, CsvFileSource, RecordSource, Records, SourceSpec};

/// Install the global fmt subscriber. `RUST_LOG` overrides the default
/// `info` level. Logs go to stderr so stdout stays free for report output.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
