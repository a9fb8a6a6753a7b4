pub mod args;
pub mod config;
pub mod entries;
pub mod error;
pub mod report;
pub mod stats;
pub mod timestamp;
pub mod utils;

pub use args::Args;
pub use config::{DateRange, ReportConfig};
pub use entries::{open_entries, read_entries, LogEntries, LogEntry};
pub use error::{ReportError, Result};
pub use report::{build_report, generate_report, ReportRow};
pub use stats::{aggregate, UrlStats, UrlStatsMap};
pub use timestamp::{parse_cli_date, parse_timestamp};
