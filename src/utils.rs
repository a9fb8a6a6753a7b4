use std::ffi::OsString;
use std::path::{Path, PathBuf};
use time::macros::format_description;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

use crate::args::Args;

pub const REPORT_EXTENSION: &str = "csv";

/// Logs go to stderr so the report table owns stdout. `RUST_LOG` overrides
/// the level picked by `verbose`.
pub fn setup_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let timer = UtcTime::new(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
    ));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(timer)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Appends `.csv` to a report name that has no extension.
pub fn with_csv_extension(name: &Path) -> PathBuf {
    let has_suffix = name
        .to_string_lossy()
        .ends_with(&format!(".{REPORT_EXTENSION}"));
    if name.extension().is_some() || has_suffix {
        return name.to_path_buf();
    }

    let mut with_extension = OsString::from(name.as_os_str());
    with_extension.push(".");
    with_extension.push(REPORT_EXTENSION);
    PathBuf::from(with_extension)
}

pub fn validate_args(args: &Args) -> anyhow::Result<()> {
    if !args.delim.is_ascii() {
        anyhow::bail!("--delim must be a single ASCII character");
    }

    if let (Some(from), Some(to)) = (args.from, args.to) {
        if from > to {
            anyhow::bail!("--from ({}) is later than --to ({})", from, to);
        }
    }

    Ok(())
}
