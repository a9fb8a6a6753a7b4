use chrono::{DateTime, Utc};
use clap::Parser;
use std::path::PathBuf;

use crate::config::{DateRange, ReportConfig};
use crate::timestamp::parse_cli_date;

#[derive(Parser, Debug)]
#[command(
    name = "traffic-report",
    about = "Count page views and unique visitors per URL in a web access log",
    version,
    long_about = None,
    arg_required_else_help = true
)]
pub struct Args {
    /// Path to the log file, delimited text with timestamp, url and userid columns
    #[arg(value_name = "LOG_FILE")]
    pub log_path: PathBuf,

    /// Include entries from this date on, "YYYY-MM-DD HH:MM:SS" (UTC). Default is the start of the log
    #[arg(long, value_name = "DATE", value_parser = parse_cli_date)]
    pub from: Option<DateTime<Utc>>,

    /// Include entries up to this date, "YYYY-MM-DD HH:MM:SS" (UTC). Default is the end of the log
    #[arg(long, value_name = "DATE", value_parser = parse_cli_date)]
    pub to: Option<DateTime<Utc>>,

    /// Field delimiter of the log file
    #[arg(short, long, value_name = "DELIMITER", default_value_t = ',')]
    pub delim: char,

    /// Save the report to this file. ".csv" is appended when the name has no extension
    #[arg(short, long, value_name = "FILE_NAME")]
    pub report_name: Option<PathBuf>,

    /// Do not print the report table
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn to_config(&self) -> ReportConfig {
        let mut config = ReportConfig::new(&self.log_path)
            .with_range(DateRange::new(self.from, self.to))
            .with_delimiter(self.delim);
        if let Some(name) = &self.report_name {
            config = config.with_report_file_name(name);
        }
        if self.quiet {
            config = config.quiet();
        }
        config
    }
}
