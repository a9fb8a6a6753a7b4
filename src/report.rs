use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;
use tracing::info;

use crate::config::ReportConfig;
use crate::entries::read_entries;
use crate::error::{ReportError, Result};
use crate::stats::{aggregate, UrlStatsMap};

pub const REPORT_HEADER: [&str; 3] = ["url", "page_views", "userids"];

const URL_WIDTH: usize = 20;
const COUNT_WIDTH: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub url: String,
    pub page_views: u64,
    #[serde(rename = "userids")]
    pub unique_users: u64,
}

/// Snapshots the stats into rows, keeping the map's iteration order.
pub fn build_report(stats: &UrlStatsMap) -> Vec<ReportRow> {
    stats
        .iter()
        .map(|(url, stats)| ReportRow {
            url: url.to_string(),
            page_views: stats.page_views,
            unique_users: stats.unique_user_count(),
        })
        .collect()
}

/// Writes the aligned table: url left in 20 columns, counts right in 15.
pub fn write_table<W: Write>(rows: &[ReportRow], out: &mut W) -> io::Result<()> {
    let [url, page_views, userids] = REPORT_HEADER;
    writeln!(
        out,
        "{url:<URL_WIDTH$}{page_views:>COUNT_WIDTH$}{userids:>COUNT_WIDTH$}"
    )?;
    for row in rows {
        writeln!(
            out,
            "{:<URL_WIDTH$}{:>COUNT_WIDTH$}{:>COUNT_WIDTH$}",
            row.url, row.page_views, row.unique_users
        )?;
    }
    Ok(())
}

pub fn print_report<W: Write>(rows: &[ReportRow], out: &mut W) -> Result<()> {
    write_table(rows, out)
        .and_then(|_| out.flush())
        .map_err(ReportError::Output)
}

/// Saves, then prints, whichever of the two `config` enables. A failed save
/// leaves `out` untouched.
pub fn publish_report<W: Write>(rows: &[ReportRow], config: &ReportConfig, out: &mut W) -> Result<()> {
    if let Some(path) = &config.report_file_name {
        save_report(rows, path)?;
    }
    if config.verbose {
        print_report(rows, out)?;
    }
    Ok(())
}

/// Persists the rows as comma-separated text with a header line.
pub fn save_report(rows: &[ReportRow], path: &Path) -> Result<()> {
    let io_error = |source: io::Error| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(file);

    writer.write_record(REPORT_HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(io_error)?;

    info!(action = "save", component = "report", path = ?path, rows = rows.len(), "Report saved");
    Ok(())
}

/// Reads back a report written by [`save_report`].
pub fn load_report(path: &Path) -> Result<Vec<ReportRow>> {
    let file = File::open(path).map_err(|e| ReportError::from_open(path, e))?;
    let mut reader = csv::Reader::from_reader(file);
    let rows = reader.deserialize().collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Runs one report: read, filter, aggregate, then save and/or print.
///
/// Nothing is printed or written unless the whole log was aggregated
/// without error.
pub fn generate_report(config: &ReportConfig) -> Result<Vec<ReportRow>> {
    let total_start_time = Instant::now();
    info!(
        action = "start",
        component = "report",
        log_path = ?config.log_path,
        from = ?config.range.from,
        to = ?config.range.to,
        "Starting traffic report"
    );

    let stats = aggregate(read_entries(config)?)?;
    let rows = build_report(&stats);

    publish_report(&rows, config, &mut io::stdout().lock())?;

    info!(
        action = "complete",
        component = "report",
        rows = rows.len(),
        duration_ms = total_start_time.elapsed().as_millis(),
        "Report completed"
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::LogEntry;

    fn row(url: &str, page_views: u64, unique_users: u64) -> ReportRow {
        ReportRow {
            url: url.to_string(),
            page_views,
            unique_users,
        }
    }

    #[test]
    fn report_follows_map_order() {
        let mut stats = UrlStatsMap::new();
        stats.record(LogEntry::new("/b", "1"));
        stats.record(LogEntry::new("/a", "1"));
        stats.record(LogEntry::new("/b", "2"));
        stats.record(LogEntry::new("/b", "2"));

        assert_eq!(build_report(&stats), vec![row("/b", 3, 2), row("/a", 1, 1)]);
    }

    #[test]
    fn table_columns_are_fixed_width() {
        let mut out = Vec::new();
        write_table(&[row("/contact.html", 9, 3)], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "url                      page_views        userids"
        );
        assert_eq!(
            lines[1],
            "/contact.html                     9              3"
        );
        assert_eq!(lines[1].len(), 50);
    }

    #[test]
    fn long_urls_are_not_truncated() {
        let mut out = Vec::new();
        let url = "/a/very/long/path/that/overflows.html";
        write_table(&[row(url, 1, 1)], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with(url));
    }

    #[test]
    fn saved_report_quotes_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        save_report(&[row("/search?q=a,b", 2, 1)], &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "url,page_views,userids\n\"/search?q=a,b\",2,1\n");
    }

    #[test]
    fn empty_report_still_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        save_report(&[], &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "url,page_views,userids\n");
        assert!(load_report(&path).unwrap().is_empty());
    }

    #[test]
    fn failed_save_prints_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReportConfig::new("access.log")
            .with_report_file_name(dir.path().join("missing").join("report.csv"));
        let mut out = Vec::new();

        let err = publish_report(&[row("/a", 1, 1)], &config, &mut out).unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn publish_prints_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReportConfig::new("access.log").with_report_file_name(dir.path().join("out"));
        let mut out = Vec::new();

        publish_report(&[row("/a", 1, 1)], &config, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
        assert_eq!(
            load_report(&dir.path().join("out.csv")).unwrap(),
            vec![row("/a", 1, 1)]
        );
    }

    #[test]
    fn quiet_publish_prints_nothing() {
        let config = ReportConfig::new("access.log").quiet();
        let mut out = Vec::new();
        publish_report(&[row("/a", 1, 1)], &config, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn unwritable_destination_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.csv");
        let err = save_report(&[row("/a", 1, 1)], &path).unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
    }
}
