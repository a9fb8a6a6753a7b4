use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Inclusive `[from, to]` window; a missing side is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self { from, to }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    /// True when `ts` falls before the lower bound.
    pub fn starts_after(&self, ts: &DateTime<Utc>) -> bool {
        self.from.is_some_and(|from| *ts < from)
    }

    /// True when `ts` falls past the upper bound.
    pub fn ends_before(&self, ts: &DateTime<Utc>) -> bool {
        self.to.is_some_and(|to| *ts > to)
    }
}

/// Everything one report run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub log_path: PathBuf,
    pub range: DateRange,
    pub delimiter: char,
    pub report_file_name: Option<PathBuf>,
    /// Print the table to stdout.
    pub verbose: bool,
}

impl ReportConfig {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
            range: DateRange::unbounded(),
            delimiter: ',',
            report_file_name: None,
            verbose: true,
        }
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_report_file_name(mut self, name: impl AsRef<Path>) -> Self {
        self.report_file_name = Some(crate::utils::with_csv_extension(name.as_ref()));
        self
    }

    pub fn quiet(mut self) -> Self {
        self.verbose = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2013, 9, 1, h, m, 0).unwrap()
    }

    #[test]
    fn bounds_are_inclusive() {
        let range = DateRange::new(Some(at(9, 30)), Some(at(10, 0)));
        assert!(!range.starts_after(&at(9, 30)));
        assert!(!range.ends_before(&at(10, 0)));
        assert!(range.starts_after(&at(9, 29)));
        assert!(range.ends_before(&at(10, 1)));
    }

    #[test]
    fn unbounded_range_accepts_everything() {
        let range = DateRange::unbounded();
        assert!(!range.starts_after(&at(0, 0)));
        assert!(!range.ends_before(&at(23, 59)));
    }

    #[test]
    fn report_name_gets_extension() {
        let config = ReportConfig::new("log.csv").with_report_file_name("summary");
        assert_eq!(config.report_file_name, Some(PathBuf::from("summary.csv")));
        assert!(config.verbose);
        assert_eq!(config.delimiter, ',');
    }
}
