use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::iter::FusedIterator;
use std::path::Path;
use tracing::{debug, info};

use crate::config::{DateRange, ReportConfig};
use crate::error::{ReportError, Result};
use crate::timestamp::parse_timestamp;

pub const TIMESTAMP_COLUMN: &str = "timestamp";
pub const URL_COLUMN: &str = "url";
pub const USERID_COLUMN: &str = "userid";

/// One page view that passed the range filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub url: String,
    pub userid: String,
}

impl LogEntry {
    pub fn new(url: impl Into<String>, userid: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            userid: userid.into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    timestamp: usize,
    url: usize,
    userid: usize,
}

impl Columns {
    fn from_header(header: &csv::StringRecord) -> Result<Self> {
        // Later duplicates win; blank header cells map nothing.
        let index: HashMap<&str, usize> = header
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim(), i))
            .filter(|(name, _)| !name.is_empty())
            .collect();

        let missing: Vec<String> = [TIMESTAMP_COLUMN, URL_COLUMN, USERID_COLUMN]
            .into_iter()
            .filter(|name| !index.contains_key(name))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(ReportError::Schema { missing });
        }

        Ok(Self {
            timestamp: index[TIMESTAMP_COLUMN],
            url: index[URL_COLUMN],
            userid: index[USERID_COLUMN],
        })
    }
}

enum Step {
    Entry(LogEntry),
    Skip,
    Halt,
}

/// Lazy stream of in-range entries read from a delimited log.
///
/// Rows are pulled one at a time. Rows earlier than `range.from` are skipped;
/// the first row later than `range.to` ends the stream, since logs are
/// expected in ascending time order. A malformed row yields one `Err` and
/// ends the stream. The underlying reader is dropped as soon as the stream
/// ends, whichever way it ends.
pub struct LogEntries<R: Read = File> {
    reader: Option<csv::Reader<R>>,
    columns: Columns,
    range: DateRange,
    record: csv::StringRecord,
    rows_read: u64,
    yielded: u64,
}

/// Opens `path` and reads its header row.
pub fn open_entries(path: &Path, delimiter: char, range: DateRange) -> Result<LogEntries> {
    info!(action = "open", component = "log_entries", path = ?path, "Reading log file");
    let file = File::open(path).map_err(|e| ReportError::from_open(path, e))?;
    LogEntries::from_reader(file, delimiter, range)
}

/// Opens the log named by `config` with its delimiter and range.
pub fn read_entries(config: &ReportConfig) -> Result<LogEntries> {
    open_entries(&config.log_path, config.delimiter, config.range)
}

impl<R: Read> LogEntries<R> {
    pub fn from_reader(source: R, delimiter: char, range: DateRange) -> Result<Self> {
        let delimiter = delimiter_byte(delimiter)?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(source);

        let columns = Columns::from_header(reader.headers()?)?;
        debug!(action = "map", component = "log_entries", ?columns, "Mapped header columns");

        Ok(Self {
            reader: Some(reader),
            columns,
            range,
            record: csv::StringRecord::new(),
            rows_read: 0,
            yielded: 0,
        })
    }

    fn field(&self, index: usize, column: &str) -> Result<&str> {
        self.record
            .get(index)
            .map(str::trim)
            .ok_or_else(|| ReportError::MissingField {
                line: self.record.position().map_or(0, |p| p.line()),
                column: column.to_string(),
            })
    }

    fn step(&mut self) -> Result<Step> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(Step::Halt);
        };
        if !reader.read_record(&mut self.record)? {
            return Ok(Step::Halt);
        }
        self.rows_read += 1;

        // Every row must be complete, in range or not.
        let timestamp = parse_timestamp(self.field(self.columns.timestamp, TIMESTAMP_COLUMN)?)?;
        let url = self.field(self.columns.url, URL_COLUMN)?;
        let userid = self.field(self.columns.userid, USERID_COLUMN)?;

        if self.range.starts_after(&timestamp) {
            return Ok(Step::Skip);
        }
        if self.range.ends_before(&timestamp) {
            debug!(action = "halt", component = "log_entries", %timestamp, "Row past end of range");
            return Ok(Step::Halt);
        }

        Ok(Step::Entry(LogEntry::new(url, userid)))
    }

    fn finish(&mut self) {
        if self.reader.take().is_some() {
            debug!(
                action = "close",
                component = "log_entries",
                rows_read = self.rows_read,
                entries = self.yielded,
                "Log stream finished"
            );
        }
    }

    #[cfg(test)]
    fn is_finished(&self) -> bool {
        self.reader.is_none()
    }
}

impl<R: Read> Iterator for LogEntries<R> {
    type Item = Result<LogEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.step() {
                Ok(Step::Entry(entry)) => {
                    self.yielded += 1;
                    return Some(Ok(entry));
                }
                Ok(Step::Skip) => continue,
                Ok(Step::Halt) => {
                    self.finish();
                    return None;
                }
                Err(e) => {
                    self.finish();
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<R: Read> FusedIterator for LogEntries<R> {}

fn delimiter_byte(delimiter: char) -> Result<u8> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(ReportError::InvalidDelimiter(delimiter))
    }
}
