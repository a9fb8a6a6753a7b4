use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tracing::info;

use crate::entries::LogEntry;
use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlStats {
    pub page_views: u64,
    pub unique_users: HashSet<String>,
}

impl UrlStats {
    pub fn record(&mut self, userid: String) {
        self.page_views += 1;
        self.unique_users.insert(userid);
    }

    pub fn unique_user_count(&self) -> u64 {
        self.unique_users.len() as u64
    }
}

/// Per-URL stats that iterate in the order each URL was first seen.
#[derive(Debug, Default)]
pub struct UrlStatsMap {
    stats: Vec<(String, UrlStats)>,
    index: HashMap<String, usize>,
}

impl UrlStatsMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: LogEntry) {
        let LogEntry { url, userid } = entry;
        let slot = match self.index.get(&url) {
            Some(&slot) => slot,
            None => {
                let slot = self.stats.len();
                self.index.insert(url.clone(), slot);
                self.stats.push((url, UrlStats::default()));
                slot
            }
        };
        self.stats[slot].1.record(userid);
    }

    #[cfg(test)]
    fn get(&self, url: &str) -> Option<&UrlStats> {
        self.index.get(url).map(|&slot| &self.stats[slot].1)
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UrlStats)> {
        self.stats.iter().map(|(url, stats)| (url.as_str(), stats))
    }
}

/// Folds a stream of entries into per-URL stats.
///
/// The first error from the stream aborts the whole aggregation and is
/// returned; no partial map escapes.
pub fn aggregate<I>(entries: I) -> Result<UrlStatsMap>
where
    I: IntoIterator<Item = Result<LogEntry>>,
{
    let start_time = Instant::now();
    info!(action = "start", component = "aggregation", "Aggregating log entries");

    let mut stats = UrlStatsMap::new();
    let mut total = 0u64;
    for entry in entries {
        stats.record(entry?);
        total += 1;
    }

    info!(
        action = "complete",
        component = "aggregation",
        entries = total,
        unique_urls = stats.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Aggregation completed"
    );
    Ok(stats)
}
