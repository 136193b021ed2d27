//! Marketplace activity log.
//!
//! These entries are domain data shown to administrators, not process
//! tracing output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{LogEntryId, LogLevel, LogSource};

/// A stored log entry. The collection is append-only, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: LogEntryId,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub source: LogSource,
    pub message: String,
}

/// An event to be logged; the repository assigns ID and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub level: LogLevel,
    pub source: LogSource,
    pub message: String,
}

impl LogEvent {
    #[must_use]
    pub fn info(source: LogSource, message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Info,
            source,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn warn(source: LogSource, message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Warn,
            source,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(source: LogSource, message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Error,
            source,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn into_entry(self, millis: i64, now: DateTime<Utc>) -> LogEntry {
        LogEntry {
            id: LogEntryId::new(millis),
            timestamp: now,
            level: self.level,
            source: self.source,
            message: self.message,
        }
    }
}

/// Administrator filter over the log list. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub level: Option<LogLevel>,
    pub source: Option<LogSource>,
    pub search: String,
}

impl LogFilter {
    #[must_use]
    pub fn matches(&self, entry: &LogEntry) -> bool {
        if self.level.is_some_and(|level| level != entry.level) {
            return false;
        }
        if self.source.is_some_and(|source| source != entry.source) {
            return false;
        }
        let needle = self.search.trim();
        needle.is_empty() || entry.message.to_lowercase().contains(&needle.to_lowercase())
    }

    /// Entries that pass the filter, in their stored order.
    #[must_use]
    pub fn apply<'a>(&self, entries: &'a [LogEntry]) -> Vec<&'a LogEntry> {
        entries.iter().filter(|e| self.matches(e)).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn entries() -> Vec<LogEntry> {
        let now = Utc::now();
        vec![
            LogEvent::warn(LogSource::Product, "Product 'Tea' (ID: 5) deleted.").into_entry(3, now),
            LogEvent::info(LogSource::Auth, "User 'a@b.co' logged in as ADMIN.").into_entry(2, now),
            LogEvent::info(LogSource::Order, "New order BLIFE-1 placed by user u for ฿10.")
                .into_entry(1, now),
        ]
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let all = entries();
        assert_eq!(LogFilter::default().apply(&all).len(), 3);
    }

    #[test]
    fn test_filter_by_level_source_and_text() {
        let all = entries();
        let by_level = LogFilter {
            level: Some(LogLevel::Warn),
            ..LogFilter::default()
        };
        assert_eq!(by_level.apply(&all).len(), 1);

        let by_source = LogFilter {
            source: Some(LogSource::Auth),
            ..LogFilter::default()
        };
        assert_eq!(by_source.apply(&all)[0].id, LogEntryId::new(2));

        let by_text = LogFilter {
            search: "LOGGED IN".into(),
            ..LogFilter::default()
        };
        assert_eq!(by_text.apply(&all).len(), 1);
    }

    #[test]
    fn test_serde_layout() {
        let entry = &entries()[0];
        let json = serde_json::to_value(entry).unwrap();
        assert_eq!(json["level"], "WARN");
        assert_eq!(json["source"], "Product");
        assert_eq!(json["id"], 3);
    }
}
