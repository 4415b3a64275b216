//! Invocation log bus.
//!
//! Handler and pipeline stages report progress here. Entries are mirrored
//! to stdout and broadcast to any SSE subscribers (`GET /api/logs`), so a
//! browser can watch an invocation as it runs.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Severity of a log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Global log bus.
pub static LOG_BUS: Lazy<LogBus> = Lazy::new(LogBus::new);

/// Fans log entries out to all connected subscribers.
pub struct LogBus {
    sender: broadcast::Sender<LogEntry>,
}

impl LogBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Publish an entry: print to stdout, then broadcast. Entries are
    /// dropped silently when nobody is subscribed.
    pub fn publish(&self, entry: LogEntry) {
        let prefix = match entry.level {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        println!("{} {}", prefix, entry.message);

        let _ = self.sender.send(entry);
    }

    /// Get a receiver for SSE streaming.
    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.sender.subscribe()
    }
}

impl Default for LogBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenient logging functions
pub fn log_info(msg: impl Into<String>) {
    LOG_BUS.publish(LogEntry::new(LogLevel::Info, msg));
}

pub fn log_success(msg: impl Into<String>) {
    LOG_BUS.publish(LogEntry::new(LogLevel::Success, msg));
}

pub fn log_warning(msg: impl Into<String>) {
    LOG_BUS.publish(LogEntry::new(LogLevel::Warning, msg));
}

pub fn log_error(msg: impl Into<String>) {
    LOG_BUS.publish(LogEntry::new(LogLevel::Error, msg));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_entries() {
        let bus = LogBus::new();
        let mut rx = bus.subscribe();

        bus.publish(LogEntry::new(LogLevel::Success, "wrote Output-data/x.csv"));

        let entry = rx.recv().await.unwrap();
        assert!(matches!(entry.level, LogLevel::Success));
        assert_eq!(entry.message, "wrote Output-data/x.csv");
    }

    #[test]
    fn test_publish_without_subscribers_is_fine() {
        let bus = LogBus::new();
        bus.publish(LogEntry::new(LogLevel::Info, "nobody listening"));
    }

    #[test]
    fn test_entry_serialization() {
        let entry = LogEntry::new(LogLevel::Warning, "thin volume");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"warning\""));
        assert!(json.contains("thin volume"));
    }
}
