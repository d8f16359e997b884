use std::sync::Mutex;

use chrono::Local;
use serde::{Deserialize, Serialize};

pub const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

/// Append an entry stamped with the local time, dropping the oldest past the cap
pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = logs.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    logs.push(entry);
    if logs.len() > MAX_LOG_ENTRIES {
        logs.remove(0);
    }
}

/// Copy of the current entries, oldest first
pub fn recent_logs(logs: &Mutex<Vec<LogEntry>>) -> Vec<LogEntry> {
    logs.lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_is_bounded() {
        let logs = Mutex::new(Vec::new());
        for i in 0..(MAX_LOG_ENTRIES + 5) {
            add_log(&logs, "INFO", "CSV", &format!("entry {}", i));
        }

        let entries = recent_logs(&logs);
        assert_eq!(entries.len(), MAX_LOG_ENTRIES);
        assert_eq!(entries[0].message, "entry 5");
        assert_eq!(entries.last().unwrap().source, "CSV");
    }

    #[test]
    fn test_add_log_records_fields() {
        let logs = Mutex::new(Vec::new());
        add_log(&logs, "ERROR", "CSV", "Only CSV files are accepted");

        let entries = recent_logs(&logs);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, "ERROR");
        assert_eq!(entries[0].message, "Only CSV files are accepted");
        assert_eq!(entries[0].time.len(), "12:34:56".len());
    }
}
