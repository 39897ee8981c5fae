use crate::agent::AgentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    System,
    Statement,
    Vote,
    Settlement,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub kind: LogKind,
    pub text: String,
    pub agent: Option<AgentId>,
    pub timestamp: DateTime<Utc>,
}

/// Append-only narration of a game. Insertion order is display order.
#[derive(Debug, Default)]
pub struct GameLog {
    entries: Vec<LogEntry>,
    feed: Option<broadcast::Sender<LogEntry>>,
}

impl GameLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirror every appended entry onto `feed`.
    pub fn with_feed(feed: broadcast::Sender<LogEntry>) -> Self {
        Self {
            entries: Vec::new(),
            feed: Some(feed),
        }
    }

    pub fn push(&mut self, kind: LogKind, text: impl Into<String>, agent: Option<AgentId>) {
        let entry = LogEntry {
            kind,
            text: text.into(),
            agent,
            timestamp: Utc::now(),
        };

        if let Some(feed) = &self.feed {
            // no subscribers is fine
            let _ = feed.send(entry.clone());
        }
        self.entries.push(entry);
    }

    pub fn system(&mut self, text: impl Into<String>) {
        self.push(LogKind::System, text, None);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn of_kind(&self, kind: LogKind) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_keep_insertion_order() {
        let mut log = GameLog::new();
        log.system("--- Round 1 ---");
        log.push(LogKind::Statement, "hello", Some(2));
        log.push(LogKind::Vote, "Dave votes for Carl", Some(0));

        let kinds: Vec<LogKind> = log.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![LogKind::System, LogKind::Statement, LogKind::Vote]);
        assert_eq!(log.entries()[1].agent, Some(2));
        assert_eq!(log.of_kind(LogKind::Vote).count(), 1);
        assert!(log.entries()[0].timestamp <= log.entries()[2].timestamp);
    }

    #[tokio::test]
    async fn test_feed_mirrors_entries() {
        let (tx, mut rx) = broadcast::channel(16);
        let mut log = GameLog::with_feed(tx);

        log.system("Game started!");
        let received = rx.recv().await.unwrap();
        assert_eq!(received.text, "Game started!");
        assert_eq!(received.kind, LogKind::System);
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&LogKind::Settlement).unwrap(),
            "\"settlement\""
        );
    }
}
