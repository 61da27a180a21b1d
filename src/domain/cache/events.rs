//! Hit/miss events emitted by cached lookups

use std::fmt;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::CacheNamespace;

/// Result of a cache lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheOutcome {
    Hit,
    Miss,
}

impl fmt::Display for CacheOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hit => write!(f, "hit"),
            Self::Miss => write!(f, "miss"),
        }
    }
}

/// A single structured hit/miss record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheEvent {
    pub timestamp: DateTime<Utc>,
    pub key: String,
    pub outcome: CacheOutcome,
    pub namespace: CacheNamespace,
}

impl CacheEvent {
    pub fn new(namespace: CacheNamespace, key: impl Into<String>, outcome: CacheOutcome) -> Self {
        Self {
            timestamp: Utc::now(),
            key: key.into(),
            outcome,
            namespace,
        }
    }

    pub fn hit(namespace: CacheNamespace, key: impl Into<String>) -> Self {
        Self::new(namespace, key, CacheOutcome::Hit)
    }

    pub fn miss(namespace: CacheNamespace, key: impl Into<String>) -> Self {
        Self::new(namespace, key, CacheOutcome::Miss)
    }
}

/// Receiver of cache lookup events
pub trait CacheEventSink: Send + Sync + fmt::Debug {
    fn record(&self, event: CacheEvent);
}

/// Sink that keeps every event in memory, in emission order
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<CacheEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CacheEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// `(key, outcome)` pairs, in emission order
    pub fn outcomes(&self) -> Vec<(String, CacheOutcome)> {
        self.events()
            .into_iter()
            .map(|e| (e.key, e.outcome))
            .collect()
    }

    pub fn count(&self, outcome: CacheOutcome) -> usize {
        self.events()
            .iter()
            .filter(|e| e.outcome == outcome)
            .count()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl CacheEventSink for RecordingEventSink {
    fn record(&self, event: CacheEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingEventSink::new();

        sink.record(CacheEvent::miss(CacheNamespace::Local, "local:Product:1"));
        sink.record(CacheEvent::hit(CacheNamespace::Local, "local:Product:1"));

        assert_eq!(
            sink.outcomes(),
            vec![
                ("local:Product:1".to_string(), CacheOutcome::Miss),
                ("local:Product:1".to_string(), CacheOutcome::Hit),
            ]
        );
        assert_eq!(sink.count(CacheOutcome::Hit), 1);

        sink.clear();
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_event_serialization() {
        let event = CacheEvent::hit(CacheNamespace::Distributed, "distributed:AllProducts");
        let json = serde_json::to_string(&event).unwrap();

        assert!(json.contains("\"outcome\":\"hit\""));
        assert!(json.contains("\"namespace\":\"distributed\""));
        assert!(json.contains("\"timestamp\""));
    }
}
