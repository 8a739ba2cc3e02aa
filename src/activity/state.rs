use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

pub const STARTING_UP: &str = "Starting up...";

/// Latest known activity, as served by the status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityState {
    pub activity: String,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Default for ActivityState {
    fn default() -> Self {
        Self {
            activity: STARTING_UP.to_string(),
            timestamp: None,
        }
    }
}

/// Process-wide holder for the last analysis. Last write wins; readers always see a
/// complete snapshot because writers swap the whole record.
#[derive(Debug, Default)]
pub struct ActivityStore {
    current: RwLock<Arc<ActivityState>>,
}

impl ActivityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, activity: String, timestamp: DateTime<Utc>) {
        let state = Arc::new(ActivityState {
            activity,
            timestamp: Some(timestamp),
        });
        *self.current.write() = state;
    }

    pub fn snapshot(&self) -> Arc<ActivityState> {
        Arc::clone(&self.current.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_sentinel_and_no_timestamp() {
        let store = ActivityStore::new();
        let state = store.snapshot();
        assert_eq!(state.activity, STARTING_UP);
        assert!(state.timestamp.is_none());
    }

    #[test]
    fn publish_replaces_snapshot() {
        let store = ActivityStore::new();
        let before = store.snapshot();
        let now = Utc::now();

        store.publish("4. Sleeping 😴".to_string(), now);
        store.publish("2. Working 💻".to_string(), now);

        let after = store.snapshot();
        assert_eq!(after.activity, "2. Working 💻");
        assert_eq!(after.timestamp, Some(now));
        // Earlier readers keep their own snapshot.
        assert_eq!(before.activity, STARTING_UP);
    }

    #[test]
    fn serializes_missing_timestamp_as_null() {
        let json = serde_json::to_value(ActivityState::default()).unwrap();
        assert_eq!(json["activity"], "Starting up...");
        assert!(json["timestamp"].is_null());
    }
}
