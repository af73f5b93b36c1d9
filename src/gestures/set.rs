//! Named gesture collections
//!
//! A `GestureSet` maps labels to ordered gesture lists and round-trips
//! through JSON. Lookup by a missing label is recoverable by design:
//! scripts probe optimistically, so it logs and yields an empty list
//! instead of failing.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::capture::types::GestureEvent;

/// Current gesture-set format version
pub const CURRENT_FORMAT_VERSION: &str = "1.0";

/// Gesture-set metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureSetMetadata {
    /// Unique set ID
    pub id: Uuid,
    /// Serial of the device the gestures were captured on, if known
    pub serial: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Version of the persisted format
    pub format_version: String,
}

impl Default for GestureSetMetadata {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            serial: None,
            created_at: Utc::now(),
            format_version: CURRENT_FORMAT_VERSION.to_string(),
        }
    }
}

/// A named mapping from label to ordered gesture list.
///
/// Insertion order is irrelevant; lookup is by label and the last write
/// wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureSet {
    pub metadata: GestureSetMetadata,
    gestures: HashMap<String, Vec<GestureEvent>>,
}

impl GestureSet {
    pub fn new(serial: Option<String>) -> Self {
        Self {
            metadata: GestureSetMetadata {
                serial,
                ..Default::default()
            },
            gestures: HashMap::new(),
        }
    }

    /// Store a gesture list under a label, replacing any previous list.
    pub fn insert(&mut self, label: impl Into<String>, events: Vec<GestureEvent>) {
        self.gestures.insert(label.into(), events);
    }

    /// Look up a gesture list by label.
    ///
    /// A missing label logs a warning and returns an empty list; it never
    /// aborts the caller.
    pub fn get(&self, label: &str) -> Vec<GestureEvent> {
        match self.gestures.get(label) {
            Some(events) => events.clone(),
            None => {
                warn!(label, "no gestures recorded under this label");
                Vec::new()
            }
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.gestures.contains_key(label)
    }

    /// Labels in sorted order, for display.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.gestures.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }

    /// Number of labelled gesture lists.
    pub fn len(&self) -> usize {
        self.gestures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gestures.is_empty()
    }

    /// Save the set to a JSON file.
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a set from a JSON file.
    ///
    /// Logs a warning on an unknown format version but still attempts to
    /// deserialize (forward-compatible via `#[serde(default)]` metadata).
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let set: GestureSet = serde_json::from_str(&content)?;
        if set.metadata.format_version != CURRENT_FORMAT_VERSION {
            warn!(
                found = %set.metadata.format_version,
                expected = CURRENT_FORMAT_VERSION,
                "gesture set has different format version; some fields may use defaults"
            );
        }
        Ok(set)
    }
}

impl Default for GestureSet {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::types::{GestureKind, PointSample};
    use tempfile::NamedTempFile;

    fn make_tap(x: f64, y: f64, time: f64) -> GestureEvent {
        GestureEvent {
            kind: GestureKind::Tap,
            points: vec![PointSample::new(time, x, y)],
            start: time,
            end: time,
            contact_id: String::new(),
        }
    }

    fn make_swipe() -> GestureEvent {
        GestureEvent {
            kind: GestureKind::Swipe,
            points: vec![
                PointSample::new(1.0, 240.0, 80.0),
                PointSample::new(1.3, 672.0, 80.0),
            ],
            start: 1.0,
            end: 1.3,
            contact_id: String::new(),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let mut set = GestureSet::new(Some("emulator-5554".to_string()));
        set.insert("unlock", vec![make_tap(100.0, 200.0, 0.0)]);

        let events = set.get("unlock");
        assert_eq!(events.len(), 1);
        assert!(set.contains("unlock"));
    }

    #[test]
    fn test_missing_label_yields_empty_list() {
        let set = GestureSet::default();
        assert!(set.get("nonexistent").is_empty());
    }

    #[test]
    fn test_last_write_wins() {
        let mut set = GestureSet::default();
        set.insert("scroll", vec![make_tap(1.0, 1.0, 0.0)]);
        set.insert("scroll", vec![make_swipe()]);

        let events = set.get("scroll");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, GestureKind::Swipe);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_labels_sorted() {
        let mut set = GestureSet::default();
        set.insert("zoom", Vec::new());
        set.insert("back", Vec::new());
        set.insert("menu", Vec::new());
        assert_eq!(set.labels(), vec!["back", "menu", "zoom"]);
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut set = GestureSet::new(Some("emulator-5554".to_string()));
        set.insert("tap_then_swipe", vec![make_tap(240.0, 80.0, 0.0), make_swipe()]);
        set.insert("just_a_tap", vec![make_tap(10.0, 20.0, 2.5)]);

        let file = NamedTempFile::new().unwrap();
        set.save(file.path()).unwrap();
        let loaded = GestureSet::load(file.path()).unwrap();

        assert_eq!(set, loaded);
        assert_eq!(loaded.metadata.serial.as_deref(), Some("emulator-5554"));
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(GestureSet::load(Path::new("/nonexistent/set.json")).is_err());
    }

    #[test]
    fn test_load_malformed_json_fails() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "{ not json }").unwrap();
        assert!(GestureSet::load(file.path()).is_err());
    }

    #[test]
    fn test_version_mismatch_still_loads() {
        let mut set = GestureSet::default();
        set.insert("legacy", vec![make_tap(5.0, 5.0, 0.0)]);
        set.metadata.format_version = "2.0".to_string();

        let file = NamedTempFile::new().unwrap();
        set.save(file.path()).unwrap();
        let loaded = GestureSet::load(file.path()).unwrap();
        assert_eq!(loaded.metadata.format_version, "2.0");
        assert_eq!(loaded.get("legacy").len(), 1);
    }

    #[test]
    fn test_metadata_missing_fields_get_defaults() {
        // A set persisted before serial/format_version existed
        let json = r#"{
            "metadata": {
                "id": "00000000-0000-0000-0000-000000000001",
                "created_at": "2026-01-01T00:00:00Z"
            },
            "gestures": {}
        }"#;
        let set: GestureSet = serde_json::from_str(json).unwrap();
        assert!(set.metadata.serial.is_none());
        assert_eq!(set.metadata.format_version, CURRENT_FORMAT_VERSION);
    }

    #[test]
    fn test_persisted_gesture_shape() {
        let mut set = GestureSet::default();
        set.insert("shape", vec![make_swipe()]);

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&set).unwrap()).unwrap();
        let gesture = &json["gestures"]["shape"][0];
        assert_eq!(gesture["type"], "swipe");
        assert_eq!(gesture["start"], 1.0);
        assert_eq!(gesture["end"], 1.3);
        assert_eq!(gesture["points"][0]["x"], 240.0);
        assert_eq!(gesture["points"][1]["time"], 1.3);
    }
}
