//! Snapshot stores

use super::timestamp;
use crate::error::{AffectError, AffectResult};
use crate::memory::ConversationTurn;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::info;

/// Free-form attributes of one personality profile
pub type PersonalityProfile = serde_json::Map<String, serde_json::Value>;

/// Everything persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Stored turns, oldest first
    #[serde(default)]
    pub conversation_history: Vec<ConversationTurn>,

    /// Profiles by key
    #[serde(default)]
    pub personality_profiles: BTreeMap<String, PersonalityProfile>,

    /// When the snapshot was taken
    #[serde(with = "timestamp", default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

impl Snapshot {
    /// Snapshot taken now
    pub fn new(
        conversation_history: Vec<ConversationTurn>,
        personality_profiles: BTreeMap<String, PersonalityProfile>,
    ) -> Self {
        Self {
            conversation_history,
            personality_profiles,
            last_updated: Utc::now(),
        }
    }

    /// Encode as pretty-printed JSON
    pub fn to_json(&self) -> AffectResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AffectError::serialization("encode snapshot", e))
    }

    /// Decode JSON; `location` names the source in errors
    pub fn from_json(raw: &str, location: &str) -> AffectResult<Self> {
        serde_json::from_str(raw).map_err(|e| AffectError::malformed_snapshot(location, e))
    }
}

/// Medium that keeps the latest snapshot
///
/// Saves are a full overwrite without locking; callers that share a medium
/// must serialize their saves.
#[async_trait::async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Latest snapshot, `None` when nothing has been saved yet
    async fn load(&self) -> AffectResult<Option<Snapshot>>;

    /// Replace the stored snapshot
    async fn save(&self, snapshot: &Snapshot) -> AffectResult<()>;

    /// Human-readable location, used in logs and errors
    fn location(&self) -> String;
}

/// Snapshot kept as a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileSnapshotStore {
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    /// Store backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl SnapshotStore for JsonFileSnapshotStore {
    async fn load(&self) -> AffectResult<Option<Snapshot>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No snapshot found, starting empty");
                return Ok(None);
            }
            Err(e) => return Err(AffectError::storage("read snapshot", e)),
        };

        let snapshot = Snapshot::from_json(&raw, &self.location())?;

        info!(
            path = %self.path.display(),
            turns = snapshot.conversation_history.len(),
            profiles = snapshot.personality_profiles.len(),
            "Loaded snapshot"
        );

        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &Snapshot) -> AffectResult<()> {
        let json = snapshot.to_json()?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| AffectError::storage("create snapshot directory", e))?;
            }
        }

        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| AffectError::storage("write snapshot", e))?;

        info!(
            path = %self.path.display(),
            turns = snapshot.conversation_history.len(),
            "Saved snapshot"
        );

        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Snapshot kept as serialized JSON in memory
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    raw: RwLock<Option<String>>,
}

impl InMemorySnapshotStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with raw JSON
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: RwLock::new(Some(raw.into())),
        }
    }

    /// The stored JSON, if any
    pub async fn raw(&self) -> Option<String> {
        self.raw.read().await.clone()
    }
}

#[async_trait::async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn load(&self) -> AffectResult<Option<Snapshot>> {
        match self.raw.read().await.as_deref() {
            Some(raw) => Snapshot::from_json(raw, &self.location()).map(Some),
            None => Ok(None),
        }
    }

    async fn save(&self, snapshot: &Snapshot) -> AffectResult<()> {
        let json = snapshot.to_json()?;
        *self.raw.write().await = Some(json);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Signals;

    fn turn(user: &str) -> ConversationTurn {
        let signals = Signals {
            emotion: "joy".to_string(),
            confidence: 0.5,
            topic: "general".to_string(),
            cultural_markers: vec![crate::signal::CulturalMarker::new("religious", "الله")],
        };
        ConversationTurn::new(user, "الله يديم عليك الفرحة", signals, Utc::now()).with_importance(7)
    }

    #[tokio::test]
    async fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSnapshotStore::new(dir.path().join("nested").join("memory.json"));

        let mut profiles = BTreeMap::new();
        let mut profile = PersonalityProfile::new();
        profile.insert("name".to_string(), serde_json::json!("نورة"));
        profiles.insert("user".to_string(), profile);

        let snapshot = Snapshot::new(vec![turn("أنا فرحان"), turn("مبسوط")], profiles);
        store.save(&snapshot).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.conversation_history, snapshot.conversation_history);
        assert_eq!(loaded.personality_profiles, snapshot.personality_profiles);
    }

    #[tokio::test]
    async fn test_file_keeps_arabic_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");
        let store = JsonFileSnapshotStore::new(&path);

        store
            .save(&Snapshot::new(vec![turn("أنا فرحان")], BTreeMap::new()))
            .await
            .unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("أنا فرحان"));
        assert!(raw.contains("\"user_message\""));
        assert!(raw.contains('\n'));
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSnapshotStore::new(dir.path().join("absent.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_file_is_surfaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonFileSnapshotStore::new(&path).load().await.unwrap_err();
        assert!(err.is_malformed_snapshot());
    }

    #[tokio::test]
    async fn test_legacy_snapshot_loads() {
        let raw = r#"{
            "conversation_history": [{
                "timestamp": "2024-05-01T09:30:00.123456",
                "user_message": "السلام عليكم",
                "nano_response": "وعليكم السلام",
                "emotion_detected": "neutral",
                "topic_category": "general",
                "cultural_markers": [],
                "confidence_level": 0.5,
                "memory_importance": 5
            }],
            "personality_profiles": {},
            "last_updated": "2024-05-01T09:31:00"
        }"#;

        let store = InMemorySnapshotStore::with_raw(raw);
        let snapshot = store.load().await.unwrap().unwrap();
        assert_eq!(snapshot.conversation_history.len(), 1);
        assert_eq!(snapshot.conversation_history[0].system_text, "وعليكم السلام");
    }

    #[tokio::test]
    async fn test_out_of_range_turn_is_malformed() {
        let with_turn = |confidence: &str, importance: &str| {
            format!(
                r#"{{"conversation_history": [{{
                    "timestamp": "2024-05-01T09:30:00Z",
                    "user_message": "مرحبا",
                    "system_response": "هلا",
                    "emotion_detected": "neutral",
                    "topic_category": "general",
                    "cultural_markers": [],
                    "confidence_level": {},
                    "memory_importance": {}
                }}]}}"#,
                confidence, importance
            )
        };

        for (confidence, importance) in [("7.5", "200"), ("0.5", "0"), ("0.5", "11"), ("-0.1", "5")] {
            let store = InMemorySnapshotStore::with_raw(with_turn(confidence, importance));
            let err = store.load().await.unwrap_err();
            assert!(err.is_malformed_snapshot(), "{} / {}", confidence, importance);
        }

        let store = InMemorySnapshotStore::with_raw(with_turn("1.0", "10"));
        let snapshot = store.load().await.unwrap().unwrap();
        assert_eq!(snapshot.conversation_history[0].importance, 10);
    }

    #[tokio::test]
    async fn test_in_memory_round_trip() {
        let store = InMemorySnapshotStore::new();
        assert!(store.load().await.unwrap().is_none());

        let snapshot = Snapshot::new(vec![turn("مرحبا")], BTreeMap::new());
        store.save(&snapshot).await.unwrap();

        assert!(store.raw().await.is_some());
        assert_eq!(store.load().await.unwrap().unwrap(), snapshot);
    }
}
