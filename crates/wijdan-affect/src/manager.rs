//! Affect manager - coordinates memory, emotional state and replies

use crate::config::AffectConfig;
use crate::emotion::{EmotionModels, EmotionalState, EmotionalStateEngine};
use crate::error::{AffectError, AffectResult};
use crate::memory::{ConversationMemoryStore, ConversationTurn, ResponseHints};
use crate::persistence::{JsonFileSnapshotStore, PersonalityProfile, Snapshot, SnapshotStore};
use crate::response::{ComposedResponse, RandomSource, ResponseTemplateSelector, StdRandom, TemplateCatalog};
use crate::signal::SignalExtractor;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Generate a new session ID
pub fn generate_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Outcome of answering one message
#[derive(Debug, Clone)]
pub struct AgentReply {
    /// Composed reply and its metadata
    pub response: ComposedResponse,

    /// Emotional state of the message
    pub state: EmotionalState,

    /// Prior turns judged relevant, most relevant first
    pub relevant: Vec<ConversationTurn>,

    /// The turn recorded for this exchange
    pub turn: ConversationTurn,
}

/// Affect subsystem for one conversation
///
/// Each conversation owns its manager; nothing is shared between instances
/// except the immutable keyword tables.
pub struct AffectManager {
    /// Configuration
    config: AffectConfig,

    /// Current session identifier
    session_id: String,

    /// Conversation memory
    memory: ConversationMemoryStore,

    /// Emotional state
    engine: EmotionalStateEngine,

    /// Reply templates
    selector: ResponseTemplateSelector,

    /// Randomness for phrase choice
    rng: Box<dyn RandomSource>,

    /// Personality profiles by key
    profiles: BTreeMap<String, PersonalityProfile>,

    /// Snapshot medium, if any
    snapshots: Option<Arc<dyn SnapshotStore>>,
}

impl AffectManager {
    /// Create a manager with the built-in tables
    pub fn new(config: AffectConfig) -> AffectResult<Self> {
        config.validate()?;

        let extractor = Arc::new(SignalExtractor::default());
        let session_id = generate_session_id();

        info!(
            session_id = %session_id,
            memory_capacity = config.memory_capacity,
            retrieval_window = config.retrieval_window,
            "Created affect manager"
        );

        Ok(Self {
            memory: ConversationMemoryStore::from_config(extractor, &config),
            engine: EmotionalStateEngine::from_config(EmotionModels::default(), &config),
            selector: ResponseTemplateSelector::default(),
            rng: Box::new(StdRandom::new()),
            profiles: BTreeMap::new(),
            snapshots: None,
            session_id,
            config,
        })
    }

    /// Use another signal extractor; drops any recorded turns
    pub fn with_extractor(mut self, extractor: Arc<SignalExtractor>) -> Self {
        self.memory = ConversationMemoryStore::from_config(extractor, &self.config);
        self
    }

    /// Use other emotion models; drops any emotional events
    pub fn with_emotion_models(mut self, models: EmotionModels) -> Self {
        self.engine = EmotionalStateEngine::from_config(models, &self.config);
        self
    }

    /// Use another template catalog
    pub fn with_catalog(mut self, catalog: TemplateCatalog) -> Self {
        self.selector = ResponseTemplateSelector::new(catalog);
        self
    }

    /// Use another source of randomness
    pub fn with_random_source(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    /// Persist snapshots through `store`
    pub fn with_snapshot_store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.snapshots = Some(store);
        self
    }

    /// Persist snapshots to the configured file
    pub fn with_file_snapshots(self) -> Self {
        let store = JsonFileSnapshotStore::new(self.config.snapshot_path.clone());
        self.with_snapshot_store(Arc::new(store))
    }

    /// Set the session ID
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    /// Get session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Get configuration
    pub fn config(&self) -> &AffectConfig {
        &self.config
    }

    /// Get conversation memory
    pub fn memory(&self) -> &ConversationMemoryStore {
        &self.memory
    }

    /// Get the emotional state engine
    pub fn engine(&self) -> &EmotionalStateEngine {
        &self.engine
    }

    /// Get the reply selector
    pub fn selector(&self) -> &ResponseTemplateSelector {
        &self.selector
    }

    /// Record an exchange
    pub fn record_turn(&mut self, user_text: &str, system_text: &str) -> ConversationTurn {
        self.memory.record(user_text, system_text)
    }

    /// Record an exchange at a given time
    pub fn record_turn_at(
        &mut self,
        user_text: &str,
        system_text: &str,
        now: DateTime<Utc>,
    ) -> ConversationTurn {
        self.memory.record_at(user_text, system_text, now)
    }

    /// Most relevant recent turns for `query`
    pub fn retrieve_relevant(&self, query: &str, limit: usize) -> Vec<ConversationTurn> {
        self.memory.retrieve(query, limit)
    }

    /// Analyze a message and update the emotional state
    pub fn analyze_state(&mut self, text: &str) -> EmotionalState {
        self.engine.analyze_state(text)
    }

    /// Compose a reply and log the exchange
    pub fn compose_response(&mut self, state: &EmotionalState, user_text: &str) -> ComposedResponse {
        let response = self.selector.compose(state, user_text, self.rng.as_mut());
        self.engine.record_exchange(
            state,
            response.metadata.response_quality,
            &response.metadata.empathy_level,
        );
        response
    }

    /// Answer a message: analyze, recall, compose, then record the turn
    pub fn respond(&mut self, user_text: &str) -> AgentReply {
        let state = self.analyze_state(user_text);
        let relevant = self.retrieve_relevant(user_text, self.config.default_retrieval_limit);
        let response = self.compose_response(&state, user_text);
        let turn = self.record_turn(user_text, &response.text);

        AgentReply {
            response,
            state,
            relevant,
            turn,
        }
    }

    /// Hints for an external reply generator
    pub fn response_hints(&self, message: &str) -> ResponseHints {
        self.memory
            .response_hints(message, self.config.default_retrieval_limit)
    }

    /// All personality profiles
    pub fn profiles(&self) -> &BTreeMap<String, PersonalityProfile> {
        &self.profiles
    }

    /// One personality profile
    pub fn profile(&self, key: &str) -> Option<&PersonalityProfile> {
        self.profiles.get(key)
    }

    /// Insert or replace a personality profile
    pub fn set_profile(&mut self, key: impl Into<String>, profile: PersonalityProfile) {
        self.profiles.insert(key.into(), profile);
    }

    /// Remove a personality profile
    pub fn remove_profile(&mut self, key: &str) -> Option<PersonalityProfile> {
        self.profiles.remove(key)
    }

    /// Current history and profiles as a snapshot
    ///
    /// With a configured turn limit only the newest turns are included.
    pub fn snapshot(&self) -> Snapshot {
        let keep = self
            .config
            .snapshot_turn_limit
            .unwrap_or(self.memory.len());
        let history = self.memory.recent(keep).cloned().collect();

        Snapshot::new(history, self.profiles.clone())
    }

    /// Replace history and profiles from a snapshot
    pub fn restore(&mut self, snapshot: Snapshot) {
        let count = snapshot.conversation_history.len();
        if count > self.memory.capacity() {
            warn!(
                turns = count,
                capacity = self.memory.capacity(),
                "Snapshot holds more turns than capacity, keeping the newest"
            );
        }

        self.memory.replace_history(snapshot.conversation_history);
        self.profiles = snapshot.personality_profiles;
    }

    /// Save a snapshot to the configured store
    pub async fn save_snapshot(&self) -> AffectResult<()> {
        let store = self.snapshot_store()?;
        store.save(&self.snapshot()).await?;

        info!(
            session_id = %self.session_id,
            location = %store.location(),
            turns = self.memory.len(),
            "Saved affect snapshot"
        );
        Ok(())
    }

    /// Load the stored snapshot; `false` when none exists
    ///
    /// A corrupt snapshot is returned as an error and leaves state untouched.
    pub async fn load_snapshot(&mut self) -> AffectResult<bool> {
        let store = self.snapshot_store()?;

        match store.load().await? {
            Some(snapshot) => {
                self.restore(snapshot);
                info!(
                    session_id = %self.session_id,
                    location = %store.location(),
                    turns = self.memory.len(),
                    profiles = self.profiles.len(),
                    "Loaded affect snapshot"
                );
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn snapshot_store(&self) -> AffectResult<Arc<dyn SnapshotStore>> {
        self.snapshots.clone().ok_or_else(|| {
            AffectError::validation("snapshot_store", "no snapshot store configured", "none")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::InMemorySnapshotStore;
    use crate::response::FixedRandom;

    fn manager() -> AffectManager {
        AffectManager::new(AffectConfig::default())
            .unwrap()
            .with_random_source(Box::new(FixedRandom(0)))
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AffectConfig::default().with_memory_capacity(0);
        assert!(AffectManager::new(config).is_err());
    }

    #[test]
    fn test_session_ids() {
        let a = manager();
        let b = manager();
        assert_ne!(a.session_id(), b.session_id());
        assert_eq!(manager().with_session_id("s1").session_id(), "s1");
    }

    #[test]
    fn test_respond_flow() {
        let mut manager = manager();
        manager.record_turn("أنا فرحان اليوم", "الله يديم عليك الفرحة");

        let reply = manager.respond("فرحان مبسوط سعيد");
        assert_eq!(reply.state.primary_emotion, "joy");
        assert_eq!(reply.relevant.len(), 1);
        assert_eq!(reply.relevant[0].user_text, "أنا فرحان اليوم");
        assert_eq!(reply.response.metadata.template.as_deref(), Some("joy_high"));
        assert_eq!(reply.turn.system_text, reply.response.text);

        assert_eq!(manager.memory().len(), 2);
        assert_eq!(manager.engine().exchanges().count(), 1);
    }

    #[test]
    fn test_compose_response_logs_exchange() {
        let mut manager = manager();
        let state = manager.analyze_state("");
        let response = manager.compose_response(&state, "");

        assert_eq!(response.metadata.template, None);
        let record = manager.engine().exchanges().next().unwrap();
        assert_eq!(record.emotion, "neutral");
        assert_eq!(record.response_quality, 0.7);
    }

    #[tokio::test]
    async fn test_snapshot_requires_store() {
        let mut manager = manager();
        assert!(manager.save_snapshot().await.is_err());
        assert!(manager.load_snapshot().await.is_err());
    }

    #[tokio::test]
    async fn test_snapshot_round_trip() {
        let store = Arc::new(InMemorySnapshotStore::new());
        let mut manager = manager().with_snapshot_store(store.clone());

        manager.record_turn("اسمي سارة وأنا طالبة", "أهلا سارة");
        manager.record_turn("عندي امتحان بكرة وأنا خايف", "الله يوفقك");
        let mut profile = PersonalityProfile::new();
        profile.insert("name".to_string(), serde_json::json!("سارة"));
        manager.set_profile("user", profile);
        manager.save_snapshot().await.unwrap();

        let mut restored = self::manager().with_snapshot_store(store);
        assert!(restored.load_snapshot().await.unwrap());

        let saved: Vec<_> = manager.memory().turns().cloned().collect();
        let loaded: Vec<_> = restored.memory().turns().cloned().collect();
        assert_eq!(saved, loaded);
        assert_eq!(restored.profile("user"), manager.profile("user"));
    }

    #[tokio::test]
    async fn test_load_missing_snapshot() {
        let mut manager = manager().with_snapshot_store(Arc::new(InMemorySnapshotStore::new()));
        assert!(!manager.load_snapshot().await.unwrap());
        assert!(manager.memory().is_empty());
    }

    #[tokio::test]
    async fn test_load_trims_to_capacity() {
        let store = Arc::new(InMemorySnapshotStore::new());
        let mut big = manager().with_snapshot_store(store.clone());
        for i in 0..8 {
            big.record_turn(&format!("رسالة {}", i), "");
        }
        big.save_snapshot().await.unwrap();

        let config = AffectConfig::default().with_memory_capacity(3);
        let mut small = AffectManager::new(config)
            .unwrap()
            .with_snapshot_store(store);
        small.load_snapshot().await.unwrap();

        let texts: Vec<&str> = small.memory().turns().map(|t| t.user_text.as_str()).collect();
        assert_eq!(texts, vec!["رسالة 5", "رسالة 6", "رسالة 7"]);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_leaves_state() {
        let store = Arc::new(InMemorySnapshotStore::with_raw("[1, 2"));
        let mut manager = manager().with_snapshot_store(store);
        manager.record_turn("مرحبا", "");

        let err = manager.load_snapshot().await.unwrap_err();
        assert!(err.is_malformed_snapshot());
        assert_eq!(manager.memory().len(), 1);
    }

    #[test]
    fn test_snapshot_turn_limit() {
        let config = AffectConfig::default().with_snapshot_turn_limit(Some(2));
        let mut manager = AffectManager::new(config).unwrap();
        for i in 0..5 {
            manager.record_turn(&format!("m{}", i), "");
        }

        let snapshot = manager.snapshot();
        assert_eq!(snapshot.conversation_history.len(), 2);
        assert_eq!(snapshot.conversation_history[0].user_text, "m3");
    }
}
