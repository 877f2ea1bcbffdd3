//! Bounded conversation memory with relevance retrieval

use super::turn::{ConversationTurn, ImportanceRules};
use crate::config::AffectConfig;
use crate::signal::{CulturalMarker, SignalExtractor};
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tracing::{debug, info};

/// A stored turn with the relevance score it received for a query
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTurn {
    /// The stored turn
    pub turn: ConversationTurn,

    /// Relevance score
    pub score: f64,
}

/// Append-only log of turns, evicting the oldest beyond capacity
pub struct ConversationMemoryStore {
    /// Shared signal extractor
    extractor: Arc<SignalExtractor>,

    /// Importance scoring rules
    rules: ImportanceRules,

    /// Turns, oldest first
    turns: VecDeque<ConversationTurn>,

    /// Maximum number of turns to keep
    capacity: usize,

    /// Number of most recent turns considered by retrieval
    window: usize,
}

impl ConversationMemoryStore {
    /// Create an empty store
    pub fn new(extractor: Arc<SignalExtractor>, capacity: usize, window: usize) -> Self {
        Self {
            extractor,
            rules: ImportanceRules::default(),
            turns: VecDeque::new(),
            capacity: capacity.max(1),
            window,
        }
    }

    /// Create a store sized from configuration
    pub fn from_config(extractor: Arc<SignalExtractor>, config: &AffectConfig) -> Self {
        Self::new(extractor, config.memory_capacity, config.retrieval_window)
    }

    /// Replace the importance rules
    pub fn with_importance_rules(mut self, rules: ImportanceRules) -> Self {
        self.rules = rules;
        self
    }

    /// Record an exchange now
    pub fn record(&mut self, user_text: &str, system_text: &str) -> ConversationTurn {
        self.record_at(user_text, system_text, Utc::now())
    }

    /// Record an exchange at a given time
    ///
    /// Emotion and topic come from the user text alone; cultural markers from
    /// user and system text together.
    pub fn record_at(
        &mut self,
        user_text: &str,
        system_text: &str,
        now: DateTime<Utc>,
    ) -> ConversationTurn {
        let mut signals = self.extractor.extract(user_text);
        signals.cultural_markers = self
            .extractor
            .extract_cultural_markers(&format!("{} {}", user_text, system_text));

        let turn = ConversationTurn::new(user_text, system_text, signals, now);
        let importance = self.rules.score(&turn);
        let turn = turn.with_importance(importance);

        debug!(
            emotion = %turn.emotion,
            topic = %turn.topic,
            markers = turn.cultural_markers.len(),
            importance = turn.importance,
            "Recorded conversation turn"
        );

        self.push(turn.clone());
        turn
    }

    /// Append an already-built turn, evicting the oldest beyond capacity
    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push_back(turn);
        self.prune_old_turns();
    }

    /// Retrieve the most relevant recent turns for a query
    pub fn retrieve(&self, query: &str, limit: usize) -> Vec<ConversationTurn> {
        self.retrieve_at(query, limit, Utc::now())
    }

    /// Retrieve the most relevant recent turns relative to `now`
    pub fn retrieve_at(&self, query: &str, limit: usize, now: DateTime<Utc>) -> Vec<ConversationTurn> {
        self.retrieve_scored_at(query, limit, now)
            .into_iter()
            .map(|scored| scored.turn)
            .collect()
    }

    /// Retrieve turns along with their scores, highest first
    ///
    /// Only the most recent `window` turns are scanned. Equal scores keep
    /// insertion order.
    pub fn retrieve_scored_at(&self, query: &str, limit: usize, now: DateTime<Utc>) -> Vec<ScoredTurn> {
        if limit == 0 || self.turns.is_empty() {
            return Vec::new();
        }

        let query_signals = self.extractor.extract(query);
        let query_markers: HashSet<&CulturalMarker> =
            query_signals.cultural_markers.iter().collect();

        let skip = self.turns.len().saturating_sub(self.window);
        let mut scored: Vec<ScoredTurn> = self
            .turns
            .iter()
            .skip(skip)
            .map(|turn| {
                let mut score = 0.0;

                if turn.emotion == query_signals.emotion {
                    score += 3.0;
                }

                if turn.topic == query_signals.topic {
                    score += 2.0;
                }

                let turn_markers: HashSet<&CulturalMarker> = turn.cultural_markers.iter().collect();
                score += turn_markers.intersection(&query_markers).count() as f64;

                score += f64::from(turn.importance) / 2.0;
                score += recency_bonus(turn.age_at(now));

                ScoredTurn {
                    turn: turn.clone(),
                    score,
                }
            })
            .collect();

        // stable: ties keep insertion order
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(limit);

        debug!(
            query_emotion = %query_signals.emotion,
            query_topic = %query_signals.topic,
            returned = scored.len(),
            top_score = scored.first().map(|s| s.score).unwrap_or(0.0),
            "Retrieved relevant turns"
        );

        scored
    }

    /// All stored turns, oldest first
    pub fn turns(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    /// The most recent `n` turns, oldest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter().skip(self.turns.len().saturating_sub(n))
    }

    /// Number of stored turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Maximum number of turns kept
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Extractor shared with this store
    pub fn extractor(&self) -> &SignalExtractor {
        &self.extractor
    }

    /// Replace the whole history, keeping only the newest turns that fit
    pub fn replace_history(&mut self, turns: Vec<ConversationTurn>) {
        self.turns = turns.into();
        self.prune_old_turns();
    }

    /// Remove every turn
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Evict oldest turns down to capacity
    fn prune_old_turns(&mut self) {
        if self.turns.len() <= self.capacity {
            return;
        }

        let to_remove = self.turns.len() - self.capacity;
        self.turns.drain(..to_remove);

        info!(
            evicted = to_remove,
            capacity = self.capacity,
            "Evicted oldest conversation turns"
        );
    }
}

/// 2 within a day, 1 within a week, else 0
fn recency_bonus(age: Duration) -> f64 {
    if age < Duration::hours(24) {
        2.0
    } else if age < Duration::days(7) {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(capacity: usize, window: usize) -> ConversationMemoryStore {
        ConversationMemoryStore::new(Arc::new(SignalExtractor::default()), capacity, window)
    }

    #[test]
    fn test_record_joy_turn() {
        let mut memory = store(1000, 50);
        let turn = memory.record("أنا فرحان اليوم", "الله يديم عليك الفرحة");

        assert_eq!(turn.emotion, "joy");
        assert_eq!(turn.topic, "general");
        assert!(turn.confidence > 0.0);
        assert!(turn.importance >= 5);
        // joy +2, "أنا" +3
        assert_eq!(turn.importance, 10);
        assert!(turn
            .cultural_markers
            .contains(&CulturalMarker::new("religious", "الله")));
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn test_emotion_from_user_text_only() {
        let mut memory = store(10, 10);
        let turn = memory.record("كيف الحال", "أنا فرحان");
        assert_eq!(turn.emotion, "neutral");
        assert!(turn
            .cultural_markers
            .contains(&CulturalMarker::new("emotions", "فرحان")));
    }

    #[test]
    fn test_bounded_store_keeps_most_recent() {
        let mut memory = store(5, 50);
        for i in 0..12 {
            memory.record(&format!("رسالة {}", i), "");
        }

        assert_eq!(memory.len(), 5);
        let texts: Vec<&str> = memory.turns().map(|t| t.user_text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["رسالة 7", "رسالة 8", "رسالة 9", "رسالة 10", "رسالة 11"]
        );
    }

    #[test]
    fn test_retrieve_empty_store() {
        let memory = store(10, 10);
        assert!(memory.retrieve("فرحان", 5).is_empty());
    }

    #[test]
    fn test_retrieve_zero_limit() {
        let mut memory = store(10, 10);
        memory.record("فرحان", "");
        assert!(memory.retrieve("فرحان", 0).is_empty());
    }

    #[test]
    fn test_retrieve_prefers_matching_emotion() {
        let mut memory = store(10, 10);
        let now = Utc::now();
        memory.record_at("اليوم حزين", "", now);
        memory.record_at("أنا فرحان اليوم", "الله يديم عليك الفرحة", now);
        memory.record_at("الجو حلو", "", now);

        let results = memory.retrieve_at("فرحان بالنجاح", 1, now);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].user_text, "أنا فرحان اليوم");
    }

    #[test]
    fn test_scores_follow_formula() {
        let mut memory = store(10, 10);
        let now = Utc::now();
        memory.record_at("مرحبا مرحبا", "", now - Duration::days(3));

        let scored = memory.retrieve_scored_at("مرحبا", 1, now);
        // neutral == neutral (+3), general == general (+2), one shared marker (+1),
        // importance 5 / 2 (+2.5), three days old (+1)
        assert_eq!(scored[0].score, 9.5);
    }

    #[test]
    fn test_ties_preserve_insertion_order() {
        let mut memory = store(10, 10);
        let now = Utc::now();
        memory.record_at("واحد", "", now);
        memory.record_at("اثنين", "", now);
        memory.record_at("ثلاثة", "", now);

        let results = memory.retrieve_at("أربعة", 3, now);
        let texts: Vec<&str> = results.iter().map(|t| t.user_text.as_str()).collect();
        assert_eq!(texts, vec!["واحد", "اثنين", "ثلاثة"]);
    }

    #[test]
    fn test_scores_non_increasing() {
        let mut memory = store(100, 50);
        let now = Utc::now();
        let samples = ["حزين", "فرحان", "عندي امتحان", "مرحبا", "أنا خايف", "شغل كثير"];
        for (i, text) in samples.iter().enumerate() {
            memory.record_at(text, "", now - Duration::hours(i as i64 * 30));
        }

        let scored = memory.retrieve_scored_at("أنا فرحان في الشغل", 10, now);
        assert_eq!(scored.len(), samples.len());
        assert!(scored.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_retrieval_window_limits_scan() {
        let mut memory = store(100, 3);
        let now = Utc::now();
        memory.record_at("أنا فرحان جدا", "", now);
        for i in 0..3 {
            memory.record_at(&format!("عادي {}", i), "", now);
        }

        let results = memory.retrieve_at("فرحان", 10, now);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|t| t.emotion != "joy"));
    }

    #[test]
    fn test_recency_bonus_boundaries() {
        assert_eq!(recency_bonus(Duration::hours(23)), 2.0);
        assert_eq!(recency_bonus(Duration::hours(24)), 1.0);
        assert_eq!(recency_bonus(Duration::days(7) - Duration::seconds(1)), 1.0);
        assert_eq!(recency_bonus(Duration::days(7)), 0.0);
    }

    #[test]
    fn test_replace_history_trims_to_capacity() {
        let mut source = store(10, 10);
        for i in 0..6 {
            source.record(&format!("m{}", i), "");
        }
        let history: Vec<ConversationTurn> = source.turns().cloned().collect();

        let mut memory = store(4, 10);
        memory.replace_history(history);
        assert_eq!(memory.len(), 4);
        assert_eq!(memory.turns().next().unwrap().user_text, "m2");
    }
}
