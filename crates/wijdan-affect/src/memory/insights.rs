//! Conversation-level insights derived from stored turns
//!
//! Patterns, mood, engagement, tone suggestions and memory triggers used to
//! build hints for the reply generator.

use super::store::ConversationMemoryStore;
use crate::signal::{tokenize, CulturalMarker};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const POSITIVE_EMOTIONS: [&str; 4] = ["joy", "love", "excitement", "gratitude"];
const NEGATIVE_EMOTIONS: [&str; 3] = ["sadness", "fear", "anger"];

/// Overall mood of a run of turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationMood {
    /// Clearly more positive than negative turns
    Positive,
    /// Clearly more negative than positive turns
    Negative,
    /// Neither side dominates
    Balanced,
}

/// Patterns over the last ten turns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationPatterns {
    /// Most frequent emotion
    pub dominant_emotion: String,

    /// Distinct topics, in first-seen order
    pub frequent_topics: Vec<String>,

    /// Overall mood
    pub conversation_mood: ConversationMood,

    /// Engagement (0.0 to 1.0)
    pub engagement_level: f64,
}

/// A prior exchange surfaced as context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryHint {
    /// What the user said
    pub user_said: String,
    /// What the agent answered
    pub system_responded: String,
    /// Emotion of that turn
    pub emotion: String,
    /// Topic of that turn
    pub topic: String,
}

/// Everything a reply generator may want to know about a new message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseHints {
    /// Emotion of the new message
    pub detected_emotion: String,
    /// Confidence of that emotion
    pub emotion_confidence: f64,
    /// Topic of the new message
    pub topic_category: String,
    /// Cultural markers of the new message
    pub cultural_markers: Vec<CulturalMarker>,
    /// Relevant prior exchanges
    pub relevant_history: Vec<HistoryHint>,
    /// Conversation patterns, when there is enough history
    pub conversation_patterns: Option<ConversationPatterns>,
    /// Suggested reply tone
    pub suggested_tone: String,
    /// Prior messages that closely resemble this one
    pub memory_triggers: Vec<String>,
}

/// Summary statistics of the stored history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    /// Number of stored turns
    pub total_conversations: usize,
    /// Most frequent emotion
    pub most_common_emotion: Option<String>,
    /// Most frequent topic
    pub most_discussed_topic: Option<String>,
    /// Mean confidence
    pub average_confidence: f64,
    /// Turns with importance above 7
    pub high_importance_memories: usize,
    /// Days since the oldest stored turn
    pub memory_span_days: i64,
}

/// Classify a run of emotions as positive, negative or balanced
pub fn assess_mood<'a, I>(emotions: I) -> ConversationMood
where
    I: IntoIterator<Item = &'a str>,
{
    let (mut positive, mut negative) = (0usize, 0usize);
    for emotion in emotions {
        if POSITIVE_EMOTIONS.contains(&emotion) {
            positive += 1;
        } else if NEGATIVE_EMOTIONS.contains(&emotion) {
            negative += 1;
        }
    }

    if positive as f64 > negative as f64 * 1.5 {
        ConversationMood::Positive
    } else if negative as f64 > positive as f64 * 1.5 {
        ConversationMood::Negative
    } else {
        ConversationMood::Balanced
    }
}

/// Suggest a reply tone for an emotion, adjusted for register
pub fn suggest_response_tone(emotion: &str, markers: &[CulturalMarker]) -> String {
    let mut tone = match emotion {
        "joy" => "enthusiastic_supportive",
        "sadness" => "empathetic_comforting",
        "fear" => "reassuring_calming",
        "anger" => "understanding_diplomatic",
        "love" => "warm_appreciative",
        "excitement" => "matching_enthusiasm",
        "calmness" => "peaceful_gentle",
        "gratitude" => "humble_gracious",
        _ => "neutral_friendly",
    }
    .to_string();

    if markers.iter().any(|m| m.is_category("religious")) {
        tone.push_str("_respectful");
    }

    if markers.iter().any(|m| m.is_category("respect")) {
        tone.push_str("_formal");
    }

    tone
}

/// Most frequent item; the first seen wins ties
pub(crate) fn most_frequent<'a, I>(items: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for item in items {
        match counts.iter_mut().find(|(seen, _)| *seen == item) {
            Some((_, count)) => *count += 1,
            None => counts.push((item, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (item, count) in counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((item, count));
        }
    }

    best.map(|(item, _)| item.to_string())
}

impl ConversationMemoryStore {
    /// Patterns over the last ten turns; `None` with fewer than five turns
    pub fn conversation_patterns(&self) -> Option<ConversationPatterns> {
        if self.len() < 5 {
            return None;
        }

        let dominant_emotion = most_frequent(self.recent(10).map(|t| t.emotion.as_str()))
            .unwrap_or_else(|| crate::signal::NEUTRAL_EMOTION.to_string());

        let mut frequent_topics: Vec<String> = Vec::new();
        for turn in self.recent(10) {
            if !frequent_topics.contains(&turn.topic) {
                frequent_topics.push(turn.topic.clone());
            }
        }

        Some(ConversationPatterns {
            dominant_emotion,
            frequent_topics,
            conversation_mood: assess_mood(self.recent(10).map(|t| t.emotion.as_str())),
            engagement_level: self.engagement_level(),
        })
    }

    /// How engaged the user seems over the last ten turns (0.5 with fewer than three)
    pub fn engagement_level(&self) -> f64 {
        if self.len() < 3 {
            return 0.5;
        }

        let recent: Vec<_> = self.recent(10).collect();
        let count = recent.len() as f64;

        let avg_words = recent
            .iter()
            .map(|t| t.user_text.split_whitespace().count())
            .sum::<usize>() as f64
            / count;

        let unique_topics = recent
            .iter()
            .map(|t| t.topic.as_str())
            .collect::<HashSet<_>>()
            .len() as f64;

        let emotional_depth = recent.iter().filter(|t| t.confidence > 0.7).count() as f64;

        ((avg_words / 10.0 + unique_topics / 5.0 + emotional_depth / 10.0) / 3.0).min(1.0)
    }

    /// Earlier messages sharing more than two words with `message` (at most three)
    pub fn find_memory_triggers(&self, message: &str) -> Vec<String> {
        let message_words = tokenize(message);

        self.recent(100)
            .filter(|turn| {
                let user_words = tokenize(&turn.user_text);
                user_words.intersection(&message_words).count() > 2
            })
            .map(|turn| {
                let preview: String = turn.user_text.chars().take(50).collect();
                format!("similar_to: {}...", preview)
            })
            .take(3)
            .collect()
    }

    /// Hints for replying to `message`
    pub fn response_hints(&self, message: &str, limit: usize) -> ResponseHints {
        self.response_hints_at(message, limit, Utc::now())
    }

    /// Hints for replying to `message`, scoring recency relative to `now`
    pub fn response_hints_at(&self, message: &str, limit: usize, now: DateTime<Utc>) -> ResponseHints {
        let signals = self.extractor().extract(message);

        let relevant_history = self
            .retrieve_at(message, limit, now)
            .into_iter()
            .map(|turn| HistoryHint {
                user_said: turn.user_text,
                system_responded: turn.system_text,
                emotion: turn.emotion,
                topic: turn.topic,
            })
            .collect();

        ResponseHints {
            suggested_tone: suggest_response_tone(&signals.emotion, &signals.cultural_markers),
            detected_emotion: signals.emotion,
            emotion_confidence: signals.confidence,
            topic_category: signals.topic,
            cultural_markers: signals.cultural_markers,
            relevant_history,
            conversation_patterns: self.conversation_patterns(),
            memory_triggers: self.find_memory_triggers(message),
        }
    }

    /// Summary statistics
    pub fn stats(&self) -> MemoryStats {
        self.stats_at(Utc::now())
    }

    /// Summary statistics with the memory span measured up to `now`
    pub fn stats_at(&self, now: DateTime<Utc>) -> MemoryStats {
        let total = self.len();
        if total == 0 {
            return MemoryStats {
                total_conversations: 0,
                most_common_emotion: None,
                most_discussed_topic: None,
                average_confidence: 0.0,
                high_importance_memories: 0,
                memory_span_days: 0,
            };
        }

        MemoryStats {
            total_conversations: total,
            most_common_emotion: most_frequent(self.turns().map(|t| t.emotion.as_str())),
            most_discussed_topic: most_frequent(self.turns().map(|t| t.topic.as_str())),
            average_confidence: self.turns().map(|t| t.confidence).sum::<f64>() / total as f64,
            high_importance_memories: self.turns().filter(|t| t.importance > 7).count(),
            memory_span_days: self
                .turns()
                .next()
                .map(|first| first.age_at(now).num_days())
                .unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::SignalExtractor;
    use chrono::Duration;
    use std::sync::Arc;

    fn store() -> ConversationMemoryStore {
        ConversationMemoryStore::new(Arc::new(SignalExtractor::default()), 1000, 50)
    }

    #[test]
    fn test_assess_mood() {
        assert_eq!(assess_mood(["joy", "love", "neutral"]), ConversationMood::Positive);
        assert_eq!(assess_mood(["sadness", "fear", "joy"]), ConversationMood::Negative);
        assert_eq!(assess_mood(["joy", "sadness"]), ConversationMood::Balanced);
        assert_eq!(assess_mood(Vec::<&str>::new()), ConversationMood::Balanced);
    }

    #[test]
    fn test_suggest_response_tone() {
        assert_eq!(suggest_response_tone("joy", &[]), "enthusiastic_supportive");
        assert_eq!(suggest_response_tone("unknown", &[]), "neutral_friendly");

        let markers = vec![
            CulturalMarker::new("respect", "أستاذ"),
            CulturalMarker::new("religious", "الله"),
        ];
        assert_eq!(
            suggest_response_tone("sadness", &markers),
            "empathetic_comforting_respectful_formal"
        );
    }

    #[test]
    fn test_patterns_need_five_turns() {
        let mut memory = store();
        for _ in 0..4 {
            memory.record("فرحان", "");
        }
        assert!(memory.conversation_patterns().is_none());

        memory.record("حزين من شغل", "");
        let patterns = memory.conversation_patterns().unwrap();
        assert_eq!(patterns.dominant_emotion, "joy");
        assert_eq!(patterns.frequent_topics, vec!["general", "work"]);
        assert_eq!(patterns.conversation_mood, ConversationMood::Positive);
    }

    #[test]
    fn test_engagement_level() {
        let mut memory = store();
        assert_eq!(memory.engagement_level(), 0.5);

        for _ in 0..3 {
            memory.record("فرحان", "");
        }
        // one word per message, one topic, every confidence is 1.0
        let expected = (1.0 / 10.0 + 1.0 / 5.0 + 3.0 / 10.0) / 3.0;
        assert!((memory.engagement_level() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_find_memory_triggers() {
        let mut memory = store();
        memory.record("كيف أتعامل مع ضغط العمل", "");
        memory.record("السلام عليكم", "");

        let triggers = memory.find_memory_triggers("أبي أعرف كيف أتعامل مع ضغط الدراسة");
        assert_eq!(triggers, vec!["similar_to: كيف أتعامل مع ضغط العمل..."]);
    }

    #[test]
    fn test_response_hints() {
        let mut memory = store();
        memory.record("أنا فرحان اليوم", "الله يديم عليك الفرحة");

        let hints = memory.response_hints("فرحان الحمدلله", 5);
        assert_eq!(hints.detected_emotion, "joy");
        assert_eq!(hints.suggested_tone, "enthusiastic_supportive_respectful");
        assert_eq!(hints.relevant_history.len(), 1);
        assert!(hints.conversation_patterns.is_none());
    }

    #[test]
    fn test_stats() {
        let mut memory = store();
        assert_eq!(memory.stats().total_conversations, 0);
        assert!(memory.stats().most_common_emotion.is_none());

        let now = Utc::now();
        memory.record_at("أنا حزين", "", now - Duration::days(3));
        memory.record_at("حزين", "", now);
        memory.record_at("مرحبا", "", now);

        let stats = memory.stats_at(now);
        assert_eq!(stats.total_conversations, 3);
        assert_eq!(stats.most_common_emotion.as_deref(), Some("sadness"));
        assert_eq!(stats.most_discussed_topic.as_deref(), Some("general"));
        assert_eq!(stats.high_importance_memories, 2);
        assert_eq!(stats.memory_span_days, 3);
    }
}
