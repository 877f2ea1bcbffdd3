//! Conversation turns and their importance scoring

use crate::signal::{CulturalMarker, Signals};
use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

/// Lowest importance a turn can carry
pub const MIN_IMPORTANCE: u8 = 1;

/// Highest importance a turn can carry
pub const MAX_IMPORTANCE: u8 = 10;

/// One user/system exchange with derived annotations
///
/// Immutable once recorded. Field names on the wire match the snapshot format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// When the turn was recorded
    #[serde(with = "crate::persistence::timestamp")]
    pub timestamp: DateTime<Utc>,

    /// What the user said
    #[serde(rename = "user_message")]
    pub user_text: String,

    /// What the agent answered
    #[serde(rename = "system_response", alias = "nano_response")]
    pub system_text: String,

    /// Emotion detected in the user text
    #[serde(rename = "emotion_detected")]
    pub emotion: String,

    /// Topic detected in the user text
    #[serde(rename = "topic_category")]
    pub topic: String,

    /// Cultural markers found in user and system text
    pub cultural_markers: Vec<CulturalMarker>,

    /// Emotion confidence (0.0 to 1.0)
    #[serde(rename = "confidence_level", deserialize_with = "confidence_in_range")]
    pub confidence: f64,

    /// Importance (1 to 10)
    #[serde(rename = "memory_importance", deserialize_with = "importance_in_range")]
    pub importance: u8,
}

fn confidence_in_range<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let confidence = f64::deserialize(deserializer)?;
    if !(0.0..=1.0).contains(&confidence) {
        return Err(de::Error::custom(format!(
            "confidence_level {} outside 0.0..=1.0",
            confidence
        )));
    }
    Ok(confidence)
}

fn importance_in_range<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let importance = u8::deserialize(deserializer)?;
    if !(MIN_IMPORTANCE..=MAX_IMPORTANCE).contains(&importance) {
        return Err(de::Error::custom(format!(
            "memory_importance {} outside {}..={}",
            importance, MIN_IMPORTANCE, MAX_IMPORTANCE
        )));
    }
    Ok(importance)
}

impl ConversationTurn {
    /// Build a turn from extracted signals; importance starts at the minimum
    pub fn new(
        user_text: impl Into<String>,
        system_text: impl Into<String>,
        signals: Signals,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            user_text: user_text.into(),
            system_text: system_text.into(),
            emotion: signals.emotion,
            topic: signals.topic,
            cultural_markers: signals.cultural_markers,
            confidence: signals.confidence.clamp(0.0, 1.0),
            importance: MIN_IMPORTANCE,
        }
    }

    /// Set importance, clamped to 1..=10
    pub fn with_importance(mut self, importance: u8) -> Self {
        self.importance = importance.clamp(MIN_IMPORTANCE, MAX_IMPORTANCE);
        self
    }

    /// Age of the turn relative to `now`
    pub fn age_at(&self, now: DateTime<Utc>) -> chrono::Duration {
        now.signed_duration_since(self.timestamp)
    }
}

/// Rules for scoring how important a turn is to remember
#[derive(Debug, Clone, PartialEq)]
pub struct ImportanceRules {
    /// Starting score
    pub base: u8,

    /// Emotions that add `strong_affect_bonus`
    pub strong_affect: Vec<String>,

    /// Bonus for strong affect
    pub strong_affect_bonus: u8,

    /// Substrings of the user text that mark personal information
    pub self_referential: Vec<String>,

    /// Bonus for personal information
    pub self_referential_bonus: u8,

    /// More than this many cultural markers adds one point
    pub marker_threshold: usize,

    /// Confidence above this adds one point
    pub confidence_threshold: f64,
}

impl ImportanceRules {
    /// Score a turn, capped at 10
    pub fn score(&self, turn: &ConversationTurn) -> u8 {
        let mut importance = self.base;

        if self.strong_affect.iter().any(|e| *e == turn.emotion) {
            importance = importance.saturating_add(self.strong_affect_bonus);
        }

        let user_lower = turn.user_text.to_lowercase();
        if self
            .self_referential
            .iter()
            .any(|keyword| user_lower.contains(keyword.as_str()))
        {
            importance = importance.saturating_add(self.self_referential_bonus);
        }

        if turn.cultural_markers.len() > self.marker_threshold {
            importance = importance.saturating_add(1);
        }

        if turn.confidence > self.confidence_threshold {
            importance = importance.saturating_add(1);
        }

        importance.clamp(MIN_IMPORTANCE, MAX_IMPORTANCE)
    }
}

impl Default for ImportanceRules {
    fn default() -> Self {
        Self {
            base: 5,
            strong_affect: ["joy", "sadness", "fear", "love"]
                .into_iter()
                .map(String::from)
                .collect(),
            strong_affect_bonus: 2,
            self_referential: ["اسمي", "أنا", "بيتي", "عائلتي", "شغلي"]
                .into_iter()
                .map(String::from)
                .collect(),
            self_referential_bonus: 3,
            marker_threshold: 2,
            confidence_threshold: 0.8,
        }
    }
}
