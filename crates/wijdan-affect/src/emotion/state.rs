//! Emotional state snapshots and the exchange log summary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Cultural register of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CulturalContext {
    /// Religious expressions
    Religious,
    /// Family references
    Family,
    /// Formal or workplace language
    Formal,
    /// Anything else
    Casual,
}

impl CulturalContext {
    /// Tag used to key template adaptations
    pub fn as_str(&self) -> &'static str {
        match self {
            CulturalContext::Religious => "religious",
            CulturalContext::Family => "family",
            CulturalContext::Formal => "formal",
            CulturalContext::Casual => "casual",
        }
    }
}

impl fmt::Display for CulturalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of analyzing one message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalState {
    /// Strongest emotion in the message, `neutral` if none
    pub primary_emotion: String,

    /// Intensity of the primary emotion (0.0 to 1.0)
    pub intensity: f64,

    /// Other emotions found, with their intensities
    pub secondary_emotions: BTreeMap<String, f64>,

    /// Emotions of the most recent exchanges, oldest first
    pub emotional_history: Vec<String>,

    /// How steady recent emotions have been (0.1 to 1.0)
    pub stability: f64,

    /// How much empathy the reply should carry (0.0 to 1.0)
    pub empathy_score: f64,

    /// Cultural register of the message
    pub cultural_context: CulturalContext,

    /// Dominant emotion across active events after this message
    pub dominant_emotion: String,
}

/// One answered message, kept for analytics and stability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRecord {
    /// When the reply was produced
    pub timestamp: DateTime<Utc>,
    /// Primary emotion of the message
    pub emotion: String,
    /// Intensity of that emotion
    pub intensity: f64,
    /// Quality score of the reply
    pub response_quality: f64,
    /// Empathy level of the reply
    pub empathy_level: String,
}

/// Summary of the exchange log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalAnalytics {
    /// Exchanges in the log
    pub total_interactions: usize,
    /// Most frequent emotion
    pub most_common_emotion: String,
    /// Mean intensity
    pub average_intensity: f64,
    /// Mean reply quality
    pub average_response_quality: f64,
    /// Count per emotion
    pub emotional_distribution: BTreeMap<String, usize>,
    /// Share of replies with quality above 0.8
    pub empathy_effectiveness: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cultural_context_tags() {
        assert_eq!(CulturalContext::Religious.as_str(), "religious");
        assert_eq!(CulturalContext::Casual.to_string(), "casual");
        assert_eq!(
            serde_json::to_value(CulturalContext::Formal).unwrap(),
            "formal"
        );
    }
}
