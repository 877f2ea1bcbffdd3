//! Keyword-based classification of emotion, topic and cultural register

use super::lexicon::{KeywordCategory, Lexicon};
use crate::error::{AffectError, AffectResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Emotion tag returned when no emotion keyword matches
pub const NEUTRAL_EMOTION: &str = "neutral";

/// Confidence attached to the neutral fallback
pub const NEUTRAL_CONFIDENCE: f64 = 0.5;

/// Topic tag returned when no topic keyword matches
pub const GENERAL_TOPIC: &str = "general";

/// A keyword signalling cultural register, tagged with its category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CulturalMarker {
    /// Register category (e.g. `religious`, `respect`)
    pub category: String,

    /// Matched keyword
    pub word: String,
}

impl CulturalMarker {
    /// Create a marker
    pub fn new(category: impl Into<String>, word: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            word: word.into(),
        }
    }

    /// Whether this marker belongs to a category
    pub fn is_category(&self, category: &str) -> bool {
        self.category == category
    }
}

impl fmt::Display for CulturalMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category, self.word)
    }
}

impl std::str::FromStr for CulturalMarker {
    type Err = AffectError;

    fn from_str(s: &str) -> AffectResult<Self> {
        match s.split_once(':') {
            Some((category, word)) if !category.is_empty() && !word.is_empty() => {
                Ok(Self::new(category, word))
            }
            _ => Err(AffectError::validation(
                "cultural_marker",
                "expected 'category:word'",
                s,
            )),
        }
    }
}

impl TryFrom<String> for CulturalMarker {
    type Error = AffectError;

    fn try_from(value: String) -> AffectResult<Self> {
        value.parse()
    }
}

impl From<CulturalMarker> for String {
    fn from(marker: CulturalMarker) -> Self {
        marker.to_string()
    }
}

/// All signals extracted from one piece of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signals {
    /// Emotion tag
    pub emotion: String,

    /// Emotion confidence (0.0 to 1.0)
    pub confidence: f64,

    /// Topic tag
    pub topic: String,

    /// Cultural markers
    pub cultural_markers: Vec<CulturalMarker>,
}

/// Split lowercased text into its set of whitespace-delimited words
pub fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(String::from)
        .collect()
}

/// Classifies text against a [`Lexicon`]
///
/// Pure: the same text always produces the same signals.
#[derive(Debug, Clone)]
pub struct SignalExtractor {
    lexicon: Lexicon,
}

impl SignalExtractor {
    /// Create an extractor over the given tables
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// Tables in use
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Detect the dominant emotion and its confidence
    pub fn detect_emotion(&self, text: &str) -> (String, f64) {
        let tokens = tokenize(text);

        match best_category(&self.lexicon.emotions, &tokens) {
            Some((category, matches)) => {
                let confidence = (matches as f64 / tokens.len() as f64).min(1.0);
                (category.name.clone(), confidence)
            }
            None => (NEUTRAL_EMOTION.to_string(), NEUTRAL_CONFIDENCE),
        }
    }

    /// Classify the topic of the text
    pub fn classify_topic(&self, text: &str) -> String {
        let tokens = tokenize(text);

        best_category(&self.lexicon.topics, &tokens)
            .map(|(category, _)| category.name.clone())
            .unwrap_or_else(|| GENERAL_TOPIC.to_string())
    }

    /// Extract cultural markers in category order, words in order of appearance
    pub fn extract_cultural_markers(&self, text: &str) -> Vec<CulturalMarker> {
        let lowered = text.to_lowercase();
        let mut markers = Vec::new();

        for category in &self.lexicon.cultural {
            let mut seen = HashSet::new();
            for word in lowered.split_whitespace() {
                if category.keywords.contains(word) && seen.insert(word) {
                    markers.push(CulturalMarker::new(category.name.clone(), word));
                }
            }
        }

        markers
    }

    /// Run every classifier on the same text
    pub fn extract(&self, text: &str) -> Signals {
        let (emotion, confidence) = self.detect_emotion(text);

        Signals {
            emotion,
            confidence,
            topic: self.classify_topic(text),
            cultural_markers: self.extract_cultural_markers(text),
        }
    }
}

impl Default for SignalExtractor {
    fn default() -> Self {
        Self::new(Lexicon::default())
    }
}

/// Category with the most matching tokens; the first-defined wins ties
fn best_category<'a>(
    categories: &'a [KeywordCategory],
    tokens: &HashSet<String>,
) -> Option<(&'a KeywordCategory, usize)> {
    let mut best: Option<(&KeywordCategory, usize)> = None;

    for category in categories {
        let matches = category.count_matches(tokens);
        if matches == 0 {
            continue;
        }
        if best.map_or(true, |(_, top)| matches > top) {
            best = Some((category, matches));
        }
    }

    best
}
