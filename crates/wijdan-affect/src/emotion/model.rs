//! Emotion models, personality traits and baseline intensities

use crate::signal::tokenize;
use std::collections::{HashMap, HashSet};

/// Keyword and intensity tables for one emotion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmotionModel {
    /// Emotion tag
    pub name: String,

    /// Lowercased keywords that signal the emotion
    pub keywords: HashSet<String>,

    /// Lowercased phrases that raise the intensity once the emotion is present
    pub intensity_indicators: HashSet<String>,
}

impl EmotionModel {
    /// Create a model, lowercasing keywords and indicators
    pub fn new<K, I, S, T>(name: impl Into<String>, keywords: K, intensity_indicators: I) -> Self
    where
        K: IntoIterator<Item = S>,
        I: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            name: name.into(),
            keywords: keywords
                .into_iter()
                .map(|kw| kw.as_ref().to_lowercase())
                .collect(),
            intensity_indicators: intensity_indicators
                .into_iter()
                .map(|ind| ind.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Intensity for a tokenized text, `None` if no keyword matched
    ///
    /// Each keyword match adds 0.3. Each matched indicator adds 0.8, 0.5 or
    /// 0.3 depending on whether it is longer than 10, longer than 6, or at most
    /// 6 characters. The total is capped at 1.0.
    pub fn score(&self, tokens: &HashSet<String>) -> Option<f64> {
        let keyword_matches = tokens.intersection(&self.keywords).count();
        if keyword_matches == 0 {
            return None;
        }

        let contributions: f64 = tokens
            .intersection(&self.intensity_indicators)
            .map(|indicator| indicator_weight(indicator))
            .sum();

        Some((keyword_matches as f64 * 0.3 + contributions).min(1.0))
    }
}

/// Longer phrases count as stronger
fn indicator_weight(indicator: &str) -> f64 {
    match indicator.chars().count() {
        n if n > 10 => 0.8,
        n if n > 6 => 0.5,
        _ => 0.3,
    }
}

/// Ordered emotion models; earlier models win ties
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmotionModels {
    models: Vec<EmotionModel>,
}

impl EmotionModels {
    /// Create from explicit models
    pub fn new(models: Vec<EmotionModel>) -> Self {
        Self { models }
    }

    /// Models in definition order
    pub fn iter(&self) -> impl Iterator<Item = &EmotionModel> {
        self.models.iter()
    }

    /// Score every emotion present in `text`, in definition order
    pub fn detect(&self, text: &str) -> Vec<(String, f64)> {
        let tokens = tokenize(text);
        self.models
            .iter()
            .filter_map(|model| model.score(&tokens).map(|score| (model.name.clone(), score)))
            .collect()
    }
}

impl Default for EmotionModels {
    fn default() -> Self {
        Self::new(vec![
            EmotionModel::new(
                "joy",
                ["فرحان", "مبسوط", "سعيد", "مستانس", "منبسط", "مفرحان", "باين عليك الفرح"],
                [
                    "مو طبيعي من الفرح",
                    "طائر من الفرح",
                    "أسعد إنسان",
                    "ما أصدق",
                    "الحمدلله فرحان",
                    "مبسوط والله",
                    "سعيد جداً",
                    "مبسوط",
                    "كويس",
                    "تمام",
                ],
            ),
            EmotionModel::new(
                "sadness",
                ["حزين", "زعلان", "متضايق", "منكسر", "مكتئب", "تعبان نفسياً"],
                [
                    "مكسور",
                    "محطم",
                    "مش قادر",
                    "دايب من الحزن",
                    "زعلان كثير",
                    "حزين والله",
                    "متضايق جداً",
                    "شوي حزين",
                    "متضايق",
                    "مو مرتاح",
                ],
            ),
            EmotionModel::new(
                "fear",
                ["خايف", "قلقان", "متوتر", "مرعوب", "خوف", "رعب", "هلع"],
                [
                    "مرعوب",
                    "هلعان",
                    "خايف موت",
                    "مش قادر أنام",
                    "قلقان كثير",
                    "خايف والله",
                    "متوتر جداً",
                    "شوي قلقان",
                    "خايف",
                    "متوتر",
                ],
            ),
            EmotionModel::new(
                "anger",
                ["غضبان", "زعلان", "متنرفز", "مستاء", "حانق", "مغتاظ"],
                [
                    "مجنون من الغضب",
                    "نار",
                    "بركان",
                    "حانق موت",
                    "غضبان كثير",
                    "متنرفز جداً",
                    "زعلان والله",
                    "شوي متضايق",
                    "متنرفز",
                    "مستاء",
                ],
            ),
            EmotionModel::new(
                "love",
                ["أحب", "حبيبي", "عزيز", "غالي", "محب", "عاشق", "مولع"],
                [
                    "عاشق",
                    "مجنون حب",
                    "حبي الوحيد",
                    "روحي",
                    "أحبك كثير",
                    "غالي عليّ",
                    "عزيز جداً",
                    "أحبك",
                    "حبيبي",
                    "عزيز عليّ",
                ],
            ),
        ])
    }
}

/// Personality of the companion, each trait in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersonalityTraits {
    /// Empathy, the base of every empathy score
    pub empathy: f64,
    /// Warmth
    pub warmth: f64,
    /// Patience
    pub patience: f64,
    /// Understanding
    pub understanding: f64,
    /// Positivity
    pub positivity: f64,
    /// Cultural sensitivity
    pub cultural_sensitivity: f64,
    /// Humor
    pub humor: f64,
    /// Wisdom
    pub wisdom: f64,
    /// Supportiveness
    pub supportiveness: f64,
    /// Authenticity
    pub authenticity: f64,
}

impl Default for PersonalityTraits {
    fn default() -> Self {
        Self {
            empathy: 0.95,
            warmth: 0.90,
            patience: 0.85,
            understanding: 0.92,
            positivity: 0.88,
            cultural_sensitivity: 0.98,
            humor: 0.75,
            wisdom: 0.80,
            supportiveness: 0.94,
            authenticity: 0.96,
        }
    }
}

/// Resting intensity per emotion when no event is active
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineIntensities {
    values: HashMap<String, f64>,
}

impl BaselineIntensities {
    /// Create from `(emotion, intensity)` pairs
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(emotion, value)| (emotion.into(), value.clamp(0.0, 1.0)))
                .collect(),
        }
    }

    /// Baseline for `emotion`, 0.0 when none is configured
    pub fn get(&self, emotion: &str) -> f64 {
        self.values.get(emotion).copied().unwrap_or(0.0)
    }
}

impl Default for BaselineIntensities {
    fn default() -> Self {
        Self::new([("joy", 0.7), ("trust", 0.6), ("respect", 0.8), ("calm", 0.5)])
    }
}
