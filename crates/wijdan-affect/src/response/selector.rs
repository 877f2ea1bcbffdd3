//! Template selection and reply composition

use super::random::{choose, RandomSource};
use super::template::{EmpathyCategory, ResponseTemplate, TemplateCatalog};
use crate::emotion::EmotionalState;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Empathy phrase used when a category has no phrases
const EMPATHY_FALLBACK: &str = "أنا معك";

/// No empathy phrase below this intensity
const EMPATHY_THRESHOLD: f64 = 0.3;

/// Follow-up questions only above this intensity
const FOLLOW_UP_THRESHOLD: f64 = 0.6;

/// Negative emotions above this intensity get validation instead of support
const VALIDATION_THRESHOLD: f64 = 0.7;

const DEFAULT_QUALITY: f64 = 0.7;
const DEFAULT_RESONANCE: f64 = 0.6;
const DEFAULT_EMPATHY_LEVEL: &str = "medium";
const DEFAULT_CULTURAL_ADAPTATION: &str = "general";

const CULTURAL_KEYWORDS: [&str; 4] = ["الله", "ان شاء الله", "الحمدلله", "يا رب"];
const EMPATHY_INDICATORS: [&str; 5] = ["معك", "أفهم", "قلبي", "نحبك", "هنا لك"];

/// Outcome of template selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TemplateChoice<'a> {
    /// A template covers the emotion and intensity
    Template(&'a ResponseTemplate),
    /// No template matched; use this default reply
    Default(&'a str),
}

/// Details about a composed reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Primary emotion the reply answers
    pub emotion: String,
    /// Its intensity
    pub intensity: f64,
    /// Template used, `None` for a default reply
    pub template: Option<String>,
    /// Empathy level of the reply
    pub empathy_level: String,
    /// Cultural adaptation applied
    pub cultural_adaptation: String,
    /// Heuristic quality (0.0 to 1.0)
    pub response_quality: f64,
    /// How well the wording matches the emotion (0.0 to 1.0)
    pub emotional_resonance: f64,
}

/// A reply and its metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedResponse {
    /// Reply text
    pub text: String,
    /// Reply metadata
    pub metadata: ResponseMetadata,
}

/// Chooses templates and assembles replies
#[derive(Debug, Clone, Default)]
pub struct ResponseTemplateSelector {
    catalog: TemplateCatalog,
}

impl ResponseTemplateSelector {
    /// Create a selector over a catalog
    pub fn new(catalog: TemplateCatalog) -> Self {
        Self { catalog }
    }

    /// Catalog in use
    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Template whose band covers `intensity` with the closest midpoint
    ///
    /// Equal distances keep the first-defined template.
    pub fn select_template(&self, emotion: &str, intensity: f64) -> TemplateChoice<'_> {
        let mut best: Option<(&ResponseTemplate, f64)> = None;

        for template in &self.catalog.templates {
            if template.emotion_trigger != emotion || !template.covers(intensity) {
                continue;
            }

            let distance = template.distance(intensity);
            if best.map_or(true, |(_, closest)| distance < closest) {
                best = Some((template, distance));
            }
        }

        match best {
            Some((template, _)) => TemplateChoice::Template(template),
            None => TemplateChoice::Default(self.catalog.default_response(emotion)),
        }
    }

    /// Compose a reply to `user_text` given its analyzed state
    ///
    /// Parts in order: one opening pattern, a cultural addition when the
    /// template adapts to the state's context, an empathy phrase from 0.3
    /// intensity, and a follow-up question above 0.6. A default reply is
    /// returned alone.
    ///
    /// `user_text` does not change the wording; the analyzed state carries
    /// everything selection needs. It is only logged.
    pub fn compose(
        &self,
        state: &EmotionalState,
        user_text: &str,
        rng: &mut dyn RandomSource,
    ) -> ComposedResponse {
        let template = match self.select_template(&state.primary_emotion, state.intensity) {
            TemplateChoice::Template(template) => template,
            TemplateChoice::Default(text) => {
                debug!(
                    emotion = %state.primary_emotion,
                    intensity = state.intensity,
                    "No template matched, using default reply"
                );
                return ComposedResponse {
                    text: text.to_string(),
                    metadata: ResponseMetadata {
                        emotion: state.primary_emotion.clone(),
                        intensity: state.intensity,
                        template: None,
                        empathy_level: DEFAULT_EMPATHY_LEVEL.to_string(),
                        cultural_adaptation: DEFAULT_CULTURAL_ADAPTATION.to_string(),
                        response_quality: DEFAULT_QUALITY,
                        emotional_resonance: DEFAULT_RESONANCE,
                    },
                };
            }
        };

        let mut parts: Vec<&str> = Vec::with_capacity(4);

        if let Some(opening) = choose(&mut *rng, &template.response_patterns) {
            parts.push(opening);
        }

        if let Some(pool) = template
            .cultural_adaptation
            .get(state.cultural_context.as_str())
        {
            if let Some(addition) = choose(&mut *rng, pool) {
                parts.push(addition);
            }
        }

        if let Some(category) = empathy_category(&state.primary_emotion, state.intensity) {
            let phrase = choose(&mut *rng, self.catalog.empathy.phrases(category)).unwrap_or(EMPATHY_FALLBACK);
            parts.push(phrase);
        }

        if state.intensity > FOLLOW_UP_THRESHOLD {
            if let Some(question) = choose(&mut *rng, &template.follow_up_questions) {
                parts.push(question);
            }
        }

        let text = parts.join(" ");
        let metadata = ResponseMetadata {
            emotion: state.primary_emotion.clone(),
            intensity: state.intensity,
            template: Some(template.key.clone()),
            empathy_level: template.empathy_level.clone(),
            cultural_adaptation: state.cultural_context.as_str().to_string(),
            response_quality: assess_response_quality(state, &text),
            emotional_resonance: emotional_resonance(state, &text),
        };

        debug!(
            template = %template.key,
            parts = parts.len(),
            user_chars = user_text.chars().count(),
            quality = metadata.response_quality,
            "Composed reply"
        );

        ComposedResponse { text, metadata }
    }
}

/// Which empathy phrases fit, `None` below 0.3 intensity
pub fn empathy_category(emotion: &str, intensity: f64) -> Option<EmpathyCategory> {
    if intensity < EMPATHY_THRESHOLD {
        return None;
    }

    let negative = matches!(emotion, "sadness" | "fear" | "anger");
    if negative && intensity > VALIDATION_THRESHOLD {
        Some(EmpathyCategory::Validation)
    } else {
        Some(EmpathyCategory::Support)
    }
}

/// Heuristic reply quality
///
/// 0.2 for 5 to 25 words, 0.2 if the emotion tag appears, 0.3 for cultural
/// wording and 0.3 for empathy wording.
pub fn assess_response_quality(state: &EmotionalState, response: &str) -> f64 {
    let mut score: f64 = 0.0;

    let word_count = response.split_whitespace().count();
    if (5..=25).contains(&word_count) {
        score += 0.2;
    }

    if response.to_lowercase().contains(&state.primary_emotion) {
        score += 0.2;
    }

    if CULTURAL_KEYWORDS.iter().any(|kw| response.contains(kw)) {
        score += 0.3;
    }

    if EMPATHY_INDICATORS.iter().any(|ind| response.contains(ind)) {
        score += 0.3;
    }

    score.min(1.0)
}

/// Share of an emotion's resonant words found in the reply; 0.5 for other emotions
pub fn emotional_resonance(state: &EmotionalState, response: &str) -> f64 {
    let words: &[&str] = match state.primary_emotion.as_str() {
        "joy" => &["فرح", "سعادة", "مبروك", "هنيئاً"],
        "sadness" => &["حزن", "ضيق", "صبر", "تعاطف"],
        "fear" => &["أمان", "طمأنينة", "حماية", "دعم"],
        "anger" => &["فهم", "حق", "معك", "طبيعي"],
        "love" => &["حب", "جميل", "رائع", "أحلى"],
        _ => return 0.5,
    };

    let response = response.to_lowercase();
    let matches = words.iter().filter(|word| response.contains(*word)).count();
    (matches as f64 / words.len() as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::CulturalContext;
    use crate::response::FixedRandom;
    use std::collections::BTreeMap;

    fn state(emotion: &str, intensity: f64, context: CulturalContext) -> EmotionalState {
        EmotionalState {
            primary_emotion: emotion.to_string(),
            intensity,
            secondary_emotions: BTreeMap::new(),
            emotional_history: Vec::new(),
            stability: 0.5,
            empathy_score: 0.95,
            cultural_context: context,
            dominant_emotion: emotion.to_string(),
        }
    }

    #[test]
    fn test_select_template() {
        let selector = ResponseTemplateSelector::default();

        match selector.select_template("joy", 0.9) {
            TemplateChoice::Template(t) => assert_eq!(t.key, "joy_high"),
            other => panic!("unexpected {:?}", other),
        }
        match selector.select_template("fear", 0.7) {
            TemplateChoice::Template(t) => assert_eq!(t.key, "fear_medium"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            selector.select_template("sadness", 0.5),
            TemplateChoice::Default("قلبي معك في هالوقت، والله يصبرك ويقويك")
        );
        assert_eq!(
            selector.select_template("gratitude", 0.9),
            TemplateChoice::Default(crate::response::FALLBACK_RESPONSE)
        );
    }

    #[test]
    fn test_select_template_tie_keeps_first() {
        let mut catalog = TemplateCatalog::default();
        let mut twin = catalog.templates[0].clone();
        twin.key = "joy_twin".to_string();
        catalog.templates.push(twin);

        let selector = ResponseTemplateSelector::new(catalog);
        match selector.select_template("joy", 0.8) {
            TemplateChoice::Template(t) => assert_eq!(t.key, "joy_high"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_compose_full_reply() {
        let selector = ResponseTemplateSelector::default();
        let state = state("joy", 0.9, CulturalContext::Religious);

        let reply = selector.compose(&state, "فرحان", &mut FixedRandom(0));
        assert_eq!(
            reply.text,
            "يا الله! فرحتنا بفرحتك والله! 🎉 الحمدلله رب العالمين! أنا هنا لو تحتاج أي شي قول لي تفاصيل أكثر، ودي أفرح معك!"
        );
        assert_eq!(reply.metadata.template.as_deref(), Some("joy_high"));
        assert_eq!(reply.metadata.empathy_level, "high");
        assert_eq!(reply.metadata.cultural_adaptation, "religious");
        assert!((reply.metadata.response_quality - 0.8).abs() < 1e-9);
        assert!((reply.metadata.emotional_resonance - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_compose_without_cultural_match_or_follow_up() {
        let selector = ResponseTemplateSelector::default();
        let state = state("fear", 0.55, CulturalContext::Casual);

        let reply = selector.compose(&state, "خايف", &mut FixedRandom(0));
        assert_eq!(reply.text, "لا تخاف، الله معك دايماً 🤲 أنا هنا لو تحتاج أي شي");
    }

    #[test]
    fn test_compose_validation_for_intense_sadness() {
        let selector = ResponseTemplateSelector::default();
        let state = state("sadness", 0.9, CulturalContext::Casual);

        let reply = selector.compose(&state, "حزين", &mut FixedRandom(0));
        assert!(reply.text.contains("مشاعرك طبيعية ومفهومة"));
        assert!(reply.text.ends_with("تبي تتكلم عن اللي صار؟"));
    }

    #[test]
    fn test_compose_default_reply_alone() {
        let selector = ResponseTemplateSelector::default();
        let state = state("neutral", 0.5, CulturalContext::Religious);

        let reply = selector.compose(&state, "", &mut FixedRandom(2));
        assert_eq!(reply.text, "أفهم شعورك، وأنا هنا لو تحتاج أتكلم عن أي شي");
        assert_eq!(reply.metadata.template, None);
        assert_eq!(reply.metadata.response_quality, 0.7);
        assert_eq!(reply.metadata.emotional_resonance, 0.6);
        assert_eq!(reply.metadata.empathy_level, "medium");
        assert_eq!(reply.metadata.cultural_adaptation, "general");
    }

    #[test]
    fn test_empathy_category() {
        assert_eq!(empathy_category("sadness", 0.2), None);
        assert_eq!(empathy_category("sadness", 0.8), Some(EmpathyCategory::Validation));
        assert_eq!(empathy_category("anger", 0.5), Some(EmpathyCategory::Support));
        assert_eq!(empathy_category("joy", 0.95), Some(EmpathyCategory::Support));
    }

    #[test]
    fn test_empty_empathy_pool_falls_back() {
        let mut catalog = TemplateCatalog::default();
        catalog.empathy = crate::response::EmpathyDatabase::new(Default::default());
        let selector = ResponseTemplateSelector::new(catalog);

        let reply = selector.compose(
            &state("fear", 0.5, CulturalContext::Casual),
            "",
            &mut FixedRandom(0),
        );
        assert!(reply.text.ends_with(EMPATHY_FALLBACK));
    }

    #[test]
    fn test_resonance_for_unknown_emotion() {
        let s = state("calm", 0.5, CulturalContext::Casual);
        assert_eq!(emotional_resonance(&s, "أي شي"), 0.5);
    }
}
