//! Emotional state engine
//!
//! Keeps a rolling, time-decaying set of emotional events plus a bounded log
//! of answered exchanges, and turns a message into an [`EmotionalState`].

use super::event::EmotionalEvent;
use super::model::{BaselineIntensities, EmotionModels, PersonalityTraits};
use super::state::{CulturalContext, EmotionalAnalytics, EmotionalState, ExchangeRecord};
use crate::config::AffectConfig;
use crate::memory::most_frequent;
use crate::signal::NEUTRAL_EMOTION;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet, VecDeque};
use tracing::{debug, trace};

/// Emotion reported when no event is active
pub const CALM_EMOTION: &str = "calm";

/// Intensity reported for text without any emotion
pub const NEUTRAL_INTENSITY: f64 = 0.5;

const NEGATIVE_EMOTIONS: [&str; 3] = ["sadness", "fear", "anger"];
const POSITIVE_EMOTIONS: [&str; 2] = ["joy", "love"];

const RELIGIOUS_MARKERS: [&str; 4] = ["الله", "الحمدلله", "ان شاء الله", "ما شاء الله"];
const FAMILY_MARKERS: [&str; 5] = ["أهل", "عائلة", "والدين", "أمي", "أبوي"];
const FORMAL_MARKERS: [&str; 5] = ["أستاذ", "دكتور", "مدير", "عمل", "وظيفة"];

/// Number of exchanges reported in [`EmotionalState::emotional_history`]
const HISTORY_LENGTH: usize = 10;

/// Messages considered by stability
const STABILITY_WINDOW: usize = 5;

/// Tracks emotional events and exchanges for one conversation
pub struct EmotionalStateEngine {
    models: EmotionModels,
    traits: PersonalityTraits,
    baseline: BaselineIntensities,

    /// Events not yet pruned; may include expired ones until the next update
    active: Vec<EmotionalEvent>,

    /// Every event, oldest first, bounded by `event_log_capacity`
    event_log: VecDeque<EmotionalEvent>,

    /// Answered exchanges, oldest first, bounded by `exchange_log_capacity`
    exchanges: VecDeque<ExchangeRecord>,

    event_duration_secs: u64,
    event_log_capacity: usize,
    exchange_log_capacity: usize,
}

impl EmotionalStateEngine {
    /// Create an engine with default capacities
    pub fn new(models: EmotionModels) -> Self {
        Self::from_config(models, &AffectConfig::default())
    }

    /// Create an engine sized from configuration
    pub fn from_config(models: EmotionModels, config: &AffectConfig) -> Self {
        Self {
            models,
            traits: PersonalityTraits::default(),
            baseline: BaselineIntensities::default(),
            active: Vec::new(),
            event_log: VecDeque::new(),
            exchanges: VecDeque::new(),
            event_duration_secs: config.event_duration_secs,
            event_log_capacity: config.event_log_capacity.max(1),
            exchange_log_capacity: config.exchange_log_capacity.max(1),
        }
    }

    /// Replace the personality traits
    pub fn with_traits(mut self, traits: PersonalityTraits) -> Self {
        self.traits = traits;
        self
    }

    /// Replace the baseline intensities
    pub fn with_baseline(mut self, baseline: BaselineIntensities) -> Self {
        self.baseline = baseline;
        self
    }

    /// Emotion models in use
    pub fn models(&self) -> &EmotionModels {
        &self.models
    }

    /// Personality traits in use
    pub fn traits(&self) -> &PersonalityTraits {
        &self.traits
    }

    /// Score every emotion present in `text` without touching state
    pub fn detect(&self, text: &str) -> Vec<(String, f64)> {
        self.models.detect(text)
    }

    /// Push one event per emotion found in `text`
    pub fn update_from_text(&mut self, text: &str) -> Vec<EmotionalEvent> {
        self.update_from_text_at(text, Utc::now())
    }

    /// Push one event per emotion found in `text`, created at `now`
    ///
    /// Expired events are dropped from the active set first.
    pub fn update_from_text_at(&mut self, text: &str, now: DateTime<Utc>) -> Vec<EmotionalEvent> {
        self.prune_expired_at(now);

        let events: Vec<EmotionalEvent> = self
            .detect(text)
            .into_iter()
            .map(|(emotion, intensity)| {
                EmotionalEvent::new(emotion, intensity, self.event_duration_secs, now)
            })
            .collect();

        for event in &events {
            self.add_event(event.clone());
        }

        events
    }

    /// Add an event to the active set and the log
    pub fn add_event(&mut self, event: EmotionalEvent) {
        trace!(
            emotion = %event.emotion,
            intensity = event.intensity,
            duration_secs = event.duration_secs,
            "Added emotional event"
        );

        self.active.push(event.clone());
        self.event_log.push_back(event);

        while self.event_log.len() > self.event_log_capacity {
            self.event_log.pop_front();
        }
    }

    /// Drop events that are no longer active at `now`
    pub fn prune_expired_at(&mut self, now: DateTime<Utc>) {
        let before = self.active.len();
        self.active.retain(|event| event.is_active_at(now));

        let pruned = before - self.active.len();
        if pruned > 0 {
            trace!(pruned, "Pruned expired emotional events");
        }
    }

    /// Events active at `now`, oldest first
    pub fn active_events_at(&self, now: DateTime<Utc>) -> impl Iterator<Item = &EmotionalEvent> {
        self.active.iter().filter(move |event| event.is_active_at(now))
    }

    /// Logged events, oldest first
    pub fn event_log(&self) -> impl Iterator<Item = &EmotionalEvent> {
        self.event_log.iter()
    }

    /// Strongest active emotion now
    pub fn dominant_emotion(&self) -> String {
        self.dominant_emotion_at(Utc::now())
    }

    /// Strongest active emotion at `now`, `calm` when none is active
    ///
    /// Equal intensities go to the most recently created event.
    pub fn dominant_emotion_at(&self, now: DateTime<Utc>) -> String {
        let mut strongest: Option<&EmotionalEvent> = None;

        for event in self.active_events_at(now) {
            let replace = match strongest {
                None => true,
                Some(best) => {
                    event.intensity > best.intensity
                        || (event.intensity == best.intensity && event.created_at >= best.created_at)
                }
            };
            if replace {
                strongest = Some(event);
            }
        }

        strongest
            .map(|event| event.emotion.clone())
            .unwrap_or_else(|| CALM_EMOTION.to_string())
    }

    /// Current intensity of `emotion`
    pub fn emotion_intensity(&self, emotion: &str) -> f64 {
        self.emotion_intensity_at(emotion, Utc::now())
    }

    /// Mean intensity of active events of `emotion`, else its baseline
    pub fn emotion_intensity_at(&self, emotion: &str, now: DateTime<Utc>) -> f64 {
        let (total, count) = self
            .active_events_at(now)
            .filter(|event| event.emotion == emotion)
            .fold((0.0, 0usize), |(total, count), event| {
                (total + event.intensity, count + 1)
            });

        if count > 0 {
            total / count as f64
        } else {
            self.baseline.get(emotion)
        }
    }

    /// Analyze a message now
    pub fn analyze_state(&mut self, text: &str) -> EmotionalState {
        self.analyze_state_at(text, Utc::now())
    }

    /// Analyze a message at `now`, pushing its events
    ///
    /// Empty or whitespace-only text yields `neutral` at 0.5.
    pub fn analyze_state_at(&mut self, text: &str, now: DateTime<Utc>) -> EmotionalState {
        let detected = self.detect(text);
        let (primary_emotion, intensity) = primary_of(&detected);

        let secondary_emotions: BTreeMap<String, f64> = detected
            .iter()
            .filter(|(emotion, _)| *emotion != primary_emotion)
            .cloned()
            .collect();

        self.update_from_text_at(text, now);

        let recorded: Vec<&str> = self.exchanges.iter().map(|r| r.emotion.as_str()).collect();
        let stability = stability_from(&recorded);

        let state = EmotionalState {
            empathy_score: self.empathy_score(&primary_emotion, intensity),
            emotional_history: self.emotional_history(),
            cultural_context: cultural_context(text),
            dominant_emotion: self.dominant_emotion_at(now),
            primary_emotion,
            intensity,
            secondary_emotions,
            stability,
        };

        debug!(
            emotion = %state.primary_emotion,
            intensity = state.intensity,
            secondary = state.secondary_emotions.len(),
            stability = state.stability,
            cultural_context = %state.cultural_context,
            dominant = %state.dominant_emotion,
            "Analyzed emotional state"
        );

        state
    }

    /// Stability over the last five of `messages`; 0.5 with fewer than three
    pub fn stability_of<S: AsRef<str>>(&self, messages: &[S]) -> f64 {
        let emotions: Vec<String> = messages
            .iter()
            .map(|message| primary_of(&self.detect(message.as_ref())).0)
            .collect();
        let emotions: Vec<&str> = emotions.iter().map(String::as_str).collect();
        stability_from(&emotions)
    }

    /// Cultural register of `text`
    pub fn cultural_context(&self, text: &str) -> CulturalContext {
        cultural_context(text)
    }

    /// Empathy a reply should carry for `emotion` at `intensity`
    ///
    /// Negative emotions add up to 0.2 on top of the empathy trait, positive
    /// ones scale it to 80%.
    pub fn empathy_score(&self, emotion: &str, intensity: f64) -> f64 {
        let base = self.traits.empathy;

        if NEGATIVE_EMOTIONS.contains(&emotion) {
            (base + intensity * 0.2).min(1.0)
        } else if POSITIVE_EMOTIONS.contains(&emotion) {
            base * 0.8
        } else {
            base
        }
    }

    /// Log an answered exchange now
    pub fn record_exchange(
        &mut self,
        state: &EmotionalState,
        response_quality: f64,
        empathy_level: &str,
    ) {
        self.record_exchange_at(state, response_quality, empathy_level, Utc::now());
    }

    /// Log an answered exchange at `now`
    pub fn record_exchange_at(
        &mut self,
        state: &EmotionalState,
        response_quality: f64,
        empathy_level: &str,
        now: DateTime<Utc>,
    ) {
        self.exchanges.push_back(ExchangeRecord {
            timestamp: now,
            emotion: state.primary_emotion.clone(),
            intensity: state.intensity,
            response_quality,
            empathy_level: empathy_level.to_string(),
        });

        while self.exchanges.len() > self.exchange_log_capacity {
            self.exchanges.pop_front();
        }
    }

    /// Logged exchanges, oldest first
    pub fn exchanges(&self) -> impl Iterator<Item = &ExchangeRecord> {
        self.exchanges.iter()
    }

    /// Summary of the exchange log, `None` when it is empty
    pub fn analytics(&self) -> Option<EmotionalAnalytics> {
        if self.exchanges.is_empty() {
            return None;
        }

        let total = self.exchanges.len();
        let mut distribution = BTreeMap::new();
        for record in &self.exchanges {
            *distribution.entry(record.emotion.clone()).or_insert(0) += 1;
        }

        Some(EmotionalAnalytics {
            total_interactions: total,
            most_common_emotion: most_frequent(self.exchanges.iter().map(|r| r.emotion.as_str()))
                .unwrap_or_else(|| NEUTRAL_EMOTION.to_string()),
            average_intensity: self.exchanges.iter().map(|r| r.intensity).sum::<f64>()
                / total as f64,
            average_response_quality: self
                .exchanges
                .iter()
                .map(|r| r.response_quality)
                .sum::<f64>()
                / total as f64,
            emotional_distribution: distribution,
            empathy_effectiveness: self
                .exchanges
                .iter()
                .filter(|r| r.response_quality > 0.8)
                .count() as f64
                / total as f64,
        })
    }

    fn emotional_history(&self) -> Vec<String> {
        let skip = self.exchanges.len().saturating_sub(HISTORY_LENGTH);
        self.exchanges
            .iter()
            .skip(skip)
            .map(|record| record.emotion.clone())
            .collect()
    }
}

impl Default for EmotionalStateEngine {
    fn default() -> Self {
        Self::new(EmotionModels::default())
    }
}

/// Strongest detected emotion; earlier models win ties
fn primary_of(detected: &[(String, f64)]) -> (String, f64) {
    let mut primary: Option<&(String, f64)> = None;
    for candidate in detected {
        if primary.map_or(true, |best| candidate.1 > best.1) {
            primary = Some(candidate);
        }
    }

    primary
        .cloned()
        .unwrap_or_else(|| (NEUTRAL_EMOTION.to_string(), NEUTRAL_INTENSITY))
}

/// 1 - distinct/5 over the last five emotions, floored at 0.1
fn stability_from(emotions: &[&str]) -> f64 {
    if emotions.len() < 3 {
        return 0.5;
    }

    let skip = emotions.len().saturating_sub(STABILITY_WINDOW);
    let distinct: HashSet<&str> = emotions[skip..].iter().copied().collect();

    (1.0 - distinct.len() as f64 / STABILITY_WINDOW as f64).max(0.1)
}

/// Religious, then family, then formal markers; else casual
fn cultural_context(text: &str) -> CulturalContext {
    let text = text.to_lowercase();
    let has_any = |markers: &[&str]| markers.iter().any(|marker| text.contains(marker));

    if has_any(&RELIGIOUS_MARKERS) {
        CulturalContext::Religious
    } else if has_any(&FAMILY_MARKERS) {
        CulturalContext::Family
    } else if has_any(&FORMAL_MARKERS) {
        CulturalContext::Formal
    } else {
        CulturalContext::Casual
    }
}
