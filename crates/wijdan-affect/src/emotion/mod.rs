//! Emotional state
//!
//! Per-emotion keyword models produce intensities for a message. Each
//! detected emotion becomes an [`EmotionalEvent`] that stays active for a
//! fixed duration; the strongest active event is the dominant emotion.

mod engine;
mod event;
mod model;
mod state;

pub use engine::{EmotionalStateEngine, CALM_EMOTION, NEUTRAL_INTENSITY};
pub use event::EmotionalEvent;
pub use model::{BaselineIntensities, EmotionModel, EmotionModels, PersonalityTraits};
pub use state::{CulturalContext, EmotionalAnalytics, EmotionalState, ExchangeRecord};
