//! Time-bounded emotional events

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Longest lifetime an event can have (about a century)
const MAX_DURATION_SECS: u64 = 100 * 365 * 24 * 60 * 60;

/// An emotion felt at some intensity for a limited time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalEvent {
    /// Emotion tag
    pub emotion: String,

    /// Intensity (0.0 to 1.0)
    pub intensity: f64,

    /// How long the event stays active
    pub duration_secs: u64,

    /// When the event was created
    pub created_at: DateTime<Utc>,
}

impl EmotionalEvent {
    /// Create an event; intensity is clamped to 0.0..=1.0
    pub fn new(
        emotion: impl Into<String>,
        intensity: f64,
        duration_secs: u64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            emotion: emotion.into(),
            intensity: intensity.clamp(0.0, 1.0),
            duration_secs,
            created_at,
        }
    }

    /// Active from creation until `duration_secs` have elapsed (exclusive)
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.created_at) < self.lifetime()
    }

    /// When the event stops being active
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + self.lifetime()
    }

    fn lifetime(&self) -> Duration {
        Duration::seconds(self.duration_secs.min(MAX_DURATION_SECS) as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_window_is_half_open() {
        let created = Utc::now();
        let event = EmotionalEvent::new("joy", 0.8, 300, created);

        assert!(event.is_active_at(created));
        assert!(event.is_active_at(created + Duration::seconds(299)));
        assert!(!event.is_active_at(created + Duration::seconds(300)));
        assert!(!event.is_active_at(created + Duration::days(2)));
        assert_eq!(event.expires_at(), created + Duration::seconds(300));
    }

    #[test]
    fn test_intensity_clamped() {
        let event = EmotionalEvent::new("fear", 1.7, 10, Utc::now());
        assert_eq!(event.intensity, 1.0);
    }
}
