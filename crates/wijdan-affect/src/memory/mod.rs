//! Conversation memory
//!
//! A bounded, append-only log of annotated turns with relevance retrieval
//! and conversation-level insights.

mod insights;
mod store;
mod turn;

pub use insights::{
    assess_mood, suggest_response_tone, ConversationMood, ConversationPatterns, HistoryHint,
    MemoryStats, ResponseHints,
};
pub(crate) use insights::most_frequent;
pub use store::{ConversationMemoryStore, ScoredTurn};
pub use turn::{ConversationTurn, ImportanceRules, MAX_IMPORTANCE, MIN_IMPORTANCE};
