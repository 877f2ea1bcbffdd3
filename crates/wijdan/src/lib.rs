//! # Wijdan - Affect-aware memory for Arabic companions
//!
//! **Wijdan** gives a conversational agent an emotional memory:
//!
//! - **Signals**: emotion, topic and cultural register of every message
//! - **Memory**: bounded history ranked by emotion, topic, importance and recency
//! - **Emotion**: the agent's own decaying emotional state
//! - **Responses**: empathetic replies adapted to religious, family and formal registers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wijdan::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut manager = AffectManager::new(AffectConfig::from_env()?)?.with_file_snapshots();
//!     manager.load_snapshot().await?;
//!
//!     let reply = manager.respond("الحمدلله فرحان اليوم");
//!     println!("{}", reply.response.text);
//!
//!     manager.save_snapshot().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `affect` (default): the affect subsystem from `wijdan-affect`

#![doc(html_root_url = "https://docs.rs/wijdan/0.1.0")]
#![warn(missing_docs)]

#[cfg(feature = "affect")]
pub use wijdan_affect as affect;

/// Commonly used types and traits
pub mod prelude {
    #[cfg(feature = "affect")]
    pub use crate::affect::{
        config::AffectConfig,
        emotion::{CulturalContext, EmotionalState},
        error::{AffectError, AffectResult},
        manager::{AffectManager, AgentReply},
        memory::{ConversationMemoryStore, ConversationTurn, MemoryStats, ResponseHints},
        persistence::{InMemorySnapshotStore, JsonFileSnapshotStore, Snapshot, SnapshotStore},
        response::{ComposedResponse, FixedRandom, RandomSource, StdRandom},
        signal::{SignalExtractor, Signals},
    };
}
