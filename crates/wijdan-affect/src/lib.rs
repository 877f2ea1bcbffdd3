//! # Wijdan Affect
//!
//! Affect-aware conversation memory for Saudi-dialect Arabic companions.
//!
//! For every exchange the user's emotion, topic and cultural register are
//! classified, the turn is scored for importance and kept in a bounded
//! history. Relevant prior turns are recalled for new messages, the agent's
//! own emotional state decays over time, and replies are composed from
//! culturally adapted templates.
//!
//! ```rust,no_run
//! use wijdan_affect::{AffectConfig, AffectManager};
//!
//! # async fn run() -> wijdan_affect::AffectResult<()> {
//! let mut manager = AffectManager::new(AffectConfig::from_env()?)?.with_file_snapshots();
//! manager.load_snapshot().await?;
//!
//! let reply = manager.respond("والله فرحان مو طبيعي! حصلت على وظيفة");
//! println!("{}", reply.response.text);
//!
//! manager.save_snapshot().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Components
//!
//! - [`signal`]: keyword classification of emotion, topic and cultural markers
//! - [`memory`]: bounded turn history with relevance retrieval and insights
//! - [`emotion`]: time-decaying emotional events and state analysis
//! - [`response`]: template selection and reply composition
//! - [`persistence`]: JSON snapshots behind an async store trait

#![warn(missing_docs)]

pub mod config;
pub mod emotion;
pub mod error;
pub mod manager;
pub mod memory;
pub mod persistence;
pub mod response;
pub mod signal;

pub use config::AffectConfig;
pub use emotion::{EmotionalEvent, EmotionalState, EmotionalStateEngine};
pub use error::{AffectError, AffectResult};
pub use manager::{AffectManager, AgentReply};
pub use memory::{ConversationMemoryStore, ConversationTurn};
pub use persistence::{InMemorySnapshotStore, JsonFileSnapshotStore, Snapshot, SnapshotStore};
pub use response::{ComposedResponse, RandomSource, ResponseTemplateSelector, StdRandom};
pub use signal::{SignalExtractor, Signals};
