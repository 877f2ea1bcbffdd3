//! Snapshot persistence
//!
//! The whole conversation history and personality profiles are written as a
//! single pretty-printed JSON document. A missing snapshot is not an error; a
//! corrupt one is.

mod store;
pub mod timestamp;

pub use store::{
    InMemorySnapshotStore, JsonFileSnapshotStore, PersonalityProfile, Snapshot, SnapshotStore,
};
