//! Signal extraction
//!
//! Classifies raw text into an emotion tag (with confidence), a topic tag and
//! a set of cultural-register markers. Text is lowercased and split on
//! whitespace into a set of words, which is intersected with precomputed
//! keyword sets. Multi-word keywords therefore never match.

mod extractor;
mod lexicon;

pub use extractor::{
    tokenize, CulturalMarker, SignalExtractor, Signals, GENERAL_TOPIC, NEUTRAL_CONFIDENCE,
    NEUTRAL_EMOTION,
};
pub use lexicon::{KeywordCategory, Lexicon};
