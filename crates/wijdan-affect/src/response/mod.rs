//! Empathetic reply composition
//!
//! Templates are selected by emotion and intensity band, then assembled from
//! randomly drawn phrases. Randomness goes through [`RandomSource`] so tests
//! can pin exact replies.

mod random;
mod selector;
mod template;

pub use random::{choose, FixedRandom, RandomSource, StdRandom};
pub use selector::{
    assess_response_quality, emotional_resonance, empathy_category, ComposedResponse,
    ResponseMetadata, ResponseTemplateSelector, TemplateChoice,
};
pub use template::{
    EmpathyCategory, EmpathyDatabase, ResponseTemplate, TemplateCatalog, FALLBACK_RESPONSE,
};
