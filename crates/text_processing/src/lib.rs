//! Hindi text processing for the scheme assistant
//!
//! Three concerns live here, all pattern/rule based (no statistical NLU):
//! - [`hindi`]: Devanagari numeral conversion and Hindi number words
//! - [`extraction`]: ordered per-field rules turning an utterance into
//!   candidate profile field values
//! - [`intent`]: keyword-group scoring over a closed intent set

pub mod extraction;
pub mod hindi;
pub mod intent;

pub use extraction::ExtractionEngine;
pub use intent::IntentClassifier;
