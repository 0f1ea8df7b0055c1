//! Interpretation corpus: keyed text fragments loaded once at startup.

pub mod corpus;
pub mod key;
pub mod loader;

pub use crate::error::{ConfigurationError, LookupMiss};
pub use corpus::{Corpus, Fragment};
pub use key::{profection_entry_key, InterpretationKey, Point, Topic, PROFECTION_ENTRY_KEYS};
pub use loader::ProfectionCheck;
