//! Language detection, intent classification and canned responses for
//! parley.
//!
//! This crate provides:
//!
//! - **Language detection**: diacritic and keyword heuristics over a closed
//!   set of six languages via [`language::LanguageDetector`].
//! - **Intent classification**: an ordered keyword-rule list with fixed
//!   per-rule confidence via [`classifier::IntentClassifier`].
//! - **Response templates**: per-language canned replies, random pools and
//!   echo templates via [`templates::TemplateStore`].
//!
//! Every operation here is total once the matchers are built: detection
//! defaults to English and classification to a statement.

pub mod classifier;
pub mod error;
pub mod keywords;
pub mod language;
pub mod templates;

pub use classifier::{Classification, Intent, IntentClassifier, STATEMENT_CONFIDENCE};
pub use error::{IntentError, Result};
pub use keywords::PhraseSet;
pub use language::{Language, LanguageDetector};
pub use templates::{FixedPicker, Picker, Template, TemplateStore, ThreadRngPicker, truncate_chars};
