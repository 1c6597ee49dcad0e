//! Heuristic language detection.
//!
//! Detection runs two passes over the lower-cased text, each in the same
//! fixed priority order (Spanish, French, German, Portuguese, Italian):
//!
//! 1. **Characters** -- the first language whose diacritic set shares a
//!    character with the text wins.  The sets overlap (`é`, `ü`, `ç`, ...),
//!    so earlier languages shadow later ones; Portuguese is only reachable
//!    through `ã`/`õ` and Italian through `ì`/`ò`.
//! 2. **Keywords** -- the first language whose phrase list has a whole-word
//!    hit wins.
//!
//! Anything else is English.  The character pass always takes precedence,
//! even when the keywords point at another language.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::keywords::PhraseSet;

/// The closed set of languages the service answers in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Spanish,
    French,
    German,
    Portuguese,
    Italian,
}

impl Language {
    /// Every supported language, English first.
    pub const ALL: [Language; 6] = [
        Language::English,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Portuguese,
        Language::Italian,
    ];

    /// Lower-case name, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Spanish => "spanish",
            Language::French => "french",
            Language::German => "german",
            Language::Portuguese => "portuguese",
            Language::Italian => "italian",
        }
    }

    /// Two-letter code used for language-specific Wikipedia hosts.
    pub fn wiki_code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::German => "de",
            Language::Portuguese => "pt",
            Language::Italian => "it",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Heuristic tables
// ---------------------------------------------------------------------------

/// Diacritic sets, in detection priority order.
const CHARSETS: &[(Language, &[char])] = &[
    (Language::Spanish, &['ñ', 'á', 'é', 'í', 'ó', 'ú', 'ü']),
    (
        Language::French,
        &['ç', 'à', 'â', 'ê', 'î', 'ô', 'û', 'è', 'é', 'ë', 'ï', 'ù'],
    ),
    (Language::German, &['ä', 'ö', 'ü', 'ß']),
    (Language::Portuguese, &['ã', 'õ', 'ç']),
    (Language::Italian, &['à', 'è', 'é', 'ì', 'ò', 'ù']),
];

// Words that double as everyday English ("was", "will", "come", "comment")
// are left out, as are country and city names.
const SPANISH_KEYWORDS: &[&str] = &[
    "hola",
    "gracias",
    "por favor",
    "adiós",
    "adios",
    "buenos días",
    "buenas tardes",
    "buenas noches",
    "ayuda",
    "cómo",
    "qué",
    "dónde",
    "cuándo",
    "por qué",
    "puedes",
    "necesito",
    "quiero",
    "tengo",
    "español",
];

const FRENCH_KEYWORDS: &[&str] = &[
    "bonjour",
    "bonsoir",
    "salut",
    "merci",
    "s'il vous plaît",
    "au revoir",
    "aide",
    "pourquoi",
    "quand",
    "pouvez",
    "besoin",
    "veux",
    "français",
];

const GERMAN_KEYWORDS: &[&str] = &[
    "hallo",
    "danke",
    "bitte",
    "auf wiedersehen",
    "tschüss",
    "hilfe",
    "wie",
    "wo",
    "wann",
    "warum",
    "können",
    "brauche",
    "habe",
    "deutsch",
];

const PORTUGUESE_KEYWORDS: &[&str] = &[
    "olá",
    "oi",
    "obrigado",
    "obrigada",
    "tchau",
    "ajuda",
    "onde",
    "quando",
    "preciso",
    "quero",
    "tenho",
    "português",
];

const ITALIAN_KEYWORDS: &[&str] = &[
    "ciao",
    "buongiorno",
    "buonasera",
    "grazie",
    "per favore",
    "arrivederci",
    "aiuto",
    "dove",
    "perché",
    "bisogno",
    "voglio",
    "italiano",
];

// ---------------------------------------------------------------------------
// Detector
// ---------------------------------------------------------------------------

/// Compiled language detector.  Build once, share freely.
#[derive(Debug, Clone)]
pub struct LanguageDetector {
    keywords: Vec<(Language, PhraseSet)>,
}

impl LanguageDetector {
    /// Compile the keyword automata.
    pub fn new() -> Result<Self> {
        let keywords = vec![
            (
                Language::Spanish,
                PhraseSet::new("spanish", SPANISH_KEYWORDS)?,
            ),
            (Language::French, PhraseSet::new("french", FRENCH_KEYWORDS)?),
            (Language::German, PhraseSet::new("german", GERMAN_KEYWORDS)?),
            (
                Language::Portuguese,
                PhraseSet::new("portuguese", PORTUGUESE_KEYWORDS)?,
            ),
            (
                Language::Italian,
                PhraseSet::new("italian", ITALIAN_KEYWORDS)?,
            ),
        ];
        Ok(Self { keywords })
    }

    /// Classify `text` into one of the supported languages.
    pub fn detect(&self, text: &str) -> Language {
        let lowered = text.to_lowercase();

        if let Some(language) = detect_by_charset(&lowered) {
            tracing::trace!(%language, "language from diacritics");
            return language;
        }

        for (language, phrases) in &self.keywords {
            if let Some(hit) = phrases.find(&lowered) {
                tracing::trace!(%language, keyword = hit, "language from keyword");
                return *language;
            }
        }

        Language::English
    }
}

fn detect_by_charset(lowered: &str) -> Option<Language> {
    CHARSETS
        .iter()
        .find(|(_, chars)| lowered.chars().any(|c| chars.contains(&c)))
        .map(|(language, _)| *language)
}
