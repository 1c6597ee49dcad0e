//! Rule-based intent classification.
//!
//! The classifier walks an ordered rule list and stops at the first rule
//! whose phrase set matches.  Each rule carries a fixed confidence; the
//! catch-all [`Intent::Statement`] is returned at [`STATEMENT_CONFIDENCE`]
//! when nothing else matched.
//!
//! Rule order is part of the contract: greeting, goodbye, thanks, help,
//! question, then the topic buckets (technology, business, learning,
//! advice).  A message that says both "hello" and "thanks" is a greeting.
//!
//! [`IntentClassifier::conversational`] is the smaller rule set used ahead
//! of a web lookup: greeting, goodbye, thanks and question only, with modal
//! verbs counting as question words.  Topical messages stay statements there
//! so their low confidence routes them to the lookup.
//!
//! Phrase lists cover all six supported languages so that a single pass
//! classifies any input regardless of the detected language.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::keywords::PhraseSet;

/// Confidence assigned to the catch-all statement bucket.
pub const STATEMENT_CONFIDENCE: f64 = 0.6;

/// Coarse conversational purpose of one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Goodbye,
    Thanks,
    Help,
    Question,
    Technology,
    Business,
    Learning,
    Advice,
    Statement,
}

impl Intent {
    /// Every intent in rule order, catch-all last.
    pub const ALL: [Intent; 10] = [
        Intent::Greeting,
        Intent::Goodbye,
        Intent::Thanks,
        Intent::Help,
        Intent::Question,
        Intent::Technology,
        Intent::Business,
        Intent::Learning,
        Intent::Advice,
        Intent::Statement,
    ];

    /// Snake-case name, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Goodbye => "goodbye",
            Intent::Thanks => "thanks",
            Intent::Help => "help",
            Intent::Question => "question",
            Intent::Technology => "technology",
            Intent::Business => "business",
            Intent::Learning => "learning",
            Intent::Advice => "advice",
            Intent::Statement => "statement",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub intent: Intent,
    /// Fixed per-rule score in `[0, 1]`.
    pub confidence: f64,
}

// ---------------------------------------------------------------------------
// Phrase lists
// ---------------------------------------------------------------------------

const GREETING: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
    "hola",
    "buenos días",
    "buenos dias",
    "buenas tardes",
    "buenas noches",
    "bonjour",
    "salut",
    "bonsoir",
    "hallo",
    "guten tag",
    "guten morgen",
    "guten abend",
    "olá",
    "oi",
    "bom dia",
    "boa tarde",
    "boa noite",
    "ciao",
    "buongiorno",
    "buonasera",
];

const GOODBYE: &[&str] = &[
    "bye",
    "goodbye",
    "see you",
    "farewell",
    "exit",
    "adiós",
    "adios",
    "chao",
    "hasta luego",
    "nos vemos",
    "au revoir",
    "à bientôt",
    "auf wiedersehen",
    "tschüss",
    "bis später",
    "tchau",
    "até logo",
    "arrivederci",
    "a presto",
];

const THANKS: &[&str] = &[
    "thank",
    "thanks",
    "thank you",
    "appreciate",
    "grateful",
    "gracias",
    "agradecido",
    "te agradezco",
    "merci",
    "je vous remercie",
    "danke",
    "vielen dank",
    "ich danke dir",
    "obrigado",
    "obrigada",
    "eu agradeço",
    "grazie",
    "ti ringrazio",
];

const HELP: &[&str] = &[
    "help",
    "assist",
    "support",
    "what can you do",
    "ayuda",
    "ayúdame",
    "asistencia",
    "qué puedes hacer",
    "aide",
    "aide-moi",
    "assistance",
    "que peux-tu faire",
    "hilfe",
    "hilf mir",
    "unterstützung",
    "was kannst du tun",
    "ajuda",
    "ajude-me",
    "assistência",
    "o que você pode fazer",
    "aiuto",
    "aiutami",
    "assistenza",
    "cosa puoi fare",
];

const QUESTION_WORDS: &[&str] = &[
    "what",
    "how",
    "why",
    "when",
    "where",
    "who",
    "which",
    "qué",
    "cómo",
    "por qué",
    "cuándo",
    "dónde",
    "quién",
    "cuál",
    "comment",
    "pourquoi",
    "quand",
    "où",
    "quel",
    "quelle",
    "wie",
    "warum",
    "wann",
    "wo",
    "wer",
    "welche",
    "como",
    "porque",
    "quando",
    "onde",
    "quem",
    "qual",
    "perché",
    "dove",
    "chi",
    "quale",
];

/// Extra question words of the conversational rule set.
const MODAL_QUESTION_WORDS: &[&str] = &["can", "could", "would", "should"];

const TECHNOLOGY: &[&str] = &[
    "code",
    "coding",
    "programming",
    "software",
    "app",
    "website",
    "development",
    "código",
    "programación",
    "aplicación",
    "página web",
    "desarrollo",
    "programmation",
    "logiciel",
    "développement",
    "programmierung",
    "entwicklung",
    "programação",
    "desenvolvimento",
    "programmazione",
    "sviluppo",
];

const BUSINESS: &[&str] = &[
    "business",
    "company",
    "work",
    "career",
    "professional",
    "job",
    "negocio",
    "empresa",
    "carrera",
    "trabajo",
    "entreprise",
    "carrière",
    "travail",
    "unternehmen",
    "karriere",
    "arbeit",
    "negócio",
    "carreira",
    "trabalho",
    "azienda",
    "carriera",
    "lavoro",
];

const LEARNING: &[&str] = &[
    "learn",
    "learning",
    "study",
    "education",
    "course",
    "tutorial",
    "explain",
    "aprender",
    "estudiar",
    "educación",
    "apprendre",
    "étudier",
    "lernen",
    "studieren",
    "estudar",
    "educação",
    "imparare",
    "studiare",
];

const ADVICE: &[&str] = &[
    "advice",
    "suggest",
    "recommend",
    "opinion",
    "think",
    "consejo",
    "recomienda",
    "conseil",
    "recommande",
    "ratschlag",
    "empfehlen",
    "conselho",
    "recomenda",
    "consiglio",
    "consiglia",
];

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Ordered keyword-rule classifier.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: Vec<Rule>,
}

#[derive(Debug, Clone)]
struct Rule {
    intent: Intent,
    confidence: f64,
    phrases: PhraseSet,
    /// Also fires when the trimmed text ends with `?`.
    question_mark: bool,
}

impl Rule {
    fn new(intent: Intent, confidence: f64, phrases: &[&str]) -> Result<Self> {
        Ok(Self {
            intent,
            confidence,
            phrases: PhraseSet::new(intent.as_str(), phrases)?,
            question_mark: intent == Intent::Question,
        })
    }
}

impl IntentClassifier {
    /// Compile the full rule set, topic buckets included.
    pub fn new() -> Result<Self> {
        let rules = vec![
            Rule::new(Intent::Greeting, 0.9, GREETING)?,
            Rule::new(Intent::Goodbye, 0.9, GOODBYE)?,
            Rule::new(Intent::Thanks, 0.9, THANKS)?,
            Rule::new(Intent::Help, 0.85, HELP)?,
            Rule::new(Intent::Question, 0.8, QUESTION_WORDS)?,
            Rule::new(Intent::Technology, 0.75, TECHNOLOGY)?,
            Rule::new(Intent::Business, 0.75, BUSINESS)?,
            Rule::new(Intent::Learning, 0.75, LEARNING)?,
            Rule::new(Intent::Advice, 0.75, ADVICE)?,
        ];

        Ok(Self { rules })
    }

    /// Compile the conversational rule set: no help or topic buckets, and
    /// `can` / `could` / `would` / `should` mark a question.
    pub fn conversational() -> Result<Self> {
        let question_words: Vec<&str> = QUESTION_WORDS
            .iter()
            .chain(MODAL_QUESTION_WORDS)
            .copied()
            .collect();

        let rules = vec![
            Rule::new(Intent::Greeting, 0.9, GREETING)?,
            Rule::new(Intent::Goodbye, 0.9, GOODBYE)?,
            Rule::new(Intent::Thanks, 0.9, THANKS)?,
            Rule::new(Intent::Question, 0.8, &question_words)?,
        ];

        Ok(Self { rules })
    }

    /// Classify `text`.  Never fails; unmatched input is a statement.
    pub fn classify(&self, text: &str) -> Classification {
        let lowered = text.trim().to_lowercase();

        for rule in &self.rules {
            let hit = (rule.question_mark && lowered.ends_with('?'))
                || rule.phrases.matches(&lowered);
            if hit {
                tracing::trace!(intent = %rule.intent, "intent rule matched");
                return Classification {
                    intent: rule.intent,
                    confidence: rule.confidence,
                };
            }
        }

        Classification {
            intent: Intent::Statement,
            confidence: STATEMENT_CONFIDENCE,
        }
    }
}
