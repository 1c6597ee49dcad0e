//! In-process generative stage.
//!
//! A word-level Markov chain trained from a plain-text corpus at startup.
//! Transition keys are normalised (surrounding punctuation stripped,
//! lower-cased) while the stored successors keep their original spelling, so
//! generated text reads like the corpus.
//!
//! Generation seeds from the last prompt word the model knows; failing that
//! it starts from a random sentence opener.  It stops after `max_words`
//! words, at a sentence terminator, or at a word with no successors.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::info;

use parley_intent::truncate_chars;

use crate::config::LocalModelConfig;
use crate::error::{AgentError, Result};
use crate::provider::{Answer, ProviderId, ResponseProvider, Turn};

/// Hard cap on generated output, in characters.
pub const MAX_OUTPUT_CHARS: usize = 500;

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// Trained word transition table.
#[derive(Debug, Clone)]
pub struct MarkovModel {
    transitions: HashMap<String, Vec<String>>,
    starters: Vec<String>,
}

impl MarkovModel {
    /// Train from raw text.  `None` when the text yields no transitions.
    pub fn train(text: &str) -> Option<Self> {
        let words: Vec<&str> = text.split_whitespace().collect();
        let mut transitions: HashMap<String, Vec<String>> = HashMap::new();
        let mut starters = Vec::new();

        for (i, word) in words.iter().enumerate() {
            if i == 0 || ends_sentence(words[i - 1]) {
                starters.push((*word).to_owned());
            }
            if let Some(next) = words.get(i + 1) {
                let key = normalize(word);
                if !key.is_empty() {
                    transitions.entry(key).or_default().push((*next).to_owned());
                }
            }
        }

        if transitions.is_empty() {
            return None;
        }
        if starters.is_empty() {
            starters.push(words[0].to_owned());
        }

        Some(Self {
            transitions,
            starters,
        })
    }

    /// Read and train from a corpus file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| AgentError::CorpusRead {
            path: path.to_path_buf(),
            source,
        })?;

        let model = Self::train(&text).ok_or_else(|| AgentError::EmptyCorpus {
            path: path.to_path_buf(),
        })?;

        info!(
            path = %path.display(),
            keys = model.transitions.len(),
            transitions = model.transition_count(),
            "local model trained"
        );
        Ok(model)
    }

    /// Total number of recorded word transitions.
    pub fn transition_count(&self) -> usize {
        self.transitions.values().map(Vec::len).sum()
    }

    /// Generate a continuation for `prompt`.
    pub fn generate<R: Rng + ?Sized>(&self, prompt: &str, max_words: usize, rng: &mut R) -> String {
        let mut out: Vec<&str> = Vec::new();

        let seed = prompt
            .split_whitespace()
            .rev()
            .map(normalize)
            .find(|key| self.transitions.contains_key(key));

        let mut current = match seed {
            Some(key) => key,
            None => {
                let Some(starter) = self.starters.choose(rng) else {
                    return String::new();
                };
                out.push(starter);
                if ends_sentence(starter) {
                    return finish(&out);
                }
                normalize(starter)
            }
        };

        while out.len() < max_words {
            let Some(next) = self
                .transitions
                .get(&current)
                .and_then(|successors| successors.choose(rng))
            else {
                break;
            };
            out.push(next);
            if ends_sentence(next) {
                break;
            }
            current = normalize(next);
        }

        finish(&out)
    }
}

fn normalize(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

fn ends_sentence(word: &str) -> bool {
    word.ends_with(['.', '!', '?'])
}

fn finish(words: &[&str]) -> String {
    let text = words.join(" ");
    truncate_chars(&text, MAX_OUTPUT_CHARS).to_owned()
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Chain stage backed by a [`MarkovModel`].
pub struct LocalModel {
    model: Arc<MarkovModel>,
    max_words: usize,
    timeout: Duration,
}

impl LocalModel {
    pub fn new(model: Arc<MarkovModel>, config: &LocalModelConfig) -> Self {
        Self {
            model,
            max_words: config.max_words,
            timeout: config.timeout(),
        }
    }

    /// Load the configured corpus.  `Ok(None)` when no corpus is configured.
    pub fn from_config(config: &LocalModelConfig) -> Result<Option<Self>> {
        let Some(path) = &config.corpus_path else {
            return Ok(None);
        };
        let model = MarkovModel::load(path)?;
        Ok(Some(Self::new(Arc::new(model), config)))
    }

    fn generate(&self, prompt: &str) -> String {
        let mut rng = rand::thread_rng();
        self.model.generate(prompt, self.max_words, &mut rng)
    }
}

#[async_trait]
impl ResponseProvider for LocalModel {
    fn id(&self) -> ProviderId {
        ProviderId::LocalModel
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn attempt(&self, turn: &Turn<'_>) -> Result<Option<Answer>> {
        let text = self.generate(turn.utterance);
        if text.is_empty() {
            return Ok(None);
        }
        Ok(Some(Answer::new(text)))
    }
}
