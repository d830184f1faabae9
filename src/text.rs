//! Text normalization shared by query and corpus vectorization.
//!
//! The pipeline has to reproduce what the offline fit did, otherwise
//! recommendations silently degrade. Its knobs therefore come from the
//! vectorizer artifact rather than from configuration.

use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;

use crate::error::{ArtifactError, ArtifactResult};

/// Collapse every run of whitespace into a single space and trim the ends.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn stemmer_for(name: &str) -> ArtifactResult<Stemmer> {
    let algorithm = match name.to_ascii_lowercase().as_str() {
        "english" | "porter2" | "snowball" => Algorithm::English,
        "french" => Algorithm::French,
        "german" => Algorithm::German,
        "spanish" => Algorithm::Spanish,
        other => return Err(ArtifactError::UnknownStemmer(other.to_string())),
    };
    Ok(Stemmer::create(algorithm))
}

/// Tokenizer configured exactly like the fitted vectorizer.
pub struct Analyzer {
    lowercase: bool,
    min_token_len: usize,
    stop_words: HashSet<String>,
    stemmer: Option<Stemmer>,
}

impl Analyzer {
    pub fn new(
        lowercase: bool,
        min_token_len: usize,
        stop_words: &[String],
        stemmer: Option<&str>,
    ) -> ArtifactResult<Self> {
        // matched verbatim against tokens after case-folding, like the fit
        let stop_words = stop_words.iter().cloned().collect();
        let stemmer = stemmer.map(stemmer_for).transpose()?;
        Ok(Self {
            lowercase,
            min_token_len,
            stop_words,
            stemmer,
        })
    }

    pub fn analyze(&self, text: &str) -> Vec<String> {
        let text = clean_text(text);
        let text = if self.lowercase { text.to_lowercase() } else { text };

        text.split(|c: char| !is_word_char(c))
            .filter(|t| t.chars().count() >= self.min_token_len)
            .filter(|t| !self.stop_words.contains(*t))
            .map(|t| match &self.stemmer {
                Some(stemmer) => stemmer.stem(t).into_owned(),
                None => t.to_string(),
            })
            .collect()
    }
}
