//! Frozen TF-IDF vectorizer.
//!
//! The vocabulary and IDF weights are fitted offline and never change after
//! load. Feature ids are vocabulary positions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

use crate::artifact::{check_header, read_artifact};
use crate::config::Number;
use crate::error::{ArtifactError, ArtifactResult};
use crate::text::Analyzer;
use crate::vector_ops::TermVector;

pub const VECTORIZER_FORMAT: &str = "tfidf";
pub const VECTORIZER_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    #[default]
    L2,
    None,
}

fn default_true() -> bool {
    true
}

fn default_min_token_len() -> usize {
    2
}

/// On-disk form of the vectorizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerArtifact {
    pub format: String,
    pub version: u32,
    pub vocabulary: Vec<String>,
    pub idf: Vec<Number>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,
    #[serde(default)]
    pub stop_words: Vec<String>,
    #[serde(default)]
    pub stemmer: Option<String>,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default)]
    pub norm: Norm,
}

impl VectorizerArtifact {
    pub fn new(vocabulary: Vec<String>, idf: Vec<Number>) -> Self {
        Self {
            format: VECTORIZER_FORMAT.to_string(),
            version: VECTORIZER_VERSION,
            vocabulary,
            idf,
            lowercase: true,
            min_token_len: default_min_token_len(),
            stop_words: Vec::new(),
            stemmer: None,
            sublinear_tf: false,
            norm: Norm::L2,
        }
    }
}

/// Lowercase hex SHA-256 over each term followed by a newline, in feature
/// order. Cluster models record it to pin the vectorizer they were fitted on.
pub fn vocabulary_fingerprint<'a>(terms: impl IntoIterator<Item = &'a str>) -> String {
    let mut hasher = Sha256::new();
    for term in terms {
        hasher.update(term.as_bytes());
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}

pub struct TfidfVectorizer {
    /// term -> idf; the map position is the feature id.
    vocabulary: IndexMap<String, Number>,
    analyzer: Analyzer,
    stop_words: Vec<String>,
    stemmer: Option<String>,
    lowercase: bool,
    min_token_len: usize,
    sublinear_tf: bool,
    norm: Norm,
    fingerprint: String,
}

impl TfidfVectorizer {
    pub fn load(path: &Path) -> ArtifactResult<Self> {
        let artifact: VectorizerArtifact = read_artifact(path)?;
        Self::from_artifact(artifact)
    }

    pub fn from_artifact(artifact: VectorizerArtifact) -> ArtifactResult<Self> {
        check_header(
            VECTORIZER_FORMAT,
            VECTORIZER_VERSION,
            &artifact.format,
            artifact.version,
        )?;

        if artifact.vocabulary.is_empty() {
            return Err(ArtifactError::EmptyModel("vectorizer vocabulary".to_string()));
        }
        if artifact.idf.len() != artifact.vocabulary.len() {
            return Err(ArtifactError::DimensionMismatch {
                what: "idf weights".to_string(),
                expected: artifact.vocabulary.len(),
                found: artifact.idf.len(),
            });
        }

        let fingerprint = vocabulary_fingerprint(artifact.vocabulary.iter().map(String::as_str));
        let expected = artifact.vocabulary.len();
        let vocabulary: IndexMap<String, Number> = artifact
            .vocabulary
            .into_iter()
            .zip(artifact.idf)
            .collect();
        if vocabulary.len() != expected {
            return Err(ArtifactError::DimensionMismatch {
                what: "vocabulary (duplicate terms)".to_string(),
                expected,
                found: vocabulary.len(),
            });
        }

        let analyzer = Analyzer::new(
            artifact.lowercase,
            artifact.min_token_len,
            &artifact.stop_words,
            artifact.stemmer.as_deref(),
        )?;

        Ok(Self {
            vocabulary,
            analyzer,
            stop_words: artifact.stop_words,
            stemmer: artifact.stemmer,
            lowercase: artifact.lowercase,
            min_token_len: artifact.min_token_len,
            sublinear_tf: artifact.sublinear_tf,
            norm: artifact.norm,
            fingerprint,
        })
    }

    pub fn to_artifact(&self) -> VectorizerArtifact {
        VectorizerArtifact {
            format: VECTORIZER_FORMAT.to_string(),
            version: VECTORIZER_VERSION,
            vocabulary: self.vocabulary.keys().cloned().collect(),
            idf: self.vocabulary.values().copied().collect(),
            lowercase: self.lowercase,
            min_token_len: self.min_token_len,
            stop_words: self.stop_words.clone(),
            stemmer: self.stemmer.clone(),
            sublinear_tf: self.sublinear_tf,
            norm: self.norm,
        }
    }

    /// Vocabulary size, and so the length of every produced vector.
    pub fn dim(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn transform(&self, text: &str) -> TermVector {
        let mut counts: BTreeMap<usize, Number> = BTreeMap::new();
        for token in self.analyzer.analyze(text) {
            if let Some(index) = self.vocabulary.get_index_of(token.as_str()) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let entries = counts
            .into_iter()
            .map(|(index, count)| {
                let tf = if self.sublinear_tf { 1.0 + count.ln() } else { count };
                let idf = self.vocabulary.get_index(index).map_or(0.0, |(_, idf)| *idf);
                (index as u32, tf * idf)
            })
            .collect();

        let mut vector = TermVector::from_sorted(self.dim(), entries);
        if self.norm == Norm::L2 {
            vector.normalize();
        }
        vector
    }
}
