//! Corpus Store and Journal Registry: the two read-only tables produced by
//! the offline pipeline.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use statrs::statistics::Statistics;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::warn;

use crate::error::ArtifactResult;
use crate::text::clean_text;

/// One clustered article. Columns other than `title`, `cluster` and `journal`
/// may be absent from the CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default, rename = "abstract")]
    pub abstract_text: String,
    #[serde(default)]
    pub keywords: String,
    pub cluster: usize,
    #[serde(default, deserialize_with = "lenient_count")]
    pub citations: Option<u32>,
    #[serde(alias = "journal_name")]
    pub journal: String,
    /// Text the offline pipeline vectorized, when it was exported.
    #[serde(default)]
    pub combined: Option<String>,
}

impl Article {
    /// Text fed to the vectorizer: the exported `combined` column if present,
    /// otherwise title, abstract and keywords joined like a query.
    pub fn document_text(&self) -> String {
        match &self.combined {
            Some(combined) if !combined.trim().is_empty() => clean_text(combined),
            _ => combine_fields(&self.title, &self.abstract_text, &self.keywords),
        }
    }
}

/// Integer counts written as `42`, `42.0` or left empty. Integer columns with
/// gaps come out of pandas as floats. Unparseable cells become `None`.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<f64> = csv::invalid_option(deserializer)?;
    Ok(value
        .filter(|v| v.is_finite() && *v >= 0.0 && *v <= u32::MAX as f64)
        .map(|v| v.round() as u32))
}

pub fn combine_fields(title: &str, abstract_text: &str, keywords: &str) -> String {
    clean_text(&format!("{} {} {}", title, abstract_text, keywords))
}

pub struct CorpusStore {
    articles: Vec<Article>,
    by_cluster: HashMap<usize, Vec<usize>>,
}

impl CorpusStore {
    pub fn load(path: &Path) -> ArtifactResult<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let articles = reader
            .deserialize()
            .collect::<Result<Vec<Article>, csv::Error>>()?;
        Ok(Self::from_articles(articles))
    }

    pub fn from_articles(articles: Vec<Article>) -> Self {
        let mut by_cluster: HashMap<usize, Vec<usize>> = HashMap::new();
        for (i, article) in articles.iter().enumerate() {
            by_cluster.entry(article.cluster).or_default().push(i);
        }
        Self {
            articles,
            by_cluster,
        }
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn get(&self, index: usize) -> Option<&Article> {
        self.articles.get(index)
    }

    /// Indices of the cluster's articles, in corpus order.
    pub fn in_cluster(&self, cluster: usize) -> &[usize] {
        self.by_cluster
            .get(&cluster)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn cluster_counts(&self) -> BTreeMap<usize, usize> {
        self.by_cluster
            .iter()
            .map(|(&cluster, members)| (cluster, members.len()))
            .collect()
    }
}

/// Journal row as exported, before corpus aggregates are attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalRecord {
    #[serde(alias = "journal_name", alias = "journal")]
    pub name: String,
    #[serde(default)]
    pub impact_factor: Option<f64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub h_index: Option<u32>,
    #[serde(default)]
    pub sjr: Option<f64>,
    #[serde(default)]
    pub quartile: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Journal {
    pub name: String,
    pub impact_factor: Option<f64>,
    pub h_index: Option<u32>,
    pub sjr: Option<f64>,
    pub quartile: Option<String>,
    pub publisher: Option<String>,
    pub scope: Option<String>,
    pub article_count: usize,
    pub mean_citations: Option<f64>,
}

pub struct JournalRegistry {
    journals: IndexMap<String, Journal>,
}

impl JournalRegistry {
    pub fn load(path: &Path, corpus: &CorpusStore) -> ArtifactResult<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let records = reader
            .deserialize()
            .collect::<Result<Vec<JournalRecord>, csv::Error>>()?;
        Ok(Self::from_records(records, corpus))
    }

    /// Builds the registry keyed by trimmed journal name; the first row wins
    /// on duplicates.
    pub fn from_records(records: Vec<JournalRecord>, corpus: &CorpusStore) -> Self {
        let mut citations: HashMap<&str, Vec<f64>> = HashMap::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for article in corpus.articles() {
            let name = article.journal.trim();
            *counts.entry(name).or_insert(0) += 1;
            if let Some(c) = article.citations {
                citations.entry(name).or_default().push(c as f64);
            }
        }

        let mut journals = IndexMap::with_capacity(records.len());
        for record in records {
            let name = record.name.trim().to_string();
            if journals.contains_key(&name) {
                warn!("Duplicate journal '{}' in registry; keeping the first row", name);
                continue;
            }
            let mean_citations = citations
                .get(name.as_str())
                .filter(|c| !c.is_empty())
                .map(|c| c.iter().mean());
            let journal = Journal {
                article_count: counts.get(name.as_str()).copied().unwrap_or(0),
                mean_citations,
                name: name.clone(),
                impact_factor: record.impact_factor,
                h_index: record.h_index,
                sjr: record.sjr,
                quartile: record.quartile,
                publisher: record.publisher,
                scope: record.scope,
            };
            journals.insert(name, journal);
        }
        Self { journals }
    }

    pub fn len(&self) -> usize {
        self.journals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.journals.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Journal> {
        self.journals.get(name.trim())
    }

    pub fn journals(&self) -> impl Iterator<Item = &Journal> {
        self.journals.values()
    }
}

/// A referential-integrity problem between the two tables and the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityIssue {
    ClusterOutOfRange {
        article: usize,
        title: String,
        cluster: usize,
        k: usize,
    },
    UnknownJournal {
        article: usize,
        title: String,
        journal: String,
    },
    EmptyCluster {
        cluster: usize,
    },
}

/// Checks what serving assumes but never enforces: every article's cluster
/// is below `k` and its journal resolves in the registry.
pub fn integrity_report(
    corpus: &CorpusStore,
    registry: &JournalRegistry,
    k: usize,
) -> Vec<IntegrityIssue> {
    let mut issues = Vec::new();
    for (i, article) in corpus.articles().iter().enumerate() {
        if article.cluster >= k {
            issues.push(IntegrityIssue::ClusterOutOfRange {
                article: i,
                title: article.title.clone(),
                cluster: article.cluster,
                k,
            });
        }
        if registry.get(&article.journal).is_none() {
            issues.push(IntegrityIssue::UnknownJournal {
                article: i,
                title: article.title.clone(),
                journal: article.journal.clone(),
            });
        }
    }
    for cluster in 0..k {
        if corpus.in_cluster(cluster).is_empty() {
            issues.push(IntegrityIssue::EmptyCluster { cluster });
        }
    }
    issues
}
