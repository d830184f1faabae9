use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::cluster::ClusterAssigner;
use crate::config::{Number, Settings};
use crate::corpus::{combine_fields, CorpusStore, Journal, JournalRegistry};
use crate::error::ArtifactResult;
use crate::vector_ops::{cosine_similarity, TermVector};
use crate::vectorizer::TfidfVectorizer;

/// A submitted manuscript. Missing fields are treated as empty text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Query {
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "abstract")]
    pub abstract_text: String,
    #[serde(default)]
    pub keywords: String,
}

impl Query {
    pub fn new(title: &str, abstract_text: &str, keywords: &str) -> Self {
        Self {
            title: title.to_string(),
            abstract_text: abstract_text.to_string(),
            keywords: keywords.to_string(),
        }
    }

    pub fn combined_text(&self) -> String {
        combine_fields(&self.title, &self.abstract_text, &self.keywords)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleMatch {
    pub index: usize,
    pub title: String,
    pub abstract_text: String,
    pub journal: String,
    pub similarity: Number,
}

/// Best-matching article of one journal, joined with registry metadata.
#[derive(Debug, Clone, Serialize)]
pub struct JournalRecommendation {
    pub journal: String,
    pub article: ArticleMatch,
    pub metrics: Option<Journal>,
}

impl JournalRecommendation {
    pub fn similarity(&self) -> Number {
        self.article.similarity
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendations {
    pub cluster: usize,
    /// Distinct journals, best first.
    pub journals: Vec<JournalRecommendation>,
    /// Top articles of the cluster, journals possibly repeated.
    pub articles: Vec<ArticleMatch>,
}

/// Everything loaded at startup. Immutable once built; share it behind an
/// `Arc`.
pub struct Recommender {
    vectorizer: TfidfVectorizer,
    assigner: ClusterAssigner,
    corpus: CorpusStore,
    registry: JournalRegistry,
    article_vectors: Vec<TermVector>,
    top_n: usize,
}

impl Recommender {
    pub fn load(settings: &Settings) -> ArtifactResult<Self> {
        let start = Instant::now();
        let vectorizer = TfidfVectorizer::load(Path::new(&settings.vectorizer_path))?;
        info!(
            path = %settings.vectorizer_path,
            vocabulary = vectorizer.dim(),
            fingerprint = %vectorizer.fingerprint(),
            "Loaded vectorizer"
        );

        let assigner = ClusterAssigner::load(Path::new(&settings.cluster_model_path), &vectorizer)?;
        info!(path = %settings.cluster_model_path, k = assigner.k(), "Loaded cluster model");

        let corpus = CorpusStore::load(Path::new(&settings.articles_path))?;
        info!(path = %settings.articles_path, articles = corpus.len(), "Loaded corpus");

        let registry = JournalRegistry::load(Path::new(&settings.journals_path), &corpus)?;
        info!(path = %settings.journals_path, journals = registry.len(), "Loaded journal registry");

        let recommender = Self::new(vectorizer, assigner, corpus, registry, settings.top_n);
        info!("Artifacts ready in {:?}", start.elapsed());
        Ok(recommender)
    }

    /// Vectorizes every article once, in parallel.
    pub fn new(
        vectorizer: TfidfVectorizer,
        assigner: ClusterAssigner,
        corpus: CorpusStore,
        registry: JournalRegistry,
        top_n: usize,
    ) -> Self {
        let article_vectors: Vec<TermVector> = corpus
            .articles()
            .par_iter()
            .map(|article| vectorizer.transform(&article.document_text()))
            .collect();

        let out_of_range = corpus
            .articles()
            .iter()
            .filter(|a| a.cluster >= assigner.k())
            .count();
        if out_of_range > 0 {
            warn!(
                "{} articles have a cluster id outside 0..{} and will never be recommended",
                out_of_range,
                assigner.k()
            );
        }

        Self {
            vectorizer,
            assigner,
            corpus,
            registry,
            article_vectors,
            top_n,
        }
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn assigner(&self) -> &ClusterAssigner {
        &self.assigner
    }

    pub fn corpus(&self) -> &CorpusStore {
        &self.corpus
    }

    pub fn registry(&self) -> &JournalRegistry {
        &self.registry
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn vectorize(&self, query: &Query) -> TermVector {
        self.vectorizer.transform(&query.combined_text())
    }

    /// Same-cluster articles scored against `query_vector`, best first.
    /// Equal scores keep corpus order.
    pub fn rank(&self, query_vector: &TermVector, cluster: usize) -> Vec<(usize, Number)> {
        let mut scored: Vec<(usize, Number)> = self
            .corpus
            .in_cluster(cluster)
            .par_iter()
            .map(|&i| (i, cosine_similarity(query_vector, &self.article_vectors[i])))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored
    }

    fn article_match(&self, index: usize, similarity: Number) -> ArticleMatch {
        let article = &self.corpus.articles()[index];
        ArticleMatch {
            index,
            title: article.title.clone(),
            abstract_text: article.abstract_text.clone(),
            journal: article.journal.clone(),
            similarity,
        }
    }

    pub fn recommend(&self, query: &Query) -> Recommendations {
        let query_vector = self.vectorize(query);
        let cluster = self.assigner.assign(&query_vector);
        let ranked = self.rank(&query_vector, cluster);
        debug!(
            cluster,
            terms = query_vector.nnz(),
            candidates = ranked.len(),
            "Ranked cluster members"
        );

        let articles = ranked
            .iter()
            .take(self.top_n)
            .map(|&(i, s)| self.article_match(i, s))
            .collect();

        let mut seen = HashSet::new();
        let journals = ranked
            .iter()
            .filter(|&&(i, _)| seen.insert(self.corpus.articles()[i].journal.trim()))
            .take(self.top_n)
            .map(|&(i, s)| {
                let article = self.article_match(i, s);
                let metrics = self.registry.get(&article.journal).cloned();
                if metrics.is_none() {
                    debug!(journal = %article.journal, "No registry entry; omitting metrics");
                }
                JournalRecommendation {
                    journal: article.journal.trim().to_string(),
                    article,
                    metrics,
                }
            })
            .collect();

        Recommendations {
            cluster,
            journals,
            articles,
        }
    }
}
