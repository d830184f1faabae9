//! Journal recommendations from frozen TF-IDF and K-Means artifacts.
//!
//! Training happens offline. At startup the service loads a vectorizer, a
//! set of cluster centroids, a clustered article table and a journal table,
//! then answers each query by:
//!
//! 1. vectorizing title, abstract and keywords with the frozen vocabulary,
//! 2. assigning the nearest centroid,
//! 3. ranking that cluster's articles by cosine similarity,
//! 4. keeping the best article per journal and joining journal metrics.
//!
//! Nothing is mutated after load; the [`Recommender`] is shared by `Arc`.

pub mod artifact;
pub mod cluster;
pub mod config;
pub mod corpus;
pub mod error;
pub mod recommend;
pub mod render;
pub mod server;
pub mod static_files;
pub mod text;
pub mod vector_ops;
pub mod vectorizer;

pub use cluster::ClusterAssigner;
pub use config::Settings;
pub use corpus::{Article, CorpusStore, Journal, JournalRegistry};
pub use error::{ArtifactError, ArtifactResult};
pub use recommend::{Query, Recommendations, Recommender};
pub use vectorizer::TfidfVectorizer;
