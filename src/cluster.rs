//! Nearest-centroid assignment against frozen K-Means centroids.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::artifact::{check_header, read_artifact};
use crate::config::Number;
use crate::error::{ArtifactError, ArtifactResult};
use crate::vector_ops::{squared_euclidean_simd, TermVector};
use crate::vectorizer::TfidfVectorizer;

pub const CLUSTER_FORMAT: &str = "kmeans";
pub const CLUSTER_VERSION: u32 = 1;

/// On-disk form of the cluster model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterArtifact {
    pub format: String,
    pub version: u32,
    pub n_features: usize,
    pub centroids: Vec<Vec<Number>>,
    #[serde(default)]
    pub vectorizer_fingerprint: Option<String>,
}

impl ClusterArtifact {
    pub fn new(centroids: Vec<Vec<Number>>, vectorizer: &TfidfVectorizer) -> Self {
        Self {
            format: CLUSTER_FORMAT.to_string(),
            version: CLUSTER_VERSION,
            n_features: vectorizer.dim(),
            centroids,
            vectorizer_fingerprint: Some(vectorizer.fingerprint().to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClusterAssigner {
    centroids: Vec<Vec<Number>>,
    n_features: usize,
}

impl ClusterAssigner {
    pub fn load(path: &Path, vectorizer: &TfidfVectorizer) -> ArtifactResult<Self> {
        let artifact: ClusterArtifact = read_artifact(path)?;
        Self::from_artifact(artifact, vectorizer)
    }

    /// Validates the centroids against the vectorizer they will be fed by.
    pub fn from_artifact(
        artifact: ClusterArtifact,
        vectorizer: &TfidfVectorizer,
    ) -> ArtifactResult<Self> {
        check_header(CLUSTER_FORMAT, CLUSTER_VERSION, &artifact.format, artifact.version)?;

        if artifact.centroids.is_empty() {
            return Err(ArtifactError::EmptyModel("cluster centroids".to_string()));
        }
        if artifact.n_features != vectorizer.dim() {
            return Err(ArtifactError::DimensionMismatch {
                what: "cluster model features".to_string(),
                expected: vectorizer.dim(),
                found: artifact.n_features,
            });
        }
        if let Some((i, centroid)) = artifact
            .centroids
            .iter()
            .enumerate()
            .find(|(_, c)| c.len() != artifact.n_features)
        {
            return Err(ArtifactError::DimensionMismatch {
                what: format!("centroid {}", i),
                expected: artifact.n_features,
                found: centroid.len(),
            });
        }

        match artifact.vectorizer_fingerprint {
            Some(expected) if expected != vectorizer.fingerprint() => {
                return Err(ArtifactError::FingerprintMismatch {
                    expected,
                    found: vectorizer.fingerprint().to_string(),
                });
            }
            Some(_) => {}
            None => debug!("Cluster model carries no vectorizer fingerprint; skipping check"),
        }

        Ok(Self {
            centroids: artifact.centroids,
            n_features: artifact.n_features,
        })
    }

    /// Number of clusters (K).
    pub fn k(&self) -> usize {
        self.centroids.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Id of the nearest centroid by Euclidean distance. Ties go to the
    /// lowest id. A zero vector lands on the centroid closest to the origin.
    pub fn assign(&self, vector: &TermVector) -> usize {
        debug_assert_eq!(vector.dim(), self.n_features);
        if vector.is_zero() {
            debug!("Query vector is zero; assigning the centroid nearest the origin");
        }

        let dense = vector.to_dense();
        let mut best = 0;
        let mut best_distance = Number::INFINITY;
        for (i, centroid) in self.centroids.iter().enumerate() {
            let distance = squared_euclidean_simd(&dense, centroid);
            if distance < best_distance {
                best = i;
                best_distance = distance;
            }
        }
        best
    }
}
