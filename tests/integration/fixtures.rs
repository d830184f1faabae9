//! Small but realistic artifact set: two topical clusters and an empty one.

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use jrec::artifact::write_artifact;
use jrec::cluster::ClusterArtifact;
use jrec::config::Settings;
use jrec::vectorizer::{TfidfVectorizer, VectorizerArtifact};

pub const VOCABULARY: [&str; 10] = [
    "graph", "neural", "network", "learning", "deep", "protein", "enzyme", "folding", "cell",
    "molecular",
];

pub const ARTICLES_CSV: &str = "\
id,title,abstract,keywords,cluster,citations,journal_name
a1,Graph neural networks,Deep learning on graph structured data with neural network models,graph;learning,0,40,Neural Computing
a2,Deep graph learning,Learning graph representations with deep network architectures,deep;graph,0,25,Neural Computing
a3,Neural network pruning,Pruning deep neural network weights,neural,0,10,Machine Learning Letters
a4,Network embeddings,Graph network embedding for learning,graph,0,5,Unlisted Proceedings
a5,Protein folding dynamics,Molecular dynamics of protein folding and enzyme activity,protein,1,60,Bioinformatics
a6,Enzyme kinetics in the cell,Cell enzyme kinetics and molecular protein interactions,enzyme,1,12,Cell Systems
";

pub const JOURNALS_CSV: &str = "\
name,impact_factor,h_index,sjr,quartile,publisher,scope
Neural Computing,6.0,120,1.5,Q1,Springer,Neural networks and learning systems
Machine Learning Letters,2.1,35,0.6,Q2,Elsevier,
Bioinformatics,5.8,300,3.2,Q1,Oxford,Computational biology
Cell Systems,9.3,80,4.1,Q1,Cell Press,Systems biology
";

pub fn vectorizer_artifact() -> VectorizerArtifact {
    let mut artifact = VectorizerArtifact::new(
        VOCABULARY.iter().map(|s| s.to_string()).collect(),
        vec![1.2, 1.4, 1.1, 1.0, 1.3, 1.5, 1.6, 1.7, 1.4, 1.5],
    );
    artifact.stop_words = vec!["the".to_string(), "of".to_string(), "and".to_string()];
    artifact
}

pub fn centroids() -> Vec<Vec<f32>> {
    vec![
        vec![0.45, 0.4, 0.4, 0.4, 0.35, 0.0, 0.0, 0.0, 0.0, 0.0],
        vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.45, 0.4, 0.35, 0.35, 0.4],
        // sits near the origin and owns no articles
        vec![0.05, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.05],
    ]
}

/// Writes the artifact set into `dir` and returns settings pointing at it.
/// `model_ext` selects the model encoding ("json" or "bin").
pub fn write_fixtures(dir: &Path, model_ext: &str) -> Settings {
    let artifact = vectorizer_artifact();
    let vectorizer = TfidfVectorizer::from_artifact(artifact.clone()).unwrap();

    let vectorizer_path = dir.join(format!("vectorizer.{}", model_ext));
    let cluster_path = dir.join(format!("kmeans.{}", model_ext));
    let articles_path = dir.join("articles.csv");
    let journals_path = dir.join("journals.csv");

    write_artifact(&vectorizer_path, &artifact).unwrap();
    write_artifact(&cluster_path, &ClusterArtifact::new(centroids(), &vectorizer)).unwrap();
    fs::write(&articles_path, ARTICLES_CSV).unwrap();
    fs::write(&journals_path, JOURNALS_CSV).unwrap();

    Settings {
        vectorizer_path: vectorizer_path.to_string_lossy().to_string(),
        cluster_model_path: cluster_path.to_string_lossy().to_string(),
        articles_path: articles_path.to_string_lossy().to_string(),
        journals_path: journals_path.to_string_lossy().to_string(),
        ..Settings::default()
    }
}

pub fn fixture_dir() -> (TempDir, Settings) {
    let dir = TempDir::new().unwrap();
    let settings = write_fixtures(dir.path(), "json");
    (dir, settings)
}
