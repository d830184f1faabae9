//! End-to-end recommendation over artifacts loaded from disk.

use std::collections::HashSet;
use tempfile::TempDir;

use jrec::artifact::write_artifact;
use jrec::cluster::ClusterArtifact;
use jrec::corpus::{integrity_report, IntegrityIssue};
use jrec::vectorizer::{TfidfVectorizer, VectorizerArtifact};
use jrec::{ArtifactError, Query, Recommender};

use crate::fixtures::{centroids, fixture_dir, write_fixtures, VOCABULARY};

#[test]
fn test_loads_fixture_artifacts() {
    let (_dir, settings) = fixture_dir();
    let recommender = Recommender::load(&settings).unwrap();

    assert_eq!(recommender.vectorizer().dim(), VOCABULARY.len());
    assert_eq!(recommender.assigner().k(), 3);
    assert_eq!(recommender.corpus().len(), 6);
    assert_eq!(recommender.registry().len(), 4);
}

#[test]
fn test_json_and_bincode_models_agree() {
    let json_dir = TempDir::new().unwrap();
    let bin_dir = TempDir::new().unwrap();
    let from_json = Recommender::load(&write_fixtures(json_dir.path(), "json")).unwrap();
    let from_bin = Recommender::load(&write_fixtures(bin_dir.path(), "bin")).unwrap();

    let query = Query::new("Graph learning", "neural network models", "deep");
    let a = from_json.recommend(&query);
    let b = from_bin.recommend(&query);
    assert_eq!(a.cluster, b.cluster);
    let names_a: Vec<_> = a.journals.iter().map(|j| j.journal.clone()).collect();
    let names_b: Vec<_> = b.journals.iter().map(|j| j.journal.clone()).collect();
    assert_eq!(names_a, names_b);
}

#[test]
fn test_stored_abstract_ranks_its_journal_first() {
    let (_dir, settings) = fixture_dir();
    let recommender = Recommender::load(&settings).unwrap();

    let query = Query::new(
        "Protein folding dynamics",
        "Molecular dynamics of protein folding and enzyme activity",
        "protein",
    );
    let result = recommender.recommend(&query);
    assert_eq!(result.cluster, 1);
    let top = &result.journals[0];
    assert_eq!(top.journal, "Bioinformatics");
    assert!((top.similarity() - 1.0).abs() < 1e-4);
    assert_eq!(top.metrics.as_ref().unwrap().quartile.as_deref(), Some("Q1"));
}

#[test]
fn test_output_is_distinct_sorted_and_bounded() {
    let (_dir, settings) = fixture_dir();
    let recommender = Recommender::load(&settings).unwrap();

    for text in ["graph learning", "neural network", "deep graph network learning"] {
        let result = recommender.recommend(&Query::new(text, "", ""));
        assert_eq!(result.cluster, 0);

        let names: HashSet<&str> = result.journals.iter().map(|j| j.journal.as_str()).collect();
        assert_eq!(names.len(), result.journals.len());

        for pair in result.journals.windows(2) {
            assert!(pair[0].similarity() >= pair[1].similarity());
        }
        for j in &result.journals {
            assert!(j.similarity() >= 0.0 && j.similarity() <= 1.0);
        }
    }
}

#[test]
fn test_best_article_per_journal_is_kept() {
    let (_dir, settings) = fixture_dir();
    let recommender = Recommender::load(&settings).unwrap();

    let result = recommender.recommend(&Query::new("graph learning", "", ""));
    let journals: Vec<&str> = result.journals.iter().map(|j| j.journal.as_str()).collect();
    assert_eq!(
        journals,
        vec!["Neural Computing", "Unlisted Proceedings", "Machine Learning Letters"]
    );
    assert_eq!(result.journals[0].article.title, "Graph neural networks");

    let unlisted = &result.journals[1];
    assert!(unlisted.metrics.is_none());

    let nc = result.journals[0].metrics.as_ref().unwrap();
    assert_eq!(nc.article_count, 2);
    assert_eq!(nc.mean_citations, Some(32.5));
}

#[test]
fn test_empty_and_unknown_queries_degrade_quietly() {
    let (_dir, settings) = fixture_dir();
    let recommender = Recommender::load(&settings).unwrap();

    for query in [Query::default(), Query::new("quantum chromodynamics", "", "")] {
        let result = recommender.recommend(&query);
        assert_eq!(result.cluster, 2);
        assert!(result.journals.is_empty());
        assert!(result.articles.is_empty());
    }
}

#[test]
fn test_top_n_limits_journals() {
    let dir = TempDir::new().unwrap();
    let mut settings = write_fixtures(dir.path(), "json");
    settings.top_n = 1;
    let recommender = Recommender::load(&settings).unwrap();

    let result = recommender.recommend(&Query::new("neural network", "", ""));
    assert_eq!(result.journals.len(), 1);
    assert_eq!(result.journals[0].journal, "Machine Learning Letters");
}

#[test]
fn test_vector_length_is_vocabulary_size() {
    let (_dir, settings) = fixture_dir();
    let recommender = Recommender::load(&settings).unwrap();

    for query in [
        Query::default(),
        Query::new("graph", "protein", "cell"),
        Query::new("∑ unicode ünïcödé", "&&&", "   "),
    ] {
        assert_eq!(recommender.vectorize(&query).dim(), VOCABULARY.len());
    }
}

#[test]
fn test_integrity_report_flags_fixture_gaps() {
    let (_dir, settings) = fixture_dir();
    let recommender = Recommender::load(&settings).unwrap();

    let issues = integrity_report(
        recommender.corpus(),
        recommender.registry(),
        recommender.assigner().k(),
    );
    assert_eq!(issues.len(), 2);
    assert!(issues.iter().any(|i| matches!(
        i,
        IntegrityIssue::UnknownJournal { journal, .. } if journal == "Unlisted Proceedings"
    )));
    assert!(issues.contains(&IntegrityIssue::EmptyCluster { cluster: 2 }));
}

#[test]
fn test_cluster_model_from_another_vectorizer_is_rejected() {
    let dir = TempDir::new().unwrap();
    let settings = write_fixtures(dir.path(), "json");

    let mut other_vocabulary: Vec<String> = VOCABULARY.iter().map(|s| s.to_string()).collect();
    other_vocabulary.reverse();
    let other = TfidfVectorizer::from_artifact(VectorizerArtifact::new(
        other_vocabulary,
        vec![1.0; VOCABULARY.len()],
    ))
    .unwrap();
    write_artifact(
        std::path::Path::new(&settings.cluster_model_path),
        &ClusterArtifact::new(centroids(), &other),
    )
    .unwrap();

    match Recommender::load(&settings) {
        Err(ArtifactError::FingerprintMismatch { .. }) => {}
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("mismatched artifacts were accepted"),
    }
}

#[test]
fn test_missing_artifact_is_an_io_error() {
    let (_dir, mut settings) = fixture_dir();
    settings.articles_path = "/nonexistent/articles.csv".to_string();
    assert!(Recommender::load(&settings).is_err());
}
