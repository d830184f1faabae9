use anyhow::{Context, Result};
use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;
use std::env;

pub type Number = f32;

pub const EPSILON: f32 = 1e-6;

pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_SNIPPET_CHARS: usize = 200;

#[derive(Deserialize)]
pub struct JrecConfig {
    pub vectorizer_path: Option<String>,
    pub cluster_model_path: Option<String>,
    pub articles_path: Option<String>,
    pub journals_path: Option<String>,
    pub top_n: Option<usize>,
    pub snippet_chars: Option<usize>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub verbose: Option<bool>,
}

impl JrecConfig {
    pub fn try_from(config: &Config) -> Result<Self, ConfigError> {
        Ok(JrecConfig {
            vectorizer_path: config.get("vectorizer_path").ok(),
            cluster_model_path: config.get("cluster_model_path").ok(),
            articles_path: config.get("articles_path").ok(),
            journals_path: config.get("journals_path").ok(),
            top_n: config.get("top_n").ok(),
            snippet_chars: config.get("snippet_chars").ok(),
            host: config.get("host").ok(),
            port: config.get("port").ok(),
            verbose: config.get("verbose").ok(),
        })
    }
}

/// Effective settings, resolved once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Settings {
    pub vectorizer_path: String,
    pub cluster_model_path: String,
    pub articles_path: String,
    pub journals_path: String,
    pub top_n: usize,
    pub snippet_chars: usize,
    pub host: String,
    pub port: u16,
    pub verbose: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vectorizer_path: "data/vectorizer.json".to_string(),
            cluster_model_path: "data/kmeans.json".to_string(),
            articles_path: "data/articles.csv".to_string(),
            journals_path: "data/journals.csv".to_string(),
            top_n: DEFAULT_TOP_N,
            snippet_chars: DEFAULT_SNIPPET_CHARS,
            host: "127.0.0.1".to_string(),
            port: 5000,
            verbose: false,
        }
    }
}

impl Settings {
    /// Layers `jrec_config.*` (optional) and `JREC_*` environment variables
    /// over the defaults.
    pub fn new() -> Result<Self> {
        let mut config = Config::default();
        #[allow(deprecated)]
        {
            config.merge(ConfigFile::with_name("jrec_config").required(false))?;
            config.merge(Environment::with_prefix("JREC"))?;
        }

        let jrec_config =
            JrecConfig::try_from(&config).context("Failed to read jrec configuration")?;
        Self::from_config(jrec_config)
    }

    pub fn from_config(jrec_config: JrecConfig) -> Result<Self> {
        let defaults = Settings::default();

        let top_n = jrec_config.top_n.unwrap_or(defaults.top_n);
        if top_n == 0 {
            anyhow::bail!("JREC_TOP_N must be at least 1.");
        }

        let verbose = jrec_config
            .verbose
            .or_else(|| env::var("JREC_VERBOSE").ok().map(|s| s == "true" || s == "1"))
            .unwrap_or(defaults.verbose);

        Ok(Self {
            vectorizer_path: jrec_config
                .vectorizer_path
                .unwrap_or(defaults.vectorizer_path),
            cluster_model_path: jrec_config
                .cluster_model_path
                .unwrap_or(defaults.cluster_model_path),
            articles_path: jrec_config.articles_path.unwrap_or(defaults.articles_path),
            journals_path: jrec_config.journals_path.unwrap_or(defaults.journals_path),
            top_n,
            snippet_chars: jrec_config.snippet_chars.unwrap_or(defaults.snippet_chars),
            host: jrec_config.host.unwrap_or(defaults.host),
            port: jrec_config.port.unwrap_or(defaults.port),
            verbose,
        })
    }

    pub fn config_lines(&self) -> Vec<String> {
        vec![
            format!("vectorizer_path={}", self.vectorizer_path),
            format!("cluster_model_path={}", self.cluster_model_path),
            format!("articles_path={}", self.articles_path),
            format!("journals_path={}", self.journals_path),
            format!("top_n={}", self.top_n),
            format!("snippet_chars={}", self.snippet_chars),
            format!("host={}", self.host),
            format!("port={}", self.port),
            format!("verbose={}", self.verbose),
        ]
    }

    pub fn print_config(&self) {
        for line in self.config_lines() {
            println!("{}", line);
        }
    }
}
