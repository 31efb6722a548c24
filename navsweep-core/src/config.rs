use crate::matcher::{ALL_WORDS_MIN_LEN, DEFAULT_STOPWORDS, SIGNIFICANT_WORD_MIN_LEN, TitleMatcher};
use navsweep_scanner::MenuSelectors;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "~/.config/navsweep/config.json";
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 60_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Title matcher thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherSettings {
    pub significant_word_min_len: usize,
    pub all_words_min_len: usize,
    pub stopwords: Vec<String>,
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self {
            significant_word_min_len: SIGNIFICANT_WORD_MIN_LEN,
            all_words_min_len: ALL_WORDS_MIN_LEN,
            stopwords: DEFAULT_STOPWORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl MatcherSettings {
    pub fn to_matcher(&self) -> TitleMatcher {
        TitleMatcher::new()
            .with_significant_word_min_len(self.significant_word_min_len)
            .with_all_words_min_len(self.all_words_min_len)
            .with_stopwords(self.stopwords.iter().cloned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    pub selectors: MenuSelectors,
    pub navigation_timeout_ms: u64,
    pub user_agent: Option<String>,
    pub matcher: MatcherSettings,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            selectors: MenuSelectors::default(),
            navigation_timeout_ms: DEFAULT_NAVIGATION_TIMEOUT_MS,
            user_agent: None,
            matcher: MatcherSettings::default(),
        }
    }
}

impl CrawlConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn from_json(content: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content, path)
    }
}

/// Expand a leading `~` in a user supplied path.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Load the config named on the command line, or the default one if present.
///
/// An explicitly named file must exist; a missing default file means built-in defaults.
pub fn load_config(explicit: Option<&str>) -> Result<CrawlConfig, ConfigError> {
    match explicit {
        Some(path) => CrawlConfig::load(&expand_path(path)),
        None => {
            let default_path = expand_path(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                CrawlConfig::load(&default_path)
            } else {
                Ok(CrawlConfig::default())
            }
        }
    }
}
