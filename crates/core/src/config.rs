//! Configuration for loading and analysis.
//!
//! Every field has a default, so an absent or partial `oasgen.toml` is valid.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{OasError, Result};

/// Default HTTP timeout for remote documents
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of attempts for a remote fetch
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Delay before the first retry; doubles per attempt
const DEFAULT_INITIAL_RETRY_DELAY_MS: u64 = 125;

/// Hard recursion backstop for the form analyzer
const DEFAULT_MAX_DEPTH: usize = 32;

/// Top-level configuration file contents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OasgenConfig {
    pub loader: LoaderConfig,
    pub analyzer: AnalyzerConfig,
}

/// Settings for the document loader.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    /// Per-request timeout for remote documents.
    pub timeout_secs: u64,
    /// Attempts made for a remote document before giving up.
    pub max_retries: u32,
    /// Backoff before the second attempt.
    pub initial_retry_delay_ms: u64,
    /// User agent sent with remote fetches.
    pub user_agent: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            initial_retry_delay_ms: DEFAULT_INITIAL_RETRY_DELAY_MS,
            user_agent: format!("oasgen/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Settings for the form analyzer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Maximum nesting depth of group/array/map controls.
    pub max_depth: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl OasgenConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str, origin: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| OasError::Config {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// Read configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| OasError::Io {
            uri: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content, &path.display().to_string())
    }
}
