use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable consulted when the config file carries no API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_LANGUAGE: &str = "English";
pub const DEFAULT_WRAP_WIDTH: usize = 80;
pub const DEFAULT_TEXT_SEGMENT: &str = "__TEXT";

/// Third-party class prefixes skipped by default.
pub const DEFAULT_IGNORED_CLASS_PREFIXES: &[&str] = &[
    "AFNetwork",
    "AFHTTP",
    "AFURL",
    "AFSecurity",
    "Flurry",
    "FMDatabase",
    "MBProgressHUD",
    "MJ",
    "SDWebImage",
];

/// Placeholder labels skipped by default.
pub const DEFAULT_IGNORED_LABELS: &[&str] = &["-[ClassName methodName:]"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("Failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("wrap_width must be greater than zero")]
    InvalidWrapWidth,
}

/// Process-wide settings, fixed once loaded.
///
/// Every field has a default so partial JSON files are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplainerConfig {
    /// Bearer credential for the explanation backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub ignored_class_prefixes: Vec<String>,
    pub ignored_labels: Vec<String>,
    /// Natural language every explanation must be written in.
    pub language: String,
    /// Column budget for comments written back to the host.
    pub wrap_width: usize,
    /// Name of the executable-code segment scanned for classes.
    pub text_segment: String,
}

impl Default for ExplainerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            ignored_class_prefixes: DEFAULT_IGNORED_CLASS_PREFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ignored_labels: DEFAULT_IGNORED_LABELS.iter().map(|s| s.to_string()).collect(),
            language: DEFAULT_LANGUAGE.to_string(),
            wrap_width: DEFAULT_WRAP_WIDTH,
            text_segment: DEFAULT_TEXT_SEGMENT.to_string(),
        }
    }
}

impl ExplainerConfig {
    pub fn from_json(body: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(body)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let body = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.display().to_string(), source })?;
        Self::from_json(&body)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wrap_width == 0 {
            return Err(ConfigError::InvalidWrapWidth);
        }
        Ok(())
    }

    /// Fill a missing API key from `OPENAI_API_KEY`.
    pub fn with_env_api_key(mut self) -> Self {
        if self.api_key.is_none() {
            self.api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty());
        }
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}
