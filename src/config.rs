//! TOML configuration.
//!
//! Lookup order: an explicit path, `./rusty-explain.toml`, then
//! `<config dir>/rusty-explain/config.toml`. A missing file yields the
//! defaults; a file that exists but does not parse is an error.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::i18n::Language;

pub const APP_NAME: &str = "rusty-explain";
const LOCAL_FILE: &str = "rusty-explain.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ai: AiConfig,
    pub display: DisplayConfig,
    pub capture: CaptureConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// OpenAI-compatible endpoint, e.g. `https://api.deepseek.com/v1`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: None,
            model: "gpt-4".to_string(),
            timeout_secs: 30,
            max_retries: 3,
            temperature: 0.3,
            max_tokens: 1000,
        }
    }
}

impl AiConfig {
    /// A key that is present and not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub language: Language,
    pub show_emoji: bool,
    /// Wrap width for rendered text.
    pub width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            show_emoji: true,
            width: 80,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub poll_interval_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
        }
    }
}

impl Config {
    /// `<config dir>/rusty-explain/config.toml`
    pub fn user_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join("config.toml"))
    }

    /// Load from `explicit` or the first existing default location, then
    /// apply environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::discover() {
                Some(path) => Self::from_file(&path)?,
                None => {
                    tracing::debug!("no config file found, using defaults");
                    Self::default()
                }
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_FILE);
        if local.is_file() {
            return Some(local);
        }
        Self::user_path().filter(|p| p.is_file())
    }

    /// Override AI credentials from the environment. `API_KEY` wins over
    /// `OPENAI_API_KEY`; blank values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_blank("API_KEY").or_else(|| non_blank("OPENAI_API_KEY")) {
            self.ai.api_key = Some(key);
        }
        if let Some(base) = non_blank("API_BASE") {
            self.ai.api_base = Some(base);
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.ai.model, "gpt-4");
        assert_eq!(config.ai.timeout_secs, 30);
        assert_eq!(config.ai.max_retries, 3);
        assert_eq!(config.ai.max_tokens, 1000);
        assert!(config.ai.api_key().is_none());
        assert_eq!(config.display.language, Language::Zh);
        assert_eq!(config.capture.poll_interval_ms, 500);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml(
            r#"
[ai]
model = "deepseek-chat"
api_base = "https://api.deepseek.com/v1"

[display]
language = "en"
"#,
        )
        .unwrap_or_default();
        assert_eq!(config.ai.model, "deepseek-chat");
        assert_eq!(config.ai.api_base.as_deref(), Some("https://api.deepseek.com/v1"));
        assert_eq!(config.ai.max_retries, 3);
        assert_eq!(config.display.language, Language::En);
        assert!(config.display.show_emoji);
    }

    #[test]
    fn test_unknown_language_falls_back() {
        let config = Config::from_toml("[display]\nlanguage = \"fr\"\n").unwrap_or_default();
        assert_eq!(config.display.language, Language::Zh);
    }

    #[test]
    fn test_malformed_file_is_error() {
        assert!(Config::from_toml("[ai\nmodel = ").is_err());
        assert!(Config::from_toml("[ai]\nmax_retries = \"many\"").is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = Config::load(Some(Path::new("/nonexistent/rusty-explain.toml")));
        assert!(err.is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env(env(&[("OPENAI_API_KEY", "sk-openai"), ("API_BASE", "http://localhost:11434/v1")]));
        assert_eq!(config.ai.api_key(), Some("sk-openai"));
        assert_eq!(config.ai.api_base.as_deref(), Some("http://localhost:11434/v1"));

        config.apply_env(env(&[("API_KEY", "sk-generic"), ("OPENAI_API_KEY", "sk-openai")]));
        assert_eq!(config.ai.api_key(), Some("sk-generic"));

        let mut config = Config::default();
        config.ai.api_key = Some("from-file".to_string());
        config.apply_env(env(&[("API_KEY", "  ")]));
        assert_eq!(config.ai.api_key(), Some("from-file"));
    }

    #[test]
    fn test_blank_key_is_absent() {
        let mut config = Config::default();
        config.ai.api_key = Some("   ".to_string());
        assert!(config.ai.api_key().is_none());
    }

    #[test]
    fn test_toml_round_trip_of_defaults() {
        let text = Config::default().to_toml().unwrap_or_default();
        assert!(text.contains("[ai]"));
        assert_eq!(Config::from_toml(&text).ok(), Some(Config::default()));
    }
}
