use crate::core::error::MealchatError;
use crate::providers::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GenerationConfig};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

fn default_probe_interval_secs() -> u64 {
    15
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: None,
            generation: GenerationConfig::default(),
            probe_interval_secs: default_probe_interval_secs(),
        }
    }
}

impl Config {
    fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".mealchat")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    pub fn consent_path() -> PathBuf {
        Self::config_dir().join("consent.yaml")
    }

    pub fn history_path() -> PathBuf {
        Self::config_dir().join("input_history.txt")
    }

    pub fn load() -> Result<Config, MealchatError> {
        let path = Self::config_path();

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config = serde_yml::from_str::<Config>(&contents)
                .map_err(|e| MealchatError::Config(format!("Parse {}: {}", path.display(), e)))?;
            tracing::debug!(path = %path.display(), "loaded config");
            return Ok(config);
        }

        let config = Config::default();
        let _ = config.save();
        Ok(config)
    }

    pub fn save(&self) -> Result<(), MealchatError> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml_content = serde_yml::to_string(self)?;
        fs::write(&path, yaml_content)?;
        Ok(())
    }

    /// The credential is a deployment secret: the environment wins over the
    /// config file, and a missing key is a config error, never a default.
    pub fn resolve_api_key(&self) -> Result<String, MealchatError> {
        env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .or_else(|| self.api_key.clone())
            .ok_or_else(|| {
                MealchatError::Config(format!(
                    "No API key configured. Set {} or add api_key to {}.",
                    API_KEY_ENV,
                    Self::config_path().display()
                ))
            })
    }

    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn model(&self) -> String {
        self.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_fills_in_defaults() {
        let config: Config = serde_yml::from_str("api_key: abc\n").unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.model(), DEFAULT_MODEL);
        assert_eq!(config.probe_interval_secs, 15);
        assert_eq!(config.generation.max_output_tokens, 1024);
    }

    #[test]
    fn generation_overrides_round_trip() {
        let yaml = "generation:\n  temperature: 0.5\n  topK: 10\n  topP: 0.8\n  maxOutputTokens: 256\n";
        let config: Config = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.generation.top_k, 10);
        assert_eq!(config.generation.max_output_tokens, 256);

        let out = serde_yml::to_string(&config).unwrap();
        assert!(out.contains("maxOutputTokens: 256"));
    }

    #[test]
    fn config_file_key_is_used_when_env_is_absent() {
        let config = Config {
            api_key: Some("from-file".to_string()),
            ..Config::default()
        };
        // The env var may leak in from the host; only assert on the fallback path
        if env::var(API_KEY_ENV).is_err() {
            assert_eq!(config.resolve_api_key().unwrap(), "from-file");
        }
    }
}
