use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::naming::{ConventionRules, NamingConvention};

const CONFIG_FILE_NAME: &str = ".onomarc";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_provider: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub llm_model: String,
    pub naming_convention: String,
    pub min_filename_words: usize,
    pub max_filename_words: usize,
    pub system_prompt: String,
    pub user_prompt: String,
    pub image_prompt: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_provider: "openai".to_string(),
            openai_api_key: String::new(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            llm_model: "gpt-4o".to_string(),
            naming_convention: "snake_case".to_string(),
            min_filename_words: 5,
            max_filename_words: 15,
            system_prompt: String::new(),
            user_prompt: String::new(),
            image_prompt: String::new(),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home_dir = dirs::home_dir().ok_or(ConfigError::NoHome)?;
        Ok(home_dir.join(CONFIG_FILE_NAME))
    }

    /// Load from an explicit path (must exist) or from `~/.onomarc` (defaults
    /// when absent). Parse errors are never papered over with defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        let config_path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                path.to_path_buf()
            }
            None => {
                let path = Self::default_path()?;
                if !path.exists() {
                    tracing::debug!("No config at {}, using defaults", path.display());
                    return Ok(Config::default());
                }
                path
            }
        };

        Self::from_file(&config_path)
    }

    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.naming_rules()?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn naming_convention(&self) -> Result<NamingConvention, ConfigError> {
        self.naming_convention.parse()
    }

    pub fn naming_rules(&self) -> Result<ConventionRules, ConfigError> {
        ConventionRules::new(
            self.naming_convention()?,
            self.min_filename_words,
            self.max_filename_words,
        )
    }

    /// Config value first, then `OPENAI_API_KEY`.
    pub fn openai_api_key(&self) -> Option<String> {
        if !self.openai_api_key.trim().is_empty() {
            return Some(self.openai_api_key.clone());
        }
        std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_provider = \"mock\"\nllm_model = \"test-model\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.default_provider, "mock");
        assert_eq!(config.llm_model, "test-model");
        assert_eq!(config.naming_convention, "snake_case");
        assert_eq!(config.min_filename_words, 5);
        assert_eq!(config.max_filename_words, 15);
    }

    #[test]
    fn test_missing_explicit_path_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_malformed_toml_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "not a valid toml").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_unknown_convention_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "naming_convention = \"Train-Case\"\n").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownConvention(_)));
    }

    #[test]
    fn test_inverted_word_bounds_are_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "min_filename_words = 9\nmax_filename_words = 3\n").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::WordBounds { min: 9, max: 3 }));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(".onomarc");
        let config = Config {
            naming_convention: "kebab-case".to_string(),
            ..Config::default()
        };

        config.save(&path).unwrap();

        assert_eq!(Config::load(Some(&path)).unwrap(), config);
    }
}
