use crate::utils::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub general: GeneralConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub database_path: PathBuf,
    pub color: bool,
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

fn default_limit() -> u32 {
    crate::store::prompts::DEFAULT_SEARCH_LIMIT
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("promptstash");

        Self {
            general: GeneralConfig {
                database_path: data_dir.join("prompts.db"),
                color: true,
                default_limit: default_limit(),
            },
        }
    }
}

impl Config {
    pub fn load() -> AppResult<Self> {
        Self::load_custom(&Self::config_file_path())
    }

    pub fn ensure_config_exists() -> AppResult<()> {
        let config_path = Self::config_file_path();
        if !config_path.exists() {
            Config::default().save()?;
        }
        Ok(())
    }

    pub fn load_custom(config_path: &Path) -> AppResult<Self> {
        if !config_path.exists() {
            let default_config = Config::default();
            default_config.save()?;
            return Ok(default_config);
        }

        let content = std::fs::read_to_string(config_path)
            .map_err(|e| AppError::Config(format!("read {}: {}", config_path.display(), e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.general.database_path.as_os_str().is_empty() {
            return Err(AppError::Config("database path cannot be empty".to_string()));
        }
        if self.general.default_limit == 0
            || self.general.default_limit > crate::store::prompts::MAX_SEARCH_LIMIT
        {
            return Err(AppError::Config(format!(
                "default_limit must be between 1 and {}",
                crate::store::prompts::MAX_SEARCH_LIMIT
            )));
        }
        Ok(())
    }

    pub fn save(&self) -> AppResult<()> {
        let config_path = Self::config_file_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::Config(format!("create {}: {}", parent.display(), e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("failed to serialize config: {}", e)))?;

        std::fs::write(&config_path, content)
            .map_err(|e| AppError::Config(format!("write {}: {}", config_path.display(), e)))?;

        Ok(())
    }

    pub fn config_file_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("promptstash")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.general.color);
        assert_eq!(config.general.default_limit, 10);
    }

    #[test]
    fn round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.general.database_path, config.general.database_path);
        assert_eq!(parsed.general.default_limit, config.general.default_limit);
    }

    #[test]
    fn missing_limit_falls_back_to_default() {
        let parsed: Config = toml::from_str(
            "[general]\ndatabase_path = \"/tmp/p.db\"\ncolor = false\n",
        )
        .unwrap();
        assert_eq!(parsed.general.default_limit, 10);
        assert!(!parsed.general.color);
    }

    #[test]
    fn zero_default_limit_fails_validation() {
        let config = Config {
            general: GeneralConfig {
                database_path: PathBuf::from("/tmp/p.db"),
                color: true,
                default_limit: 0,
            },
        };
        assert_eq!(config.validate().unwrap_err().kind(), "config");
    }
}
