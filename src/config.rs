use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

const CONFIG_DIR_NAME: &str = "eisen";
const CONFIG_FILE_NAME: &str = "config.json";

/// Resolved runtime configuration: stored config file, overridden by
/// environment variables (a `.env` file is honored). Missing values stay
/// `None`; commands warn and fail lazily when they actually need one.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,
    pub glpi_base_url: Option<String>,
    pub glpi_app_token: Option<String>,
    pub glpi_user_token: Option<String>,
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        let stored = StoredConfig::load()?;

        Ok(Self {
            openai_api_key: env_or("OPENAI_API_KEY", stored.openai_api_key),
            openai_model: env_or("OPENAI_MODEL", stored.openai_model),
            glpi_base_url: env_or("GLPI_BASE_URL", stored.glpi_base_url),
            glpi_app_token: env_or("GLPI_APP_TOKEN", stored.glpi_app_token),
            glpi_user_token: env_or("GLPI_USER_TOKEN", stored.glpi_user_token),
        })
    }
}

fn env_or(name: &str, fallback: Option<String>) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty()).or(fallback)
}

/// On-disk configuration managed by `eisen config init`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredConfig {
    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,
    pub glpi_base_url: Option<String>,
    pub glpi_app_token: Option<String>,
    pub glpi_user_token: Option<String>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        let path = config_file_path()?;
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|err| AppError::Configuration(format!("invalid config file: {err}"))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        let path = config_file_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to encode config: {err}")))?;
        fs::write(&path, data)?;
        Ok(())
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    if let Some(xdg) = env::var("XDG_CONFIG_HOME").ok().filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(xdg).join(CONFIG_DIR_NAME));
    }
    let home = env::var("HOME")
        .map_err(|_| AppError::Configuration("HOME is not set".to_string()))?;
    Ok(PathBuf::from(home).join(".config").join(CONFIG_DIR_NAME))
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}
