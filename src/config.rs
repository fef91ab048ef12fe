use std::{env, fs, path::{Path, PathBuf}, time::Duration};

use dotenvy::dotenv;
use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &'static str = "http://localhost:8000/api/v1";
pub const DEFAULT_PUSH_URL: &'static str = "ws://localhost:8000/ws";
pub const DEFAULT_TOKEN_FILE: &'static str = ".atm_auth_token";
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Could not read config file {0}. Error: {1}")]
    ReadError(PathBuf, std::io::Error),
    #[error("Could not parse config file {0}. Error: {1}")]
    ParseError(PathBuf, serde_json::Error),
    #[error("Environment variable {0} has invalid value '{1}'")]
    InvalidEnvVar(&'static str, String),
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub push_url: String,
    pub token_file: PathBuf,
    pub refresh_interval_secs: u64,
    pub export_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            push_url: DEFAULT_PUSH_URL.to_string(),
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            export_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    ///
    /// Builds the configuration from the defaults, then the JSON file at `path`
    /// (if given and present), then the environment (including a `.env` file).
    ///
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            Some(path) => {
                warn!("Config file {} not found, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env(|key| env::var(key).ok())?;
        info!("Using backend {} and push channel {}", config.api_base_url, config.push_url);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::ReadError(path.to_path_buf(), e))?;
        serde_json::from_str::<Config>(&contents)
            .map_err(|e| Error::ParseError(path.to_path_buf(), e))
    }

    pub fn apply_env(&mut self, get_var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = get_var("ATM_API_URL") { self.api_base_url = url; }
        if let Some(url) = get_var("ATM_WS_URL") { self.push_url = url; }
        if let Some(path) = get_var("ATM_TOKEN_FILE") { self.token_file = PathBuf::from(path); }
        if let Some(dir) = get_var("ATM_EXPORT_DIR") { self.export_dir = PathBuf::from(dir); }
        if let Some(secs) = get_var("ATM_REFRESH_SECS") {
            self.refresh_interval_secs = secs.parse()
                .map_err(|_| Error::InvalidEnvVar("ATM_REFRESH_SECS", secs.clone()))?;
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_defaults_point_at_localhost() {
        let config = Config::default();
        assert_eq!("http://localhost:8000/api/v1", config.api_base_url);
        assert_eq!("ws://localhost:8000/ws", config.push_url);
        assert_eq!(Duration::from_secs(30), config.refresh_interval());
    }

    #[test]
    fn test_env_overrides_file_values() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "api_base_url": "http://file:1/api", "refresh_interval_secs": 10 }"#)?;

        let mut config = Config::from_file(&path)?;
        assert_eq!("http://file:1/api", config.api_base_url);
        assert_eq!(DEFAULT_PUSH_URL, config.push_url);

        let vars = HashMap::from([
            ("ATM_WS_URL", "ws://env:2/ws"),
            ("ATM_REFRESH_SECS", "5"),
        ]);
        config.apply_env(|key| vars.get(key).map(|v| v.to_string()))?;

        assert_eq!("http://file:1/api", config.api_base_url);
        assert_eq!("ws://env:2/ws", config.push_url);
        assert_eq!(5, config.refresh_interval_secs);
        Ok(())
    }

    #[test]
    fn test_invalid_refresh_interval_is_rejected() {
        let mut config = Config::default();
        let res = config.apply_env(|key| (key == "ATM_REFRESH_SECS").then(|| "soon".to_string()));
        assert!(matches!(res, Err(Error::InvalidEnvVar("ATM_REFRESH_SECS", _))));
    }
}
