// src/config.rs
//! Service configuration: defaults ← optional TOML file ← environment.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;

pub const ENV_CONFIG_PATH: &str = "DEVTO_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/devto.toml";
pub const DEFAULT_BASE_URL: &str = "https://dev.to/api";

const ENV_API_KEY: &str = "DEVTO_API_KEY";
const ENV_BASE_URL: &str = "DEVTO_API_BASE_URL";
const ENV_TIMEOUT: &str = "DEVTO_HTTP_TIMEOUT_SECS";
const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub remote: RemoteConfig,
    pub paging: PagingDefaults,
    pub log: LogConfig,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Applied to every outbound call.
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

// Never print the key itself.
impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<set>"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PagingDefaults {
    pub per_page: u32,
    pub max_pages: u32,
    /// Keyword and by-user scans walk further by default.
    pub search_max_pages: u32,
    /// Owned-corpus scans behind the fallback resolver and draft/scheduled listings.
    pub owned_per_page: u32,
    pub owned_max_pages: u32,
}

impl Default for PagingDefaults {
    fn default() -> Self {
        Self {
            per_page: 30,
            max_pages: 10,
            search_max_pages: 30,
            owned_per_page: 100,
            owned_max_pages: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

impl Config {
    /// Load using file + env fallbacks:
    /// 1) $DEVTO_CONFIG_PATH (must exist)
    /// 2) config/devto.toml (optional)
    /// 3) environment variables override either
    pub fn load() -> Result<Self> {
        let mut cfg = match std::env::var(ENV_CONFIG_PATH) {
            Ok(p) => {
                let pb = PathBuf::from(p);
                if !pb.exists() {
                    bail!("{ENV_CONFIG_PATH} points to non-existent path {}", pb.display());
                }
                Self::from_file(&pb)?
            }
            Err(_) => {
                let default = PathBuf::from(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::from_file(&default)?
                } else {
                    Self::default()
                }
            }
        };
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(key) = env_nonempty(ENV_API_KEY) {
            self.remote.api_key = Some(key);
        }
        if let Some(url) = env_nonempty(ENV_BASE_URL) {
            self.remote.base_url = url;
        }
        if let Some(raw) = env_nonempty(ENV_TIMEOUT) {
            self.remote.timeout_secs = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_TIMEOUT} must be a whole number of seconds"))?;
        }
        if let Some(level) = env_nonempty(ENV_LOG_LEVEL) {
            self.log.level = level.to_ascii_lowercase();
        }
        if let Some(fmt) = env_nonempty(ENV_LOG_FORMAT) {
            self.log.format = match fmt.to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "compact" | "text" => LogFormat::Compact,
                other => return Err(anyhow!("unsupported {ENV_LOG_FORMAT} '{other}'")),
            };
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.remote.timeout_secs == 0 {
            bail!("remote.timeout_secs must be at least 1");
        }
        if !self.remote.base_url.starts_with("http") {
            bail!("remote.base_url must be an http(s) URL");
        }
        if self.paging.per_page == 0 || self.paging.owned_per_page == 0 {
            bail!("paging page sizes must be at least 1");
        }
        Ok(())
    }
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    fn clear_env() {
        for k in [
            ENV_CONFIG_PATH,
            ENV_API_KEY,
            ENV_BASE_URL,
            ENV_TIMEOUT,
            ENV_LOG_LEVEL,
            ENV_LOG_FORMAT,
        ] {
            env::remove_var(k);
        }
    }

    #[test]
    fn file_fills_only_what_it_names() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("devto.toml");
        fs::write(
            &p,
            r#"
[remote]
timeout_secs = 3

[paging]
per_page = 50
"#,
        )
        .unwrap();
        let cfg = Config::from_file(&p).unwrap();
        assert_eq!(cfg.remote.timeout_secs, 3);
        assert_eq!(cfg.remote.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.paging.per_page, 50);
        assert_eq!(cfg.paging.max_pages, 10);
        assert_eq!(cfg.log.format, LogFormat::Compact);
    }

    #[serial_test::serial]
    #[test]
    fn env_overrides_file() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("devto.toml");
        fs::write(&p, "[remote]\nbase_url = \"http://file.example/api\"\n").unwrap();

        env::set_var(ENV_CONFIG_PATH, p.display().to_string());
        env::set_var(ENV_API_KEY, "secret");
        env::set_var(ENV_TIMEOUT, "7");
        env::set_var(ENV_LOG_FORMAT, "JSON");

        let cfg = Config::load().unwrap();
        assert_eq!(cfg.remote.base_url, "http://file.example/api");
        assert_eq!(cfg.remote.api_key.as_deref(), Some("secret"));
        assert_eq!(cfg.remote.timeout_secs, 7);
        assert_eq!(cfg.log.format, LogFormat::Json);
        assert!(!format!("{:?}", cfg.remote).contains("secret"));

        env::set_var(ENV_BASE_URL, "http://env.example/api");
        assert_eq!(Config::load().unwrap().remote.base_url, "http://env.example/api");
        clear_env();
    }

    #[serial_test::serial]
    #[test]
    fn bad_values_are_reported() {
        clear_env();
        env::set_var(ENV_CONFIG_PATH, "/definitely/not/here.toml");
        assert!(Config::load().is_err());
        env::remove_var(ENV_CONFIG_PATH);

        env::set_var(ENV_TIMEOUT, "soon");
        let err = Config::load().unwrap_err();
        assert!(err.to_string().contains(ENV_TIMEOUT));
        clear_env();
    }
}
