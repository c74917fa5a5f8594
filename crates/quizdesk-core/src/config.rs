//! quizdesk configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level quizdesk configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizdeskConfig {
    /// Directory holding one `<name>.json` per quiz.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Directory receiving `<quiz>/` result folders.
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
    /// Address the delivery front binds to.
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Reject submissions that arrive after the per-session deadline.
    #[serde(default)]
    pub enforce_time_limit: bool,
    /// Slack added to the deadline when it is enforced.
    #[serde(default = "default_grace_seconds")]
    pub grace_seconds: u64,
    /// Public exposure settings.
    #[serde(default)]
    pub tunnel: TunnelConfig,
}

/// Public exposure settings.
///
/// Note: Custom Debug impl masks the auth token.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct TunnelConfig {
    /// Try to expose the server publicly after it starts listening.
    #[serde(default)]
    pub enabled: bool,
    /// Token for the tunnel provider. `${VAR}` references are resolved.
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl std::fmt::Debug for TunnelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TunnelConfig")
            .field("enabled", &self.enabled)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "***"))
            .finish()
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_grace_seconds() -> u64 {
    30
}

impl Default for QuizdeskConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            results_dir: default_results_dir(),
            host: default_host(),
            port: default_port(),
            enforce_time_limit: false,
            grace_seconds: default_grace_seconds(),
            tunnel: TunnelConfig::default(),
        }
    }
}

impl QuizdeskConfig {
    /// `host:port` for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizdesk.toml` in the current directory
/// 2. `~/.config/quizdesk/config.toml`
///
/// Environment variable overrides: `QUIZDESK_PORT`, `QUIZDESK_DATA_DIR`,
/// `QUIZDESK_RESULTS_DIR`, `NGROK_AUTH_TOKEN`.
pub fn load_config() -> Result<QuizdeskConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizdeskConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizdesk.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!("loading config from {}", path.display());
            toml::from_str::<QuizdeskConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizdeskConfig::default(),
    };

    apply_env_overrides(&mut config)?;

    config.tunnel.auth_token = config
        .tunnel
        .auth_token
        .as_deref()
        .map(resolve_env_vars)
        .filter(|t| !t.trim().is_empty());

    Ok(config)
}

fn apply_env_overrides(config: &mut QuizdeskConfig) -> Result<()> {
    if let Ok(port) = std::env::var("QUIZDESK_PORT") {
        config.port = port
            .trim()
            .parse()
            .with_context(|| format!("invalid QUIZDESK_PORT: {port:?}"))?;
    }
    if let Ok(dir) = std::env::var("QUIZDESK_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }
    if let Ok(dir) = std::env::var("QUIZDESK_RESULTS_DIR") {
        config.results_dir = PathBuf::from(dir);
    }
    if let Ok(token) = std::env::var("NGROK_AUTH_TOKEN") {
        if !token.trim().is_empty() {
            config.tunnel.auth_token = Some(token);
        }
    }
    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizdesk"))
}
