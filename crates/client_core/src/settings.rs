//! Client settings: defaults, then an optional `termsearch.toml`, then
//! `TERMSEARCH_*` environment variables. Front ends apply their own flags last.

use std::{collections::HashMap, fs, path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use tracing::warn;
use url::Url;

use crate::transport::normalize_base_url;

pub const SETTINGS_FILE: &str = "termsearch.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub session_path: PathBuf,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".into(),
            request_timeout_secs: 10,
            session_path: PathBuf::from("./termsearch-session.json"),
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Rejects settings the transport cannot work with.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api_base_url)
            .with_context(|| format!("invalid api base url {:?}", self.api_base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("api base url must be http or https, got {}", url.scheme());
        }
        if self.request_timeout_secs == 0 {
            bail!("request timeout must be at least one second");
        }
        Ok(())
    }
}

pub fn load_settings() -> ClientSettings {
    let raw = fs::read_to_string(SETTINGS_FILE).ok();
    settings_from_sources(raw.as_deref(), |key| std::env::var(key).ok())
}

/// Builds settings from the settings file contents and an environment lookup.
pub fn settings_from_sources(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Some(raw) = file {
        match toml::from_str::<HashMap<String, toml::Value>>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_value(&file_cfg, "api_base_url") {
                    settings.api_base_url = v;
                }
                if let Some(v) = file_value(&file_cfg, "request_timeout_secs") {
                    apply_timeout(&mut settings, &v);
                }
                if let Some(v) = file_value(&file_cfg, "session_path") {
                    settings.session_path = PathBuf::from(v);
                }
            }
            Err(err) => warn!("settings: ignoring malformed {SETTINGS_FILE}: {err}"),
        }
    }

    if let Some(v) = env("TERMSEARCH_API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("TERMSEARCH_REQUEST_TIMEOUT_SECS") {
        apply_timeout(&mut settings, &v);
    }
    if let Some(v) = env("TERMSEARCH_SESSION_PATH") {
        settings.session_path = PathBuf::from(v);
    }

    settings.api_base_url = normalize_base_url(&settings.api_base_url);
    settings
}

fn file_value(file_cfg: &HashMap<String, toml::Value>, key: &str) -> Option<String> {
    match file_cfg.get(key)? {
        toml::Value::String(v) => Some(v.clone()),
        toml::Value::Integer(v) => Some(v.to_string()),
        other => {
            warn!("settings: ignoring {key} with unsupported value {other}");
            None
        }
    }
}

fn apply_timeout(settings: &mut ClientSettings, raw: &str) {
    match raw.trim().parse::<u64>() {
        Ok(secs) => settings.request_timeout_secs = secs,
        Err(_) => warn!("settings: ignoring non-numeric request timeout {raw:?}"),
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
