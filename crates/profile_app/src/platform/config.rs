//! RON configuration for the watch client.
//!
//! Every field is optional; a missing file means all defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use profile_core::CoreSettings;
use profile_engine::{FetchSettings, DEFAULT_POLL_INTERVAL};
use serde::Deserialize;

const DEFAULT_CONFIG_FILENAME: &str = "profile_watch.ron";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub manifest_path: String,
    pub content_dir: String,
    pub state_dir: PathBuf,
    pub poll_interval_ms: u64,
    pub auto_refresh_delay_ms: u64,
    pub notification_visible_ms: u64,
    pub notification_dismiss_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_file_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let core = CoreSettings::default();
        let fetch = FetchSettings::default();
        Self {
            base_url: "http://localhost:8080/".to_string(),
            manifest_path: "files.json".to_string(),
            content_dir: "profile/".to_string(),
            state_dir: PathBuf::from(".profile_watch"),
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            auto_refresh_delay_ms: core.auto_refresh_delay_ms,
            notification_visible_ms: core.notification_visible_ms,
            notification_dismiss_ms: core.notification_dismiss_ms,
            connect_timeout_ms: fetch.connect_timeout.as_millis() as u64,
            request_timeout_ms: fetch.request_timeout.as_millis() as u64,
            max_file_bytes: fetch.max_bytes,
        }
    }
}

impl AppConfig {
    /// Loads `path`, or the default config file when it exists, or defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILENAME);
                if !fallback.exists() {
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_ron(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_ron(text: &str) -> anyhow::Result<Self> {
        Ok(ron::from_str(text)?)
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            manifest_url: join_url(&self.base_url, &self.manifest_path),
            content_base_url: join_url(&self.base_url, &self.content_dir),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_bytes: self.max_file_bytes,
        }
    }

    pub fn core_settings(&self) -> CoreSettings {
        CoreSettings {
            auto_refresh_delay_ms: self.auto_refresh_delay_ms,
            notification_visible_ms: self.notification_visible_ms,
            notification_dismiss_ms: self.notification_dismiss_ms,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

fn join_url(base: &str, relative: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use profile_engine::{FetchSettings, DEFAULT_POLL_INTERVAL};

    use super::{join_url, AppConfig};

    #[test]
    fn empty_config_is_all_defaults() {
        assert_eq!(AppConfig::from_ron("()").unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_config_overrides_named_fields() {
        let config =
            AppConfig::from_ron(r#"(base_url: "https://cdn.example/site", poll_interval_ms: 250)"#)
                .unwrap();
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.manifest_path, "files.json");

        let settings = config.fetch_settings();
        assert_eq!(settings.manifest_url, "https://cdn.example/site/files.json");
        assert_eq!(settings.content_base_url, "https://cdn.example/site/profile/");
    }

    #[test]
    fn defaults_follow_engine_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.poll_interval(), DEFAULT_POLL_INTERVAL);
        assert_eq!(config.poll_interval(), Duration::from_secs(5));

        let settings = config.fetch_settings();
        let engine = FetchSettings::default();
        assert_eq!(settings.connect_timeout, engine.connect_timeout);
        assert_eq!(settings.request_timeout, engine.request_timeout);
        assert_eq!(settings.max_bytes, engine.max_bytes);
    }

    #[test]
    fn unknown_syntax_is_rejected() {
        assert!(AppConfig::from_ron("(poll_interval_ms: \"soon\")").is_err());
    }

    #[test]
    fn join_handles_slashes() {
        assert_eq!(join_url("http://h/", "/files.json"), "http://h/files.json");
        assert_eq!(join_url("http://h", "profile/"), "http://h/profile/");
    }
}
