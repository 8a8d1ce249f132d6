use mailcraft_render::RenderConfig;
use mailcraft_state::STATE_VERSION;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "mailcraft.config.json";

/// Mailcraft configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory exports are written to
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// HTML render service; `SSR_EXPORT_HTML_URL` takes precedence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_url: Option<String>,

    /// Version tag for documents imported without one
    #[serde(default = "default_state_version")]
    pub state_version: String,

    /// Key-value file holding editor settings
    #[serde(default = "default_settings_path")]
    pub settings_path: String,
}

fn default_out_dir() -> String {
    "exports".to_string()
}

fn default_state_version() -> String {
    STATE_VERSION.to_string()
}

fn default_settings_path() -> String {
    ".mailcraft/settings.json".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn get_out_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.out_dir)
    }

    pub fn get_settings_path(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.settings_path)
    }

    /// Environment first, then the configured URL
    pub fn render_config(&self) -> RenderConfig {
        let configured = self
            .render_url
            .clone()
            .map(RenderConfig::new)
            .unwrap_or_default();
        RenderConfig::from_env().or(configured)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            render_url: None,
            state_version: default_state_version(),
            settings_path: default_settings_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "outDir": "dist/emails",
            "renderUrl": "http://localhost:4000/html",
            "stateVersion": "2.0.0",
            "settingsPath": "settings.json"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.out_dir, "dist/emails");
        assert_eq!(
            config.render_url.as_deref(),
            Some("http://localhost:4000/html")
        );
        assert_eq!(config.state_version, "2.0.0");
        assert_eq!(config.settings_path, "settings.json");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"outDir": "out"}"#).unwrap();
        assert_eq!(config.out_dir, "out");
        assert_eq!(config.render_url, None);
        assert_eq!(config.state_version, "1.0.0");
        assert_eq!(config.settings_path, ".mailcraft/settings.json");
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().display().to_string()).unwrap();
        assert_eq!(config, Config::default());
    }
}
