//! HTML render service client.
//!
//! One POST per call, body `{"app": <node map>}`. No retries and no local
//! fallback: every failure goes back to the caller.

use mailcraft_document::NodeTree;
use serde_json::json;
use tracing::{debug, info};

use crate::RenderError;

pub const RENDER_URL_ENV: &str = "SSR_EXPORT_HTML_URL";

/// Older deployments configured the service under this name
pub const LEGACY_RENDER_URL_ENV: &str = "REACT_APP_SSR_EXPORT_HTML_URL";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderConfig {
    pub url: Option<String>,
}

impl RenderConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }

    /// URL from the environment, `SSR_EXPORT_HTML_URL` first
    pub fn from_env() -> Self {
        let url = [RENDER_URL_ENV, LEGACY_RENDER_URL_ENV]
            .iter()
            .find_map(|name| std::env::var(name).ok())
            .filter(|url| !url.trim().is_empty());
        Self { url }
    }

    /// Keep `self` when set, otherwise take `fallback`
    pub fn or(self, fallback: RenderConfig) -> Self {
        if self.url.is_some() {
            self
        } else {
            fallback
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderClient {
    http: reqwest::Client,
    config: RenderConfig,
}

impl RenderClient {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render `tree` to HTML through the configured service
    pub async fn render_html(&self, tree: &NodeTree) -> Result<String, RenderError> {
        let url = self
            .config
            .url
            .as_deref()
            .ok_or(RenderError::NotConfigured)?;

        let body = json!({ "app": tree.to_value()? });
        debug!(url, nodes = tree.len(), "Requesting HTML render");

        let response = self.http.post(url).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(RenderError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        info!(bytes = text.len(), "Rendered HTML");
        Ok(unwrap_string_literal(text))
    }
}

/// Services that answer with `res.json(html)` send a JSON string literal
fn unwrap_string_literal(body: String) -> String {
    if body.trim_start().starts_with('"') {
        if let Ok(html) = serde_json::from_str::<String>(&body) {
            return html;
        }
    }
    body
}
