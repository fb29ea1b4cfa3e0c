use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use log::info;
use url::Url;

use crate::client::services::analyzer::{IngredientAnalyzer, PlaceholderAnalyzer, PLACEHOLDER_DELAY};
use crate::client::services::http_analyzer::HttpAnalyzer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalyzerBackend {
    #[default]
    Placeholder,
    Http,
}

impl FromStr for AnalyzerBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "placeholder" => Ok(AnalyzerBackend::Placeholder),
            "http" => Ok(AnalyzerBackend::Http),
            other => Err(anyhow!("unknown analyzer backend '{}' (expected placeholder or http)", other)),
        }
    }
}

impl fmt::Display for AnalyzerBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AnalyzerBackend::Placeholder => "placeholder",
            AnalyzerBackend::Http => "http",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub log_level: String,
    /// Raw `ANALYZER_BACKEND`; parsed when the analyzer is built.
    pub analyzer_backend: String,
    pub analyzer_endpoint: Option<String>,
    pub analyzer_api_key: Option<String>,
    pub analyzer_timeout: Duration,
    pub placeholder_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            log_level: non_empty("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            analyzer_backend: non_empty("ANALYZER_BACKEND").unwrap_or_else(|| "placeholder".to_string()),
            analyzer_endpoint: non_empty("ANALYZER_ENDPOINT"),
            analyzer_api_key: non_empty("ANALYZER_API_KEY"),
            analyzer_timeout: non_empty("ANALYZER_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(30)),
            placeholder_delay: non_empty("PLACEHOLDER_DELAY_MS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(PLACEHOLDER_DELAY),
        }
    }

    pub fn backend(&self) -> anyhow::Result<AnalyzerBackend> {
        self.analyzer_backend.parse()
    }

    pub fn build_analyzer(&self) -> anyhow::Result<Arc<dyn IngredientAnalyzer>> {
        let backend = self.backend()?;
        let analyzer: Arc<dyn IngredientAnalyzer> = match backend {
            AnalyzerBackend::Placeholder => {
                info!("Analyzer backend: {} ({:?} delay)", backend, self.placeholder_delay);
                Arc::new(PlaceholderAnalyzer::new(self.placeholder_delay))
            }
            AnalyzerBackend::Http => {
                let raw = self
                    .analyzer_endpoint
                    .as_deref()
                    .ok_or_else(|| anyhow!("ANALYZER_ENDPOINT must be set for the http backend"))?;
                let endpoint = Url::parse(raw).with_context(|| format!("invalid ANALYZER_ENDPOINT '{}'", raw))?;
                let http = HttpAnalyzer::new(endpoint, self.analyzer_api_key.clone(), self.analyzer_timeout)?;
                info!("Analyzer backend: {} at {}", backend, http.endpoint());
                Arc::new(http)
            }
        };
        Ok(analyzer)
    }
}
