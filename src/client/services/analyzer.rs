use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::info;

use crate::client::models::health::{HealthResult, Score};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("the image could not be read: {0}")]
    Unreadable(String),
    #[error("the image content is not supported: {0}")]
    UnsupportedContent(String),
    #[error("the analysis service is unavailable: {0}")]
    BackendUnavailable(String),
    #[error("the analysis quota has been exceeded")]
    QuotaExceeded,
    #[error("the analysis timed out")]
    Timeout,
    #[error("the analysis service sent an invalid response: {0}")]
    InvalidResponse(String),
}

/// Turns an ingredient-list photo into a [`HealthResult`].
#[async_trait]
pub trait IngredientAnalyzer: Send + Sync {
    async fn analyze(&self, image: Arc<[u8]>, mime_type: &str) -> Result<HealthResult, AnalysisError>;

    fn name(&self) -> &'static str;
}

pub const PLACEHOLDER_DELAY: Duration = Duration::from_millis(2000);

/// Stand-in backend: waits, then returns a fixed result.
#[derive(Debug, Clone)]
pub struct PlaceholderAnalyzer {
    delay: Duration,
    result: HealthResult,
}

impl PlaceholderAnalyzer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            result: sample_result(),
        }
    }
}

impl Default for PlaceholderAnalyzer {
    fn default() -> Self {
        Self::new(PLACEHOLDER_DELAY)
    }
}

#[async_trait]
impl IngredientAnalyzer for PlaceholderAnalyzer {
    async fn analyze(&self, image: Arc<[u8]>, mime_type: &str) -> Result<HealthResult, AnalysisError> {
        info!(
            "placeholder analysis of {} bytes ({}), replying in {:?}",
            image.len(),
            mime_type,
            self.delay
        );
        tokio::time::sleep(self.delay).await;
        Ok(self.result.clone())
    }

    fn name(&self) -> &'static str {
        "placeholder"
    }
}

fn sample_result() -> HealthResult {
    HealthResult::new(
        Score::clamped(75),
        ["Water", "Sugar", "Natural Flavors", "Citric Acid", "Vitamin C"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    )
}
