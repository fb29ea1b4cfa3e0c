use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use log::{debug, error, warn};
use reqwest::StatusCode;
use serde::Serialize;
use url::Url;

use crate::client::models::health::HealthResult;
use crate::client::services::analyzer::{AnalysisError, IngredientAnalyzer};

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    mime_type: &'a str,
    image_base64: String,
}

/// Sends the image to an inference endpoint and reads back a [`HealthResult`].
#[derive(Debug, Clone)]
pub struct HttpAnalyzer {
    client: reqwest::Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl HttpAnalyzer {
    pub fn new(endpoint: Url, api_key: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, endpoint, api_key))
    }

    pub fn with_client(client: reqwest::Client, endpoint: Url, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint,
            api_key,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn check_readable(bytes: &[u8], mime_type: &str) -> Result<(), AnalysisError> {
    if bytes.is_empty() {
        return Err(AnalysisError::Unreadable("the file is empty".to_string()));
    }
    // SVG is text; there is no magic number to sniff.
    if mime_type == "image/svg+xml" {
        return std::str::from_utf8(bytes)
            .map(|_| ())
            .map_err(|e| AnalysisError::Unreadable(e.to_string()));
    }
    image::guess_format(bytes)
        .map(|_| ())
        .map_err(|e| AnalysisError::Unreadable(e.to_string()))
}

fn status_error(status: StatusCode, body: String) -> AnalysisError {
    match status {
        StatusCode::UNSUPPORTED_MEDIA_TYPE | StatusCode::UNPROCESSABLE_ENTITY => {
            AnalysisError::UnsupportedContent(body)
        }
        StatusCode::TOO_MANY_REQUESTS => AnalysisError::QuotaExceeded,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => AnalysisError::Timeout,
        s if s.is_server_error() => AnalysisError::BackendUnavailable(format!("{}: {}", s, body)),
        s => AnalysisError::InvalidResponse(format!("unexpected status {}: {}", s, body)),
    }
}

fn transport_error(err: reqwest::Error) -> AnalysisError {
    if err.is_timeout() {
        AnalysisError::Timeout
    } else {
        AnalysisError::BackendUnavailable(err.to_string())
    }
}

#[async_trait]
impl IngredientAnalyzer for HttpAnalyzer {
    async fn analyze(&self, image: Arc<[u8]>, mime_type: &str) -> Result<HealthResult, AnalysisError> {
        check_readable(&image, mime_type)?;

        let body = AnalyzeRequest {
            mime_type,
            image_base64: base64::engine::general_purpose::STANDARD.encode(&image),
        };
        debug!("POST {} ({} bytes, {})", self.endpoint, image.len(), mime_type);

        let mut request = self.client.post(self.endpoint.clone()).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            error!("analysis request to {} failed: {}", self.endpoint, e);
            transport_error(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!("analysis service answered {}", status);
            return Err(status_error(status, text));
        }

        let bytes = response.bytes().await.map_err(transport_error)?;
        serde_json::from_slice::<HealthResult>(&bytes)
            .map_err(|e| AnalysisError::InvalidResponse(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_garbage_images_are_unreadable() {
        assert!(matches!(check_readable(&[], "image/png"), Err(AnalysisError::Unreadable(_))));
        assert!(matches!(check_readable(b"hello", "image/png"), Err(AnalysisError::Unreadable(_))));
        assert!(check_readable(b"\x89PNG\r\n\x1a\n0000", "image/png").is_ok());
    }

    #[test]
    fn svg_is_checked_as_text() {
        assert!(check_readable(b"<svg xmlns='http://www.w3.org/2000/svg'/>", "image/svg+xml").is_ok());
        assert!(matches!(check_readable(&[0xff, 0xfe, 0xfd], "image/svg+xml"), Err(AnalysisError::Unreadable(_))));
        assert!(matches!(check_readable(&[], "image/svg+xml"), Err(AnalysisError::Unreadable(_))));
    }

    #[test]
    fn statuses_map_to_analysis_errors() {
        let map = |code: u16| status_error(StatusCode::from_u16(code).unwrap(), String::new());
        assert!(matches!(map(415), AnalysisError::UnsupportedContent(_)));
        assert!(matches!(map(422), AnalysisError::UnsupportedContent(_)));
        assert_eq!(map(429), AnalysisError::QuotaExceeded);
        assert_eq!(map(504), AnalysisError::Timeout);
        assert!(matches!(map(503), AnalysisError::BackendUnavailable(_)));
        assert!(matches!(map(404), AnalysisError::InvalidResponse(_)));
    }
}
