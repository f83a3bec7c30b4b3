//! HTTP client for the external AI menu-extraction service
//!
//! Wraps the upstream with retry and exponential backoff, a concurrency
//! semaphore, and a circuit breaker. Decoded menu content is never logged;
//! log lines carry a text fingerprint only.

use super::circuit_breaker::CircuitBreaker;
use super::config::ExtractionConfig;
use crate::cache::fingerprint;
use crate::menu::models::{AnalysisResult, LocationInfo};
use crate::metrics::METRICS;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

/// Extraction upstream error types
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("extraction integration is disabled")]
    Disabled,

    #[error("circuit breaker is open")]
    CircuitOpen,

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("upstream error: {0}")]
    UpstreamError(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// What the upstream should analyze
#[derive(Debug)]
enum ExtractionInput<'a> {
    Text(&'a str),
    Image {
        image: &'a str,
        location: &'a LocationInfo,
    },
}

impl ExtractionInput<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Image { .. } => "image",
        }
    }
}

/// Menu extraction client
pub struct MenuExtractionClient {
    http: Client,
    config: ExtractionConfig,
    semaphore: Arc<Semaphore>,
    breaker: Arc<CircuitBreaker>,
}

impl MenuExtractionClient {
    pub fn new(config: ExtractionConfig) -> Result<Self, ExtractionError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ExtractionError::RequestFailed(e.to_string()))?;

        let semaphore = Arc::new(Semaphore::new(config.max_concurrent_requests));
        let breaker = Arc::new(CircuitBreaker::new(
            config.circuit_breaker_failures,
            config.breaker_reset_timeout(),
        ));

        Ok(Self {
            http,
            config,
            semaphore,
            breaker,
        })
    }

    /// Extract structured drink listings from raw menu text
    pub async fn analyze_text(&self, menu_text: &str) -> Result<AnalysisResult, ExtractionError> {
        self.analyze(ExtractionInput::Text(menu_text)).await
    }

    /// Extract structured drink listings from a menu photo
    pub async fn analyze_image(
        &self,
        image: &str,
        location: &LocationInfo,
    ) -> Result<AnalysisResult, ExtractionError> {
        self.analyze(ExtractionInput::Image { image, location }).await
    }

    async fn analyze(&self, input: ExtractionInput<'_>) -> Result<AnalysisResult, ExtractionError> {
        let start = Instant::now();
        let kind = input.kind();

        if !self.config.enabled {
            METRICS.record_extraction(kind, "disabled");
            return Err(ExtractionError::Disabled);
        }

        if !self.breaker.allow() {
            METRICS.record_extraction(kind, "circuit_open");
            error!(kind, "extraction circuit breaker is open");
            return Err(ExtractionError::CircuitOpen);
        }

        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| ExtractionError::RequestFailed(e.to_string()))?;

        let mut attempt = 0;
        let result = loop {
            attempt += 1;

            match self.call_analyze_api(&input).await {
                Ok(result) => {
                    self.breaker.record_success();
                    METRICS.record_extraction(kind, "success");
                    break result;
                }
                Err(e) => {
                    self.breaker.record_failure();

                    if attempt > self.config.retry_attempts {
                        METRICS.record_extraction(kind, "error");
                        error!(kind, attempts = attempt, error = %e, "extraction failed");
                        return Err(e);
                    }

                    let backoff = self.calculate_backoff(attempt);
                    warn!(
                        kind,
                        attempt,
                        error = %e,
                        backoff_ms = backoff.as_millis() as u64,
                        "extraction attempt failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        };

        METRICS
            .extraction_duration
            .with_label_values(&[kind])
            .observe(start.elapsed().as_secs_f64());

        Ok(result)
    }

    async fn call_analyze_api(
        &self,
        input: &ExtractionInput<'_>,
    ) -> Result<AnalysisResult, ExtractionError> {
        let url = format!("{}/v1/menus/analyze", self.config.service_url);

        let request_body = match input {
            ExtractionInput::Text(text) => {
                debug!(key = %fingerprint(text), "calling extraction API for menu text");
                serde_json::json!({ "text": text })
            }
            ExtractionInput::Image { image, location } => {
                debug!(location = %location.name, "calling extraction API for menu image");
                serde_json::json!({ "image": image, "location": location })
            }
        };

        let mut req = self.http.post(&url).json(&request_body);

        if let Some(api_key) = &self.config.api_key {
            req = req.bearer_auth(api_key);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                ExtractionError::Timeout(e.to_string())
            } else {
                ExtractionError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ExtractionError::UpstreamError(format!(
                "Status {}: {}",
                status, error_text
            )));
        }

        // Malformed structured output is an extraction failure, not a panic
        response
            .json()
            .await
            .map_err(|e| ExtractionError::InvalidResponse(e.to_string()))
    }

    fn calculate_backoff(&self, attempt: usize) -> Duration {
        let base = self.config.retry_backoff();
        let multiplier = 2_u32.saturating_pow(attempt.saturating_sub(1) as u32);
        base.saturating_mul(multiplier)
    }
}
