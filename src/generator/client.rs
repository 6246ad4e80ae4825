use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use super::types::{CircuitRequest, RawCircuitCandidate};
use crate::config::{GeneratorConfig, RequestConfig};
use crate::error::{GeneratorError, GeneratorResult};

/// Client for the hosted circuit generator API
#[derive(Clone)]
pub struct GeneratorClient {
    client: Client,
    base_url: String,
    api_key: String,
    request_config: RequestConfig,
}

impl GeneratorClient {
    /// Create a new generator client
    pub fn new(config: &GeneratorConfig, request_config: RequestConfig) -> GeneratorResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()
            .map_err(GeneratorError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            request_config,
        })
    }

    /// Request a candidate circuit, retrying transient failures.
    ///
    /// Retries with exponential backoff up to `max_retries` times, then
    /// reports the last failure. Callers treat any error here as a
    /// generator failure and move on to regeneration or the fallback pool.
    pub async fn generate(&self, request: CircuitRequest) -> GeneratorResult<RawCircuitCandidate> {
        let url = format!("{}/v1/circuits/generate", self.base_url);

        let mut last_error = None;
        let mut retries = 0;

        while retries <= self.request_config.max_retries {
            if retries > 0 {
                let delay = Duration::from_millis(
                    self.request_config.retry_delay_ms * (2_u64.pow(retries - 1)),
                );
                warn!(
                    difficulty = %request.difficulty,
                    retry = retries,
                    delay_ms = delay.as_millis(),
                    "Retrying generator request"
                );
                tokio::time::sleep(delay).await;
            }

            let start = Instant::now();

            match self.execute_request(&url, &request).await {
                Ok(candidate) => {
                    let latency = start.elapsed();
                    info!(
                        difficulty = %request.difficulty,
                        complexity = %request.complexity_type,
                        latency_ms = latency.as_millis(),
                        "Generator call succeeded"
                    );
                    return Ok(candidate);
                }
                Err(e) => {
                    let latency = start.elapsed();
                    error!(
                        difficulty = %request.difficulty,
                        error = %e,
                        latency_ms = latency.as_millis(),
                        retry = retries,
                        "Generator call failed"
                    );
                    last_error = Some(e);
                    retries += 1;
                }
            }
        }

        Err(GeneratorError::Unavailable {
            message: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "Unknown error".to_string()),
            retries,
        })
    }

    /// Execute a single request (internal)
    async fn execute_request(
        &self,
        url: &str,
        request: &CircuitRequest,
    ) -> GeneratorResult<RawCircuitCandidate> {
        debug!(
            difficulty = %request.difficulty,
            gate_count = request.gate_count,
            "Calling circuit generator"
        );

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeneratorError::Timeout {
                        timeout_ms: self.request_config.timeout_ms,
                    }
                } else {
                    GeneratorError::Http(e)
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(GeneratorError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        let candidate: RawCircuitCandidate =
            response
                .json()
                .await
                .map_err(|e| GeneratorError::InvalidResponse {
                    message: format!("Failed to parse response: {}", e),
                })?;

        Ok(candidate)
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = GeneratorConfig {
            api_key: "test_key".to_string(),
            base_url: "https://api.circuitgen.dev/".to_string(),
        };

        let request_config = RequestConfig::default();

        let client = GeneratorClient::new(&config, request_config).unwrap();
        assert_eq!(client.base_url(), "https://api.circuitgen.dev");
    }
}
