//! HTTP transport shared by the SendGrid and Azure clients
//!
//! Every client owns one [`ApiTransport`]. Clients build their own requests
//! (auth headers, query strings, conditional headers) and hand them to
//! [`ApiTransport::send`], which turns gateway failures and rate limiting into
//! errors and, when enabled, sends them again. Judging the remaining statuses is
//! left to the client, since "success" differs per operation (200 vs 201).

use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::utils::log_sanitizer::truncate_for_log;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// First backoff step; doubles per attempt.
const BASE_BACKOFF: Duration = Duration::from_millis(100);
const MAX_BACKOFF: Duration = Duration::from_secs(10);
/// Longest `Retry-After` honored, in seconds.
const MAX_RETRY_AFTER_SECS: u64 = 30;

/// Status code and body of a response that got past the transient-failure checks.
#[derive(Debug)]
pub(crate) struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn json<T: DeserializeOwned>(&self, provider: &str) -> Result<T> {
        parse_json(&self.body, provider)
    }
}

/// One provider's HTTP client plus its retry setting.
pub(crate) struct ApiTransport {
    client: Client,
    provider: &'static str,
    max_retries: u32,
}

impl ApiTransport {
    /// Client with bounded connect/request timeouts; sends each request once.
    pub fn new(provider: &'static str) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("sendauth/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::NetworkError {
                provider: provider.to_string(),
                detail: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            provider,
            max_retries: 0,
        })
    }

    pub fn set_max_retries(&mut self, max_retries: u32) {
        self.max_retries = max_retries;
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Send `request`, retrying network errors, timeouts and HTTP 429 up to
    /// `max_retries` times.
    ///
    /// `label` names the call in logs (`"GET https://..."`). A request whose body
    /// cannot be cloned is sent once.
    pub async fn send(&self, request: RequestBuilder, label: &str) -> Result<ApiResponse> {
        let mut request = request;
        let mut attempt = 0;

        loop {
            let spare = if attempt < self.max_retries {
                request.try_clone()
            } else {
                None
            };

            let err = match self.send_once(request, label).await {
                Ok(response) => return Ok(response),
                Err(e) => e,
            };

            let (Some(next), Some(delay)) = (spare, next_delay(&err, attempt)) else {
                return Err(err);
            };

            log::warn!(
                "[{}] {label} failed (attempt {}/{}), retrying in {:.1}s: {err}",
                self.provider,
                attempt + 1,
                self.max_retries + 1,
                delay.as_secs_f32()
            );
            tokio::time::sleep(delay).await;
            request = next;
            attempt += 1;
        }
    }

    async fn send_once(&self, request: RequestBuilder, label: &str) -> Result<ApiResponse> {
        let provider = self.provider;
        log::debug!("[{provider}] {label}");

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(provider, &e))?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError {
                provider: provider.to_string(),
                detail: format!("Failed to read response body: {e}"),
            })?;
        log::debug!(
            "[{provider}] {label} -> HTTP {status}: {}",
            truncate_for_log(&body)
        );

        if let Some(err) = transient_status(provider, status, retry_after, &body) {
            log::warn!("[{provider}] {label} -> HTTP {status}");
            return Err(err);
        }

        Ok(ApiResponse { status, body })
    }
}

/// Parse a JSON body into `T`, logging the raw text when it does not fit.
pub(crate) fn parse_json<T: DeserializeOwned>(body: &str, provider: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        log::error!(
            "[{provider}] Unparseable response ({e}): {}",
            truncate_for_log(body)
        );
        ProviderError::ParseError {
            provider: provider.to_string(),
            detail: e.to_string(),
        }
    })
}

fn transport_error(provider: &str, e: &reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout {
            provider: provider.to_string(),
            detail: e.to_string(),
        }
    } else {
        ProviderError::NetworkError {
            provider: provider.to_string(),
            detail: e.to_string(),
        }
    }
}

/// Statuses no operation accepts: rate limiting and gateway failures.
fn transient_status(
    provider: &str,
    status: u16,
    retry_after: Option<u64>,
    body: &str,
) -> Option<ProviderError> {
    match status {
        429 => Some(ProviderError::RateLimited {
            provider: provider.to_string(),
            retry_after,
            raw_message: (!body.is_empty()).then(|| truncate_for_log(body)),
        }),
        502..=504 => Some(ProviderError::NetworkError {
            provider: provider.to_string(),
            detail: format!("HTTP {status}: {}", truncate_for_log(body)),
        }),
        _ => None,
    }
}

/// Wait before attempt `attempt + 1`, or `None` when `error` is final.
fn next_delay(error: &ProviderError, attempt: u32) -> Option<Duration> {
    match error {
        ProviderError::RateLimited {
            retry_after: Some(secs),
            ..
        } => Some(Duration::from_secs((*secs).min(MAX_RETRY_AFTER_SECS))),
        ProviderError::RateLimited { .. }
        | ProviderError::NetworkError { .. }
        | ProviderError::Timeout { .. } => Some(backoff(attempt)),
        _ => None,
    }
}

fn backoff(attempt: u32) -> Duration {
    BASE_BACKOFF
        .checked_mul(2_u32.saturating_pow(attempt))
        .map_or(MAX_BACKOFF, |d| d.min(MAX_BACKOFF))
}
