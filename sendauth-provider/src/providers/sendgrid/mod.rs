//! SendGrid authenticated-domain client

mod error;
mod http;
mod provider;
mod types;

use crate::error::Result;
use crate::http_client::ApiTransport;

pub(crate) use types::SendgridErrorBody;

/// Production API root.
pub const SENDGRID_API_BASE: &str = "https://api.sendgrid.com";
/// Authenticated-domain resource path.
pub(crate) const DOMAINS_PATH: &str = "/v3/whitelabel/domains";

/// SendGrid client for the authenticated-domain ("whitelabel") API.
pub struct SendgridProvider {
    pub(crate) http: ApiTransport,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
}

impl SendgridProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: ApiTransport::new("sendgrid")?,
            api_key: api_key.into(),
            base_url: SENDGRID_API_BASE.to_string(),
        })
    }

    /// Point the client at a different API root (test servers, proxies).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Retry transient failures up to `max_retries` times.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.http.set_max_retries(max_retries);
        self
    }
}

impl std::fmt::Debug for SendgridProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendgridProvider")
            .field("api_key", &crate::utils::log_sanitizer::mask_secret(&self.api_key))
            .field("base_url", &self.base_url)
            .field("max_retries", &self.http.max_retries())
            .finish_non_exhaustive()
    }
}
