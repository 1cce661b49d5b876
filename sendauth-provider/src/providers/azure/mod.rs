//! Azure DNS record-set client

mod auth;
mod error;
mod http;
mod provider;
mod types;

use tokio::sync::RwLock;

use crate::error::Result;
use crate::http_client::ApiTransport;

pub use auth::AzureCredential;
pub(crate) use auth::CachedToken;
pub(crate) use types::{AzureErrorBody, AzureRecordSet, AzureZone};

/// Azure Resource Manager root.
pub const AZURE_MANAGEMENT_BASE: &str = "https://management.azure.com";
/// Entra ID (Azure AD) token authority root.
pub const AZURE_LOGIN_BASE: &str = "https://login.microsoftonline.com";
/// Instance Metadata Service token endpoint for managed identities.
pub const AZURE_IMDS_TOKEN_ENDPOINT: &str =
    "http://169.254.169.254/metadata/identity/oauth2/token";
/// DNS resource provider API version.
pub(crate) const DNS_API_VERSION: &str = "2018-05-01";

/// Azure DNS client scoped to ARM record-set operations.
pub struct AzureDnsProvider {
    pub(crate) http: ApiTransport,
    pub(crate) credential: AzureCredential,
    pub(crate) token: RwLock<Option<CachedToken>>,
    pub(crate) management_url: String,
    pub(crate) login_url: String,
    pub(crate) imds_url: String,
}

impl AzureDnsProvider {
    pub fn new(credential: AzureCredential) -> Result<Self> {
        Ok(Self {
            http: ApiTransport::new("azure")?,
            credential,
            token: RwLock::new(None),
            management_url: AZURE_MANAGEMENT_BASE.to_string(),
            login_url: AZURE_LOGIN_BASE.to_string(),
            imds_url: AZURE_IMDS_TOKEN_ENDPOINT.to_string(),
        })
    }

    /// Point the ARM calls at a different root.
    #[must_use]
    pub fn with_management_url(mut self, url: impl Into<String>) -> Self {
        self.management_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Point service-principal token requests at a different authority.
    #[must_use]
    pub fn with_login_url(mut self, url: impl Into<String>) -> Self {
        self.login_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Point managed-identity token requests at a different endpoint.
    #[must_use]
    pub fn with_imds_url(mut self, url: impl Into<String>) -> Self {
        self.imds_url = url.into();
        self
    }

    /// Retry transient failures up to `max_retries` times.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.http.set_max_retries(max_retries);
        self
    }
}

impl std::fmt::Debug for AzureDnsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureDnsProvider")
            .field("credential", &self.credential)
            .field("management_url", &self.management_url)
            .field("max_retries", &self.http.max_retries())
            .finish_non_exhaustive()
    }
}
