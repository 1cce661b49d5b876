//! # sendauth-provider
//!
//! API clients for the two remote systems involved in authenticating an email
//! sending domain: the email provider that issues the DNS requirements, and the
//! DNS host that publishes them.
//!
//! ## Supported APIs
//!
//! | Trait | Client | Auth Method |
//! |-------|--------|-------------|
//! | [`EmailDomainRegistry`] | [`SendgridProvider`] | Bearer API key |
//! | [`DnsZoneProvider`] | [`AzureDnsProvider`] | Managed identity, service principal or static bearer token |
//!
//! ## Feature Flags
//!
//! - **`rustls`** *(default)*: Use rustls.
//! - **`native-tls`**: Use the platform's native TLS implementation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sendauth_provider::{
//!     AzureCredential, AzureDnsProvider, DnsZoneProvider, EmailDomainRegistry,
//!     SendgridProvider, ZoneReference,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sendgrid = SendgridProvider::new("SG.your-key")?;
//!     let azure = AzureDnsProvider::new(AzureCredential::ManagedIdentity { client_id: None })?;
//!
//!     let zone = ZoneReference::new("subscription-id", "dns-rg", "example.com");
//!     if azure.get_zone(&zone).await?.is_none() {
//!         return Err("zone missing".into());
//!     }
//!
//!     if let Some(found) = sendgrid.find_domain("mail.example.com").await? {
//!         let detail = sendgrid.get_domain(found.id).await?;
//!         println!("DKIM host: {}", detail.dns.dkim.host);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError):
//!
//! - [`ProviderError::InvalidCredentials`]: authentication failed
//! - [`ProviderError::PermissionDenied`]: principal lacks the needed role or scope
//! - [`ProviderError::RecordExists`]: create-only write hit an existing record set
//! - [`ProviderError::UnexpectedStatus`]: any status the operation does not accept
//!
//! Transient errors (`NetworkError`, `Timeout`, `RateLimited`) are retried with
//! exponential backoff only when a client is built `with_max_retries(n)`.

mod error;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export public traits only (error mapping stays internal)
pub use traits::{DnsZoneProvider, EmailDomainRegistry};

// Re-export types
pub use types::{
    CreateRecordSetRequest, DnsRequirement, DnsRequirements, DnsZone, DomainAuthRecord,
    DomainQuery, DomainSummary, DomainValidation, NewDomainRequest, RecordData, RecordSet,
    RecordType, RecordValidation, ZoneReference,
};

// Re-export helpers
pub use providers::common;
pub use utils::log_sanitizer;

// Re-export concrete clients
pub use providers::{
    AZURE_IMDS_TOKEN_ENDPOINT, AZURE_LOGIN_BASE, AZURE_MANAGEMENT_BASE, AzureCredential,
    AzureDnsProvider, SENDGRID_API_BASE, SendgridProvider,
};
