use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{
    CreateRecordSetRequest, DnsZone, DomainAuthRecord, DomainQuery, DomainSummary,
    DomainValidation, NewDomainRequest, RecordSet, RecordType, ZoneReference,
};

/// Raw API error as returned by a remote API, before mapping (internal).
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// HTTP status of the response.
    pub status: u16,
    /// Provider error code, when the body carries one.
    pub code: Option<String>,
    /// Raw error message.
    pub message: String,
}

impl RawApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// Extra context used while mapping an error (internal).
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// Relative record set name (for `RecordExists`, `RecordNotFound`).
    pub record_name: Option<String>,
    /// Zone name (for `ZoneNotFound`).
    pub zone: Option<String>,
    /// Domain name or id (for `DomainNotFound`).
    pub domain: Option<String>,
}

/// Maps raw API errors onto [`ProviderError`] (internal).
pub(crate) trait ProviderErrorMapper {
    /// Provider identifier used in error messages.
    fn provider_name(&self) -> &'static str;

    /// Map a raw API error to the unified error type.
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// Shortcut: serialization failure of a request body.
    fn serialization_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::SerializationError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// Shortcut: status the operation does not accept (fallback).
    fn unexpected_status(&self, raw: RawApiError) -> ProviderError {
        ProviderError::UnexpectedStatus {
            provider: self.provider_name().to_string(),
            status: raw.status,
            raw_message: raw.message,
        }
    }
}

/// Email-sending provider's authenticated-domain API.
#[async_trait]
pub trait EmailDomainRegistry: Send + Sync {
    /// Provider identifier.
    fn id(&self) -> &'static str;

    /// One page of authenticated domains matching the query.
    async fn list_domains(&self, query: &DomainQuery) -> Result<Vec<DomainSummary>>;

    /// Register a new authenticated domain. Succeeds only on HTTP 201.
    async fn create_domain(&self, req: &NewDomainRequest) -> Result<DomainSummary>;

    /// Full record of an authenticated domain, including its DNS requirements.
    async fn get_domain(&self, id: u64) -> Result<DomainAuthRecord>;

    /// Ask the provider to check the domain's DNS records now.
    async fn validate_domain(&self, id: u64) -> Result<DomainValidation>;

    /// Scan the list pages for an exact match of `domain`.
    ///
    /// Names are compared byte for byte; callers pass the normalized form.
    ///
    /// Pages are requested with a limit of [`DomainQuery::DEFAULT_LIMIT`] and
    /// increasing offset. The scan stops at the first match, on an empty page, or
    /// on a page shorter than the limit.
    async fn find_domain(&self, domain: &str) -> Result<Option<DomainSummary>> {
        let mut query = DomainQuery::first_page(domain);

        loop {
            let page = self.list_domains(&query).await?;
            log::debug!(
                "[{}] Domain page offset={} returned {} entries",
                self.id(),
                query.offset,
                page.len()
            );

            if let Some(found) = page.iter().find(|d| d.domain == domain) {
                return Ok(Some(found.clone()));
            }

            if page.len() < query.limit as usize {
                return Ok(None);
            }

            query = query.next_page();
        }
    }
}

/// DNS zone hosting API.
#[async_trait]
pub trait DnsZoneProvider: Send + Sync {
    /// Provider identifier.
    fn id(&self) -> &'static str;

    /// The zone, or `None` when it does not exist.
    async fn get_zone(&self, zone: &ZoneReference) -> Result<Option<DnsZone>>;

    /// The record set of `record_type` at `name`, or `None` when it does not exist.
    ///
    /// `name` is relative to the zone (`"@"` for the apex).
    async fn get_record_set(
        &self,
        zone: &ZoneReference,
        record_type: RecordType,
        name: &str,
    ) -> Result<Option<RecordSet>>;

    /// Create a record set holding one value.
    ///
    /// Never overwrites: an existing set with the same name and type yields
    /// [`ProviderError::RecordExists`].
    async fn create_record_set(
        &self,
        zone: &ZoneReference,
        req: &CreateRecordSetRequest,
    ) -> Result<RecordSet>;
}
