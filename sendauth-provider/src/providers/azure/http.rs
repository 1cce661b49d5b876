//! Azure Resource Manager HTTP request methods

use reqwest::Method;

use crate::error::{ProviderError, Result};
use crate::http_client::ApiResponse;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::types::{RecordType, ZoneReference};
use crate::utils::log_sanitizer::truncate_for_log;

use super::types::record_type_segment;
use super::{AzureDnsProvider, AzureErrorBody, DNS_API_VERSION};

impl AzureDnsProvider {
    /// `.../dnsZones/{zone}` under the zone's subscription and resource group.
    fn zone_path(&self, zone: &ZoneReference) -> String {
        format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/dnsZones/{}",
            self.management_url,
            urlencoding::encode(&zone.subscription_id),
            urlencoding::encode(&zone.resource_group),
            zone.zone_name,
        )
    }

    pub(crate) fn zone_url(&self, zone: &ZoneReference) -> String {
        format!("{}?api-version={DNS_API_VERSION}", self.zone_path(zone))
    }

    pub(crate) fn record_set_url(
        &self,
        zone: &ZoneReference,
        record_type: RecordType,
        name: &str,
    ) -> String {
        format!(
            "{}/{}/{}?api-version={DNS_API_VERSION}",
            self.zone_path(zone),
            record_type_segment(record_type),
            name,
        )
    }

    /// Send an authenticated ARM request; the caller judges the status.
    ///
    /// `create_only` adds `If-None-Match: *` so an existing resource is never overwritten.
    pub(crate) async fn arm_request(
        &self,
        method: Method,
        url: &str,
        body: Option<String>,
        create_only: bool,
    ) -> Result<ApiResponse> {
        let token = self.access_token().await?;

        let label = format!("{method} {url}");
        let mut request = self.http.request(method, url).bearer_auth(token);
        if create_only {
            request = request.header("If-None-Match", "*");
        }
        if let Some(body) = body {
            log::debug!("[azure] Request Body: {}", truncate_for_log(&body));
            request = request
                .header("Content-Type", "application/json")
                .body(body);
        }

        self.http.send(request, &label).await
    }

    /// Turn a non-accepted response into a mapped error.
    pub(crate) fn api_error(&self, status: u16, body: &str, context: ErrorContext) -> ProviderError {
        let parsed: AzureErrorBody = serde_json::from_str(body).unwrap_or_default();
        log::debug!("[azure] API error (HTTP {status}): {}", truncate_for_log(body));

        let raw = match parsed.error {
            Some(detail) if !detail.code.is_empty() => {
                RawApiError::with_code(status, detail.code, detail.message)
            }
            Some(detail) => RawApiError::new(status, detail.message),
            None => RawApiError::new(status, truncate_for_log(body)),
        };
        self.map_error(raw, context)
    }
}
