//! Azure `DnsZoneProvider` implementation

use async_trait::async_trait;
use reqwest::Method;

use crate::error::{ProviderError, Result};
use crate::traits::{DnsZoneProvider, ErrorContext, ProviderErrorMapper};
use crate::types::{CreateRecordSetRequest, DnsZone, RecordSet, RecordType, ZoneReference};

use super::{AzureDnsProvider, AzureRecordSet, AzureZone};

#[async_trait]
impl DnsZoneProvider for AzureDnsProvider {
    fn id(&self) -> &'static str {
        "azure"
    }

    async fn get_zone(&self, zone: &ZoneReference) -> Result<Option<DnsZone>> {
        let url = self.zone_url(zone);
        let response = self.arm_request(Method::GET, &url, None, false).await?;

        match response.status {
            200 => {
                let raw: AzureZone = response.json(self.provider_name())?;
                Ok(Some(raw.into()))
            }
            // Missing zone, resource group or subscription all mean "no such zone"
            404 => {
                log::debug!("[azure] Zone {zone} not found");
                Ok(None)
            }
            status => Err(self.api_error(
                status,
                &response.body,
                ErrorContext {
                    zone: Some(zone.zone_name.clone()),
                    ..Default::default()
                },
            )),
        }
    }

    async fn get_record_set(
        &self,
        zone: &ZoneReference,
        record_type: RecordType,
        name: &str,
    ) -> Result<Option<RecordSet>> {
        let url = self.record_set_url(zone, record_type, name);
        let response = self.arm_request(Method::GET, &url, None, false).await?;
        let context = ErrorContext {
            zone: Some(zone.zone_name.clone()),
            record_name: Some(name.to_string()),
            ..Default::default()
        };

        match response.status {
            200 => {
                let raw: AzureRecordSet = response.json(self.provider_name())?;
                Ok(Some(raw.into_record_set(record_type, name)))
            }
            404 => match self.api_error(404, &response.body, context) {
                ProviderError::RecordNotFound { .. } => Ok(None),
                // An absent error code on 404 is treated as a missing record set
                ProviderError::UnexpectedStatus { .. } => Ok(None),
                other => Err(other),
            },
            status => Err(self.api_error(status, &response.body, context)),
        }
    }

    async fn create_record_set(
        &self,
        zone: &ZoneReference,
        req: &CreateRecordSetRequest,
    ) -> Result<RecordSet> {
        let record_type = req.record_type();
        let url = self.record_set_url(zone, record_type, &req.name);
        let body = serde_json::to_string(&AzureRecordSet::from_request(req))
            .map_err(|e| self.serialization_error(e))?;

        let response = self.arm_request(Method::PUT, &url, Some(body), true).await?;

        match response.status {
            200 | 201 => {
                log::info!(
                    "[azure] Created {record_type} record set '{}' in {zone}",
                    req.name
                );
                let raw: AzureRecordSet = response.json(self.provider_name())?;
                Ok(raw.into_record_set(record_type, &req.name))
            }
            status => Err(self.api_error(
                status,
                &response.body,
                ErrorContext {
                    zone: Some(zone.zone_name.clone()),
                    record_name: Some(req.name.clone()),
                    ..Default::default()
                },
            )),
        }
    }
}
