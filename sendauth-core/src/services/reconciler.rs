//! Create-if-absent record sets

use std::sync::Arc;

use serde::Serialize;

use sendauth_provider::{CreateRecordSetRequest, DnsZoneProvider, RecordData, ZoneReference};
use sendauth_provider::log_sanitizer::truncate_for_log;

use crate::error::{CoreError, CoreResult};

/// What [`RecordReconciler::ensure_record`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EnsureOutcome {
    /// A record set with the same name and type was already there; left untouched.
    AlreadyExists,
    /// The record set was created.
    Created,
}

/// Ensures record sets exist without ever modifying existing ones.
pub struct RecordReconciler {
    dns: Arc<dyn DnsZoneProvider>,
}

impl RecordReconciler {
    #[must_use]
    pub fn new(dns: Arc<dyn DnsZoneProvider>) -> Self {
        Self { dns }
    }

    /// Make sure a record set of `data`'s type exists at `name`.
    ///
    /// An existing set is never compared or overwritten, whatever its values.
    /// Lookup failures come back as [`CoreError::Provider`]; a refused create as
    /// [`CoreError::RecordConflictOrPermission`].
    pub async fn ensure_record(
        &self,
        zone: &ZoneReference,
        name: &str,
        ttl: u32,
        data: RecordData,
    ) -> CoreResult<EnsureOutcome> {
        let record_type = data.record_type();

        if self
            .dns
            .get_record_set(zone, record_type, name)
            .await?
            .is_some()
        {
            log::info!("{record_type} record '{name}' already exists in {zone}, leaving it as is");
            return Ok(EnsureOutcome::AlreadyExists);
        }

        log::info!(
            "Creating {record_type} record '{name}' in {zone}: {}",
            truncate_for_log(&data.display_value())
        );

        let req = CreateRecordSetRequest {
            name: name.to_string(),
            ttl,
            data,
        };

        match self.dns.create_record_set(zone, &req).await {
            Ok(_) => Ok(EnsureOutcome::Created),
            Err(e) => Err(CoreError::RecordConflictOrPermission {
                name: name.to_string(),
                record_type,
                reason: e.to_string(),
            }),
        }
    }
}
