//! Provisioning services

mod provisioning;
mod reconciler;

pub use provisioning::{
    MX_PREFERENCE, PlannedRecord, ProvisionReport, ProvisioningService, RecordOutcome,
    RecordReport, SENDGRID_MX_EXCHANGE, plan_records,
};
pub use reconciler::{EnsureOutcome, RecordReconciler};
