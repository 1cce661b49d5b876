//! sendauth core library
//!
//! Provisioning logic for email sender authentication:
//! - Domain checks and zone splitting ([`ParsedDomain`])
//! - Run configuration ([`Config`], [`ValidationPolicy`])
//! - Create-if-absent DNS records ([`RecordReconciler`])
//! - The end-to-end procedure ([`ProvisioningService`])
//!
//! Remote APIs are reached only through the `sendauth-provider` traits, so the
//! services run unchanged against in-memory mocks.

pub mod config;
pub mod domain;
pub mod error;
pub mod services;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::{Config, ValidationPolicy};
pub use domain::ParsedDomain;
pub use error::{CoreError, CoreResult};
pub use services::{
    EnsureOutcome, ProvisionReport, ProvisioningService, RecordOutcome, RecordReconciler,
    RecordReport,
};
