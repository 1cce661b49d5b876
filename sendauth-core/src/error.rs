//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

use sendauth_provider::RecordType;

// Re-export library error type
pub use sendauth_provider::ProviderError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// The input is not a syntactically valid domain name
    #[error("Incorrect domain name: {0}")]
    InvalidDomain(String),

    /// A required setting is missing or malformed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The DNS zone to publish into does not exist
    #[error("DNS zone not found: {0}")]
    ZoneNotFound(String),

    /// A record set could not be created (conflict, permission, transport)
    #[error("Failed to create {record_type} record '{name}': {reason}")]
    RecordConflictOrPermission {
        name: String,
        record_type: RecordType,
        reason: String,
    },

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::InvalidDomain(_)
            | Self::Configuration(_)
            | Self::ZoneNotFound(_)
            | Self::RecordConflictOrPermission { .. } => true,
            Self::Provider(e) => e.is_expected(),
        }
    }

    /// Whether the failure stems from refused credentials or missing permissions.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Provider(e) if e.is_auth_failure())
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
