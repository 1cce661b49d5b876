//! Remote API clients

/// Name helpers shared by the clients.
pub mod common;

mod azure;
mod sendgrid;

pub use azure::{
    AZURE_IMDS_TOKEN_ENDPOINT, AZURE_LOGIN_BASE, AZURE_MANAGEMENT_BASE, AzureCredential,
    AzureDnsProvider,
};
pub use sendgrid::{SENDGRID_API_BASE, SendgridProvider};
