//! Command-line definition and conversion into run settings

use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use clap::Parser;
use sendauth_core::config::DEFAULT_A_RECORD;
use sendauth_core::{Config, CoreError, CoreResult, ValidationPolicy};
use sendauth_provider::AzureCredential;

#[derive(Parser, Debug)]
#[command(name = "sendauth")]
#[command(about = "Register a SendGrid sending domain and publish its DNS records in Azure DNS")]
#[command(version)]
pub struct Cli {
    /// Domain to authenticate (e.g., mail.example.com)
    pub domain_name: String,

    /// Azure subscription holding the DNS zone
    #[arg(long, env = "SUBSCRIPTION_ID")]
    pub subscription_id: Option<String>,

    /// Resource group holding the DNS zone
    #[arg(long, env = "RESOURCE_GROUP")]
    pub resource_group: Option<String>,

    /// SendGrid API key
    #[arg(long, env = "SENDGRID_API_KEY", hide_env_values = true)]
    pub sendgrid_api_key: Option<String>,

    /// Pre-issued Azure Resource Manager bearer token
    #[arg(long, env = "AZURE_ACCESS_TOKEN", hide_env_values = true)]
    pub azure_access_token: Option<String>,

    /// Service principal tenant
    #[arg(long, env = "AZURE_TENANT_ID")]
    pub azure_tenant_id: Option<String>,

    /// Service principal client id, or user-assigned managed identity client id
    #[arg(long, env = "AZURE_CLIENT_ID")]
    pub azure_client_id: Option<String>,

    /// Service principal client secret
    #[arg(long, env = "AZURE_CLIENT_SECRET", hide_env_values = true)]
    pub azure_client_secret: Option<String>,

    /// IPv4 address of the A record at the domain
    #[arg(long, default_value_t = DEFAULT_A_RECORD)]
    pub a_record: Ipv4Addr,

    /// IPv6 address of an additional AAAA record at the domain
    #[arg(long)]
    pub aaaa_record: Option<Ipv6Addr>,

    /// TTL of created record sets, in seconds
    #[arg(long, default_value_t = 3600, value_parser = clap::value_parser!(u32).range(1..))]
    pub ttl: u32,

    /// Seconds to wait before validating
    #[arg(long, default_value_t = 10)]
    pub validation_delay: u64,

    /// Validation attempts, with exponential backoff between them
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub validation_attempts: u32,

    /// Retries for transient HTTP failures (network errors, timeouts, HTTP 429)
    #[arg(long, default_value_t = 0)]
    pub max_retries: u32,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Run configuration; missing required values are configuration errors.
    pub fn config(&self) -> CoreResult<Config> {
        let mut config = Config::new(
            self.subscription_id.clone(),
            self.resource_group.clone(),
            self.sendgrid_api_key.clone(),
        )?;
        config.a_record = self.a_record;
        config.aaaa_record = self.aaaa_record;
        config.ttl = self.ttl;
        config.validation = ValidationPolicy {
            delay: Duration::from_secs(self.validation_delay),
            attempts: self.validation_attempts,
        };
        config.max_retries = self.max_retries;
        config.validate()?;
        Ok(config)
    }

    /// Azure credential: static token, then service principal, then managed identity.
    pub fn azure_credential(&self) -> CoreResult<AzureCredential> {
        if let Some(token) = non_blank(self.azure_access_token.as_ref()) {
            return Ok(AzureCredential::AccessToken(token));
        }

        let tenant = non_blank(self.azure_tenant_id.as_ref());
        let client_id = non_blank(self.azure_client_id.as_ref());
        let secret = non_blank(self.azure_client_secret.as_ref());

        match (tenant, client_id, secret) {
            (Some(tenant_id), Some(client_id), Some(client_secret)) => {
                Ok(AzureCredential::ServicePrincipal {
                    tenant_id,
                    client_id,
                    client_secret,
                })
            }
            (None, client_id, None) => Ok(AzureCredential::ManagedIdentity { client_id }),
            _ => Err(CoreError::Configuration(
                "AZURE_TENANT_ID, AZURE_CLIENT_ID and AZURE_CLIENT_SECRET must be set together"
                    .to_string(),
            )),
        }
    }
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
