//! sendauth entry point
//!
//! Registers an authenticated sending domain with SendGrid, publishes the DNS
//! records it requires in an Azure DNS zone and triggers validation.
//!
//! Logs go to stderr; the report goes to stdout.

mod cli;
mod report;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use sendauth_core::{CoreError, CoreResult, ParsedDomain, ProvisionReport, ProvisioningService};
use sendauth_provider::{AzureDnsProvider, SendgridProvider};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("[ERROR] {e:#}");
        return ExitCode::from(report::EXIT_INTERNAL);
    }

    match run(&cli).await {
        Ok(result) => report::print_report(&result, cli.json),
        Err(e) => {
            tracing::error!("Provisioning aborted: {e}");
            report::print_error(&e, cli.json)
        }
    }
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("invalid log filter")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .try_init()
        .context("failed to install logger")
}

async fn run(cli: &Cli) -> CoreResult<ProvisionReport> {
    // Reject bad input before any credential is looked at.
    ParsedDomain::parse(&cli.domain_name)?;

    let config = cli.config()?;
    let credential = cli.azure_credential()?;
    tracing::debug!("Using {config:?}, Azure credential {}", credential.kind());

    let registry = SendgridProvider::new(config.sendgrid_api_key.clone())
        .map_err(CoreError::Provider)?
        .with_max_retries(config.max_retries);
    let dns = AzureDnsProvider::new(credential)
        .map_err(CoreError::Provider)?
        .with_max_retries(config.max_retries);

    let service = ProvisioningService::new(Arc::new(registry), Arc::new(dns), config);
    service.provision(&cli.domain_name).await
}
