//! Shared test helpers

#![allow(dead_code)]

use sendauth_provider::{AzureCredential, AzureDnsProvider, SendgridProvider, ZoneReference};
use wiremock::MockServer;

/// Skip a test when any of the listed environment variables is missing.
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("skipping: environment variable {} not set", $var);
                return;
            }
        )+
    };
}

/// Assert a `Result` is `Ok` and unwrap it (fails the test otherwise).
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// Assert an `Option` is `Some` and unwrap it (fails the test otherwise).
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

pub const TEST_API_KEY: &str = "SG.test-key";
pub const TEST_TOKEN: &str = "test-bearer-token";
pub const SUBSCRIPTION: &str = "00000000-0000-0000-0000-000000000000";
pub const RESOURCE_GROUP: &str = "dns-rg";
pub const ZONE: &str = "example.com";

/// SendGrid client pointed at the mock server.
pub fn sendgrid_client(server: &MockServer) -> SendgridProvider {
    SendgridProvider::new(TEST_API_KEY)
        .map(|p| p.with_base_url(server.uri()))
        .unwrap_or_else(|e| panic!("client construction failed: {e}"))
}

/// Azure client with a static token, pointed at the mock server.
pub fn azure_client(server: &MockServer) -> AzureDnsProvider {
    azure_client_with(server, AzureCredential::AccessToken(TEST_TOKEN.to_string()))
}

/// Azure client with the given credential; every endpoint points at the mock server.
pub fn azure_client_with(server: &MockServer, credential: AzureCredential) -> AzureDnsProvider {
    AzureDnsProvider::new(credential)
        .map(|p| {
            p.with_management_url(server.uri())
                .with_login_url(server.uri())
                .with_imds_url(format!("{}/metadata/identity/oauth2/token", server.uri()))
        })
        .unwrap_or_else(|e| panic!("client construction failed: {e}"))
}

pub fn zone_ref() -> ZoneReference {
    ZoneReference::new(SUBSCRIPTION, RESOURCE_GROUP, ZONE)
}

/// ARM path of the test zone.
pub fn zone_path() -> String {
    format!(
        "/subscriptions/{SUBSCRIPTION}/resourceGroups/{RESOURCE_GROUP}/providers/Microsoft.Network/dnsZones/{ZONE}"
    )
}

/// ARM path of a record set in the test zone.
pub fn record_set_path(record_type: &str, name: &str) -> String {
    format!("{}/{record_type}/{name}", zone_path())
}
