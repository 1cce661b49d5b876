//! Azure access-token acquisition and caching

use std::time::{Duration, Instant};

use reqwest::Method;
use serde::Deserialize;

use crate::error::{ProviderError, Result};
use crate::http_client::parse_json;
use crate::traits::ProviderErrorMapper;
use crate::utils::log_sanitizer::{mask_secret, truncate_for_log};

use super::AzureDnsProvider;

/// Resource the tokens are requested for.
const MANAGEMENT_RESOURCE: &str = "https://management.azure.com/";
/// Scope form of [`MANAGEMENT_RESOURCE`] for the v2.0 token endpoint.
const MANAGEMENT_SCOPE: &str = "https://management.azure.com/.default";
/// Tokens are refreshed this long before they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);
/// Assumed lifetime when the token endpoint does not report one.
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// How the client authenticates against Azure Resource Manager.
#[derive(Clone)]
pub enum AzureCredential {
    /// Managed identity through the Instance Metadata Service.
    ManagedIdentity {
        /// Client id of a user-assigned identity; `None` for the system-assigned one.
        client_id: Option<String>,
    },
    /// Service principal with a client secret (client-credentials grant).
    ServicePrincipal {
        tenant_id: String,
        client_id: String,
        client_secret: String,
    },
    /// A bearer token obtained elsewhere (e.g. `az account get-access-token`).
    AccessToken(String),
}

impl AzureCredential {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ManagedIdentity { .. } => "managed identity",
            Self::ServicePrincipal { .. } => "service principal",
            Self::AccessToken(_) => "access token",
        }
    }
}

impl std::fmt::Debug for AzureCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ManagedIdentity { client_id } => f
                .debug_struct("ManagedIdentity")
                .field("client_id", client_id)
                .finish(),
            Self::ServicePrincipal {
                tenant_id,
                client_id,
                client_secret,
            } => f
                .debug_struct("ServicePrincipal")
                .field("tenant_id", tenant_id)
                .field("client_id", client_id)
                .field("client_secret", &mask_secret(client_secret))
                .finish(),
            Self::AccessToken(token) => f
                .debug_tuple("AccessToken")
                .field(&mask_secret(token))
                .finish(),
        }
    }
}

/// Bearer token with its refresh deadline.
#[derive(Clone)]
pub(crate) struct CachedToken {
    pub value: String,
    pub refresh_at: Option<Instant>,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        self.refresh_at.is_none_or(|at| Instant::now() < at)
    }
}

/// Token endpoint response. IMDS reports `expires_in` as a string, Entra ID as a number.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<serde_json::Value>,
}

impl TokenResponse {
    fn lifetime(&self) -> Duration {
        let secs = match &self.expires_in {
            Some(serde_json::Value::Number(n)) => n.as_u64(),
            Some(serde_json::Value::String(s)) => s.parse().ok(),
            _ => None,
        };
        secs.map_or(DEFAULT_TOKEN_LIFETIME, Duration::from_secs)
    }
}

/// Entra ID error body (`{"error": "...", "error_description": "..."}`).
#[derive(Debug, Default, Deserialize)]
struct TokenErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl AzureDnsProvider {
    /// Current bearer token, fetching a new one when the cache is empty or stale.
    pub(crate) async fn access_token(&self) -> Result<String> {
        {
            let cached = self.token.read().await;
            if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
                return Ok(token.value.clone());
            }
        }

        let mut slot = self.token.write().await;
        // Another task may have refreshed while we waited for the lock
        if let Some(token) = slot.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.value.clone());
        }

        let token = self.fetch_token().await?;
        let value = token.value.clone();
        *slot = Some(token);
        Ok(value)
    }

    async fn fetch_token(&self) -> Result<CachedToken> {
        log::debug!("[azure] Acquiring token via {}", self.credential.kind());

        let (request, url) = match &self.credential {
            AzureCredential::AccessToken(token) => {
                return Ok(CachedToken {
                    value: token.clone(),
                    refresh_at: None,
                });
            }
            AzureCredential::ManagedIdentity { client_id } => {
                let mut query = vec![
                    ("api-version", "2018-02-01"),
                    ("resource", MANAGEMENT_RESOURCE),
                ];
                if let Some(id) = client_id {
                    query.push(("client_id", id.as_str()));
                }
                let request = self
                    .http
                    .request(Method::GET, &self.imds_url)
                    .header("Metadata", "true")
                    .query(&query);
                (request, self.imds_url.clone())
            }
            AzureCredential::ServicePrincipal {
                tenant_id,
                client_id,
                client_secret,
            } => {
                let url = format!(
                    "{}/{}/oauth2/v2.0/token",
                    self.login_url,
                    urlencoding::encode(tenant_id)
                );
                let form = [
                    ("grant_type", "client_credentials"),
                    ("client_id", client_id.as_str()),
                    ("client_secret", client_secret.as_str()),
                    ("scope", MANAGEMENT_SCOPE),
                ];
                (self.http.request(Method::POST, &url).form(&form), url)
            }
        };

        let response = self.http.send(request, &format!("TOKEN {url}")).await?;
        let (status, body) = (response.status, response.body);

        if status != 200 {
            let parsed: TokenErrorBody = serde_json::from_str(&body).unwrap_or_default();
            let message = parsed
                .error_description
                .or(parsed.error)
                .unwrap_or_else(|| truncate_for_log(&body));
            log::warn!("[azure] Token request refused (HTTP {status})");
            return Err(ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(format!("token request failed with HTTP {status}: {message}")),
            });
        }

        let token: TokenResponse = parse_json(&body, self.provider_name())?;
        let lifetime = token.lifetime();
        log::debug!("[azure] Token acquired, valid for {}s", lifetime.as_secs());

        Ok(CachedToken {
            refresh_at: Some(Instant::now() + lifetime.saturating_sub(EXPIRY_MARGIN)),
            value: token.access_token,
        })
    }
}
