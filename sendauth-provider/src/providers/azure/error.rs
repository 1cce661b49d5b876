//! Azure Resource Manager error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::AzureDnsProvider;

/// ARM error code mapping, falling back to the HTTP status.
/// Reference: <https://learn.microsoft.com/en-us/azure/azure-resource-manager/troubleshooting/common-deployment-errors>
impl ProviderErrorMapper for AzureDnsProvider {
    fn provider_name(&self) -> &'static str {
        "azure"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let zone = || context.zone.clone().unwrap_or_else(|| "<unknown>".to_string());
        let record_name = || {
            context
                .record_name
                .clone()
                .unwrap_or_else(|| "<unknown>".to_string())
        };

        match raw.code.as_deref() {
            Some(
                "AuthenticationFailed"
                | "InvalidAuthenticationToken"
                | "ExpiredAuthenticationToken"
                | "InvalidAuthenticationTokenTenant",
            ) => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            Some("AuthorizationFailed" | "LinkedAuthorizationFailed") => {
                ProviderError::PermissionDenied {
                    provider: self.provider_name().to_string(),
                    raw_message: Some(raw.message),
                }
            }

            // The zone (or something above it) is missing
            Some("ParentResourceNotFound" | "ResourceGroupNotFound" | "SubscriptionNotFound") => {
                ProviderError::ZoneNotFound {
                    provider: self.provider_name().to_string(),
                    zone: zone(),
                    raw_message: Some(raw.message),
                }
            }

            Some("ResourceNotFound" | "NotFound") if context.record_name.is_some() => {
                ProviderError::RecordNotFound {
                    provider: self.provider_name().to_string(),
                    record_name: record_name(),
                    raw_message: Some(raw.message),
                }
            }

            Some("ResourceNotFound" | "NotFound") => ProviderError::ZoneNotFound {
                provider: self.provider_name().to_string(),
                zone: zone(),
                raw_message: Some(raw.message),
            },

            // If-None-Match: * rejected an existing set
            Some("PreconditionFailed" | "Conflict") => ProviderError::RecordExists {
                provider: self.provider_name().to_string(),
                record_name: record_name(),
                raw_message: Some(raw.message),
            },

            Some("BadRequest" | "InvalidRequestContent" | "InvalidRequestFormat") => {
                ProviderError::InvalidParameter {
                    provider: self.provider_name().to_string(),
                    param: context.record_name.clone().unwrap_or_else(|| "request".to_string()),
                    detail: raw.message,
                }
            }

            _ => match raw.status {
                401 => ProviderError::InvalidCredentials {
                    provider: self.provider_name().to_string(),
                    raw_message: Some(raw.message),
                },
                403 => ProviderError::PermissionDenied {
                    provider: self.provider_name().to_string(),
                    raw_message: Some(raw.message),
                },
                409 | 412 => ProviderError::RecordExists {
                    provider: self.provider_name().to_string(),
                    record_name: record_name(),
                    raw_message: Some(raw.message),
                },
                _ => self.unexpected_status(raw),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::azure::AzureCredential;

    fn provider() -> AzureDnsProvider {
        AzureDnsProvider::new(AzureCredential::AccessToken("t".into())).unwrap()
    }

    fn ctx_zone() -> ErrorContext {
        ErrorContext {
            zone: Some("example.com".to_string()),
            ..Default::default()
        }
    }

    fn ctx_record() -> ErrorContext {
        ErrorContext {
            zone: Some("example.com".to_string()),
            record_name: Some("mail".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn authorization_failed_is_permission_denied() {
        let err = provider().map_error(
            RawApiError::with_code(403, "AuthorizationFailed", "no write access"),
            ctx_record(),
        );
        assert!(matches!(err, ProviderError::PermissionDenied { .. }), "unexpected: {err:?}");
        assert!(err.is_auth_failure());
    }

    #[test]
    fn expired_token_is_invalid_credentials() {
        let err = provider().map_error(
            RawApiError::with_code(401, "ExpiredAuthenticationToken", "expired"),
            ctx_zone(),
        );
        assert!(matches!(err, ProviderError::InvalidCredentials { .. }), "unexpected: {err:?}");
    }

    #[test]
    fn parent_missing_is_zone_not_found() {
        let err = provider().map_error(
            RawApiError::with_code(404, "ParentResourceNotFound", "zone missing"),
            ctx_record(),
        );
        assert!(
            matches!(err, ProviderError::ZoneNotFound { ref zone, .. } if zone == "example.com"),
            "unexpected: {err:?}"
        );
    }

    #[test]
    fn not_found_depends_on_context() {
        let err = provider().map_error(
            RawApiError::with_code(404, "NotFound", "gone"),
            ctx_record(),
        );
        assert!(
            matches!(err, ProviderError::RecordNotFound { ref record_name, .. } if record_name == "mail"),
            "unexpected: {err:?}"
        );

        let err = provider().map_error(RawApiError::with_code(404, "ResourceNotFound", "gone"), ctx_zone());
        assert!(matches!(err, ProviderError::ZoneNotFound { .. }), "unexpected: {err:?}");
    }

    #[test]
    fn precondition_failed_is_record_exists() {
        let err = provider().map_error(
            RawApiError::with_code(412, "PreconditionFailed", "exists"),
            ctx_record(),
        );
        assert!(matches!(err, ProviderError::RecordExists { .. }), "unexpected: {err:?}");

        // Bare 412 without an error body
        let err = provider().map_error(RawApiError::new(412, ""), ctx_record());
        assert!(matches!(err, ProviderError::RecordExists { .. }), "unexpected: {err:?}");
    }

    #[test]
    fn unmapped_status_is_unexpected() {
        let err = provider().map_error(RawApiError::new(500, "boom"), ctx_zone());
        assert!(
            matches!(err, ProviderError::UnexpectedStatus { status: 500, .. }),
            "unexpected: {err:?}"
        );
    }

    #[test]
    fn unrecognized_code_falls_back_to_status() {
        let err = provider().map_error(
            RawApiError::with_code(500, "InternalServerError", "try later"),
            ctx_record(),
        );
        assert!(
            matches!(err, ProviderError::UnexpectedStatus { status: 500, ref raw_message, .. } if raw_message == "try later"),
            "unexpected: {err:?}"
        );
    }
}
