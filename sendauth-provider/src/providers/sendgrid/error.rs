//! SendGrid error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::SendgridProvider;

/// SendGrid reports errors through the HTTP status; the body only carries
/// `{"errors":[{"field", "message"}]}` for diagnostics.
/// Reference: <https://www.twilio.com/docs/sendgrid/api-reference/how-to-use-the-sendgrid-v3-api/responses>
impl ProviderErrorMapper for SendgridProvider {
    fn provider_name(&self) -> &'static str {
        "sendgrid"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.status {
            401 => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // API key lacks the whitelabel scopes
            403 => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            404 => ProviderError::DomainNotFound {
                provider: self.provider_name().to_string(),
                domain: context.domain.unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            },

            400 => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: raw.code.unwrap_or_else(|| "request".to_string()),
                detail: raw.message,
            },

            // Other error fallback
            _ => self.unexpected_status(raw),
        }
    }
}
