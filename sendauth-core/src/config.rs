//! Run configuration

use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use serde::Serialize;

use crate::error::{CoreError, CoreResult};

/// Default A record value (loopback; mail is never delivered to the domain itself).
pub const DEFAULT_A_RECORD: Ipv4Addr = Ipv4Addr::LOCALHOST;
/// Default TTL of created record sets, in seconds.
pub const DEFAULT_TTL: u32 = 3600;
/// Default pause between publishing records and validating.
pub const DEFAULT_VALIDATION_DELAY: Duration = Duration::from_secs(10);
/// Longest wait between two validation attempts.
pub const MAX_VALIDATION_BACKOFF: Duration = Duration::from_secs(300);

/// When and how often the provider is asked to validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationPolicy {
    /// Pause before the first attempt.
    pub delay: Duration,
    /// Total number of attempts; `1` validates once.
    pub attempts: u32,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            delay: DEFAULT_VALIDATION_DELAY,
            attempts: 1,
        }
    }
}

impl ValidationPolicy {
    /// Wait before attempt `attempt + 1` after a failed attempt `attempt` (0-based).
    ///
    /// Doubles from the initial delay (at least one second), capped at
    /// [`MAX_VALIDATION_BACKOFF`].
    pub fn backoff(&self, attempt: u32) -> Duration {
        let base = self.delay.max(Duration::from_secs(1));
        let factor = 1_u32 << attempt.min(16);
        base.saturating_mul(factor).min(MAX_VALIDATION_BACKOFF)
    }
}

/// Everything a provisioning run needs besides the domain name.
#[derive(Clone, Serialize)]
pub struct Config {
    /// Azure subscription holding the DNS zone.
    pub subscription_id: String,
    /// Resource group holding the DNS zone.
    pub resource_group: String,
    /// SendGrid API key with whitelabel scopes.
    #[serde(skip)]
    pub sendgrid_api_key: String,
    /// Value of the A record at the domain.
    pub a_record: Ipv4Addr,
    /// Value of the optional AAAA record at the domain.
    pub aaaa_record: Option<Ipv6Addr>,
    /// TTL of created record sets.
    pub ttl: u32,
    /// Validation wait policy.
    pub validation: ValidationPolicy,
    /// Retry budget for transient HTTP failures (`0` = single attempt).
    pub max_retries: u32,
}

impl Config {
    /// Build a configuration from the required settings, with defaults for the rest.
    ///
    /// Missing or blank values yield [`CoreError::Configuration`].
    pub fn new(
        subscription_id: Option<String>,
        resource_group: Option<String>,
        sendgrid_api_key: Option<String>,
    ) -> CoreResult<Self> {
        let config = Self {
            subscription_id: required("SUBSCRIPTION_ID", subscription_id)?,
            resource_group: required("RESOURCE_GROUP", resource_group)?,
            sendgrid_api_key: required("SENDGRID_API_KEY", sendgrid_api_key)?,
            a_record: DEFAULT_A_RECORD,
            aaaa_record: None,
            ttl: DEFAULT_TTL,
            validation: ValidationPolicy::default(),
            max_retries: 0,
        };
        config.validate()?;
        Ok(config)
    }

    /// Re-check invariants after fields were changed.
    pub fn validate(&self) -> CoreResult<()> {
        for (name, value) in [
            ("SUBSCRIPTION_ID", &self.subscription_id),
            ("RESOURCE_GROUP", &self.resource_group),
            ("SENDGRID_API_KEY", &self.sendgrid_api_key),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::Configuration(format!("{name} is not set")));
            }
        }
        if self.ttl == 0 {
            return Err(CoreError::Configuration("TTL must be positive".to_string()));
        }
        if self.validation.attempts == 0 {
            return Err(CoreError::Configuration(
                "validation attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("subscription_id", &self.subscription_id)
            .field("resource_group", &self.resource_group)
            .field(
                "sendgrid_api_key",
                &sendauth_provider::log_sanitizer::mask_secret(&self.sendgrid_api_key),
            )
            .field("a_record", &self.a_record)
            .field("aaaa_record", &self.aaaa_record)
            .field("ttl", &self.ttl)
            .field("validation", &self.validation)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

fn required(name: &str, value: Option<String>) -> CoreResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CoreError::Configuration(format!("{name} is not set")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> CoreResult<Config> {
        Config::new(
            Some("sub-1".into()),
            Some("dns-rg".into()),
            Some("SG.key-value".into()),
        )
    }

    #[test]
    fn defaults() {
        let config = full().unwrap();
        assert_eq!(config.a_record, Ipv4Addr::new(127, 0, 0, 1));
        assert_eq!(config.aaaa_record, None);
        assert_eq!(config.ttl, 3600);
        assert_eq!(config.validation.delay, Duration::from_secs(10));
        assert_eq!(config.validation.attempts, 1);
        assert_eq!(config.max_retries, 0);
    }

    #[test]
    fn missing_values_are_configuration_errors() {
        let err = Config::new(None, Some("rg".into()), Some("key".into())).unwrap_err();
        assert!(
            matches!(err, CoreError::Configuration(ref m) if m.contains("SUBSCRIPTION_ID")),
            "unexpected: {err:?}"
        );

        let err = Config::new(Some("sub".into()), Some("  ".into()), Some("key".into())).unwrap_err();
        assert!(
            matches!(err, CoreError::Configuration(ref m) if m.contains("RESOURCE_GROUP")),
            "unexpected: {err:?}"
        );

        let err = Config::new(Some("sub".into()), Some("rg".into()), None).unwrap_err();
        assert!(
            matches!(err, CoreError::Configuration(ref m) if m.contains("SENDGRID_API_KEY")),
            "unexpected: {err:?}"
        );
    }

    #[test]
    fn zero_attempts_rejected() {
        let mut config = full().unwrap();
        config.validation.attempts = 0;
        assert!(matches!(config.validate(), Err(CoreError::Configuration(_))));
    }

    #[test]
    fn debug_hides_api_key() {
        let rendered = format!("{:?}", full().unwrap());
        assert!(!rendered.contains("SG.key-value"));
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = ValidationPolicy {
            delay: Duration::from_secs(10),
            attempts: 5,
        };
        assert_eq!(policy.backoff(0), Duration::from_secs(10));
        assert_eq!(policy.backoff(1), Duration::from_secs(20));
        assert_eq!(policy.backoff(2), Duration::from_secs(40));
        assert_eq!(policy.backoff(10), MAX_VALIDATION_BACKOFF);

        let zero = ValidationPolicy {
            delay: Duration::ZERO,
            attempts: 3,
        };
        assert_eq!(zero.backoff(0), Duration::from_secs(1));
    }
}
