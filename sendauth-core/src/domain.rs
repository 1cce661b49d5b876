//! Domain name checks and zone splitting

use regex::Regex;
use serde::Serialize;

use sendauth_provider::common::{full_name_to_relative, normalize_domain_name};

use crate::error::{CoreError, CoreResult};

/// Zone = rightmost `label.tld` with an alphabetic TLD.
const ZONE_PATTERN: &str = r"^.*?\.?([^.]+\.[a-z]+)$";

const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// A checked domain split into its zone and the part below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedDomain {
    /// Normalized full name (`"mail.example.com"`).
    pub name: String,
    /// Zone the records are published in (`"example.com"`).
    pub zone: String,
    /// Labels below the zone (`"mail"`); empty for the apex.
    pub subdomain: String,
}

impl ParsedDomain {
    /// Normalize, check and split `input`.
    ///
    /// Surrounding whitespace and one trailing dot are dropped and the name is
    /// lowercased before any check.
    pub fn parse(input: &str) -> CoreResult<Self> {
        let name = normalize_domain_name(input);
        check_syntax(&name).map_err(|why| {
            log::debug!("Rejected domain '{input}': {why}");
            CoreError::InvalidDomain(input.trim().to_string())
        })?;

        let zone = split_zone(&name).ok_or_else(|| CoreError::InvalidDomain(name.clone()))?;
        let subdomain = name
            .strip_suffix(zone.as_str())
            .map(|rest| rest.trim_end_matches('.').to_string())
            .unwrap_or_default();

        Ok(Self {
            name,
            zone,
            subdomain,
        })
    }

    /// Name of the domain relative to its zone (`"@"` for the apex).
    pub fn relative_name(&self) -> String {
        if self.subdomain.is_empty() {
            "@".to_string()
        } else {
            self.subdomain.clone()
        }
    }

    /// Relative name of a provider-supplied host inside this zone.
    ///
    /// Drops the two rightmost labels (the zone); `"@"` when nothing remains.
    /// `None` when the host lies outside the zone.
    pub fn relative_name_for(&self, host: &str) -> Option<String> {
        full_name_to_relative(host, &self.zone)
    }
}

impl std::fmt::Display for ParsedDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

fn split_zone(name: &str) -> Option<String> {
    let Ok(re) = Regex::new(ZONE_PATTERN) else {
        log::error!("Zone pattern failed to compile");
        return None;
    };
    re.captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Hostname rules: at least two labels, 1-63 chars each from `[a-z0-9-]` not
/// starting or ending with a hyphen, alphabetic TLD, 253 chars in total.
fn check_syntax(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("empty".to_string());
    }
    if name.len() > MAX_DOMAIN_LEN {
        return Err(format!("longer than {MAX_DOMAIN_LEN} characters"));
    }

    let labels: Vec<&str> = name.split('.').collect();
    if labels.len() < 2 {
        return Err("needs at least two labels".to_string());
    }

    for label in &labels {
        if label.is_empty() {
            return Err("empty label".to_string());
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(format!("label '{label}' longer than {MAX_LABEL_LEN} characters"));
        }
        if !label
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        {
            return Err(format!("label '{label}' has invalid characters"));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(format!("label '{label}' starts or ends with a hyphen"));
        }
    }

    let tld = labels.last().copied().unwrap_or_default();
    if tld.len() < 2 || !tld.bytes().all(|b| b.is_ascii_lowercase()) {
        return Err(format!("top-level domain '{tld}' is not alphabetic"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subdomain_split() {
        let parsed = ParsedDomain::parse("sub.example.com").unwrap();
        assert_eq!(parsed.zone, "example.com");
        assert_eq!(parsed.subdomain, "sub");
        assert_eq!(parsed.relative_name(), "sub");
    }

    #[test]
    fn apex_split() {
        let parsed = ParsedDomain::parse("example.com").unwrap();
        assert_eq!(parsed.zone, "example.com");
        assert_eq!(parsed.subdomain, "");
        assert_eq!(parsed.relative_name(), "@");
    }

    #[test]
    fn deep_subdomain_keeps_all_lower_labels() {
        let parsed = ParsedDomain::parse("a.b.mail.example.com").unwrap();
        assert_eq!(parsed.zone, "example.com");
        assert_eq!(parsed.subdomain, "a.b.mail");
    }

    #[test]
    fn input_is_normalized() {
        let parsed = ParsedDomain::parse("  Mail.Example.COM.\n").unwrap();
        assert_eq!(parsed.name, "mail.example.com");
        assert_eq!(parsed.to_string(), "mail.example.com");
    }

    #[test]
    fn rejects_malformed_names() {
        for bad in [
            "",
            "localhost",
            "no spaces.example.com",
            "-lead.example.com",
            "trail-.example.com",
            "double..dot.com",
            "example.c0m",
            "under_score.example.com",
            "exa$mple.com",
        ] {
            let err = ParsedDomain::parse(bad).unwrap_err();
            assert!(matches!(err, CoreError::InvalidDomain(_)), "{bad}: {err:?}");
        }
    }

    #[test]
    fn rejects_overlong_label() {
        let name = format!("{}.example.com", "a".repeat(64));
        assert!(ParsedDomain::parse(&name).is_err());
    }

    #[test]
    fn provider_host_relative_names() {
        let parsed = ParsedDomain::parse("mail.example.com").unwrap();
        assert_eq!(
            parsed.relative_name_for("em1234.mail.example.com").as_deref(),
            Some("em1234.mail")
        );
        assert_eq!(
            parsed.relative_name_for("s1._domainkey.mail.example.com.").as_deref(),
            Some("s1._domainkey.mail")
        );
        assert_eq!(parsed.relative_name_for("example.com").as_deref(), Some("@"));
        assert_eq!(parsed.relative_name_for("em1.elsewhere.net"), None);
    }
}
