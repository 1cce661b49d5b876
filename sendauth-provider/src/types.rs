use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ============ Email Provider Types ============

/// Page selector for the authenticated-domain list endpoint.
///
/// SendGrid pages with `limit`/`offset` rather than page numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainQuery {
    /// Domain filter passed through to the provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Maximum number of entries in the page.
    pub limit: u32,
    /// Number of entries to skip.
    pub offset: u32,
}

impl DomainQuery {
    /// Default page size used when scanning for a domain.
    pub const DEFAULT_LIMIT: u32 = 50;

    /// First page for the given domain filter.
    pub fn first_page(domain: impl Into<String>) -> Self {
        Self {
            domain: Some(domain.into()),
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }

    /// The page after this one.
    #[must_use]
    pub fn next_page(&self) -> Self {
        Self {
            domain: self.domain.clone(),
            limit: self.limit,
            offset: self.offset.saturating_add(self.limit),
        }
    }
}

/// One entry of the authenticated-domain list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSummary {
    /// Provider-assigned identifier.
    pub id: u64,
    /// Registered domain name.
    pub domain: String,
}

/// Body of the create-domain request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDomainRequest {
    /// Domain to authenticate.
    pub domain: String,
    /// Provider subdomain used for the mail CNAME/MX; empty lets the provider choose.
    pub subdomain: String,
    /// Whether the provider manages DKIM/SPF rotation through CNAMEs.
    pub automatic_security: bool,
    /// Whether a dedicated SPF TXT record is published for the mail subdomain.
    pub custom_spf: bool,
    /// Whether this becomes the account's default authenticated domain.
    pub default: bool,
}

impl NewDomainRequest {
    /// Registration options used by the provisioning procedure: no subdomain,
    /// security automation off, custom SPF on, not default.
    pub fn with_fixed_options(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            subdomain: String::new(),
            automatic_security: false,
            custom_spf: true,
            default: false,
        }
    }
}

/// A single DNS entry the provider requires to be published.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRequirement {
    /// Whether the provider last saw this record correctly published.
    #[serde(default)]
    pub valid: bool,
    /// Record type as reported by the provider (`mx`, `txt`, `cname`).
    #[serde(rename = "type", default)]
    pub record_type: String,
    /// Fully qualified host the record must be published at; empty when not required.
    #[serde(default)]
    pub host: String,
    /// Value to publish; empty when not required.
    #[serde(default)]
    pub data: String,
}

impl DnsRequirement {
    /// Whether the provider actually asks for this record.
    pub fn is_required(&self) -> bool {
        !self.host.trim().is_empty() && !self.data.trim().is_empty()
    }
}

/// DNS requirement block of an authenticated domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRequirements {
    /// MX record for the provider's mail subdomain.
    #[serde(default)]
    pub mail_server: DnsRequirement,
    /// SPF TXT record for the provider's mail subdomain.
    #[serde(default)]
    pub subdomain_spf: DnsRequirement,
    /// DKIM public key TXT record.
    #[serde(default)]
    pub dkim: DnsRequirement,
}

/// An authenticated domain as registered at the email provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainAuthRecord {
    /// Provider-assigned identifier.
    pub id: u64,
    /// Registered domain name.
    pub domain: String,
    /// Provider-chosen mail subdomain, if any.
    #[serde(default)]
    pub subdomain: Option<String>,
    /// Account user name that owns the domain.
    #[serde(default)]
    pub username: Option<String>,
    /// Whether the domain is currently validated.
    #[serde(default)]
    pub valid: bool,
    /// Records the provider expects to find in DNS.
    #[serde(default)]
    pub dns: DnsRequirements,
}

/// Per-record diagnostic from a validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordValidation {
    /// Whether the provider found the record correctly published.
    pub valid: bool,
    /// Why the record failed validation, if it did.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Outcome of a provider-side validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainValidation {
    /// Domain identifier.
    pub id: u64,
    /// Whether every required record is published correctly.
    pub valid: bool,
    /// Diagnostics keyed by the provider's record name (`mail_server`, `dkim`, ...).
    #[serde(default)]
    pub validation_results: BTreeMap<String, RecordValidation>,
}

impl DomainValidation {
    /// Diagnostics of the records that did not validate.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &RecordValidation)> {
        self.validation_results
            .iter()
            .filter(|(_, r)| !r.valid)
            .map(|(k, r)| (k.as_str(), r))
    }
}

// ============ DNS Zone Types ============

/// Identifies an existing DNS zone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneReference {
    /// Subscription that owns the zone.
    pub subscription_id: String,
    /// Resource group containing the zone.
    pub resource_group: String,
    /// Zone name (e.g., `"example.com"`).
    pub zone_name: String,
}

impl ZoneReference {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        zone_name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            zone_name: zone_name.into(),
        }
    }
}

impl std::fmt::Display for ZoneReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.resource_group, self.zone_name)
    }
}

/// An existing DNS zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsZone {
    /// Provider resource identifier.
    pub id: String,
    /// Zone name.
    pub name: String,
    /// Authoritative name servers.
    #[serde(default)]
    pub name_servers: Vec<String>,
}

/// DNS record type identifier.
///
/// Serialized as uppercase strings (`"A"`, `"AAAA"`, `"MX"`, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Canonical name (alias) record.
    Cname,
    /// Mail exchange record.
    Mx,
    /// Text record.
    Txt,
}

impl RecordType {
    /// Uppercase wire name (`"A"`, `"AAAA"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Txt => "TXT",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-safe representation of one DNS record value.
///
/// Use [`record_type()`](Self::record_type) to get the [`RecordType`] discriminant,
/// or [`display_value()`](Self::display_value) for logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content")]
pub enum RecordData {
    /// A record: maps a hostname to an IPv4 address.
    A {
        /// IPv4 address (e.g., `"127.0.0.1"`).
        address: String,
    },

    /// AAAA record: maps a hostname to an IPv6 address.
    AAAA {
        /// IPv6 address (e.g., `"2001:db8::1"`).
        address: String,
    },

    /// CNAME record: alias from one name to another.
    CNAME {
        /// Target hostname.
        target: String,
    },

    /// MX record: mail exchange server.
    MX {
        /// Preference (lower = preferred).
        preference: u16,
        /// Mail server hostname.
        exchange: String,
    },

    /// TXT record: ordered list of character strings.
    TXT {
        /// String values, concatenated by resolvers.
        values: Vec<String>,
    },
}

impl RecordData {
    /// Returns the [`RecordType`] discriminant for this record data.
    pub fn record_type(&self) -> RecordType {
        match self {
            Self::A { .. } => RecordType::A,
            Self::AAAA { .. } => RecordType::Aaaa,
            Self::CNAME { .. } => RecordType::Cname,
            Self::MX { .. } => RecordType::Mx,
            Self::TXT { .. } => RecordType::Txt,
        }
    }

    /// Single-line rendering of the value.
    pub fn display_value(&self) -> String {
        match self {
            Self::A { address } | Self::AAAA { address } => address.clone(),
            Self::CNAME { target } => target.clone(),
            Self::MX {
                preference,
                exchange,
            } => format!("{preference} {exchange}"),
            Self::TXT { values } => values.concat(),
        }
    }

    /// TXT data holding a single logical value.
    pub fn txt(value: impl Into<String>) -> Self {
        Self::TXT {
            values: vec![value.into()],
        }
    }
}

/// A record set as stored in the zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSet {
    /// Provider resource identifier, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Relative name (`"@"` for the apex).
    pub name: String,
    /// Fully qualified name, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
    /// Record type shared by every value.
    pub record_type: RecordType,
    /// Time to live in seconds.
    pub ttl: u32,
    /// Values in provider order.
    pub records: Vec<RecordData>,
}

/// Request to create a record set holding one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordSetRequest {
    /// Relative record name (`"@"` for the apex).
    pub name: String,
    /// Time to live in seconds.
    pub ttl: u32,
    /// Type-specific record data.
    pub data: RecordData,
}

impl CreateRecordSetRequest {
    pub fn record_type(&self) -> RecordType {
        self.data.record_type()
    }
}
