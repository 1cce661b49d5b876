//! Test helpers
//!
//! In-memory mocks of the two remote APIs plus small factories.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use sendauth_provider::{
    CreateRecordSetRequest, DnsRequirement, DnsRequirements, DnsZone, DnsZoneProvider,
    DomainAuthRecord, DomainQuery, DomainSummary, DomainValidation, EmailDomainRegistry,
    NewDomainRequest, ProviderError, RecordSet, RecordType, RecordValidation, ZoneReference,
};
use tokio::sync::RwLock;

use crate::config::{Config, ValidationPolicy};

// ===== MockRegistry =====

pub struct MockRegistry {
    domains: RwLock<Vec<DomainSummary>>,
    details: RwLock<HashMap<u64, DomainAuthRecord>>,
    /// Requirements attached to domains created during the test
    requirements: RwLock<DnsRequirements>,
    /// Scripted validation outcomes; the last one repeats
    validations: RwLock<VecDeque<bool>>,
    create_error: RwLock<Option<ProviderError>>,
    calls: RwLock<Vec<String>>,
    next_id: RwLock<u64>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self {
            domains: RwLock::new(Vec::new()),
            details: RwLock::new(HashMap::new()),
            requirements: RwLock::new(DnsRequirements::default()),
            validations: RwLock::new(VecDeque::from([true])),
            create_error: RwLock::new(None),
            calls: RwLock::new(Vec::new()),
            next_id: RwLock::new(100),
        }
    }

    /// Register an existing domain with the given requirements.
    pub async fn add_domain(&self, id: u64, domain: &str, dns: DnsRequirements) {
        self.domains.write().await.push(DomainSummary {
            id,
            domain: domain.to_string(),
        });
        self.details.write().await.insert(
            id,
            DomainAuthRecord {
                id,
                domain: domain.to_string(),
                subdomain: None,
                username: None,
                valid: false,
                dns,
            },
        );
    }

    /// Register `count` unrelated domains ahead of everything else.
    pub async fn add_filler(&self, count: u64) {
        let mut domains = self.domains.write().await;
        for i in 0..count {
            domains.push(DomainSummary {
                id: 10_000 + i,
                domain: format!("filler{i}.example.org"),
            });
        }
    }

    /// Change the requirements of an already registered domain.
    pub async fn replace_requirements(&self, id: u64, dns: DnsRequirements) {
        if let Some(detail) = self.details.write().await.get_mut(&id) {
            detail.dns = dns;
        }
    }

    pub async fn set_requirements(&self, dns: DnsRequirements) {
        *self.requirements.write().await = dns;
    }

    pub async fn set_validations(&self, outcomes: &[bool]) {
        *self.validations.write().await = outcomes.iter().copied().collect();
    }

    pub async fn set_create_error(&self, err: Option<ProviderError>) {
        *self.create_error.write().await = err;
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    pub async fn count_calls(&self, prefix: &str) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    async fn record(&self, call: String) {
        self.calls.write().await.push(call);
    }
}

#[async_trait]
impl EmailDomainRegistry for MockRegistry {
    fn id(&self) -> &'static str {
        "mock-registry"
    }

    async fn list_domains(&self, query: &DomainQuery) -> sendauth_provider::Result<Vec<DomainSummary>> {
        self.record(format!("list:{}", query.offset)).await;
        let domains = self.domains.read().await;
        Ok(domains
            .iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .cloned()
            .collect())
    }

    async fn create_domain(&self, req: &NewDomainRequest) -> sendauth_provider::Result<DomainSummary> {
        self.record(format!("create:{}", req.domain)).await;
        if let Some(err) = self.create_error.read().await.clone() {
            return Err(err);
        }

        let id = {
            let mut next = self.next_id.write().await;
            *next += 1;
            *next
        };
        let dns = self.requirements.read().await.clone();
        self.add_domain(id, &req.domain, dns).await;
        Ok(DomainSummary {
            id,
            domain: req.domain.clone(),
        })
    }

    async fn get_domain(&self, id: u64) -> sendauth_provider::Result<DomainAuthRecord> {
        self.record(format!("get:{id}")).await;
        self.details
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| ProviderError::DomainNotFound {
                provider: "mock-registry".to_string(),
                domain: id.to_string(),
                raw_message: None,
            })
    }

    async fn validate_domain(&self, id: u64) -> sendauth_provider::Result<DomainValidation> {
        self.record(format!("validate:{id}")).await;
        let valid = {
            let mut script = self.validations.write().await;
            if script.len() > 1 {
                script.pop_front().unwrap_or(true)
            } else {
                script.front().copied().unwrap_or(true)
            }
        };

        let mut validation_results = std::collections::BTreeMap::new();
        validation_results.insert(
            "mail_server".to_string(),
            RecordValidation {
                valid: true,
                reason: None,
            },
        );
        validation_results.insert(
            "dkim".to_string(),
            RecordValidation {
                valid,
                reason: (!valid).then(|| "Expected TXT record but none found".to_string()),
            },
        );

        Ok(DomainValidation {
            id,
            valid,
            validation_results,
        })
    }
}

// ===== MockDnsZoneProvider =====

pub struct MockDnsZoneProvider {
    zone_exists: RwLock<bool>,
    zone_error: RwLock<Option<ProviderError>>,
    records: RwLock<HashMap<(String, RecordType), RecordSet>>,
    deny_create: RwLock<HashSet<(String, RecordType)>>,
    calls: RwLock<Vec<String>>,
}

impl MockDnsZoneProvider {
    pub fn new() -> Self {
        Self {
            zone_exists: RwLock::new(true),
            zone_error: RwLock::new(None),
            records: RwLock::new(HashMap::new()),
            deny_create: RwLock::new(HashSet::new()),
            calls: RwLock::new(Vec::new()),
        }
    }

    pub async fn set_zone_exists(&self, exists: bool) {
        *self.zone_exists.write().await = exists;
    }

    pub async fn set_zone_error(&self, err: Option<ProviderError>) {
        *self.zone_error.write().await = err;
    }

    /// Make creation of (name, type) fail with `PermissionDenied`.
    pub async fn deny_create(&self, name: &str, record_type: RecordType) {
        self.deny_create
            .write()
            .await
            .insert((name.to_string(), record_type));
    }

    pub async fn record_set(&self, name: &str, record_type: RecordType) -> Option<RecordSet> {
        self.records
            .read()
            .await
            .get(&(name.to_string(), record_type))
            .cloned()
    }

    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    pub async fn count_calls(&self, prefix: &str) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl DnsZoneProvider for MockDnsZoneProvider {
    fn id(&self) -> &'static str {
        "mock-dns"
    }

    async fn get_zone(&self, zone: &ZoneReference) -> sendauth_provider::Result<Option<DnsZone>> {
        self.calls
            .write()
            .await
            .push(format!("get_zone:{}", zone.zone_name));
        if let Some(err) = self.zone_error.read().await.clone() {
            return Err(err);
        }
        Ok(self.zone_exists.read().await.then(|| DnsZone {
            id: format!("zone/{}", zone.zone_name),
            name: zone.zone_name.clone(),
            name_servers: vec!["ns1.mock.".to_string()],
        }))
    }

    async fn get_record_set(
        &self,
        _zone: &ZoneReference,
        record_type: RecordType,
        name: &str,
    ) -> sendauth_provider::Result<Option<RecordSet>> {
        self.calls
            .write()
            .await
            .push(format!("get:{record_type}:{name}"));
        Ok(self.record_set(name, record_type).await)
    }

    async fn create_record_set(
        &self,
        _zone: &ZoneReference,
        req: &CreateRecordSetRequest,
    ) -> sendauth_provider::Result<RecordSet> {
        let key = (req.name.clone(), req.record_type());
        self.calls
            .write()
            .await
            .push(format!("create:{}:{}", key.1, key.0));

        if self.deny_create.read().await.contains(&key) {
            return Err(ProviderError::PermissionDenied {
                provider: "mock-dns".to_string(),
                raw_message: Some("AuthorizationFailed".to_string()),
            });
        }

        let mut records = self.records.write().await;
        if records.contains_key(&key) {
            return Err(ProviderError::RecordExists {
                provider: "mock-dns".to_string(),
                record_name: req.name.clone(),
                raw_message: None,
            });
        }

        let set = RecordSet {
            id: Some(format!("rs/{}/{}", key.1, key.0)),
            name: req.name.clone(),
            fqdn: None,
            record_type: key.1,
            ttl: req.ttl,
            records: vec![req.data.clone()],
        };
        records.insert(key, set.clone());
        Ok(set)
    }
}

// ===== Factories =====

pub fn requirement(record_type: &str, host: &str, data: &str) -> DnsRequirement {
    DnsRequirement {
        valid: false,
        record_type: record_type.to_string(),
        host: host.to_string(),
        data: data.to_string(),
    }
}

/// Requirements SendGrid issues for `mail.example.com` with custom SPF.
pub fn mail_example_requirements() -> DnsRequirements {
    DnsRequirements {
        mail_server: requirement("mx", "em1234.mail.example.com", "mx.sendgrid.net"),
        subdomain_spf: requirement(
            "txt",
            "em1234.mail.example.com",
            "v=spf1 include:sendgrid.net ~all",
        ),
        dkim: requirement(
            "txt",
            "m1._domainkey.mail.example.com",
            "k=rsa; t=s; p=MIGfMA0GCSqGSIb3DQEBAQUAA4GNADCBiQKBgQ",
        ),
    }
}

pub fn test_config() -> Config {
    let mut config = match Config::new(
        Some("sub-1".to_string()),
        Some("dns-rg".to_string()),
        Some("SG.test".to_string()),
    ) {
        Ok(config) => config,
        Err(e) => panic!("test config rejected: {e}"),
    };
    config.validation = ValidationPolicy::default();
    config
}

pub fn create_mocks() -> (Arc<MockRegistry>, Arc<MockDnsZoneProvider>) {
    (Arc::new(MockRegistry::new()), Arc::new(MockDnsZoneProvider::new()))
}
