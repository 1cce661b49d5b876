//! End-to-end provisioning of an authenticated sending domain

use std::sync::Arc;

use serde::Serialize;

use sendauth_provider::common::relative_to_full_name;
use sendauth_provider::{
    DnsRequirement, DnsZoneProvider, DomainAuthRecord, DomainValidation, EmailDomainRegistry,
    NewDomainRequest, RecordData, RecordType, ZoneReference,
};

use crate::config::Config;
use crate::domain::ParsedDomain;
use crate::error::{CoreError, CoreResult};
use crate::services::reconciler::{EnsureOutcome, RecordReconciler};

/// Exchange the domain's own MX points at.
pub const SENDGRID_MX_EXCHANGE: &str = "mx.sendgrid.net";
/// Preference of every MX record created.
pub const MX_PREFERENCE: u16 = 10;

/// Result of one record step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordOutcome {
    Created,
    AlreadyExists,
    /// The create (or the lookup before it) failed; the run went on.
    Failed { reason: String },
    /// The step was not attempted.
    Skipped { reason: String },
}

impl From<EnsureOutcome> for RecordOutcome {
    fn from(outcome: EnsureOutcome) -> Self {
        match outcome {
            EnsureOutcome::Created => Self::Created,
            EnsureOutcome::AlreadyExists => Self::AlreadyExists,
        }
    }
}

/// One record step as reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordReport {
    /// What the record is for (`"domain A"`, `"dkim"`, ...).
    pub purpose: String,
    /// Fully qualified name.
    pub fqdn: String,
    pub record_type: RecordType,
    /// Full record value, as written.
    pub value: String,
    #[serde(flatten)]
    pub outcome: RecordOutcome,
}

/// Everything a run did, in order.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionReport {
    /// Normalized domain name.
    pub domain: String,
    /// Zone the records went into.
    pub zone: String,
    /// Email provider's domain id.
    pub domain_id: u64,
    /// Whether the domain was registered during this run.
    pub domain_created: bool,
    pub records: Vec<RecordReport>,
    /// Outcome of the last validation attempt.
    pub validation: DomainValidation,
    /// Number of validation attempts made.
    pub validation_attempts: u32,
}

impl ProvisionReport {
    /// Whether the provider considers the domain authenticated.
    pub fn is_valid(&self) -> bool {
        self.validation.valid
    }

    /// Record steps that failed.
    pub fn failed_records(&self) -> impl Iterator<Item = &RecordReport> {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, RecordOutcome::Failed { .. }))
    }
}

/// A record step derived from the domain and the provider's requirements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedRecord {
    /// Ensure `data` at relative `name`.
    Ensure {
        purpose: &'static str,
        name: String,
        data: RecordData,
    },
    /// Provider asked for a record this run cannot publish.
    Skip {
        purpose: &'static str,
        host: String,
        record_type: RecordType,
        reason: String,
    },
}

/// Record steps for `domain`, in the order they run.
///
/// 1. A (and AAAA when configured) at the domain itself
/// 2. MX at the domain to the generic exchange
/// 3. MX at the provider's mail host, unless it is the domain itself
/// 4. SPF TXT and DKIM TXT at their provider hosts
///
/// Provider hosts that are empty are left out; hosts outside the zone are skipped.
pub fn plan_records(
    domain: &ParsedDomain,
    detail: &DomainAuthRecord,
    config: &Config,
) -> Vec<PlannedRecord> {
    let own_name = domain.relative_name();
    let mut plan = vec![PlannedRecord::Ensure {
        purpose: "domain A",
        name: own_name.clone(),
        data: RecordData::A {
            address: config.a_record.to_string(),
        },
    }];

    if let Some(v6) = config.aaaa_record {
        plan.push(PlannedRecord::Ensure {
            purpose: "domain AAAA",
            name: own_name.clone(),
            data: RecordData::AAAA {
                address: v6.to_string(),
            },
        });
    }

    plan.push(PlannedRecord::Ensure {
        purpose: "domain MX",
        name: own_name.clone(),
        data: RecordData::MX {
            preference: MX_PREFERENCE,
            exchange: SENDGRID_MX_EXCHANGE.to_string(),
        },
    });

    let dns = &detail.dns;
    let provider_steps: [(&'static str, &DnsRequirement, RecordType); 3] = [
        ("mail server MX", &dns.mail_server, RecordType::Mx),
        ("subdomain SPF", &dns.subdomain_spf, RecordType::Txt),
        ("dkim", &dns.dkim, RecordType::Txt),
    ];

    for (purpose, req, record_type) in provider_steps {
        if !req.is_required() {
            continue;
        }

        let Some(name) = domain.relative_name_for(&req.host) else {
            plan.push(PlannedRecord::Skip {
                purpose,
                host: req.host.clone(),
                record_type,
                reason: format!("host {} is outside zone {}", req.host, domain.zone),
            });
            continue;
        };

        let data = match record_type {
            RecordType::Mx => {
                if name == own_name {
                    continue;
                }
                RecordData::MX {
                    preference: MX_PREFERENCE,
                    exchange: req.data.trim().trim_end_matches('.').to_string(),
                }
            }
            _ => RecordData::txt(req.data.trim()),
        };

        plan.push(PlannedRecord::Ensure {
            purpose,
            name,
            data,
        });
    }

    plan
}

/// Registers a domain with the email provider, publishes its records and validates it.
pub struct ProvisioningService {
    registry: Arc<dyn EmailDomainRegistry>,
    dns: Arc<dyn DnsZoneProvider>,
    reconciler: RecordReconciler,
    config: Config,
}

impl ProvisioningService {
    #[must_use]
    pub fn new(
        registry: Arc<dyn EmailDomainRegistry>,
        dns: Arc<dyn DnsZoneProvider>,
        config: Config,
    ) -> Self {
        Self {
            registry,
            reconciler: RecordReconciler::new(dns.clone()),
            dns,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the whole procedure for `input`.
    ///
    /// Record failures are collected in the report; any other failure aborts the
    /// run. Nothing is rolled back and DNS writes are never retried.
    pub async fn provision(&self, input: &str) -> CoreResult<ProvisionReport> {
        let domain = ParsedDomain::parse(input)?;
        self.config.validate()?;

        let zone = ZoneReference::new(
            self.config.subscription_id.clone(),
            self.config.resource_group.clone(),
            domain.zone.clone(),
        );
        log::info!(
            "Provisioning {domain} (zone {}, subdomain '{}')",
            domain.zone,
            domain.subdomain
        );

        if self.dns.get_zone(&zone).await?.is_none() {
            return Err(CoreError::ZoneNotFound(zone.to_string()));
        }

        let (domain_id, domain_created) = self.find_or_create(&domain).await?;
        let detail = self.registry.get_domain(domain_id).await?;

        let mut records = Vec::new();
        for step in plan_records(&domain, &detail, &self.config) {
            records.push(self.run_step(&zone, &domain, step).await);
        }

        let (validation, validation_attempts) = self.validate(domain_id).await?;

        Ok(ProvisionReport {
            domain: domain.name,
            zone: domain.zone,
            domain_id,
            domain_created,
            records,
            validation,
            validation_attempts,
        })
    }

    async fn find_or_create(&self, domain: &ParsedDomain) -> CoreResult<(u64, bool)> {
        if let Some(existing) = self.registry.find_domain(&domain.name).await? {
            log::info!("Domain exists, id: {}", existing.id);
            return Ok((existing.id, false));
        }

        let created = self
            .registry
            .create_domain(&NewDomainRequest::with_fixed_options(&domain.name))
            .await?;
        log::info!("Domain created, id: {}", created.id);
        Ok((created.id, true))
    }

    async fn run_step(
        &self,
        zone: &ZoneReference,
        domain: &ParsedDomain,
        step: PlannedRecord,
    ) -> RecordReport {
        match step {
            PlannedRecord::Skip {
                purpose,
                host,
                record_type,
                reason,
            } => {
                log::warn!("Skipping {purpose} record: {reason}");
                RecordReport {
                    purpose: purpose.to_string(),
                    fqdn: host,
                    record_type,
                    value: String::new(),
                    outcome: RecordOutcome::Skipped { reason },
                }
            }
            PlannedRecord::Ensure {
                purpose,
                name,
                data,
            } => {
                let fqdn = relative_to_full_name(&name, &domain.zone);
                let record_type = data.record_type();
                let value = data.display_value();

                let outcome = match self
                    .reconciler
                    .ensure_record(zone, &name, self.config.ttl, data)
                    .await
                {
                    Ok(done) => done.into(),
                    Err(e) => {
                        if e.is_expected() {
                            log::warn!("{purpose} record {fqdn} not published: {e}");
                        } else {
                            log::error!("{purpose} record {fqdn} not published: {e}");
                        }
                        RecordOutcome::Failed {
                            reason: e.to_string(),
                        }
                    }
                };

                RecordReport {
                    purpose: purpose.to_string(),
                    fqdn,
                    record_type,
                    value,
                    outcome,
                }
            }
        }
    }

    /// Wait, then validate up to the configured number of attempts.
    async fn validate(&self, domain_id: u64) -> CoreResult<(DomainValidation, u32)> {
        let policy = self.config.validation;

        if !policy.delay.is_zero() {
            log::info!(
                "Waiting {}s for DNS propagation before validating",
                policy.delay.as_secs()
            );
            tokio::time::sleep(policy.delay).await;
        }

        let mut attempt = 0;
        loop {
            attempt += 1;
            let validation = self.registry.validate_domain(domain_id).await?;

            if validation.valid {
                log::info!("Domain {domain_id} validated on attempt {attempt}");
                return Ok((validation, attempt));
            }

            for (key, result) in validation.failures() {
                log::warn!(
                    "Validation of {key} failed: {}",
                    result.reason.as_deref().unwrap_or("no reason given")
                );
            }

            if attempt >= policy.attempts {
                return Ok((validation, attempt));
            }

            let wait = policy.backoff(attempt - 1);
            log::info!(
                "Domain not valid yet (attempt {attempt}/{}), retrying in {}s",
                policy.attempts,
                wait.as_secs()
            );
            tokio::time::sleep(wait).await;
        }
    }
}
