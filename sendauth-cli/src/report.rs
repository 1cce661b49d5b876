//! Report rendering and exit codes

use std::process::ExitCode;

use sendauth_core::{CoreError, ProvisionReport, RecordOutcome};
use sendauth_provider::ProviderError;
use sendauth_provider::log_sanitizer::truncate_for_log;

/// Domain validated.
pub const EXIT_VALID: u8 = 0;
/// Provisioning ran but the provider does not consider the domain valid yet.
pub const EXIT_NOT_VALID: u8 = 1;
/// Input is not a domain name (`EX_DATAERR`).
pub const EXIT_INVALID_DOMAIN: u8 = 65;
/// DNS zone does not exist (`EX_NOHOST`).
pub const EXIT_ZONE_NOT_FOUND: u8 = 68;
/// A remote API failed (`EX_UNAVAILABLE`).
pub const EXIT_PROVIDER: u8 = 69;
/// Internal failure (`EX_SOFTWARE`).
pub const EXIT_INTERNAL: u8 = 70;
/// Credentials refused or permissions missing (`EX_NOPERM`).
pub const EXIT_PERMISSION: u8 = 77;
/// Configuration missing or malformed (`EX_CONFIG`).
pub const EXIT_CONFIG: u8 = 78;

/// Exit status of a failed run.
pub fn exit_code_for(err: &CoreError) -> u8 {
    match err {
        CoreError::InvalidDomain(_) => EXIT_INVALID_DOMAIN,
        CoreError::Configuration(_) => EXIT_CONFIG,
        CoreError::ZoneNotFound(_) => EXIT_ZONE_NOT_FOUND,
        CoreError::Provider(e) if e.is_auth_failure() => EXIT_PERMISSION,
        CoreError::Provider(ProviderError::SerializationError { .. }) => EXIT_INTERNAL,
        CoreError::Provider(_) | CoreError::RecordConflictOrPermission { .. } => EXIT_PROVIDER,
    }
}

/// Exit status of a finished run.
pub fn exit_code_for_report(report: &ProvisionReport) -> u8 {
    if report.is_valid() {
        EXIT_VALID
    } else {
        EXIT_NOT_VALID
    }
}

/// Print the report to stdout and return the matching exit code.
pub fn print_report(report: &ProvisionReport, json: bool) -> ExitCode {
    if json {
        match serde_json::to_string_pretty(report) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                tracing::error!("Failed to serialize report: {e}");
                return ExitCode::from(EXIT_INTERNAL);
            }
        }
    } else {
        print!("{}", render_text(report));
    }
    ExitCode::from(exit_code_for_report(report))
}

/// Print a fatal error and return the matching exit code.
pub fn print_error(err: &CoreError, json: bool) -> ExitCode {
    if json {
        let body = serde_json::json!({
            "error": err,
            "message": err.to_string(),
        });
        println!("{body:#}");
    } else {
        eprintln!("[ERROR] {err}");
    }
    ExitCode::from(exit_code_for(err))
}

/// Human-readable report.
pub fn render_text(report: &ProvisionReport) -> String {
    let mut out = String::new();

    let verb = if report.domain_created {
        "created"
    } else {
        "exists"
    };
    out.push_str(&format!(
        "[INFO] Domain {verb}. {} (zone {}) id: {}\n",
        report.domain, report.zone, report.domain_id
    ));

    for record in &report.records {
        let (level, status) = match &record.outcome {
            RecordOutcome::Created => ("INFO", "created".to_string()),
            RecordOutcome::AlreadyExists => ("INFO", "already exists".to_string()),
            RecordOutcome::Failed { reason } => ("ERROR", format!("failed: {reason}")),
            RecordOutcome::Skipped { reason } => ("WARN", format!("skipped: {reason}")),
        };
        out.push_str(&format!(
            "[{level}] {} {} {} -> {}: {status}\n",
            record.purpose,
            record.record_type,
            record.fqdn,
            truncate_for_log(&record.value)
        ));
    }

    if report.is_valid() {
        out.push_str(&format!(
            "[INFO] Domain validated after {} attempt(s).\n",
            report.validation_attempts
        ));
    } else {
        out.push_str(&format!(
            "[ERROR] Domain not valid after {} attempt(s).\n",
            report.validation_attempts
        ));
        for (key, result) in report.validation.failures() {
            out.push_str(&format!(
                "  {key}: {}\n",
                result.reason.as_deref().unwrap_or("no reason given")
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use sendauth_core::RecordReport;
    use sendauth_provider::{DomainValidation, RecordType, RecordValidation};

    fn report(valid: bool) -> ProvisionReport {
        let mut validation_results = BTreeMap::new();
        validation_results.insert(
            "dkim".to_string(),
            RecordValidation {
                valid,
                reason: (!valid).then(|| "Expected TXT record".to_string()),
            },
        );
        ProvisionReport {
            domain: "mail.example.com".into(),
            zone: "example.com".into(),
            domain_id: 42,
            domain_created: true,
            records: vec![
                RecordReport {
                    purpose: "domain A".into(),
                    fqdn: "mail.example.com".into(),
                    record_type: RecordType::A,
                    value: "127.0.0.1".into(),
                    outcome: RecordOutcome::Created,
                },
                RecordReport {
                    purpose: "dkim".into(),
                    fqdn: "m1._domainkey.mail.example.com".into(),
                    record_type: RecordType::Txt,
                    value: "p=KEY".into(),
                    outcome: RecordOutcome::Failed {
                        reason: "denied".into(),
                    },
                },
            ],
            validation: DomainValidation {
                id: 42,
                valid,
                validation_results,
            },
            validation_attempts: 1,
        }
    }

    #[test]
    fn exit_codes_for_errors() {
        assert_eq!(exit_code_for(&CoreError::InvalidDomain("x".into())), 65);
        assert_eq!(exit_code_for(&CoreError::ZoneNotFound("rg/z".into())), 68);
        assert_eq!(exit_code_for(&CoreError::Configuration("x".into())), 78);
        assert_eq!(
            exit_code_for(&CoreError::Provider(ProviderError::PermissionDenied {
                provider: "azure".into(),
                raw_message: None,
            })),
            77
        );
        assert_eq!(
            exit_code_for(&CoreError::Provider(ProviderError::UnexpectedStatus {
                provider: "sendgrid".into(),
                status: 500,
                raw_message: String::new(),
            })),
            69
        );
        assert_eq!(
            exit_code_for(&CoreError::Provider(ProviderError::SerializationError {
                provider: "azure".into(),
                detail: String::new(),
            })),
            70
        );
    }

    #[test]
    fn exit_codes_for_reports() {
        assert_eq!(exit_code_for_report(&report(true)), 0);
        assert_eq!(exit_code_for_report(&report(false)), 1);
    }

    #[test]
    fn text_lists_records_and_diagnostics() {
        let text = render_text(&report(false));
        assert!(text.contains("[INFO] Domain created. mail.example.com (zone example.com) id: 42"));
        assert!(text.contains("[INFO] domain A A mail.example.com -> 127.0.0.1: created"));
        assert!(text.contains("[ERROR] dkim TXT m1._domainkey.mail.example.com -> p=KEY: failed: denied"));
        assert!(text.contains("  dkim: Expected TXT record"));
    }

    #[test]
    fn long_values_are_shortened_in_text_only() {
        let mut long = report(true);
        long.records[1].value = "p=".to_string() + &"A".repeat(600);

        let text = render_text(&long);
        assert!(text.contains("[truncated, total 602 bytes]"));

        let json = serde_json::to_value(&long).unwrap();
        assert_eq!(json["records"][1]["value"].as_str().map(str::len), Some(602));
    }

    #[test]
    fn json_report_shape() {
        let json = serde_json::to_value(report(true)).unwrap();
        assert_eq!(json["domain_id"], 42);
        assert_eq!(json["records"][0]["status"], "created");
        assert_eq!(json["records"][0]["record_type"], "A");
        assert_eq!(json["records"][1]["status"], "failed");
        assert_eq!(json["records"][1]["reason"], "denied");
        assert_eq!(json["validation"]["valid"], true);
    }
}
