//! Terminal and JSON reports for the CLI.

use colored::Colorize;
use serde::Serialize;

use crate::addressing::AddressingError;
use crate::builder::BuildError;
use crate::catalog::ProfileCatalog;
use crate::model::ConfigurationDocument;
use crate::validate::ValidationIssue;

/// Outcome of a `validate` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub ok: bool,
    pub stage: Option<String>,
    pub policy_source: String,
    pub issues: Vec<ValidationIssue>,
}

impl CheckReport {
    pub fn from_result(
        result: &Result<ConfigurationDocument, BuildError>,
        policy_source: &str,
    ) -> Self {
        let (stage, issues) = match result {
            Ok(_) => (None, Vec::new()),
            Err(err) => (Some(err.stage().to_string()), issues_of(err)),
        };
        Self {
            ok: result.is_ok(),
            stage,
            policy_source: policy_source.to_string(),
            issues,
        }
    }
}

/// Flatten any build error into field-level issues.
pub fn issues_of(err: &BuildError) -> Vec<ValidationIssue> {
    match err {
        BuildError::Validation(errors) => errors.issues.clone(),
        BuildError::UnknownProfile(e) => vec![ValidationIssue {
            field: "vpn_profile".to_string(),
            message: e.to_string(),
        }],
        BuildError::Address(AddressingError::Parse(e)) => vec![ValidationIssue {
            field: e.field.clone(),
            message: format!("cannot parse address '{}': {}", e.value, e.source),
        }],
        BuildError::Address(e @ AddressingError::MissingFallback { .. }) => {
            vec![ValidationIssue {
                field: e.field().to_string(),
                message: "dynamic WAN endpoint needs dynamic_peer_fallback in the policy"
                    .to_string(),
            }]
        }
    }
}

pub fn render_check_text(report: &CheckReport, verbose: bool) -> String {
    let mut out = Vec::new();
    if verbose {
        out.push(format!("Using policy: {}", report.policy_source));
    }
    if report.ok {
        out.push("result ok".green().to_string());
        return out.join("\n");
    }
    out.push(
        format!(
            "result failed stage={} issues={}",
            report.stage.as_deref().unwrap_or("unknown"),
            report.issues.len()
        )
        .red()
        .to_string(),
    );
    for issue in &report.issues {
        out.push(format!("- {}: {}", issue.field.yellow(), issue.message));
    }
    out.join("\n")
}

pub fn render_profiles(catalog: &ProfileCatalog) -> String {
    let mut out = vec!["profiles".to_string()];
    for profile in catalog.iter() {
        out.push(format!(
            "- {} strength={} fortinet={}/{} paloalto={}/{}",
            profile.key.cyan(),
            profile.strength.as_str(),
            profile.forti_phase1,
            profile.forti_phase2,
            profile.palo_encryption,
            profile.palo_auth
        ));
        out.push(format!("  {}", profile.label));
    }
    out.join("\n")
}

/// One-line summary written to stderr after a successful `generate`.
pub fn render_summary(doc: &ConfigurationDocument) -> String {
    format!(
        "generated vpn={} profile={} dh_group={} selectors={} site1_peer={} site2_peer={}",
        doc.vpn.name,
        doc.vpn.profile,
        doc.ike.proposal.dh_group,
        doc.ipsec.selectors.len(),
        doc.sites.site1.tunnel.peer_wan_ip,
        doc.sites.site2.tunnel.peer_wan_ip
    )
    .cyan()
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_document;
    use crate::catalog::catalog;
    use crate::policy::EnginePolicy;
    use crate::validate::tests::lab_fields;

    #[test]
    fn failed_check_lists_every_issue() {
        colored::control::set_override(false);
        let mut fields = lab_fields();
        fields.insert("psk".to_string(), "short".to_string());
        fields.insert("vpn_name".to_string(), String::new());
        let result = build_document(&fields, &EnginePolicy::default());
        let report = CheckReport::from_result(&result, "embedded");
        assert!(!report.ok);
        assert_eq!(report.stage.as_deref(), Some("validate"));
        let text = render_check_text(&report, true);
        assert!(text.contains("Using policy: embedded"));
        assert!(text.contains("issues=2"));
        assert!(text.contains("- psk: PSK is invalid"));
        assert!(text.contains("- vpn_name: VPN name is invalid"));
    }

    #[test]
    fn unknown_profile_becomes_a_field_issue() {
        let mut fields = lab_fields();
        fields.insert("vpn_profile".to_string(), "nonexistent".to_string());
        let result = build_document(&fields, &EnginePolicy::default());
        let report = CheckReport::from_result(&result, "embedded");
        assert_eq!(report.stage.as_deref(), Some("profile"));
        assert_eq!(report.issues[0].field, "vpn_profile");
    }

    #[test]
    fn missing_fallback_points_at_the_wan_mode() {
        let mut fields = lab_fields();
        fields.insert("site1_wan_mode".to_string(), "dynamic".to_string());
        fields.remove("site1_wan_address");
        let result = build_document(&fields, &EnginePolicy::default());
        let report = CheckReport::from_result(&result, "embedded");
        assert_eq!(report.stage.as_deref(), Some("addressing"));
        assert_eq!(report.issues[0].field, "site1_wan_mode");
        assert!(report.issues[0].message.contains("dynamic_peer_fallback"));
    }

    #[test]
    fn profile_listing_includes_every_key() {
        colored::control::set_override(false);
        let text = render_profiles(catalog());
        for key in catalog().keys() {
            assert!(text.contains(key), "{key} missing from listing");
        }
    }
}
