//! Field-level validation of a raw request.
//!
//! Every check runs regardless of earlier failures so the caller gets the
//! full list of problems in one pass. CIDR-valued fields are only checked for
//! presence here; parsing happens in [`crate::addressing`].

use std::collections::BTreeMap;
use std::fmt;
use std::net::Ipv4Addr;

use netaddr_core::parse_ipv4;
use serde::Serialize;
use thiserror::Error;

use crate::catalog::DhGroup;
use crate::model::{EndpointMode, SiteSlot, Vendor};

/// Raw request fields keyed by canonical field name.
pub type RawFields = BTreeMap<String, String>;

pub const VPN_NAME_MAX: usize = 30;
pub const PSK_MIN_LEN: usize = 12;
/// Limit for names that are not tied to one vendor's interface naming.
pub const GENERIC_NAME_MAX: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All problems found in one request, in check order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} invalid input field(s): {}", .issues.len(), summary(.issues))]
pub struct ValidationErrors {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationErrors {
    pub fn has_field(&self, field: &str) -> bool {
        self.issues.iter().any(|i| i.field == field)
    }
}

fn summary(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|i| i.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Sanitized request. Only produced when every check passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedInput {
    pub vpn_name: String,
    pub psk: String,
    pub profile_key: Option<String>,
    pub dh_group: Option<DhGroup>,
    pub site1: SiteInput,
    pub site2: SiteInput,
}

impl ValidatedInput {
    pub fn site(&self, slot: SiteSlot) -> &SiteInput {
        match slot {
            SiteSlot::Site1 => &self.site1,
            SiteSlot::Site2 => &self.site2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteInput {
    pub hostname: Option<String>,
    pub management: ManagementInput,
    pub wan: WanInput,
    pub lan_zone: String,
    pub lans: Vec<LanInput>,
    pub tunnel: TunnelInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagementInput {
    pub ip: Ipv4Addr,
    pub username: String,
    pub password: String,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WanInput {
    pub interface: String,
    pub zone: String,
    pub mode: EndpointMode,
    /// Unparsed CIDR; `None` for dynamic endpoints.
    pub address: Option<String>,
    pub gateway: Option<Ipv4Addr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanInput {
    pub interface: String,
    /// Unparsed `ip/len` of the LAN interface.
    pub cidr: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TunnelInput {
    pub ip: Ipv4Addr,
    pub zone: String,
    /// Tunnel interface name; only Palo Alto sites carry one.
    pub interface: Option<String>,
    /// Virtual router; only Palo Alto sites carry one.
    pub virtual_router: Option<String>,
}

/// True if `value` is 1..=`max` characters of `[A-Za-z0-9_-]`.
pub fn is_valid_name(value: &str, max: usize) -> bool {
    !value.is_empty()
        && value.chars().count() <= max
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// True if `psk` is at least [`PSK_MIN_LEN`] characters with no whitespace.
pub fn is_valid_psk(psk: &str) -> bool {
    psk.chars().count() >= PSK_MIN_LEN && !psk.chars().any(char::is_whitespace)
}

/// Validate every field of `fields` and collect all failures.
pub fn validate_fields(fields: &RawFields) -> Result<ValidatedInput, ValidationErrors> {
    let mut check = FieldCheck::new(fields);

    let vpn_name = check.name("vpn_name", "VPN name", VPN_NAME_MAX);
    let psk = check.psk("psk");
    let profile_key = check.optional("vpn_profile").map(ToOwned::to_owned);
    let dh_group = check.dh_group("dh_group");
    let site1 = check.site(SiteSlot::Site1);
    let site2 = check.site(SiteSlot::Site2);

    if !check.issues.is_empty() {
        return Err(ValidationErrors {
            issues: check.issues,
        });
    }

    Ok(ValidatedInput {
        vpn_name,
        psk,
        profile_key,
        dh_group,
        site1,
        site2,
    })
}

/// Accumulates issues while extracting values.
///
/// Extractors return a placeholder after recording an issue; the placeholder
/// never escapes because [`validate_fields`] returns `Err` whenever an issue
/// exists.
struct FieldCheck<'a> {
    fields: &'a RawFields,
    issues: Vec<ValidationIssue>,
}

impl<'a> FieldCheck<'a> {
    fn new(fields: &'a RawFields) -> Self {
        Self {
            fields,
            issues: Vec::new(),
        }
    }

    fn fail(&mut self, field: &str, message: String) {
        self.issues.push(ValidationIssue {
            field: field.to_string(),
            message,
        });
    }

    fn raw(&self, field: &str) -> &'a str {
        self.fields.get(field).map(String::as_str).unwrap_or("")
    }

    fn optional(&self, field: &str) -> Option<&'a str> {
        Some(self.raw(field).trim()).filter(|v| !v.is_empty())
    }

    /// Names are checked as given; surrounding whitespace is an error.
    fn name(&mut self, field: &str, label: &str, max: usize) -> String {
        let value = self.raw(field);
        if !is_valid_name(value, max) {
            self.fail(
                field,
                format!("{label} is invalid (max {max} chars, letters/digits/_/-)"),
            );
        }
        value.to_string()
    }

    fn optional_name(&mut self, field: &str, label: &str, max: usize) -> Option<String> {
        self.optional(field)?;
        Some(self.name(field, label, max))
    }

    fn required(&mut self, field: &str, label: &str) -> String {
        let value = self.raw(field);
        if value.trim().is_empty() {
            self.fail(field, format!("{label} is required"));
        }
        value.to_string()
    }

    fn psk(&mut self, field: &str) -> String {
        let value = self.raw(field);
        if !is_valid_psk(value) {
            self.fail(
                field,
                format!("PSK is invalid (minimum {PSK_MIN_LEN} characters, no spaces)"),
            );
        }
        value.to_string()
    }

    fn ipv4(&mut self, field: &str, label: &str) -> Ipv4Addr {
        match parse_ipv4(self.raw(field)) {
            Ok(ip) => ip,
            Err(_) => {
                self.fail(field, format!("{label} is not a valid IPv4 address"));
                Ipv4Addr::UNSPECIFIED
            }
        }
    }

    fn optional_ipv4(&mut self, field: &str, label: &str) -> Option<Ipv4Addr> {
        self.optional(field)?;
        Some(self.ipv4(field, label))
    }

    fn port(&mut self, field: &str, label: &str) -> Option<u16> {
        let value = self.optional(field)?;
        match value.parse::<u16>() {
            Ok(port) if port > 0 => Some(port),
            _ => {
                self.fail(field, format!("{label} must be a port between 1 and 65535"));
                None
            }
        }
    }

    fn dh_group(&mut self, field: &str) -> Option<DhGroup> {
        let value = self.optional(field)?;
        match value.parse::<DhGroup>() {
            Ok(group) => Some(group),
            Err(err) => {
                self.fail(field, err.to_string());
                None
            }
        }
    }

    fn mode(&mut self, field: &str, label: &str) -> EndpointMode {
        let Some(value) = self.optional(field) else {
            return EndpointMode::Static;
        };
        match value.parse::<EndpointMode>() {
            Ok(mode) => mode,
            Err(_) => {
                self.fail(field, format!("{label} must be 'static' or 'dynamic'"));
                EndpointMode::Static
            }
        }
    }

    fn site(&mut self, slot: SiteSlot) -> SiteInput {
        let vendor = slot.vendor();
        let limit = vendor.name_limit();
        let key = slot.key();
        let label = slot.label();
        let f = |suffix: &str| format!("{key}_{suffix}");

        let hostname = self.optional_name(
            &f("hostname"),
            &format!("{label} hostname"),
            GENERIC_NAME_MAX,
        );
        let management = ManagementInput {
            ip: self.ipv4(&f("mgmt_ip"), &format!("{label} management IP")),
            username: self.required(&f("mgmt_user"), &format!("{label} user")),
            password: self.required(&f("mgmt_pass"), &format!("{label} password")),
            port: self.port(&f("mgmt_port"), &format!("{label} management port")),
        };

        let interface = self.name(&f("wan_if"), &format!("{label} WAN interface"), limit);
        let zone = self.name(&f("wan_zone"), &format!("{label} WAN zone"), limit);
        let mode = self.mode(&f("wan_mode"), &format!("{label} WAN mode"));
        let address = self.wan_address(&f("wan_address"), &label, mode);
        let gateway = self.optional_ipv4(&f("wan_gateway"), &format!("{label} WAN gateway"));
        let wan = WanInput {
            interface,
            zone,
            mode,
            address,
            gateway,
        };

        let lan_zone = self.name(&f("lan_zone"), &format!("{label} LAN zone"), limit);
        let lans = self.lans(&f("lans"), &label, limit);

        let tunnel = TunnelInput {
            ip: self.ipv4(&f("tunnel_ip"), &format!("{label} tunnel IP")),
            zone: self.name(&f("tunnel_zone"), &format!("{label} tunnel zone"), limit),
            interface: match vendor {
                Vendor::PaloAlto => Some(self.name(
                    &f("tunnel_if"),
                    &format!("{label} tunnel interface"),
                    limit,
                )),
                Vendor::Fortinet => None,
            },
            virtual_router: match vendor {
                Vendor::PaloAlto => Some(self.name(
                    &f("vr_name"),
                    &format!("{label} virtual router"),
                    limit,
                )),
                Vendor::Fortinet => None,
            },
        };

        SiteInput {
            hostname,
            management,
            wan,
            lan_zone,
            lans,
            tunnel,
        }
    }

    fn wan_address(&mut self, field: &str, label: &str, mode: EndpointMode) -> Option<String> {
        let value = self.optional(field);
        match (mode, value) {
            (EndpointMode::Static, Some(v)) => Some(v.to_string()),
            (EndpointMode::Static, None) => {
                self.fail(
                    field,
                    format!("{label} WAN address is required for a static endpoint"),
                );
                None
            }
            (EndpointMode::Dynamic, None) => None,
            (EndpointMode::Dynamic, Some(_)) => {
                self.fail(
                    field,
                    format!("{label} WAN address must be empty for a dynamic endpoint"),
                );
                None
            }
        }
    }

    /// Parse `interface:cidr[, interface:cidr...]`.
    fn lans(&mut self, field: &str, label: &str, limit: usize) -> Vec<LanInput> {
        let value = self.raw(field);
        if value.trim().is_empty() {
            self.fail(field, format!("{label} needs at least one LAN (interface:cidr)"));
            return Vec::new();
        }

        let mut lans = Vec::new();
        for (idx, entry) in value.split(',').enumerate() {
            let position = idx + 1;
            let Some((interface, cidr)) = entry.split_once(':') else {
                self.fail(
                    field,
                    format!("{label} LAN entry {position} '{entry}' is not interface:cidr"),
                );
                continue;
            };
            let cidr = cidr.trim();
            if !is_valid_name(interface, limit) {
                self.fail(
                    field,
                    format!(
                        "{label} LAN entry {position} interface is invalid (max {limit} chars, letters/digits/_/-)"
                    ),
                );
            }
            if cidr.is_empty() {
                self.fail(field, format!("{label} LAN entry {position} has no subnet"));
            }
            lans.push(LanInput {
                interface: interface.to_string(),
                cidr: cidr.to_string(),
            });
        }
        lans
    }
}
