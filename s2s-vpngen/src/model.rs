//! Canonical configuration document produced by the builder.
//!
//! Every type here serializes in field declaration order so the rendered
//! YAML/JSON is stable across runs. Values are filled once by
//! [`crate::builder`] and never mutated afterwards.

use std::str::FromStr;

use netaddr_core::{dotted_subnet, network_cidr, Ipv4Net};
use serde::{Deserialize, Serialize};

/// Firewall vendor family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Vendor {
    #[serde(rename = "fortinet")]
    Fortinet,
    #[serde(rename = "paloalto")]
    PaloAlto,
}

impl Vendor {
    pub fn as_str(self) -> &'static str {
        match self {
            Vendor::Fortinet => "fortinet",
            Vendor::PaloAlto => "paloalto",
        }
    }

    /// Longest interface/zone name accepted for this vendor.
    pub fn name_limit(self) -> usize {
        match self {
            Vendor::Fortinet => 20,
            Vendor::PaloAlto => 30,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Vendor::Fortinet => "FortiGate",
            Vendor::PaloAlto => "Palo Alto",
        }
    }

    pub fn default_hostname(self) -> &'static str {
        match self {
            Vendor::Fortinet => "FGT-S1",
            Vendor::PaloAlto => "PA-S2",
        }
    }

    pub fn tunnel_interface_type(self) -> &'static str {
        match self {
            Vendor::Fortinet => "ipsec",
            Vendor::PaloAlto => "tunnel",
        }
    }

    /// Subnet literal as this vendor writes it.
    ///
    /// FortiOS takes `network netmask`; PAN-OS takes `network/len`.
    /// Host bits are always cleared.
    pub fn subnet_form(self, net: &Ipv4Net) -> String {
        match self {
            Vendor::Fortinet => dotted_subnet(net),
            Vendor::PaloAlto => network_cidr(net),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Primary,
    Secondary,
}

/// How a WAN interface obtains its address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointMode {
    Static,
    Dynamic,
}

impl FromStr for EndpointMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "static" => Ok(EndpointMode::Static),
            "dynamic" => Ok(EndpointMode::Dynamic),
            other => Err(format!("unknown endpoint mode '{other}'")),
        }
    }
}

/// One of the two fixed positions in the pairing.
///
/// Site1 is always the FortiGate primary, site2 the Palo Alto secondary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteSlot {
    Site1,
    Site2,
}

impl SiteSlot {
    /// Prefix used by input field names (`site1_wan_if`).
    pub fn key(self) -> &'static str {
        match self {
            SiteSlot::Site1 => "site1",
            SiteSlot::Site2 => "site2",
        }
    }

    /// Short tag used in generated object names (`s1-lan1`).
    pub fn tag(self) -> &'static str {
        match self {
            SiteSlot::Site1 => "s1",
            SiteSlot::Site2 => "s2",
        }
    }

    pub fn vendor(self) -> Vendor {
        match self {
            SiteSlot::Site1 => Vendor::Fortinet,
            SiteSlot::Site2 => Vendor::PaloAlto,
        }
    }

    pub fn role(self) -> Role {
        match self {
            SiteSlot::Site1 => Role::Primary,
            SiteSlot::Site2 => Role::Secondary,
        }
    }

    pub fn other(self) -> SiteSlot {
        match self {
            SiteSlot::Site1 => SiteSlot::Site2,
            SiteSlot::Site2 => SiteSlot::Site1,
        }
    }

    pub fn label(self) -> String {
        format!("{} {}", self.key(), self.vendor().display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationDocument {
    pub vpn: VpnMetadata,
    pub sites: Sites,
    pub ike: IkeParameters,
    pub ipsec: IpsecParameters,
}

impl ConfigurationDocument {
    pub fn site(&self, slot: SiteSlot) -> &Site {
        match slot {
            SiteSlot::Site1 => &self.sites.site1,
            SiteSlot::Site2 => &self.sites.site2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VpnMetadata {
    pub name: String,
    pub description: String,
    pub tunnel_network: String,
    pub profile: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sites {
    pub site1: Site,
    pub site2: Site,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Site {
    pub name: String,
    pub role: Role,
    pub vendor: Vendor,
    pub management: Management,
    pub wan: WanEndpoint,
    pub lans: Vec<LanSegment>,
    pub tunnel: TunnelEndpoint,
    pub routes: Vec<RouteEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Management {
    pub hostname: String,
    pub ip: String,
    pub username: String,
    pub password: String,
    pub protocol: String,
    pub port: u16,
}

/// WAN side of a site. Address fields are absent for dynamic endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WanEndpoint {
    pub interface: String,
    pub mode: EndpointMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    pub zone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanSegment {
    pub name: String,
    pub interface: String,
    pub ip: String,
    pub mask: String,
    pub network: String,
    /// `network` in the owning vendor's notation.
    pub subnet: String,
    pub zone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TunnelEndpoint {
    pub name: String,
    pub interface_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    pub ip: String,
    /// Local tunnel IP in the owning vendor's notation.
    pub address: String,
    /// Peer tunnel IP in the owning vendor's notation.
    pub remote_address: String,
    pub zone: String,
    pub peer_wan_ip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_router: Option<String>,
}

/// Static route toward one remote LAN through the tunnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub name: String,
    pub destination: String,
    pub interface: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_router: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IkeParameters {
    pub version: String,
    pub psk: String,
    pub id_type: String,
    pub site1_id_local: String,
    pub site1_id_remote: String,
    pub site2_id_local: String,
    pub site2_id_remote: String,
    pub proposal: IkeProposal,
    pub dpd: DeadPeerDetection,
    pub nat_traversal: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IkeProposal {
    pub profile: String,
    pub encryption: String,
    pub integrity: String,
    pub dh_group: u8,
    pub lifetime_seconds: u32,
    pub fortinet: String,
    pub paloalto: PaloAltoProposal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaloAltoProposal {
    pub encryption: String,
    pub authentication: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadPeerDetection {
    pub enabled: bool,
    pub interval_seconds: u32,
    pub retries: u32,
    pub action: String,
}

impl Default for DeadPeerDetection {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 10,
            retries: 3,
            action: "restart".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IpsecParameters {
    pub mode: String,
    pub protocol: String,
    pub proposal: IpsecProposal,
    pub selectors: Vec<SelectorPair>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IpsecProposal {
    pub profile: String,
    pub encryption: String,
    pub integrity: String,
    pub pfs_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pfs_dh_group: Option<u8>,
    pub lifetime_seconds: u32,
    pub fortinet: String,
    pub paloalto: PaloAltoProposal,
}

/// One local/remote subnet pair allowed through the tunnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorPair {
    pub name: String,
    pub local_subnet: String,
    pub remote_subnet: String,
}
