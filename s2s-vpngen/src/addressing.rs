//! Peer, tunnel, subnet and route addressing for both sites.
//!
//! Every address is parsed once and rendered into each vendor's notation from
//! that single parsed value. Unparsable input is an [`AddressParseError`]
//! naming the field; nothing is passed through verbatim. A dynamic endpoint
//! needs `dynamic_peer_fallback` in the policy.

use std::net::Ipv4Addr;

use netaddr_core::{
    dotted_subnet, host_cidr, host_dotted, network_cidr, parse_cidr, AddrError, Ipv4Net,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{EndpointMode, SiteSlot, Vendor};
use crate::policy::EnginePolicy;
use crate::validate::{SiteInput, ValidatedInput};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: cannot parse address '{value}': {source}")]
pub struct AddressParseError {
    pub field: String,
    pub value: String,
    #[source]
    pub source: AddrError,
}

/// Why a site's addressing could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressingError {
    #[error(transparent)]
    Parse(#[from] AddressParseError),
    #[error("{field}: dynamic WAN endpoint but the policy sets no dynamic_peer_fallback")]
    MissingFallback { field: String },
}

impl AddressingError {
    /// Request field the error refers to.
    pub fn field(&self) -> &str {
        match self {
            AddressingError::Parse(e) => &e.field,
            AddressingError::MissingFallback { field } => field,
        }
    }
}

fn parse_field(field: &str, value: &str) -> Result<Ipv4Net, AddressParseError> {
    parse_cidr(value).map_err(|source| AddressParseError {
        field: field.to_string(),
        value: value.to_string(),
        source,
    })
}

/// FortiOS subnet notation of `cidr` read from `field`:
/// `10.1.1.5/24` becomes `10.1.1.0 255.255.255.0`.
pub fn to_forti_subnet(field: &str, cidr: &str) -> Result<String, AddressParseError> {
    parse_field(field, cidr).map(|net| dotted_subnet(&net))
}

/// Address the *other* site should use as this endpoint's IPsec peer.
///
/// A static endpoint contributes its own WAN address (read from `field`) with
/// the mask stripped. A dynamic endpoint has no stable address, so `fallback`
/// is used instead and must be configured.
pub fn peer_value(
    field: &str,
    mode: EndpointMode,
    wan_address: Option<&str>,
    fallback: Option<Ipv4Addr>,
) -> Result<Ipv4Addr, AddressingError> {
    match mode {
        EndpointMode::Static => {
            let value = wan_address.unwrap_or("");
            Ok(parse_field(field, value)?.addr())
        }
        EndpointMode::Dynamic => {
            let fallback = fallback.ok_or_else(|| AddressingError::MissingFallback {
                field: field.to_string(),
            })?;
            warn!(field, %fallback, "dynamic WAN endpoint, using fallback peer address");
            Ok(fallback)
        }
    }
}

/// One tunnel IP and both vendor renderings of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TunnelAddress {
    pub ip: Ipv4Addr,
    /// `ip 255.255.255.255`
    pub host_mask: String,
    /// `ip/32`
    pub host_cidr: String,
}

impl TunnelAddress {
    pub fn from_ip(ip: Ipv4Addr) -> Self {
        Self {
            ip,
            host_mask: host_dotted(ip),
            host_cidr: host_cidr(ip),
        }
    }

    pub fn for_vendor(&self, vendor: Vendor) -> &str {
        match vendor {
            Vendor::Fortinet => &self.host_mask,
            Vendor::PaloAlto => &self.host_cidr,
        }
    }
}

/// Parsed WAN address of a static endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WanAddressing {
    pub ip: String,
    pub mask: String,
    pub network: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLan {
    /// `lan1`, `lan2`, ... in input order.
    pub name: String,
    pub interface: String,
    /// Interface address with its prefix; host bits intact.
    pub net: Ipv4Net,
}

impl ResolvedLan {
    pub fn ip(&self) -> String {
        self.net.addr().to_string()
    }

    pub fn mask(&self) -> String {
        self.net.netmask().to_string()
    }

    /// Normalized `network/len`.
    pub fn network(&self) -> String {
        network_cidr(&self.net)
    }

    pub fn subnet_for(&self, vendor: Vendor) -> String {
        vendor.subnet_form(&self.net)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteAddressing {
    pub vendor: Vendor,
    /// `None` for a dynamic endpoint.
    pub wan: Option<WanAddressing>,
    /// Value the other site configures as this site's peer.
    pub peer_value: Ipv4Addr,
    pub lans: Vec<ResolvedLan>,
    pub tunnel: TunnelAddress,
}

/// Route toward one remote LAN, destination already in the local vendor's form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteAddressing {
    pub name: String,
    pub destination: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddressing {
    pub site1: SiteAddressing,
    pub site2: SiteAddressing,
    pub tunnel_network: String,
}

impl ResolvedAddressing {
    pub fn site(&self, slot: SiteSlot) -> &SiteAddressing {
        match slot {
            SiteSlot::Site1 => &self.site1,
            SiteSlot::Site2 => &self.site2,
        }
    }

    /// Peer WAN IP configured on `slot`, i.e. the other site's peer value.
    pub fn peer_of(&self, slot: SiteSlot) -> Ipv4Addr {
        self.site(slot.other()).peer_value
    }

    /// Routes `slot` needs toward every LAN of the other site.
    pub fn routes_for(&self, slot: SiteSlot) -> Vec<RouteAddressing> {
        let vendor = self.site(slot).vendor;
        let remote = slot.other();
        self.site(remote)
            .lans
            .iter()
            .map(|lan| RouteAddressing {
                name: format!("to-{}-{}", remote.tag(), lan.name),
                destination: lan.subnet_for(vendor),
            })
            .collect()
    }
}

/// Resolve addressing for both sites. Stops at the first unparsable value.
pub fn resolve_addressing(
    input: &ValidatedInput,
    policy: &EnginePolicy,
) -> Result<ResolvedAddressing, AddressingError> {
    let site1 = resolve_site(SiteSlot::Site1, &input.site1, policy)?;
    let site2 = resolve_site(SiteSlot::Site2, &input.site2, policy)?;
    if site1.wan.is_none() && site2.wan.is_none() {
        warn!(
            peer = %site1.peer_value,
            "both WAN endpoints are dynamic; each side will dial the fallback address"
        );
    }

    let tunnel_field = format!("{}_tunnel_ip", SiteSlot::Site1.key());
    let tunnel_net = parse_field(
        &tunnel_field,
        &format!("{}/{}", site1.tunnel.ip, policy.tunnel_prefix),
    )?;
    if !tunnel_net.trunc().contains(&site2.tunnel.ip) {
        warn!(
            tunnel_network = %tunnel_net.trunc(),
            site2_tunnel_ip = %site2.tunnel.ip,
            "site2 tunnel IP is outside the tunnel network"
        );
    }

    Ok(ResolvedAddressing {
        site1,
        site2,
        tunnel_network: network_cidr(&tunnel_net),
    })
}

fn resolve_site(
    slot: SiteSlot,
    site: &SiteInput,
    policy: &EnginePolicy,
) -> Result<SiteAddressing, AddressingError> {
    let key = slot.key();
    let wan_field = format!("{key}_wan_address");
    let mode_field = format!("{key}_wan_mode");

    let wan = match (site.wan.mode, site.wan.address.as_deref()) {
        (EndpointMode::Static, Some(raw)) => {
            let net = parse_field(&wan_field, raw)?;
            Some(WanAddressing {
                ip: net.addr().to_string(),
                mask: net.netmask().to_string(),
                network: network_cidr(&net),
            })
        }
        _ => None,
    };
    let peer_field = match site.wan.mode {
        EndpointMode::Static => &wan_field,
        EndpointMode::Dynamic => &mode_field,
    };
    let peer = peer_value(
        peer_field,
        site.wan.mode,
        site.wan.address.as_deref(),
        policy.dynamic_peer_fallback,
    )?;

    let lans_field = format!("{key}_lans");
    let lans = site
        .lans
        .iter()
        .enumerate()
        .map(|(idx, lan)| -> Result<ResolvedLan, AddressParseError> {
            Ok(ResolvedLan {
                name: format!("lan{}", idx + 1),
                interface: lan.interface.clone(),
                net: parse_field(&lans_field, &lan.cidr)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(site = key, peer = %peer, lans = lans.len(), "resolved site addressing");

    Ok(SiteAddressing {
        vendor: slot.vendor(),
        wan,
        peer_value: peer,
        lans,
        tunnel: TunnelAddress::from_ip(site.tunnel.ip),
    })
}
