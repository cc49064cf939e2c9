//! Assembly of the [`ConfigurationDocument`].
//!
//! [`build_document`] runs the whole pipeline:
//!
//! 1. **Validate** raw fields ([`crate::validate`])
//! 2. **Resolve crypto** profile and DH group ([`crate::catalog`])
//! 3. **Resolve addressing** for peers, tunnels, LANs and routes
//!    ([`crate::addressing`])
//! 4. **Assemble** the immutable document ([`assemble`])
//!
//! The first failing stage aborts the build; no partial document is ever
//! returned. Inputs are borrowed and never modified.

use thiserror::Error;
use tracing::debug;

use crate::addressing::{resolve_addressing, AddressingError, ResolvedAddressing, ResolvedLan};
use crate::catalog::{resolve_crypto, ResolvedCrypto, UnknownProfile};
use crate::model::{
    ConfigurationDocument, IkeParameters, IkeProposal, IpsecParameters, IpsecProposal, LanSegment,
    Management, PaloAltoProposal, RouteEntry, SelectorPair, Site, SiteSlot, Sites, TunnelEndpoint,
    VpnMetadata, WanEndpoint,
};
use crate::policy::EnginePolicy;
use crate::validate::{validate_fields, RawFields, ValidatedInput, ValidationErrors};

/// Reason a document could not be built, wrapping the first failing stage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("profile resolution failed: {0}")]
    UnknownProfile(#[from] UnknownProfile),
    #[error("address derivation failed: {0}")]
    Address(#[from] AddressingError),
}

impl BuildError {
    /// Pipeline stage that failed, for reports.
    pub fn stage(&self) -> &'static str {
        match self {
            BuildError::Validation(_) => "validate",
            BuildError::UnknownProfile(_) => "profile",
            BuildError::Address(_) => "addressing",
        }
    }
}

/// Validate `fields`, resolve crypto and addressing, and assemble the document.
///
/// When the request has no `vpn_profile`, `policy.default_profile` is looked
/// up instead.
pub fn build_document(
    fields: &RawFields,
    policy: &EnginePolicy,
) -> Result<ConfigurationDocument, BuildError> {
    let input = validate_fields(fields)?;
    debug!(vpn = %input.vpn_name, "request validated");

    let profile_key = input
        .profile_key
        .as_deref()
        .unwrap_or(&policy.default_profile);
    let crypto = resolve_crypto(profile_key, input.dh_group, policy.default_dh_group)?;
    debug!(
        profile = crypto.profile.key,
        dh_group = crypto.dh_group.number(),
        "crypto profile resolved"
    );

    let addressing = resolve_addressing(&input, policy)?;
    debug!(tunnel_network = %addressing.tunnel_network, "addressing resolved");

    Ok(assemble(&input, &crypto, &addressing, policy))
}

/// Merge already-resolved parts into a document.
pub fn assemble(
    input: &ValidatedInput,
    crypto: &ResolvedCrypto,
    addressing: &ResolvedAddressing,
    policy: &EnginePolicy,
) -> ConfigurationDocument {
    let profile = crypto.profile;
    let dh_group = crypto.dh_group.number();
    let paloalto = PaloAltoProposal {
        encryption: profile.palo_encryption.to_string(),
        authentication: profile.palo_auth.to_string(),
    };
    let peer = |slot: SiteSlot| addressing.site(slot).peer_value.to_string();

    ConfigurationDocument {
        vpn: VpnMetadata {
            name: input.vpn_name.clone(),
            description: policy.description.clone(),
            tunnel_network: addressing.tunnel_network.clone(),
            profile: profile.key.to_string(),
        },
        sites: Sites {
            site1: build_site(SiteSlot::Site1, input, addressing, policy),
            site2: build_site(SiteSlot::Site2, input, addressing, policy),
        },
        ike: IkeParameters {
            version: policy.ike.version.clone(),
            psk: input.psk.clone(),
            id_type: policy.ike.id_type.clone(),
            site1_id_local: peer(SiteSlot::Site1),
            site1_id_remote: peer(SiteSlot::Site2),
            site2_id_local: peer(SiteSlot::Site2),
            site2_id_remote: peer(SiteSlot::Site1),
            proposal: IkeProposal {
                profile: profile.key.to_string(),
                encryption: profile.encryption.to_string(),
                integrity: profile.integrity.to_string(),
                dh_group,
                lifetime_seconds: policy.ike.lifetime_seconds,
                fortinet: profile.forti_phase1.to_string(),
                paloalto: paloalto.clone(),
            },
            dpd: policy.ike.dpd.clone(),
            nat_traversal: policy.ike.nat_traversal,
        },
        ipsec: IpsecParameters {
            mode: "tunnel".to_string(),
            protocol: "esp".to_string(),
            proposal: IpsecProposal {
                profile: profile.key.to_string(),
                encryption: profile.encryption.to_string(),
                integrity: profile.integrity.to_string(),
                pfs_enabled: policy.ipsec.pfs_enabled,
                pfs_dh_group: policy.ipsec.pfs_enabled.then_some(dh_group),
                lifetime_seconds: policy.ipsec.lifetime_seconds,
                fortinet: profile.forti_phase2.to_string(),
                paloalto,
            },
            selectors: cross_selectors(&addressing.site1.lans, &addressing.site2.lans),
        },
    }
}

/// Row-major cross product of site1 and site2 LANs.
///
/// `m` local and `n` remote LANs give `m * n` pairs ordered
/// `l1×r1, l1×r2, …, lm×rn`, named `s1-<lan>_to_s2-<lan>`.
pub fn cross_selectors(local: &[ResolvedLan], remote: &[ResolvedLan]) -> Vec<SelectorPair> {
    local
        .iter()
        .flat_map(|l| {
            remote.iter().map(move |r| SelectorPair {
                name: format!(
                    "{}-{}_to_{}-{}",
                    SiteSlot::Site1.tag(),
                    l.name,
                    SiteSlot::Site2.tag(),
                    r.name
                ),
                local_subnet: l.network(),
                remote_subnet: r.network(),
            })
        })
        .collect()
}

fn build_site(
    slot: SiteSlot,
    input: &ValidatedInput,
    addressing: &ResolvedAddressing,
    policy: &EnginePolicy,
) -> Site {
    let vendor = slot.vendor();
    let site = input.site(slot);
    let resolved = addressing.site(slot);
    let remote = addressing.site(slot.other());

    let wan = WanEndpoint {
        interface: site.wan.interface.clone(),
        mode: site.wan.mode,
        ip: resolved.wan.as_ref().map(|w| w.ip.clone()),
        mask: resolved.wan.as_ref().map(|w| w.mask.clone()),
        network: resolved.wan.as_ref().map(|w| w.network.clone()),
        gateway: site.wan.gateway.map(|gw| gw.to_string()),
        zone: site.wan.zone.clone(),
    };

    let lans = resolved
        .lans
        .iter()
        .map(|lan| LanSegment {
            name: lan.name.clone(),
            interface: lan.interface.clone(),
            ip: lan.ip(),
            mask: lan.mask(),
            network: lan.network(),
            subnet: lan.subnet_for(vendor),
            zone: site.lan_zone.clone(),
        })
        .collect();

    // FortiOS names the tunnel interface after the phase1; PAN-OS uses tunnel.N.
    let tunnel_interface = site
        .tunnel
        .interface
        .clone()
        .unwrap_or_else(|| input.vpn_name.clone());

    let tunnel = TunnelEndpoint {
        name: input.vpn_name.clone(),
        interface_type: vendor.tunnel_interface_type().to_string(),
        interface: site.tunnel.interface.clone(),
        ip: resolved.tunnel.ip.to_string(),
        address: resolved.tunnel.for_vendor(vendor).to_string(),
        remote_address: remote.tunnel.for_vendor(vendor).to_string(),
        zone: site.tunnel.zone.clone(),
        peer_wan_ip: addressing.peer_of(slot).to_string(),
        virtual_router: site.tunnel.virtual_router.clone(),
    };

    let routes = addressing
        .routes_for(slot)
        .into_iter()
        .map(|route| RouteEntry {
            name: route.name,
            destination: route.destination,
            interface: tunnel_interface.clone(),
            virtual_router: site.tunnel.virtual_router.clone(),
        })
        .collect();

    Site {
        name: format!("{}-{}", slot.key(), vendor.as_str()),
        role: slot.role(),
        vendor,
        management: Management {
            hostname: site
                .hostname
                .clone()
                .unwrap_or_else(|| vendor.default_hostname().to_string()),
            ip: site.management.ip.to_string(),
            username: site.management.username.clone(),
            password: site.management.password.clone(),
            protocol: policy.management.protocol.clone(),
            port: site.management.port.unwrap_or(policy.management.port),
        },
        wan,
        lans,
        tunnel,
        routes,
    }
}
