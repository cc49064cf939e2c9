//! Engine policy: defaults the builder applies when a request is silent.
//!
//! The policy ships embedded (`policy/default.toml`) and can be replaced by an
//! override file. Override files may be partial; any key they omit keeps its
//! built-in value.

use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{catalog, DhGroup};
use crate::model::DeadPeerDetection;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnginePolicy {
    /// Profile used when the request has no `vpn_profile`.
    pub default_profile: String,
    pub default_dh_group: DhGroup,
    /// Peer address advertised for a dynamically addressed WAN endpoint.
    /// Requests with a dynamic WAN are rejected while this is unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_peer_fallback: Option<Ipv4Addr>,
    /// Prefix length of the tunnel transfer network.
    pub tunnel_prefix: u8,
    pub description: String,
    pub ike: IkePolicy,
    pub ipsec: IpsecPolicy,
    pub management: ManagementPolicy,
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self {
            default_profile: "lab_legacy".to_string(),
            default_dh_group: DhGroup::MODP2048,
            dynamic_peer_fallback: None,
            tunnel_prefix: 30,
            description: "Auto-generated IPsec VPN between FortiGate and Palo Alto".to_string(),
            ike: IkePolicy::default(),
            ipsec: IpsecPolicy::default(),
            management: ManagementPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IkePolicy {
    pub version: String,
    pub id_type: String,
    pub lifetime_seconds: u32,
    pub nat_traversal: bool,
    pub dpd: DeadPeerDetection,
}

impl Default for IkePolicy {
    fn default() -> Self {
        Self {
            version: "ikev2".to_string(),
            id_type: "ip".to_string(),
            lifetime_seconds: 28800,
            nat_traversal: false,
            dpd: DeadPeerDetection::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpsecPolicy {
    pub pfs_enabled: bool,
    pub lifetime_seconds: u32,
}

impl Default for IpsecPolicy {
    fn default() -> Self {
        Self {
            pfs_enabled: true,
            lifetime_seconds: 3600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagementPolicy {
    pub protocol: String,
    pub port: u16,
}

impl Default for ManagementPolicy {
    fn default() -> Self {
        Self {
            protocol: "https".to_string(),
            port: 443,
        }
    }
}

/// Errors returned when loading a policy file.
#[derive(Debug, Error)]
pub enum PolicyLoadError {
    #[error("failed to read policy file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse policy file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid policy in {path}: {reason}")]
    Invalid { path: String, reason: String },
}

/// Built-in policy. Falls back to the compiled defaults if the embedded
/// file does not parse.
pub fn embedded_policy() -> EnginePolicy {
    let raw = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/policy/default.toml"));
    parse_policy(raw, "embedded policy".to_string()).unwrap_or_default()
}

/// Load the policy from `path`, or the embedded policy when `path` is `None`.
///
/// Returns the policy together with a label describing where it came from.
pub fn load_policy_with_source(
    path: Option<&Path>,
) -> Result<(EnginePolicy, String), PolicyLoadError> {
    let Some(path) = path else {
        return Ok((embedded_policy(), "embedded".to_string()));
    };
    let raw = fs::read_to_string(path).map_err(|source| PolicyLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let policy = parse_policy(&raw, path.display().to_string())?;
    Ok((policy, format!("file:{}", path.display())))
}

fn parse_policy(raw: &str, path: String) -> Result<EnginePolicy, PolicyLoadError> {
    let policy: EnginePolicy = toml::from_str(raw).map_err(|source| PolicyLoadError::Parse {
        path: path.clone(),
        source,
    })?;
    check_policy(&policy).map_err(|reason| PolicyLoadError::Invalid { path, reason })?;
    Ok(policy)
}

fn check_policy(policy: &EnginePolicy) -> Result<(), String> {
    if policy.tunnel_prefix > 32 {
        return Err(format!(
            "tunnel_prefix {} is larger than 32",
            policy.tunnel_prefix
        ));
    }
    if let Err(err) = catalog().get(&policy.default_profile) {
        return Err(format!("default_profile: {err}"));
    }
    if policy.management.port == 0 {
        return Err("management.port must be between 1 and 65535".to_string());
    }
    Ok(())
}
