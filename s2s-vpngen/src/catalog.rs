//! Built-in cryptographic profiles and their per-vendor algorithm names.
//!
//! A profile turns an intent ("lab", "production", "high security") into the
//! exact proposal strings each vendor expects, so both ends of the tunnel
//! always negotiate the same algorithms. The table is a `static` and is only
//! reachable through [`catalog`].
//!
//! The Diffie-Hellman group is deliberately not part of a profile: it is
//! resolved from an explicit override or the policy default in
//! [`resolve_crypto`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cipher strength class a profile targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CipherStrength {
    Legacy,
    Standard,
    High,
}

impl CipherStrength {
    pub fn as_str(self) -> &'static str {
        match self {
            CipherStrength::Legacy => "legacy",
            CipherStrength::Standard => "standard",
            CipherStrength::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VpnProfile {
    pub key: &'static str,
    pub label: &'static str,
    pub strength: CipherStrength,
    /// Vendor-neutral encryption name (`aes256`).
    pub encryption: &'static str,
    /// Vendor-neutral integrity name (`sha256`).
    pub integrity: &'static str,
    /// FortiOS `phase1-interface` proposal.
    pub forti_phase1: &'static str,
    /// FortiOS `phase2-interface` proposal.
    pub forti_phase2: &'static str,
    /// PAN-OS crypto profile encryption token.
    pub palo_encryption: &'static str,
    /// PAN-OS crypto profile authentication/hash token.
    pub palo_auth: &'static str,
}

static BUILTIN_PROFILES: [VpnProfile; 3] = [
    VpnProfile {
        key: "lab_legacy",
        label: "Lab / Legacy (DES, for export-restricted lab images)",
        strength: CipherStrength::Legacy,
        encryption: "des",
        integrity: "sha256",
        forti_phase1: "des-sha256",
        forti_phase2: "des-sha256",
        palo_encryption: "des-cbc",
        palo_auth: "sha256",
    },
    VpnProfile {
        key: "production_std",
        label: "Production Standard (AES-128)",
        strength: CipherStrength::Standard,
        encryption: "aes128",
        integrity: "sha256",
        forti_phase1: "aes128-sha256",
        forti_phase2: "aes128-sha256",
        palo_encryption: "aes-128-cbc",
        palo_auth: "sha256",
    },
    VpnProfile {
        key: "high_security",
        label: "High Security (AES-256)",
        strength: CipherStrength::High,
        encryption: "aes256",
        integrity: "sha256",
        forti_phase1: "aes256-sha256",
        forti_phase2: "aes256-sha256",
        palo_encryption: "aes-256-cbc",
        palo_auth: "sha256",
    },
];

static CATALOG: ProfileCatalog = ProfileCatalog {
    profiles: &BUILTIN_PROFILES,
};

/// Read-only accessor for the process-wide profile table.
pub fn catalog() -> &'static ProfileCatalog {
    &CATALOG
}

#[derive(Debug)]
pub struct ProfileCatalog {
    profiles: &'static [VpnProfile],
}

/// Lookup of a key that is not in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown VPN profile '{key}' (known profiles: {known})")]
pub struct UnknownProfile {
    pub key: String,
    pub known: String,
}

impl ProfileCatalog {
    pub fn get(&self, key: &str) -> Result<&'static VpnProfile, UnknownProfile> {
        let profiles: &'static [VpnProfile] = self.profiles;
        profiles
            .iter()
            .find(|p| p.key == key)
            .ok_or_else(|| UnknownProfile {
                key: key.to_string(),
                known: self.keys().join(", "),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static VpnProfile> {
        let profiles: &'static [VpnProfile] = self.profiles;
        profiles.iter()
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.iter().map(|p| p.key).collect()
    }
}

/// Diffie-Hellman group numbers both vendors can negotiate.
pub const SUPPORTED_DH_GROUPS: [u8; 9] = [1, 2, 5, 14, 15, 16, 19, 20, 21];

/// A Diffie-Hellman group known to be supported on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DhGroup(u8);

impl DhGroup {
    /// 2048-bit MODP, the policy default.
    pub const MODP2048: DhGroup = DhGroup(14);

    pub fn number(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported Diffie-Hellman group '{0}'")]
pub struct UnsupportedDhGroup(pub String);

impl TryFrom<u8> for DhGroup {
    type Error = UnsupportedDhGroup;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if SUPPORTED_DH_GROUPS.contains(&value) {
            Ok(DhGroup(value))
        } else {
            Err(UnsupportedDhGroup(value.to_string()))
        }
    }
}

impl From<DhGroup> for u8 {
    fn from(group: DhGroup) -> Self {
        group.0
    }
}

impl FromStr for DhGroup {
    type Err = UnsupportedDhGroup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let number: u8 = trimmed
            .parse()
            .map_err(|_| UnsupportedDhGroup(trimmed.to_string()))?;
        DhGroup::try_from(number)
    }
}

impl fmt::Display for DhGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A profile paired with the DH group that applies to this request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedCrypto {
    pub profile: &'static VpnProfile,
    pub dh_group: DhGroup,
}

/// Look up `key` and settle the DH group: explicit override first, then
/// `default_dh`.
pub fn resolve_crypto(
    key: &str,
    dh_override: Option<DhGroup>,
    default_dh: DhGroup,
) -> Result<ResolvedCrypto, UnknownProfile> {
    let profile = catalog().get(key)?;
    Ok(ResolvedCrypto {
        profile,
        dh_group: dh_override.unwrap_or(default_dh),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_key_resolves() {
        for key in ["lab_legacy", "production_std", "high_security"] {
            let profile = catalog().get(key).expect("builtin profile");
            assert_eq!(profile.key, key);
        }
    }

    #[test]
    fn unknown_key_is_an_error_not_a_default() {
        let err = catalog().get("nonexistent").expect_err("unknown profile");
        assert_eq!(err.key, "nonexistent");
        assert!(err.known.contains("lab_legacy"));
        assert!(err.to_string().contains("nonexistent"));
    }

    #[test]
    fn vendor_tokens_agree_with_strength() {
        let high = catalog().get("high_security").expect("profile");
        assert_eq!(high.forti_phase1, "aes256-sha256");
        assert_eq!(high.palo_encryption, "aes-256-cbc");
        let legacy = catalog().get("lab_legacy").expect("profile");
        assert_eq!(legacy.forti_phase2, "des-sha256");
        assert_eq!(legacy.palo_encryption, "des-cbc");
    }

    #[test]
    fn dh_override_wins_over_default() {
        let group = DhGroup::try_from(21).expect("group 21");
        let resolved =
            resolve_crypto("high_security", Some(group), DhGroup::MODP2048).expect("resolve");
        assert_eq!(resolved.dh_group.number(), 21);

        let resolved = resolve_crypto("high_security", None, DhGroup::MODP2048).expect("resolve");
        assert_eq!(resolved.dh_group, DhGroup::MODP2048);
    }

    #[test]
    fn dh_group_parsing_rejects_unsupported_numbers() {
        assert_eq!("14".parse::<DhGroup>(), Ok(DhGroup::MODP2048));
        assert!("3".parse::<DhGroup>().is_err());
        assert!("modp2048".parse::<DhGroup>().is_err());
        assert!(DhGroup::try_from(0).is_err());
    }
}
