//! Site-to-site IPsec configuration derivation for FortiGate / Palo Alto pairs.
//!
//! Given a handful of network and security parameters, this library derives a
//! complete and internally consistent VPN configuration for both firewalls:
//! matching crypto proposals in each vendor's vocabulary, cross-referenced
//! peer addresses, tunnel addressing in each vendor's notation, and the full
//! set of traffic selectors between the two sites' LANs.
//!
//! # Architecture
//!
//! - [`validate`]: Field-level checks; collects every problem in one pass
//! - [`catalog`]: Static table of crypto profiles and DH group resolution
//! - [`addressing`]: Peer, tunnel, subnet and route addressing
//! - [`builder`]: Pipeline and assembly of the [`model::ConfigurationDocument`]
//! - [`model`]: The canonical, immutable document
//! - [`policy`]: Engine defaults (embedded TOML, overridable)
//! - [`render`]: YAML/JSON serialization
//! - [`report`]: Terminal and JSON reports for the CLI
//!
//! # Examples
//!
//! ```ignore
//! use s2s_vpngen::builder::build_document;
//! use s2s_vpngen::policy::embedded_policy;
//! use s2s_vpngen::render::to_yaml;
//!
//! let doc = build_document(&fields, &embedded_policy())?;
//! println!("{}", to_yaml(&doc)?);
//! ```
//!
//! The engine is pure: no I/O, no shared mutable state, one document per call.

pub mod addressing;
pub mod builder;
pub mod catalog;
pub mod model;
pub mod policy;
pub mod render;
pub mod report;
pub mod validate;
