//! IPv4 parsing and formatting primitives shared by firewall configuration tools.
//!
//! Firewall vendors disagree on how the same address is written: some want
//! `network netmask` pairs, others want CIDR. This crate parses user input
//! strictly and renders either form from one parsed value.

pub mod cidr;
pub mod error;
pub mod literal;

pub use cidr::{dotted_subnet, host_cidr, host_dotted, network_cidr, parse_cidr, strip_mask};
pub use error::AddrError;
pub use ipnet::Ipv4Net;
pub use literal::{is_ipv4_literal, parse_ipv4};
