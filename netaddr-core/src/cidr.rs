use std::net::Ipv4Addr;

use ipnet::Ipv4Net;

use crate::error::AddrError;
use crate::literal::parse_ipv4;

/// Parse `a.b.c.d/len` into an [`Ipv4Net`], keeping the host bits.
///
/// A bare address without `/len` is read as a `/32` host route. The address
/// part follows [`parse_ipv4`], so zero-padded octets are accepted.
pub fn parse_cidr(input: &str) -> Result<Ipv4Net, AddrError> {
    let trimmed = input.trim();
    let (addr, prefix) = match trimmed.split_once('/') {
        Some((addr, len)) => (addr, parse_prefix(len, trimmed)?),
        None => (trimmed, 32),
    };
    let addr = parse_ipv4(addr)?;
    Ipv4Net::new(addr, prefix).map_err(|_| AddrError::InvalidPrefix(trimmed.to_string()))
}

/// Return the address portion of a CIDR string, dropping the mask.
pub fn strip_mask(input: &str) -> Result<Ipv4Addr, AddrError> {
    parse_cidr(input).map(|net| net.addr())
}

/// Render the network as `network/len` with host bits cleared.
pub fn network_cidr(net: &Ipv4Net) -> String {
    net.trunc().to_string()
}

/// Render the network as `network netmask`, e.g. `10.1.1.0 255.255.255.0`.
pub fn dotted_subnet(net: &Ipv4Net) -> String {
    format!("{} {}", net.network(), net.netmask())
}

/// Single-host form with a dotted all-ones mask.
pub fn host_dotted(ip: Ipv4Addr) -> String {
    format!("{ip} {}", Ipv4Addr::BROADCAST)
}

/// Single-host form in CIDR notation.
pub fn host_cidr(ip: Ipv4Addr) -> String {
    format!("{ip}/32")
}

fn parse_prefix(len: &str, whole: &str) -> Result<u8, AddrError> {
    let invalid = || AddrError::InvalidPrefix(whole.to_string());
    if len.is_empty() || len.len() > 2 || !len.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let prefix: u8 = len.parse().map_err(|_| invalid())?;
    if prefix > 32 {
        return Err(invalid());
    }
    Ok(prefix)
}
