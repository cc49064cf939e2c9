use std::net::Ipv4Addr;

use crate::error::AddrError;

/// Parse a dotted-quad IPv4 literal.
///
/// Unlike [`Ipv4Addr`]'s `FromStr`, octets may carry leading zeros
/// (`010.001.001.001` is accepted). Each octet is one to three decimal
/// digits in `0..=255`. Surrounding whitespace is ignored; CIDR suffixes,
/// hostnames and IPv6 literals are rejected.
pub fn parse_ipv4(input: &str) -> Result<Ipv4Addr, AddrError> {
    let invalid = || AddrError::InvalidAddress(input.trim().to_string());
    let mut octets = [0u8; 4];
    let mut parts = input.trim().split('.');
    for slot in &mut octets {
        let part = parts.next().ok_or_else(invalid)?;
        *slot = parse_octet(part).ok_or_else(invalid)?;
    }
    if parts.next().is_some() {
        return Err(invalid());
    }
    Ok(Ipv4Addr::from(octets))
}

/// True when `input` is accepted by [`parse_ipv4`].
pub fn is_ipv4_literal(input: &str) -> bool {
    parse_ipv4(input).is_ok()
}

fn parse_octet(part: &str) -> Option<u8> {
    if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse::<u8>().ok()
}

#[cfg(test)]
mod tests {
    use super::{is_ipv4_literal, parse_ipv4};
    use std::net::Ipv4Addr;

    #[test]
    fn accepts_plain_and_zero_padded_octets() {
        assert_eq!(
            parse_ipv4("192.168.1.1").expect("plain"),
            Ipv4Addr::new(192, 168, 1, 1)
        );
        assert_eq!(
            parse_ipv4("010.001.000.255").expect("padded"),
            Ipv4Addr::new(10, 1, 0, 255)
        );
        assert_eq!(
            parse_ipv4("  10.0.0.1 ").expect("trimmed"),
            Ipv4Addr::new(10, 0, 0, 1)
        );
    }

    #[test]
    fn rejects_out_of_range_and_malformed() {
        for bad in [
            "",
            "256.1.1.1",
            "1.1.1",
            "1.1.1.1.1",
            "1..1.1",
            "0001.1.1.1",
            "10.0.0.1/24",
            "fw.example.net",
            "::1",
            "+1.1.1.1",
        ] {
            assert!(!is_ipv4_literal(bad), "{bad} should be rejected");
        }
    }
}
