use thiserror::Error;

/// Errors produced while parsing IPv4 literals and CIDR notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddrError {
    /// Input is not a dotted-quad IPv4 address.
    #[error("invalid IPv4 address: {0}")]
    InvalidAddress(String),
    /// The `/prefix` part is missing digits or exceeds 32.
    #[error("invalid prefix length in {0}")]
    InvalidPrefix(String),
}
