use thiserror::Error;

use super::Type;

/// Error decoding a DNS message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("packet is shorter than its header or records require")]
    Truncated,
    #[error("label in domain name has invalid length octet {0:#04x}")]
    InvalidLabel(u8),
    #[error("compression pointer at offset {pointer} refers to offset {target}")]
    CompressionLoop { pointer: usize, target: usize },
    #[error("wrong (too short or too long) size of {0} RDATA")]
    WrongRdataLength(Type),
    #[error("{0} octets of trailing data after the last section")]
    TrailingData(usize),
}
