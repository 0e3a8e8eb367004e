//! DNS wire-format decoding
//!
//! The parser borrows the packet it decodes: names and opaque rdata are
//! slices into the original buffer, so a [`Message`] can't outlive the bytes
//! it came from.

mod builder;
mod display;
mod enums;
mod error;
mod header;
mod name;
mod parser;
mod rrdata;
mod structs;

pub use self::builder::{Additional, Answers, Builder, MoveTo, Nameservers, Questions};
pub use self::enums::{Class, Opcode, ResponseCode, Type};
pub use self::error::DecodeError;
pub use self::header::{Counts, Header};
pub use self::name::Name;
pub use self::rrdata::RRData;
pub use self::structs::{Edns, Message, Question, ResourceRecord};

/// Decodes a raw DNS message
///
/// This is a shortcut for [`Message::parse`].
pub fn decode(buf: &[u8]) -> Result<Message<'_>, DecodeError> {
    Message::parse(buf)
}
