//! Decoding of DNS measurement results
//!
//! Probes in a distributed measurement network report each DNS response
//! they got as a base64 encoded wire-format buffer. This crate decodes those
//! buffers ([`dns_parser`]) and flattens a whole measurement into one
//! [`Record`] per probe and query ([`flatten`]), ready to be written out by
//! [`export`].

pub mod dns_parser;
pub mod export;
pub mod flatten;
pub mod results;

pub use crate::dns_parser::{decode, DecodeError, Message};
pub use crate::export::ExportOptions;
pub use crate::flatten::{flatten, flatten_parallel, Record};
pub use crate::results::{load, load_file, LoadError, ProbeResult, QueryResult, ResultBody};
