//! Text dump of decoded messages, for diagnostics
//!
//! The layout follows the conventional presentation of a message: a few
//! header lines, then each section under a `;SECTION` marker, one entry per
//! line.

use std::fmt;

use super::{Header, Message, Question, ResourceRecord};

/// Renders as `name class type`, e.g. `example.com. IN A`
impl<'a> fmt::Display for Question<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.qname, self.qclass, self.qtype)
    }
}

impl<'a> fmt::Display for ResourceRecord<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.name,
            self.ttl,
            self.cls,
            self.typ(),
            self.data
        )
    }
}

fn write_flags(f: &mut fmt::Formatter, header: &Header) -> fmt::Result {
    let flags = [
        (header.response, "QR"),
        (header.authoritative, "AA"),
        (header.truncated, "TC"),
        (header.recursion_desired, "RD"),
        (header.recursion_available, "RA"),
        (header.authenticated_data, "AD"),
        (header.checking_disabled, "CD"),
    ];
    f.write_str("flags")?;
    for &(set, mnemonic) in flags.iter() {
        if set {
            write!(f, " {}", mnemonic)?;
        }
    }
    writeln!(f)
}

fn write_section(f: &mut fmt::Formatter, marker: &str, records: &[ResourceRecord]) -> fmt::Result {
    writeln!(f, ";{}", marker)?;
    for rr in records {
        writeln!(f, "{}", rr)?;
    }
    Ok(())
}

impl<'a> fmt::Display for Message<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "id {}", self.header.id)?;
        writeln!(f, "opcode {}", self.header.opcode)?;
        writeln!(f, "rcode {}", self.header.response_code)?;
        write_flags(f, &self.header)?;
        if let Some(edns) = self.edns() {
            writeln!(f, "edns {}", edns.version)?;
            writeln!(f, "payload {}", edns.udp_payload_size)?;
        }
        writeln!(f, ";QUESTION")?;
        for question in &self.questions {
            writeln!(f, "{}", question)?;
        }
        write_section(f, "ANSWER", &self.answers)?;
        write_section(f, "AUTHORITY", &self.nameservers)?;
        // no newline after the last marker
        f.write_str(";ADDITIONAL")?;
        for rr in &self.additional {
            write!(f, "\n{}", rr)?;
        }
        Ok(())
    }
}
