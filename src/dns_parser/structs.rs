use super::{Class, Counts, Header, Name, RRData, ResponseCode, Type};

/// Parsed DNS message
#[derive(Debug, Clone)]
pub struct Message<'a> {
    pub header: Header,
    pub questions: Vec<Question<'a>>,
    pub answers: Vec<ResourceRecord<'a>>,
    pub nameservers: Vec<ResourceRecord<'a>>,
    pub additional: Vec<ResourceRecord<'a>>,
}

/// A parsed chunk of data in the Query section of the packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question<'a> {
    pub qname: Name<'a>,
    pub qtype: Type,
    pub qclass: Class,
}

/// A single DNS record
///
/// Records of the types in [`RRData`] are decoded structurally; everything
/// else is kept as an unparsed slice of the packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord<'a> {
    pub name: Name<'a>,
    pub cls: Class,
    pub ttl: u32,
    pub data: RRData<'a>,
}

/// What the OPT pseudo-record (RFC 6891) says about the sender
///
/// Options are not interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edns<'a> {
    pub udp_payload_size: u16,
    pub extended_rcode: u8,
    pub version: u8,
    pub dnssec_ok: bool,
    pub options: &'a [u8],
}

impl<'a> ResourceRecord<'a> {
    pub fn typ(&self) -> Type {
        self.data.typ()
    }
}

impl<'a> Message<'a> {
    /// Declared section counts, equal to the section lengths
    pub fn counts(&self) -> Counts {
        self.header.counts()
    }

    pub fn rcode(&self) -> ResponseCode {
        self.header.response_code
    }

    pub fn first_question(&self) -> Option<&Question<'a>> {
        self.questions.first()
    }

    pub fn first_answer(&self) -> Option<&ResourceRecord<'a>> {
        self.answers.first()
    }

    /// The EDNS0 parameters, if the additional section carries an OPT record
    pub fn edns(&self) -> Option<Edns<'a>> {
        self.additional.iter().find_map(|rr| match rr.data {
            RRData::Unknown {
                typ: Type::OPT,
                data,
            } => Some(Edns {
                udp_payload_size: u16::from(rr.cls),
                extended_rcode: (rr.ttl >> 24) as u8,
                version: (rr.ttl >> 16) as u8,
                dnssec_ok: rr.ttl & 0x8000 != 0,
                options: data,
            }),
            _ => None,
        })
    }
}
