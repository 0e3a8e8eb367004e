use std::fmt;

/// The TYPE value of a resource record or question
///
/// Only the types this crate decodes structurally, plus a few that show up
/// often in measurement responses, get a variant of their own. Everything
/// else round-trips through `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// a host address
    A,
    /// an authoritative name server
    NS,
    /// the canonical name for an alias
    CNAME,
    /// marks the start of a zone of authority
    SOA,
    /// a domain name pointer
    PTR,
    /// mail exchange
    MX,
    /// text strings
    TXT,
    /// IPv6 host address (RFC 3596)
    AAAA,
    /// service record (RFC 2782)
    SRV,
    /// EDNS0 pseudo-record (RFC 6891)
    OPT,
    DS,
    RRSIG,
    NSEC,
    DNSKEY,
    HTTPS,
    /// a request for all records (question only)
    ANY,
    Unknown(u16),
}

impl From<u16> for Type {
    fn from(code: u16) -> Type {
        match code {
            1 => Type::A,
            2 => Type::NS,
            5 => Type::CNAME,
            6 => Type::SOA,
            12 => Type::PTR,
            15 => Type::MX,
            16 => Type::TXT,
            28 => Type::AAAA,
            33 => Type::SRV,
            41 => Type::OPT,
            43 => Type::DS,
            46 => Type::RRSIG,
            47 => Type::NSEC,
            48 => Type::DNSKEY,
            65 => Type::HTTPS,
            255 => Type::ANY,
            other => Type::Unknown(other),
        }
    }
}

impl From<Type> for u16 {
    fn from(typ: Type) -> u16 {
        match typ {
            Type::A => 1,
            Type::NS => 2,
            Type::CNAME => 5,
            Type::SOA => 6,
            Type::PTR => 12,
            Type::MX => 15,
            Type::TXT => 16,
            Type::AAAA => 28,
            Type::SRV => 33,
            Type::OPT => 41,
            Type::DS => 43,
            Type::RRSIG => 46,
            Type::NSEC => 47,
            Type::DNSKEY => 48,
            Type::HTTPS => 65,
            Type::ANY => 255,
            Type::Unknown(code) => code,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Type::Unknown(code) => write!(f, "TYPE{}", code),
            known => fmt::Debug::fmt(&known, f),
        }
    }
}

/// The CLASS value of a resource record or question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Class {
    /// the Internet
    IN,
    /// the CSNET class (obsolete)
    CS,
    /// the CHAOS class
    CH,
    /// Hesiod
    HS,
    /// RFC 2136
    NONE,
    /// any class (question only)
    ANY,
    Unknown(u16),
}

impl From<u16> for Class {
    fn from(code: u16) -> Class {
        match code {
            1 => Class::IN,
            2 => Class::CS,
            3 => Class::CH,
            4 => Class::HS,
            254 => Class::NONE,
            255 => Class::ANY,
            other => Class::Unknown(other),
        }
    }
}

impl From<Class> for u16 {
    fn from(cls: Class) -> u16 {
        match cls {
            Class::IN => 1,
            Class::CS => 2,
            Class::CH => 3,
            Class::HS => 4,
            Class::NONE => 254,
            Class::ANY => 255,
            Class::Unknown(code) => code,
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Class::Unknown(code) => write!(f, "CLASS{}", code),
            known => fmt::Debug::fmt(&known, f),
        }
    }
}

/// The OPCODE value according to RFC 1035 and successors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    StandardQuery,
    InverseQuery,
    ServerStatusRequest,
    Notify,
    Update,
    Reserved(u8),
}

impl From<u8> for Opcode {
    fn from(code: u8) -> Opcode {
        match code {
            0 => Opcode::StandardQuery,
            1 => Opcode::InverseQuery,
            2 => Opcode::ServerStatusRequest,
            4 => Opcode::Notify,
            5 => Opcode::Update,
            x => Opcode::Reserved(x),
        }
    }
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> u8 {
        match op {
            Opcode::StandardQuery => 0,
            Opcode::InverseQuery => 1,
            Opcode::ServerStatusRequest => 2,
            Opcode::Notify => 4,
            Opcode::Update => 5,
            Opcode::Reserved(x) => x,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Opcode::StandardQuery => f.write_str("QUERY"),
            Opcode::InverseQuery => f.write_str("IQUERY"),
            Opcode::ServerStatusRequest => f.write_str("STATUS"),
            Opcode::Notify => f.write_str("NOTIFY"),
            Opcode::Update => f.write_str("UPDATE"),
            Opcode::Reserved(x) => write!(f, "{}", x),
        }
    }
}

/// The RCODE value according to RFC 1035 and RFC 2136
///
/// Only the four bits carried in the header are modeled; the EDNS0 extended
/// bits are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    NoError,
    FormatError,
    ServerFailure,
    NameError,
    NotImplemented,
    Refused,
    YxDomain,
    YxRrSet,
    NxRrSet,
    NotAuth,
    NotZone,
    Reserved(u8),
}

impl From<u8> for ResponseCode {
    fn from(code: u8) -> ResponseCode {
        use self::ResponseCode::*;
        match code {
            0 => NoError,
            1 => FormatError,
            2 => ServerFailure,
            3 => NameError,
            4 => NotImplemented,
            5 => Refused,
            6 => YxDomain,
            7 => YxRrSet,
            8 => NxRrSet,
            9 => NotAuth,
            10 => NotZone,
            x => Reserved(x),
        }
    }
}

impl From<ResponseCode> for u8 {
    fn from(r: ResponseCode) -> u8 {
        use self::ResponseCode::*;
        match r {
            NoError => 0,
            FormatError => 1,
            ServerFailure => 2,
            NameError => 3,
            NotImplemented => 4,
            Refused => 5,
            YxDomain => 6,
            YxRrSet => 7,
            NxRrSet => 8,
            NotAuth => 9,
            NotZone => 10,
            Reserved(x) => x,
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::ResponseCode::*;
        let mnemonic = match *self {
            NoError => "NOERROR",
            FormatError => "FORMERR",
            ServerFailure => "SERVFAIL",
            NameError => "NXDOMAIN",
            NotImplemented => "NOTIMP",
            Refused => "REFUSED",
            YxDomain => "YXDOMAIN",
            YxRrSet => "YXRRSET",
            NxRrSet => "NXRRSET",
            NotAuth => "NOTAUTH",
            NotZone => "NOTZONE",
            Reserved(x) => return write!(f, "{}", x),
        };
        f.write_str(mnemonic)
    }
}
