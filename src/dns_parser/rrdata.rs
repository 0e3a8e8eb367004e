use std::fmt;
use std::fmt::Write as FmtWrite;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr};

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use super::{DecodeError, Name, Type};

/// The enumeration that represents known types of DNS resource records data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RRData<'a> {
    CNAME(Name<'a>),
    NS(Name<'a>),
    PTR(Name<'a>),
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    SRV {
        priority: u16,
        weight: u16,
        port: u16,
        target: Name<'a>,
    },
    MX {
        preference: u16,
        exchange: Name<'a>,
    },
    /// One or more character strings, without their length octets
    TXT(Vec<&'a [u8]>),
    SOA {
        primary_ns: Name<'a>,
        mailbox: Name<'a>,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum_ttl: u32,
    },
    // Anything that isn't decoded structurally, OPT included
    Unknown {
        typ: Type,
        data: &'a [u8],
    },
}

impl<'a> RRData<'a> {
    pub fn typ(&self) -> Type {
        match *self {
            RRData::CNAME(..) => Type::CNAME,
            RRData::NS(..) => Type::NS,
            RRData::PTR(..) => Type::PTR,
            RRData::A(..) => Type::A,
            RRData::AAAA(..) => Type::AAAA,
            RRData::SRV { .. } => Type::SRV,
            RRData::MX { .. } => Type::MX,
            RRData::TXT(..) => Type::TXT,
            RRData::SOA { .. } => Type::SOA,
            RRData::Unknown { typ, .. } => typ,
        }
    }

    pub fn write_to<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        match *self {
            RRData::CNAME(ref name) | RRData::NS(ref name) | RRData::PTR(ref name) => {
                name.write_to(writer)
            }

            RRData::A(ip) => writer.write_u32::<BigEndian>(ip.into()),

            RRData::AAAA(ip) => {
                for segment in ip.segments().iter() {
                    writer.write_u16::<BigEndian>(*segment)?;
                }
                Ok(())
            }
            RRData::SRV {
                priority,
                weight,
                port,
                ref target,
            } => {
                writer.write_u16::<BigEndian>(priority)?;
                writer.write_u16::<BigEndian>(weight)?;
                writer.write_u16::<BigEndian>(port)?;
                target.write_to(writer)
            }
            RRData::MX {
                preference,
                ref exchange,
            } => {
                writer.write_u16::<BigEndian>(preference)?;
                exchange.write_to(writer)
            }
            RRData::TXT(ref strings) => {
                for string in strings.iter() {
                    if string.len() > 255 {
                        return Err(io::Error::new(
                            io::ErrorKind::InvalidInput,
                            "TXT character string longer than 255 octets",
                        ));
                    }
                    writer.write_u8(string.len() as u8)?;
                    writer.write_all(string)?;
                }
                Ok(())
            }
            RRData::SOA {
                ref primary_ns,
                ref mailbox,
                serial,
                refresh,
                retry,
                expire,
                minimum_ttl,
            } => {
                primary_ns.write_to(writer)?;
                mailbox.write_to(writer)?;
                writer.write_u32::<BigEndian>(serial)?;
                writer.write_u32::<BigEndian>(refresh)?;
                writer.write_u32::<BigEndian>(retry)?;
                writer.write_u32::<BigEndian>(expire)?;
                writer.write_u32::<BigEndian>(minimum_ttl)
            }
            RRData::Unknown { data, .. } => writer.write_all(data),
        }
    }

    /// Interprets the `len` octets of RDATA at `start` in `original`
    ///
    /// The caller guarantees that `start + len` is within `original`. Names
    /// inside RDATA may point anywhere before them in the packet, so the
    /// whole packet is passed rather than the RDATA slice.
    pub fn parse(
        typ: Type,
        original: &'a [u8],
        start: usize,
        len: usize,
    ) -> Result<RRData<'a>, DecodeError> {
        let end = start + len;
        let rdata = &original[start..end];
        match typ {
            Type::A => {
                if rdata.len() != 4 {
                    return Err(DecodeError::WrongRdataLength(typ));
                }
                Ok(RRData::A(Ipv4Addr::from(BigEndian::read_u32(rdata))))
            }
            Type::AAAA => {
                if rdata.len() != 16 {
                    return Err(DecodeError::WrongRdataLength(typ));
                }
                let mut octets = [0u8; 16];
                octets.copy_from_slice(rdata);
                Ok(RRData::AAAA(Ipv6Addr::from(octets)))
            }
            Type::CNAME => Ok(RRData::CNAME(name_within(typ, original, start, end)?)),
            Type::NS => Ok(RRData::NS(name_within(typ, original, start, end)?)),
            Type::PTR => Ok(RRData::PTR(name_within(typ, original, start, end)?)),
            Type::MX => {
                if rdata.len() < 3 {
                    return Err(DecodeError::WrongRdataLength(typ));
                }
                Ok(RRData::MX {
                    preference: BigEndian::read_u16(&rdata[..2]),
                    exchange: name_within(typ, original, start + 2, end)?,
                })
            }
            Type::SRV => {
                if rdata.len() < 7 {
                    return Err(DecodeError::WrongRdataLength(typ));
                }
                Ok(RRData::SRV {
                    priority: BigEndian::read_u16(&rdata[..2]),
                    weight: BigEndian::read_u16(&rdata[2..4]),
                    port: BigEndian::read_u16(&rdata[4..6]),
                    target: name_within(typ, original, start + 6, end)?,
                })
            }
            Type::TXT => {
                let mut strings = Vec::new();
                let mut pos = 0;
                while pos < rdata.len() {
                    let string_end = pos + 1 + rdata[pos] as usize;
                    if string_end > rdata.len() {
                        return Err(DecodeError::WrongRdataLength(typ));
                    }
                    strings.push(&rdata[pos + 1..string_end]);
                    pos = string_end;
                }
                Ok(RRData::TXT(strings))
            }
            Type::SOA => {
                let (primary_ns, pos) = Name::scan(original, start)?;
                let (mailbox, pos) = Name::scan(original, pos)?;
                if pos + 20 != end {
                    return Err(DecodeError::WrongRdataLength(typ));
                }
                Ok(RRData::SOA {
                    primary_ns,
                    mailbox,
                    serial: BigEndian::read_u32(&original[pos..pos + 4]),
                    refresh: BigEndian::read_u32(&original[pos + 4..pos + 8]),
                    retry: BigEndian::read_u32(&original[pos + 8..pos + 12]),
                    expire: BigEndian::read_u32(&original[pos + 12..pos + 16]),
                    minimum_ttl: BigEndian::read_u32(&original[pos + 16..pos + 20]),
                })
            }
            typ => Ok(RRData::Unknown { typ, data: rdata }),
        }
    }
}

/// A name that has to end exactly where the RDATA does
fn name_within<'a>(
    typ: Type,
    original: &'a [u8],
    start: usize,
    end: usize,
) -> Result<Name<'a>, DecodeError> {
    let (name, name_end) = Name::scan(original, start)?;
    if name_end != end {
        return Err(DecodeError::WrongRdataLength(typ));
    }
    Ok(name)
}

fn write_character_string(f: &mut fmt::Formatter, string: &[u8]) -> fmt::Result {
    f.write_char('"')?;
    for &byte in string {
        match byte {
            b'"' | b'\\' => {
                f.write_char('\\')?;
                f.write_char(byte as char)?;
            }
            0x20..=0x7e => f.write_char(byte as char)?,
            _ => write!(f, "\\{:03}", byte)?,
        }
    }
    f.write_char('"')
}

impl<'a> fmt::Display for RRData<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RRData::CNAME(ref name) | RRData::NS(ref name) | RRData::PTR(ref name) => {
                write!(f, "{}", name)
            }
            RRData::A(ip) => write!(f, "{}", ip),
            RRData::AAAA(ip) => write!(f, "{}", ip),
            RRData::SRV {
                priority,
                weight,
                port,
                ref target,
            } => write!(f, "{} {} {} {}", priority, weight, port, target),
            RRData::MX {
                preference,
                ref exchange,
            } => write!(f, "{} {}", preference, exchange),
            RRData::TXT(ref strings) => {
                for (i, string) in strings.iter().enumerate() {
                    if i > 0 {
                        f.write_char(' ')?;
                    }
                    write_character_string(f, string)?;
                }
                Ok(())
            }
            RRData::SOA {
                ref primary_ns,
                ref mailbox,
                serial,
                refresh,
                retry,
                expire,
                minimum_ttl,
            } => write!(
                f,
                "{} {} {} {} {} {} {}",
                primary_ns, mailbox, serial, refresh, retry, expire, minimum_ttl
            ),
            // RFC 3597 generic encoding
            RRData::Unknown { data, .. } => {
                write!(f, "\\# {}", data.len())?;
                if !data.is_empty() {
                    f.write_char(' ')?;
                    for byte in data {
                        write!(f, "{:02x}", byte)?;
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse_alone(typ: Type, rdata: &[u8]) -> Result<RRData, DecodeError> {
        RRData::parse(typ, rdata, 0, rdata.len())
    }

    #[test]
    fn a_and_aaaa() {
        assert_eq!(
            parse_alone(Type::A, b"\xc0\x00\x02\x01").unwrap(),
            RRData::A(Ipv4Addr::new(192, 0, 2, 1))
        );
        let aaaa = parse_alone(
            Type::AAAA,
            b"\x20\x01\x0d\xb8\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x01",
        )
        .unwrap();
        assert_eq!(aaaa.to_string(), "2001:db8::1");
    }

    #[test]
    fn wrong_address_lengths() {
        assert_eq!(
            parse_alone(Type::A, b"\x01\x02\x03"),
            Err(DecodeError::WrongRdataLength(Type::A))
        );
        assert_eq!(
            parse_alone(Type::AAAA, b"\x01\x02\x03\x04"),
            Err(DecodeError::WrongRdataLength(Type::AAAA))
        );
    }

    #[test]
    fn mx_with_compressed_exchange() {
        // "example.com" at 0, MX rdata at 13
        let packet = b"\x07example\x03com\x00\x00\x0a\x04mail\xc0\x00";
        let mx = RRData::parse(Type::MX, packet, 13, 9).unwrap();
        assert_eq!(mx.to_string(), "10 mail.example.com.");
    }

    #[test]
    fn name_must_fill_rdata() {
        let packet = b"\x03com\x00\xff";
        assert_eq!(
            RRData::parse(Type::CNAME, packet, 0, 6),
            Err(DecodeError::WrongRdataLength(Type::CNAME))
        );
    }

    #[test]
    fn txt_strings() {
        let txt = parse_alone(Type::TXT, b"\x0bv=spf1 -all\x04a\"b\\").unwrap();
        assert_eq!(txt, RRData::TXT(vec![&b"v=spf1 -all"[..], &b"a\"b\\"[..]]));
        assert_eq!(txt.to_string(), "\"v=spf1 -all\" \"a\\\"b\\\\\"");
        assert_eq!(
            parse_alone(Type::TXT, b"\x05abc"),
            Err(DecodeError::WrongRdataLength(Type::TXT))
        );
    }

    #[test]
    fn soa() {
        let mut rdata = Vec::new();
        rdata.extend_from_slice(b"\x02ns\x07example\x00\x0ahostmaster\x07example\x00");
        for value in &[2024u32, 7200, 3600, 1_209_600, 300] {
            rdata.extend_from_slice(&value.to_be_bytes());
        }
        let soa = parse_alone(Type::SOA, &rdata).unwrap();
        assert_eq!(
            soa.to_string(),
            "ns.example. hostmaster.example. 2024 7200 3600 1209600 300"
        );
        assert_eq!(
            parse_alone(Type::SOA, &rdata[..rdata.len() - 1]),
            Err(DecodeError::WrongRdataLength(Type::SOA))
        );
    }

    #[test]
    fn unknown_type_is_opaque() {
        let data = parse_alone(Type::Unknown(65280), b"\xde\xad").unwrap();
        assert_eq!(data.typ(), Type::Unknown(65280));
        assert_eq!(data.to_string(), "\\# 2 dead");
        let empty = parse_alone(Type::HTTPS, b"").unwrap();
        assert_eq!(empty.to_string(), "\\# 0");
    }

    #[test]
    fn write_matches_parse() {
        let data = RRData::MX {
            preference: 5,
            exchange: Name::from_str("mx.example.org").unwrap(),
        };
        let mut buf = Vec::new();
        data.write_to(&mut buf).unwrap();
        assert_eq!(parse_alone(Type::MX, &buf).unwrap(), data);
    }
}
