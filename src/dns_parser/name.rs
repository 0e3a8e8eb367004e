use std::borrow::Cow;
use std::fmt;
use std::fmt::Write;
use std::io;

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use super::DecodeError;

const POINTER_MASK: u8 = 0b1100_0000;
const MAX_LABEL_LEN: usize = 63;

/// A domain name as a sequence of labels, root label excluded
///
/// Names decoded from a packet borrow their labels from the original buffer,
/// with compression pointers already resolved. You may turn this into a
/// string using `.to_string()`, which renders the absolute form with a
/// trailing dot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name<'a> {
    labels: Vec<Cow<'a, [u8]>>,
}

impl<'a> Name<'a> {
    /// Reads the name starting at `start` in `original`
    ///
    /// Returns the name and the offset right after it at the call site. When
    /// the name ends in a compression pointer, that's the octet after the
    /// first pointer, no matter how many pointers were followed.
    ///
    /// Every pointer must refer to an offset strictly before the segment
    /// currently being read (and therefore before the pointer itself),
    /// which guarantees termination on cyclic input.
    pub fn scan(original: &'a [u8], start: usize) -> Result<(Name<'a>, usize), DecodeError> {
        let mut labels = Vec::new();
        let mut pos = start;
        let mut segment = start;
        let mut end = None;
        loop {
            let byte = *original.get(pos).ok_or(DecodeError::Truncated)?;
            if byte == 0 {
                return Ok((Name { labels }, end.unwrap_or(pos + 1)));
            } else if byte & POINTER_MASK == POINTER_MASK {
                if original.len() < pos + 2 {
                    return Err(DecodeError::Truncated);
                }
                let target = (BigEndian::read_u16(&original[pos..pos + 2])
                    & !0b1100_0000_0000_0000) as usize;
                if target >= segment {
                    return Err(DecodeError::CompressionLoop {
                        pointer: pos,
                        target,
                    });
                }
                end.get_or_insert(pos + 2);
                pos = target;
                segment = target;
            } else if byte & POINTER_MASK == 0 {
                let label_end = pos + 1 + byte as usize;
                if label_end > original.len() {
                    return Err(DecodeError::Truncated);
                }
                labels.push(Cow::Borrowed(&original[pos + 1..label_end]));
                pos = label_end;
            } else {
                return Err(DecodeError::InvalidLabel(byte));
            }
        }
    }

    /// Builds a name from its dotted textual form
    ///
    /// A trailing dot is accepted. Labels longer than 63 octets are rejected.
    pub fn from_str(name: &str) -> Result<Name<'static>, DecodeError> {
        let mut labels = Vec::new();
        for part in name.trim_end_matches('.').split('.') {
            if part.is_empty() {
                continue;
            }
            if part.len() > MAX_LABEL_LEN {
                return Err(DecodeError::InvalidLabel(part.len() as u8));
            }
            labels.push(Cow::Owned(part.as_bytes().to_vec()));
        }
        Ok(Name { labels })
    }

    pub fn root() -> Name<'static> {
        Name { labels: Vec::new() }
    }

    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    /// Writes the uncompressed wire form of the name
    pub fn write_to<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        for label in self.labels.iter() {
            writer.write_u8(label.len() as u8)?;
            writer.write_all(label)?;
        }
        writer.write_u8(0)
    }
}

fn write_label(fmt: &mut fmt::Formatter, label: &[u8]) -> fmt::Result {
    for &byte in label {
        match byte {
            b'.' | b'\\' | b'"' | b'(' | b')' | b';' | b'@' | b'$' => {
                fmt.write_char('\\')?;
                fmt.write_char(byte as char)?;
            }
            0x21..=0x7e => fmt.write_char(byte as char)?,
            _ => write!(fmt, "\\{:03}", byte)?,
        }
    }
    Ok(())
}

impl<'a> fmt::Display for Name<'a> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        if self.labels.is_empty() {
            return fmt.write_char('.');
        }
        for label in self.labels.iter() {
            write_label(fmt, label)?;
            fmt.write_char('.')?;
        }
        Ok(())
    }
}
