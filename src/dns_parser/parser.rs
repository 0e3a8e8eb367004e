use std::cmp::min;

use byteorder::{BigEndian, ByteOrder};
use log::trace;

use super::header::HEADER_SIZE;
use super::{Class, DecodeError, Header, Message, Name, Question, RRData, ResourceRecord, Type};

/// Smallest possible question: root name, type and class
const MIN_QUESTION_SIZE: usize = 5;
/// Smallest possible record: root name, type, class, ttl and rdlength
const MIN_RR_SIZE: usize = 11;

impl<'a> Message<'a> {
    /// Parse a full DNS message and return it
    ///
    /// Every section must hold exactly as many entries as the header
    /// declares, and nothing may follow the last one.
    pub fn parse(data: &'a [u8]) -> Result<Message<'a>, DecodeError> {
        let header = Header::parse(data)?;
        let mut offset = HEADER_SIZE;

        let mut questions = Vec::with_capacity(capacity(
            header.questions,
            data.len() - offset,
            MIN_QUESTION_SIZE,
        ));
        for _ in 0..header.questions {
            let (question, next) = parse_question(data, offset)?;
            questions.push(question);
            offset = next;
        }

        let mut answers =
            Vec::with_capacity(capacity(header.answers, data.len() - offset, MIN_RR_SIZE));
        for _ in 0..header.answers {
            let (rr, next) = parse_record(data, offset)?;
            answers.push(rr);
            offset = next;
        }

        let mut nameservers =
            Vec::with_capacity(capacity(header.nameservers, data.len() - offset, MIN_RR_SIZE));
        for _ in 0..header.nameservers {
            let (rr, next) = parse_record(data, offset)?;
            nameservers.push(rr);
            offset = next;
        }

        let mut additional =
            Vec::with_capacity(capacity(header.additional, data.len() - offset, MIN_RR_SIZE));
        for _ in 0..header.additional {
            let (rr, next) = parse_record(data, offset)?;
            additional.push(rr);
            offset = next;
        }

        if offset != data.len() {
            return Err(DecodeError::TrailingData(data.len() - offset));
        }

        trace!(
            "decoded message id {} ({} questions, {} answers, {} nameservers, {} additional)",
            header.id,
            questions.len(),
            answers.len(),
            nameservers.len(),
            additional.len()
        );

        Ok(Message {
            header,
            questions,
            answers,
            nameservers,
            additional,
        })
    }
}

/// Don't let a lying header make us allocate more than the packet can hold
fn capacity(declared: u16, remaining: usize, min_size: usize) -> usize {
    min(declared as usize, remaining / min_size)
}

fn parse_question(data: &[u8], offset: usize) -> Result<(Question, usize), DecodeError> {
    let (qname, offset) = Name::scan(data, offset)?;
    if offset + 4 > data.len() {
        return Err(DecodeError::Truncated);
    }
    let question = Question {
        qname,
        qtype: Type::from(BigEndian::read_u16(&data[offset..offset + 2])),
        qclass: Class::from(BigEndian::read_u16(&data[offset + 2..offset + 4])),
    };
    Ok((question, offset + 4))
}

fn parse_record(data: &[u8], offset: usize) -> Result<(ResourceRecord, usize), DecodeError> {
    let (name, offset) = Name::scan(data, offset)?;
    if offset + 10 > data.len() {
        return Err(DecodeError::Truncated);
    }
    let typ = Type::from(BigEndian::read_u16(&data[offset..offset + 2]));
    let cls = Class::from(BigEndian::read_u16(&data[offset + 2..offset + 4]));
    let ttl = BigEndian::read_u32(&data[offset + 4..offset + 8]);
    let rdlen = BigEndian::read_u16(&data[offset + 8..offset + 10]) as usize;
    let start = offset + 10;
    if start + rdlen > data.len() {
        return Err(DecodeError::Truncated);
    }
    let rr = ResourceRecord {
        name,
        cls,
        ttl,
        data: RRData::parse(typ, data, start, rdlen)?,
    };
    Ok((rr, start + rdlen))
}
