use std::marker::PhantomData;

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use super::header::HEADER_SIZE;
use super::{Class, Header, Name, Opcode, RRData, ResponseCode, Type};

pub enum Questions {}
pub enum Answers {}
pub enum Nameservers {}
pub enum Additional {}

pub trait MoveTo<T> {}
impl<T> MoveTo<T> for T {}

impl MoveTo<Answers> for Questions {}

impl MoveTo<Nameservers> for Questions {}
impl MoveTo<Nameservers> for Answers {}

impl MoveTo<Additional> for Questions {}
impl MoveTo<Additional> for Answers {}
impl MoveTo<Additional> for Nameservers {}

/// Allows to build a DNS packet
///
/// Sections have to be filled in order; the type parameter tracks which
/// section is being written. Names are never compressed.
pub struct Builder<S> {
    buf: Vec<u8>,
    _state: PhantomData<S>,
}

impl Builder<Questions> {
    /// Creates a new query
    ///
    /// Initially all sections are empty. You're expected to fill
    /// the questions section with `add_question`
    pub fn new_query(id: u16, recursion: bool) -> Builder<Questions> {
        Builder::with_header(Header {
            id,
            response: false,
            opcode: Opcode::StandardQuery,
            authoritative: false,
            truncated: false,
            recursion_desired: recursion,
            recursion_available: false,
            authenticated_data: false,
            checking_disabled: false,
            response_code: ResponseCode::NoError,
            questions: 0,
            answers: 0,
            nameservers: 0,
            additional: 0,
        })
    }

    /// Creates a new response, as a recursive resolver would send it when
    /// `recursion` is set (RD and RA both on)
    pub fn new_response(id: u16, recursion: bool, authoritative: bool) -> Builder<Questions> {
        Builder::with_header(Header {
            id,
            response: true,
            opcode: Opcode::StandardQuery,
            authoritative,
            truncated: false,
            recursion_desired: recursion,
            recursion_available: recursion,
            authenticated_data: false,
            checking_disabled: false,
            response_code: ResponseCode::NoError,
            questions: 0,
            answers: 0,
            nameservers: 0,
            additional: 0,
        })
    }

    fn with_header(head: Header) -> Builder<Questions> {
        let mut buf = Vec::with_capacity(512);
        buf.extend([0u8; HEADER_SIZE].iter());
        head.write(&mut buf[..HEADER_SIZE]);
        Builder {
            buf,
            _state: PhantomData,
        }
    }
}

impl<T> Builder<T> {
    fn write_rr(&mut self, name: &Name, cls: Class, ttl: u32, data: &RRData) {
        name.write_to(&mut self.buf).unwrap();
        self.buf.write_u16::<BigEndian>(data.typ().into()).unwrap();
        self.buf.write_u16::<BigEndian>(cls.into()).unwrap();
        self.buf.write_u32::<BigEndian>(ttl).unwrap();

        let size_offset = self.buf.len();
        self.buf.write_u16::<BigEndian>(0).unwrap();

        let data_offset = self.buf.len();
        data.write_to(&mut self.buf).expect("RDATA could not be encoded");
        let data_size = self.buf.len() - data_offset;

        BigEndian::write_u16(
            &mut self.buf[size_offset..size_offset + 2],
            data_size as u16,
        );
    }

    pub fn set_response_code(&mut self, code: ResponseCode) {
        Header::set_response_code(&mut self.buf[..HEADER_SIZE], code);
    }

    /// Returns the final packet
    ///
    /// There is no size limit: the packet holds everything that was added.
    pub fn build(self) -> Vec<u8> {
        self.buf
    }

    pub fn move_to<U>(self) -> Builder<U>
    where
        T: MoveTo<U>,
    {
        Builder {
            buf: self.buf,
            _state: PhantomData,
        }
    }
}

impl<T: MoveTo<Questions>> Builder<T> {
    /// Adds a question to the packet
    ///
    /// # Panics
    ///
    /// * There are already 65535 questions in the buffer.
    pub fn add_question(self, qname: &Name, qtype: Type, qclass: Class) -> Builder<Questions> {
        let mut builder = self.move_to::<Questions>();

        qname.write_to(&mut builder.buf).unwrap();
        builder.buf.write_u16::<BigEndian>(qtype.into()).unwrap();
        builder.buf.write_u16::<BigEndian>(qclass.into()).unwrap();
        Header::inc_questions(&mut builder.buf).expect("Too many questions");
        builder
    }
}

impl<T: MoveTo<Answers>> Builder<T> {
    /// # Panics
    ///
    /// * There are already 65535 answers in the buffer.
    /// * `data` holds a TXT string longer than 255 octets.
    pub fn add_answer(self, name: &Name, cls: Class, ttl: u32, data: &RRData) -> Builder<Answers> {
        let mut builder = self.move_to::<Answers>();

        builder.write_rr(name, cls, ttl, data);
        Header::inc_answers(&mut builder.buf).expect("Too many answers");

        builder
    }
}

impl<T: MoveTo<Nameservers>> Builder<T> {
    pub fn add_nameserver(
        self,
        name: &Name,
        cls: Class,
        ttl: u32,
        data: &RRData,
    ) -> Builder<Nameservers> {
        let mut builder = self.move_to::<Nameservers>();

        builder.write_rr(name, cls, ttl, data);
        Header::inc_nameservers(&mut builder.buf).expect("Too many nameservers");

        builder
    }
}

impl<T: MoveTo<Additional>> Builder<T> {
    pub fn add_additional(
        self,
        name: &Name,
        cls: Class,
        ttl: u32,
        data: &RRData,
    ) -> Builder<Additional> {
        let mut builder = self.move_to::<Additional>();

        builder.write_rr(name, cls, ttl, data);
        Header::inc_additional(&mut builder.buf).expect("Too many additional answers");

        builder
    }
}

#[cfg(test)]
mod test {
    use std::net::Ipv4Addr;

    use super::Builder;
    use super::Class as C;
    use super::Name;
    use super::RRData;
    use super::ResponseCode;
    use super::Type as T;
    use crate::dns_parser::Message;

    #[test]
    fn build_query() {
        let mut bld = Builder::new_query(1573, true);
        let name = Name::from_str("example.com").unwrap();
        bld = bld.add_question(&name, T::A, C::IN);
        let result = b"\x06%\x01\x00\x00\x01\x00\x00\x00\x00\x00\x00\
                      \x07example\x03com\x00\x00\x01\x00\x01";
        assert_eq!(&bld.build()[..], &result[..]);
    }

    #[test]
    fn build_chaos_query() {
        let mut bld = Builder::new_query(23513, true);
        let name = Name::from_str("hostname.bind").unwrap();
        bld = bld.add_question(&name, T::TXT, C::CH);
        let result = b"[\xd9\x01\x00\x00\x01\x00\x00\x00\x00\x00\x00\
            \x08hostname\x04bind\x00\x00\x10\x00\x03";
        assert_eq!(&bld.build()[..], &result[..]);
    }

    #[test]
    fn build_a_response() {
        let name = Name::from_str("example.com").unwrap();
        let mut bld = Builder::new_response(1573, true, false)
            .add_question(&name, T::A, C::IN)
            .add_answer(&name, C::IN, 300, &RRData::A(Ipv4Addr::new(192, 0, 2, 1)));
        bld.set_response_code(ResponseCode::NoError);
        let result = b"\x06%\x81\x80\x00\x01\x00\x01\x00\x00\x00\x00\
                      \x07example\x03com\x00\x00\x01\x00\x01\
                      \x07example\x03com\x00\x00\x01\x00\x01\
                      \x00\x00\x01\x2c\x00\x04\xc0\x00\x02\x01";
        assert_eq!(&bld.build()[..], &result[..]);
    }

    #[test]
    fn additional_count_is_its_own() {
        let root = Name::root();
        let opt = RRData::Unknown {
            typ: T::OPT,
            data: &[],
        };
        let packet = Builder::new_query(1, true)
            .add_additional(&root, C::Unknown(1232), 0, &opt)
            .build();
        assert_eq!(&packet[4..12], b"\x00\x00\x00\x00\x00\x00\x00\x01");
    }

    #[test]
    fn large_packet_keeps_everything() {
        let name = Name::from_str("many.example.com").unwrap();
        let mut bld = Builder::new_response(7, true, false)
            .add_question(&name, T::A, C::IN)
            .move_to::<super::Answers>();
        for host in 0..64 {
            bld = bld.add_answer(&name, C::IN, 60, &RRData::A(Ipv4Addr::new(192, 0, 2, host)));
        }
        let packet = bld.build();
        assert!(packet.len() > 512);

        let message = Message::parse(&packet).unwrap();
        assert!(!message.header.truncated);
        assert_eq!(message.answers.len(), 64);
        assert_eq!(message.counts().answers, 64);
    }

    #[test]
    fn response_code_is_rewritten() {
        let mut bld = Builder::new_response(9, true, false);
        bld.set_response_code(ResponseCode::ServerFailure);
        bld.set_response_code(ResponseCode::NameError);
        let packet = bld.build();
        assert_eq!(packet[3], 0x83);
    }
}
