//! Turns per-probe results into one flat [`Record`] per query
//!
//! A query whose buffer is missing or can't be decoded still yields a
//! record: its four result fields are left empty.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, warn};
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::dns_parser::{self, DecodeError};
use crate::results::{ProbeResult, QueryResult};

/// One row of the flattened result set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub time: Option<i64>,
    pub probe_id: u64,
    pub probe_ip: String,
    pub resolver_ip: Option<String>,
    /// First question, as `name class type`
    pub query: Option<String>,
    /// Response code mnemonic, e.g. `NOERROR`
    pub rcode: Option<String>,
    /// First answer record, as `name ttl class type rdata`
    pub answer: Option<String>,
    /// Authority count as reported by the provider
    pub nscount: Option<u16>,
}

/// Why a query's buffer couldn't be turned into result fields
#[derive(Debug, Error)]
pub enum FlattenError {
    #[error("abuf is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("abuf is not a valid DNS message: {0}")]
    Decode(#[from] DecodeError),
}

/// The fields of a record that come from the decoded message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub query: Option<String>,
    pub rcode: String,
    pub answer: Option<String>,
}

/// Undoes the base64 transport encoding of an answer buffer
pub fn decode_abuf(abuf: &str) -> Result<Vec<u8>, FlattenError> {
    Ok(STANDARD.decode(abuf.trim())?)
}

/// Decodes a base64 answer buffer and extracts what a record needs from it
pub fn summarize(abuf: &str) -> Result<Summary, FlattenError> {
    let buf = decode_abuf(abuf)?;
    let message = dns_parser::decode(&buf)?;
    Ok(Summary {
        query: message.first_question().map(ToString::to_string),
        rcode: message.rcode().to_string(),
        answer: message.first_answer().map(ToString::to_string),
    })
}

fn flatten_query(probe: &ProbeResult, query: &QueryResult) -> Record {
    let mut record = Record {
        time: probe.time_of(query),
        probe_id: probe.probe_id,
        probe_ip: probe.from.clone(),
        resolver_ip: query.dst_addr.clone(),
        query: None,
        rcode: None,
        answer: None,
        nscount: None,
    };

    let body = match query.result {
        Some(ref body) => body,
        None => {
            match query.error {
                Some(ref error) => debug!("probe {}: no result, error {}", probe.probe_id, error),
                None => debug!("probe {}: no result", probe.probe_id),
            }
            return record;
        }
    };
    let abuf = match body.abuf {
        Some(ref abuf) => abuf,
        None => {
            debug!("probe {}: result without abuf", probe.probe_id);
            return record;
        }
    };

    match summarize(abuf) {
        Ok(summary) => {
            record.query = summary.query;
            record.rcode = Some(summary.rcode);
            record.answer = summary.answer;
            record.nscount = body.nscount;
        }
        Err(err) => warn!(
            "probe {}: dropping result from {}: {}",
            probe.probe_id,
            query.dst_addr.as_deref().unwrap_or("unknown resolver"),
            err
        ),
    }
    record
}

fn probe_records(probe: &ProbeResult) -> Vec<Record> {
    probe
        .queries()
        .iter()
        .map(|query| flatten_query(probe, query))
        .collect()
}

/// One record per (probe, query), probes outer, queries inner
pub fn flatten(probes: &[ProbeResult]) -> Vec<Record> {
    probes.iter().flat_map(probe_records).collect()
}

/// Same output as [`flatten`], with probes spread over the rayon pool
pub fn flatten_parallel(probes: &[ProbeResult]) -> Vec<Record> {
    let per_probe: Vec<Vec<Record>> = probes.par_iter().map(probe_records).collect();
    per_probe.into_iter().flatten().collect()
}

#[cfg(test)]
mod test {
    use std::net::Ipv4Addr;

    use super::*;
    use crate::dns_parser::{Builder, Class, Name, RRData, ResponseCode, Type};
    use crate::results::ResultBody;

    fn a_response(name: &str, addr: Ipv4Addr) -> String {
        let name = Name::from_str(name).unwrap();
        let buf = Builder::new_response(0x2b67, true, false)
            .add_question(&name, Type::A, Class::IN)
            .add_answer(&name, Class::IN, 3600, &RRData::A(addr))
            .build();
        STANDARD.encode(&buf)
    }

    fn query(time: i64, dst: &str, abuf: Option<String>, nscount: u16) -> QueryResult {
        QueryResult {
            time: Some(time),
            dst_addr: Some(dst.to_owned()),
            result: Some(ResultBody {
                abuf,
                nscount: Some(nscount),
                ..ResultBody::default()
            }),
            error: None,
        }
    }

    fn probe(id: u64, from: &str, queries: Vec<QueryResult>) -> ProbeResult {
        ProbeResult {
            probe_id: id,
            from: from.to_owned(),
            timestamp: None,
            result_set: Some(queries),
            single: QueryResult::default(),
        }
    }

    #[test]
    fn empty_input() {
        assert!(flatten(&[]).is_empty());
        assert!(flatten_parallel(&[]).is_empty());
    }

    #[test]
    fn a_record_response() {
        let abuf = a_response("example.com", Ipv4Addr::new(93, 184, 216, 34));
        let probes = vec![probe(
            42,
            "192.0.2.9",
            vec![query(1000, "198.51.100.1", Some(abuf), 0)],
        )];
        assert_eq!(
            flatten(&probes),
            vec![Record {
                time: Some(1000),
                probe_id: 42,
                probe_ip: "192.0.2.9".to_owned(),
                resolver_ip: Some("198.51.100.1".to_owned()),
                query: Some("example.com. IN A".to_owned()),
                rcode: Some("NOERROR".to_owned()),
                answer: Some("example.com. 3600 IN A 93.184.216.34".to_owned()),
                nscount: Some(0),
            }]
        );
    }

    #[test]
    fn four_arbitrary_bytes() {
        let abuf = STANDARD.encode(b"\x01\x02\x03\x04");
        assert!(match summarize(&abuf) {
            Err(FlattenError::Decode(DecodeError::Truncated)) => true,
            _ => false,
        });

        let probes = vec![probe(
            42,
            "192.0.2.9",
            vec![query(1000, "198.51.100.1", Some(abuf), 0)],
        )];
        let records = flatten(&probes);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.time, Some(1000));
        assert_eq!(record.probe_id, 42);
        assert_eq!(record.probe_ip, "192.0.2.9");
        assert_eq!(record.resolver_ip.as_deref(), Some("198.51.100.1"));
        assert_eq!(record.query, None);
        assert_eq!(record.rcode, None);
        assert_eq!(record.answer, None);
        assert_eq!(record.nscount, None);
    }

    #[test]
    fn not_base64() {
        assert!(match summarize("not base64!") {
            Err(FlattenError::Base64(_)) => true,
            _ => false,
        });
        let probes = vec![probe(
            1,
            "192.0.2.1",
            vec![query(5, "198.51.100.1", Some("not base64!".to_owned()), 3)],
        )];
        let record = &flatten(&probes)[0];
        assert_eq!(record.nscount, None);
        assert_eq!(record.rcode, None);
    }

    #[test]
    fn query_without_result() {
        let probes = vec![probe(
            7,
            "192.0.2.7",
            vec![QueryResult {
                time: Some(99),
                dst_addr: None,
                result: None,
                error: Some(serde_json::json!({"timeout": 5000})),
            }],
        )];
        assert_eq!(
            flatten(&probes),
            vec![Record {
                time: Some(99),
                probe_id: 7,
                probe_ip: "192.0.2.7".to_owned(),
                resolver_ip: None,
                query: None,
                rcode: None,
                answer: None,
                nscount: None,
            }]
        );
    }

    #[test]
    fn result_without_abuf() {
        let probes = vec![probe(3, "192.0.2.3", vec![query(1, "198.51.100.3", None, 1)])];
        let record = &flatten(&probes)[0];
        assert_eq!(record.nscount, None);
        assert_eq!(record.query, None);
    }

    #[test]
    fn nxdomain_without_answer() {
        let name = Name::from_str("nothing.example").unwrap();
        let mut bld =
            Builder::new_response(1, true, false).add_question(&name, Type::AAAA, Class::IN);
        bld.set_response_code(ResponseCode::NameError);
        let abuf = STANDARD.encode(&bld.build());

        let summary = summarize(&abuf).unwrap();
        assert_eq!(
            summary,
            Summary {
                query: Some("nothing.example. IN AAAA".to_owned()),
                rcode: "NXDOMAIN".to_owned(),
                answer: None,
            }
        );
    }

    #[test]
    fn no_question_section() {
        let abuf = STANDARD.encode(b"\x00\x07\x81\x85\x00\x00\x00\x00\x00\x00\x00\x00");
        let summary = summarize(&abuf).unwrap();
        assert_eq!(summary.query, None);
        assert_eq!(summary.rcode, "REFUSED");
    }

    #[test]
    fn order_and_count_are_preserved() {
        let good = a_response("example.org", Ipv4Addr::new(192, 0, 2, 10));
        let probes = vec![
            probe(
                1,
                "192.0.2.1",
                vec![
                    query(10, "198.51.100.1", Some(good.clone()), 0),
                    query(11, "198.51.100.2", Some("AAAA".to_owned()), 0),
                    query(12, "198.51.100.3", None, 0),
                ],
            ),
            probe(2, "192.0.2.2", vec![]),
            probe(3, "192.0.2.3", vec![query(30, "198.51.100.1", Some(good), 2)]),
            ProbeResult {
                probe_id: 4,
                from: "192.0.2.4".to_owned(),
                timestamp: Some(4),
                result_set: None,
                single: query(40, "198.51.100.4", None, 0),
            },
        ];
        let records = flatten(&probes);
        let keys: Vec<(u64, Option<i64>)> = records.iter().map(|r| (r.probe_id, r.time)).collect();
        assert_eq!(
            keys,
            vec![
                (1, Some(10)),
                (1, Some(11)),
                (1, Some(12)),
                (3, Some(30)),
                (4, Some(40)),
            ]
        );
        assert_eq!(records[0].rcode.as_deref(), Some("NOERROR"));
        assert_eq!(records[1].rcode, None);
        assert_eq!(records[3].nscount, Some(2));

        assert_eq!(flatten_parallel(&probes), records);
    }
}
