//! Measurement results as the probe network's API hands them out
//!
//! Only the fields the flattener reads are modeled; everything else in the
//! provider's JSON is ignored.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::slice;

use log::debug;
use serde::Deserialize;
use thiserror::Error;

/// Error loading a saved result document
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read results: {0}")]
    Io(#[from] std::io::Error),
    #[error("results are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything one probe reported for a measurement
///
/// Measurements against several resolvers carry a `resultset` with one entry
/// per query. Single-resolver measurements put the query fields on the
/// probe object itself, with the start time in `timestamp` instead of
/// `time`; see [`ProbeResult::queries`] and [`ProbeResult::time_of`].
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeResult {
    #[serde(rename = "prb_id")]
    pub probe_id: u64,
    /// Source address of the probe
    #[serde(default)]
    pub from: String,
    /// Start of the measurement round on this probe
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default, rename = "resultset")]
    pub result_set: Option<Vec<QueryResult>>,
    #[serde(flatten)]
    pub single: QueryResult,
}

/// One query sent by a probe
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResult {
    /// Unix timestamp of the query
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub dst_addr: Option<String>,
    #[serde(default)]
    pub result: Option<ResultBody>,
    /// Set by the provider when the query got no answer (timeout, socket error)
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

/// The `result` object of a query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultBody {
    /// Base64 of the response in wire format
    #[serde(default)]
    pub abuf: Option<String>,
    #[serde(default, rename = "ID")]
    pub id: Option<u16>,
    #[serde(default, rename = "QDCOUNT")]
    pub qdcount: Option<u16>,
    #[serde(default, rename = "ANCOUNT")]
    pub ancount: Option<u16>,
    #[serde(default, rename = "NSCOUNT")]
    pub nscount: Option<u16>,
    #[serde(default, rename = "ARCOUNT")]
    pub arcount: Option<u16>,
    /// Response time in milliseconds
    #[serde(default)]
    pub rt: Option<f64>,
    /// Response size in octets
    #[serde(default)]
    pub size: Option<u32>,
}

impl ProbeResult {
    /// The queries of this probe, in the order the provider listed them
    pub fn queries(&self) -> &[QueryResult] {
        match self.result_set {
            Some(ref set) => set.as_slice(),
            None => slice::from_ref(&self.single),
        }
    }

    /// When `query` was sent
    ///
    /// Single-resolver results usually lack `time`; the probe's `timestamp`
    /// stands in for it. Result set entries only ever use their own `time`.
    pub fn time_of(&self, query: &QueryResult) -> Option<i64> {
        match self.result_set {
            Some(_) => query.time,
            None => query.time.or(self.timestamp),
        }
    }
}

/// Reads a JSON array of probe results
pub fn load<R: Read>(reader: R) -> Result<Vec<ProbeResult>, LoadError> {
    let probes: Vec<ProbeResult> = serde_json::from_reader(reader)?;
    debug!("loaded results of {} probes", probes.len());
    Ok(probes)
}

pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Vec<ProbeResult>, LoadError> {
    let file = File::open(path.as_ref())?;
    load(BufReader::new(file))
}
