//! Writers for a flattened record set

use std::io::{self, Write};

use crate::flatten::Record;

/// Column names, in output order
pub const COLUMNS: [&str; 8] = [
    "time",
    "probe_id",
    "probe_ip",
    "resolver_ip",
    "query",
    "rcode",
    "answer",
    "nscount",
];

/// How delimited output is laid out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Single ASCII octet separating fields
    pub delimiter: u8,
    /// Emit a line with the column names first
    pub header: bool,
    /// Stands in for absent values
    pub null: String,
}

impl Default for ExportOptions {
    fn default() -> ExportOptions {
        ExportOptions {
            delimiter: b',',
            header: false,
            null: String::new(),
        }
    }
}

fn cells(record: &Record) -> [Option<String>; 8] {
    [
        record.time.map(|time| time.to_string()),
        Some(record.probe_id.to_string()),
        Some(record.probe_ip.clone()),
        record.resolver_ip.clone(),
        record.query.clone(),
        record.rcode.clone(),
        record.answer.clone(),
        record.nscount.map(|count| count.to_string()),
    ]
}

fn write_field<W: Write>(writer: &mut W, field: &str, delimiter: u8) -> io::Result<()> {
    let needs_quotes = field
        .bytes()
        .any(|b| b == delimiter || b == b'"' || b == b'\r' || b == b'\n');
    if needs_quotes {
        write!(writer, "\"{}\"", field.replace('"', "\"\""))
    } else {
        writer.write_all(field.as_bytes())
    }
}

fn write_line<W, I, S>(writer: &mut W, fields: I, delimiter: u8) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            writer.write_all(&[delimiter])?;
        }
        write_field(writer, field.as_ref(), delimiter)?;
    }
    writer.write_all(b"\n")
}

/// Writes records as delimited text, quoting only the fields that need it
pub fn write_delimited<W: Write>(
    records: &[Record],
    options: &ExportOptions,
    mut writer: W,
) -> io::Result<()> {
    if options.header {
        write_line(&mut writer, COLUMNS.iter(), options.delimiter)?;
    }
    for record in records {
        let row = cells(record);
        let fields = row
            .iter()
            .map(|cell| cell.as_deref().unwrap_or(options.null.as_str()));
        write_line(&mut writer, fields, options.delimiter)?;
    }
    writer.flush()
}

/// Writes an aligned table for the console, with a row index and `NaN` for
/// absent values
pub fn write_table<W: Write>(records: &[Record], mut writer: W) -> io::Result<()> {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            cells(record)
                .iter()
                .map(|cell| cell.clone().unwrap_or_else(|| "NaN".to_owned()))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = COLUMNS.iter().map(|name| name.len()).collect();
    for row in rows.iter() {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let index_width = records.len().saturating_sub(1).to_string().len();

    write!(writer, "{:width$}", "", width = index_width)?;
    for (name, width) in COLUMNS.iter().zip(widths.iter()) {
        write!(writer, "  {:>width$}", name, width = width)?;
    }
    writeln!(writer)?;

    for (index, row) in rows.iter().enumerate() {
        write!(writer, "{:<width$}", index, width = index_width)?;
        for (cell, width) in row.iter().zip(widths.iter()) {
            write!(writer, "  {:>width$}", cell, width = width)?;
        }
        writeln!(writer)?;
    }
    writer.flush()
}

/// Writes one JSON object per record and line
pub fn write_json_lines<W: Write>(records: &[Record], mut writer: W) -> io::Result<()> {
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

#[cfg(test)]
mod test {
    use super::*;

    fn records() -> Vec<Record> {
        vec![
            Record {
                time: Some(1000),
                probe_id: 42,
                probe_ip: "192.0.2.9".to_owned(),
                resolver_ip: Some("198.51.100.1".to_owned()),
                query: Some("example.com. IN TXT".to_owned()),
                rcode: Some("NOERROR".to_owned()),
                answer: Some("example.com. 60 IN TXT \"a,b\"".to_owned()),
                nscount: Some(0),
            },
            Record {
                time: None,
                probe_id: 43,
                probe_ip: "192.0.2.10".to_owned(),
                resolver_ip: None,
                query: None,
                rcode: None,
                answer: None,
                nscount: None,
            },
        ]
    }

    fn to_string<F>(write: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut out = Vec::new();
        write(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn csv_defaults() {
        let out = to_string(|out| write_delimited(&records(), &ExportOptions::default(), out));
        assert_eq!(
            out,
            "1000,42,192.0.2.9,198.51.100.1,example.com. IN TXT,NOERROR,\
             \"example.com. 60 IN TXT \"\"a,b\"\"\",0\n\
             ,43,192.0.2.10,,,,,\n"
        );
    }

    #[test]
    fn header_delimiter_and_null() {
        let options = ExportOptions {
            delimiter: b'\t',
            header: true,
            null: "NA".to_owned(),
        };
        let out = to_string(|out| write_delimited(&records()[1..], &options, out));
        assert_eq!(
            out,
            "time\tprobe_id\tprobe_ip\tresolver_ip\tquery\trcode\tanswer\tnscount\n\
             NA\t43\t192.0.2.10\tNA\tNA\tNA\tNA\tNA\n"
        );
    }

    #[test]
    fn table_shows_nan() {
        let out = to_string(|out| write_table(&records(), out));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("   time  probe_id"));
        assert!(lines[1].starts_with("0  1000        42"));
        assert!(lines[2].starts_with("1   NaN        43"));
        assert!(lines[2].ends_with("NaN"));
    }

    #[test]
    fn empty_table_has_header_only() {
        let out = to_string(|out| write_table(&[], out));
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn json_lines() {
        let out = to_string(|out| write_json_lines(&records()[1..], out));
        assert_eq!(
            out,
            "{\"time\":null,\"probe_id\":43,\"probe_ip\":\"192.0.2.10\",\
             \"resolver_ip\":null,\"query\":null,\"rcode\":null,\
             \"answer\":null,\"nscount\":null}\n"
        );
    }
}
