//! Read records parsed from tab-delimited alignment (SAM) text.
//!

use super::LocateError;
use crate::utils::Result;
use crossbeam_channel::Sender;
use std::{io::BufRead, str::FromStr};

/// Marker used by aligners for a read without a mapped template.
pub const UNMAPPED_TEMPLATE: &str = "*";

/// Names of the mandatory alignment fields, in file order.
pub const SAM_FIELDS: [&str; 11] = [
    "read", "flag", "template", "pos", "mapq", "cigar", "rnext", "pnext", "tlen", "seq", "qual",
];

/// A single sequencing read with the mandatory fields of its alignment record.
///
/// Only `seq` takes part in the distance computation; every other field is passed
/// through to the output unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRecord {
    pub id: String,
    pub flag: u16,
    pub template_name: String,
    /// Alignment position reported by the aligner.
    pub pos: u64,
    pub mapq: u8,
    pub cigar: String,
    pub mate_ref: String,
    pub mate_pos: u64,
    pub template_len: i64,
    /// Read bases, upper-cased.
    pub seq: Vec<u8>,
    pub qual: String,
}

fn parse_field<T: FromStr>(fields: &[&str], index: usize) -> std::result::Result<T, LocateError> {
    fields[index].parse::<T>().map_err(|_| {
        LocateError::MalformedRecord(format!(
            "field '{}' is not a valid number: {}",
            SAM_FIELDS[index], fields[index]
        ))
    })
}

impl ReadRecord {
    pub fn from_sam_line(line: &str) -> std::result::Result<Self, LocateError> {
        let fields: Vec<&str> = line.trim_end_matches(['\n', '\r']).split('\t').collect();
        if fields.len() < SAM_FIELDS.len() {
            return Err(LocateError::MalformedRecord(format!(
                "expected at least {} tab-separated fields, found {}",
                SAM_FIELDS.len(),
                fields.len()
            )));
        }

        Ok(ReadRecord {
            id: fields[0].to_string(),
            flag: parse_field(&fields, 1)?,
            template_name: fields[2].to_string(),
            pos: parse_field(&fields, 3)?,
            mapq: parse_field(&fields, 4)?,
            cigar: fields[5].to_string(),
            mate_ref: fields[6].to_string(),
            mate_pos: parse_field(&fields, 7)?,
            template_len: parse_field(&fields, 8)?,
            seq: fields[9].as_bytes().to_ascii_uppercase(),
            qual: fields[10].to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn is_mapped(&self) -> bool {
        self.template_name != UNMAPPED_TEMPLATE
    }

    /// Mandatory fields in file order, as written to the output.
    pub fn sam_fields(&self) -> [String; 11] {
        [
            self.id.clone(),
            self.flag.to_string(),
            self.template_name.clone(),
            self.pos.to_string(),
            self.mapq.to_string(),
            self.cigar.clone(),
            self.mate_ref.clone(),
            self.mate_pos.to_string(),
            self.template_len.to_string(),
            String::from_utf8_lossy(&self.seq).into_owned(),
            self.qual.clone(),
        ]
    }
}

/// Selects candidate reads by length (exclusive bounds) and mapping status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadFilter {
    pub min_len: usize,
    pub max_len: usize,
}

impl ReadFilter {
    pub fn new(min_len: usize, max_len: usize) -> Result<Self> {
        if min_len >= max_len {
            return Err(format!(
                "Minimum read length ({}) must be smaller than maximum read length ({})",
                min_len, max_len
            ));
        }
        Ok(ReadFilter { min_len, max_len })
    }

    pub fn keep(&self, record: &ReadRecord) -> bool {
        self.min_len < record.len() && record.len() < self.max_len && record.is_mapped()
    }
}

/// Tallies of the ingestion pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RecordStats {
    pub total: usize,
    pub kept: usize,
    pub malformed: usize,
}

impl RecordStats {
    pub fn filtered(&self) -> usize {
        self.total - self.kept - self.malformed
    }
}

/// Parses alignment records from `reader` and sends the candidates that pass
/// `filter`, tagged with their index among the candidates.
pub fn stream_records_into_channel<R: BufRead>(
    reader: R,
    filter: ReadFilter,
    sender: Sender<(usize, ReadRecord)>,
) -> Result<RecordStats> {
    let mut stats = RecordStats::default();

    for (line_number, bytes) in reader.split(b'\n').enumerate() {
        let bytes =
            bytes.map_err(|e| format!("Error at alignment line {}: {}", line_number + 1, e))?;
        if bytes.starts_with(b"@") || bytes.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        stats.total += 1;
        let parsed = std::str::from_utf8(&bytes)
            .map_err(|e| LocateError::MalformedRecord(format!("invalid UTF-8: {}", e)))
            .and_then(ReadRecord::from_sam_line);
        let record = match parsed {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Skipping alignment line {}: {}", line_number + 1, e);
                stats.malformed += 1;
                continue;
            }
        };

        if filter.keep(&record) {
            if sender.send((stats.kept, record)).is_err() {
                return Err("Record channel closed before all reads were sent".to_string());
            }
            stats.kept += 1;
        }
    }

    Ok(stats)
}
