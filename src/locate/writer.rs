//! Defines the `TsvWriter` struct for writing mapped reads as a tab-separated table.
//!

use super::{Calibration, MappedRead, SAM_FIELDS};
use crate::utils::Result;
use itertools::Itertools;
use std::{
    fs::File,
    io::{BufWriter, Write},
};

/// Columns appended after the mandatory alignment fields.
const RESULT_COLUMNS: [&str; 12] = [
    "length",
    "template_distance",
    "cutoff",
    "read_distance",
    "read_offset",
    "read_match",
    "read_context",
    "template_match_distance",
    "template_offset",
    "template_match",
    "template_context",
    "insertion_pos",
];

/// Writes one row per mapped read, preceded by a header row.
pub struct TsvWriter<W: Write> {
    writer: BufWriter<W>,
}

impl TsvWriter<File> {
    /// Creates the output file at `output_path` and writes the header.
    pub fn new(output_path: &str) -> Result<Self> {
        let file = File::create(output_path).map_err(|e| format!("{}: {}", output_path, e))?;
        Self::from_writer(file)
    }
}

impl<W: Write> TsvWriter<W> {
    pub fn from_writer(inner: W) -> Result<Self> {
        let mut writer = BufWriter::new(inner);
        let header = SAM_FIELDS.iter().chain(RESULT_COLUMNS.iter()).join("\t");
        writeln!(writer, "{}", header).map_err(|e| e.to_string())?;
        Ok(Self { writer })
    }

    pub fn write(&mut self, mapped: &MappedRead, calibration: &Calibration) -> Result<()> {
        let read_match = &mapped.read_match;
        let template_match = &mapped.template_match;
        let results = [
            mapped.record.len().to_string(),
            calibration.template_distance().to_string(),
            calibration.cutoff.to_string(),
            read_match.distance.to_string(),
            read_match.offset.to_string(),
            String::from_utf8_lossy(&read_match.window).into_owned(),
            read_match.context.to_string(),
            template_match.distance.to_string(),
            template_match.offset.to_string(),
            String::from_utf8_lossy(&template_match.window).into_owned(),
            template_match.context.to_string(),
            mapped.insertion_pos.to_string(),
        ];
        let row = mapped.record.sam_fields().iter().chain(results.iter()).join("\t");
        writeln!(self.writer, "{}", row).map_err(|e| e.to_string())
    }

    /// Flushes buffered rows and returns the underlying writer.
    pub fn finish(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| format!("Failed to flush output: {}", e.error()))
    }
}
