use super::Result;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read as ioRead};
use std::path::Path;

pub type InputReader = BufReader<Box<dyn ioRead + Send>>;

/// Opens a plain-text or gzip-compressed input file.
pub fn open_reader(path: &Path) -> Result<InputReader> {
    fn is_gzipped(path: &Path) -> bool {
        let path_str = path.to_string_lossy().to_lowercase();
        path_str.ends_with(".gz") || path_str.ends_with(".gzip")
    }
    let file = File::open(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    if is_gzipped(path) {
        let gz_decoder = MultiGzDecoder::new(file);
        if gz_decoder.header().is_some() {
            Ok(BufReader::new(Box::new(gz_decoder)))
        } else {
            Err(format!("Invalid gzip header: {}", path.to_string_lossy()))
        }
    } else {
        Ok(BufReader::new(Box::new(file)))
    }
}

/// Loads the template sequence from a single-record FASTA file.
pub fn load_template(path: &Path) -> Result<Vec<u8>> {
    let reader = open_reader(path)?;
    parse_template(reader).map_err(|e| format!("Template {}: {}", path.display(), e))
}

/// The first line is the record header and is discarded; all remaining lines
/// are concatenated and upper-cased.
pub fn parse_template<R: BufRead>(reader: R) -> Result<Vec<u8>> {
    let mut lines = reader.lines();
    match lines.next() {
        Some(header) => {
            let header = header.map_err(|e| format!("Error reading header: {}", e))?;
            if !header.starts_with('>') {
                log::warn!("Template header does not start with '>': {}", header);
            }
        }
        None => return Err("File is empty".to_string()),
    }

    let mut seq = Vec::new();
    for (line_number, line) in lines.enumerate() {
        let line = line.map_err(|e| format!("Error reading line {}: {}", line_number + 2, e))?;
        if line.starts_with('>') {
            log::warn!(
                "Only the first FASTA record is used, ignoring from line {}",
                line_number + 2
            );
            break;
        }
        seq.extend(line.trim().bytes().map(|b| b.to_ascii_uppercase()));
    }

    if seq.is_empty() {
        return Err("Template sequence is empty".to_string());
    }
    Ok(seq)
}
