use std::{error, fmt};

/// Per-read failures. Both variants are recovered locally: the affected read or
/// record is skipped and the batch continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocateError {
    /// The sequence being scanned is not longer than its query, so no window exists.
    InsufficientLength { haystack: usize, needle: usize },
    /// An alignment record is missing fields or has a non-numeric value where a number is required.
    MalformedRecord(String),
}

impl fmt::Display for LocateError {
    #[cold]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LocateError::InsufficientLength { haystack, needle } => write!(
                f,
                "Sequence of length {} is too short to scan with a query of length {}",
                haystack, needle
            ),
            LocateError::MalformedRecord(msg) => write!(f, "Malformed record: {}", msg),
        }
    }
}

impl error::Error for LocateError {}
