//! Bounded flanking sequence captured around a matched window.
//!
//! The flank length is fixed and never scales with the query, so a long insert
//! cannot pull adjacent adapter or low-quality sequence into the second-stage probe.

use std::fmt;

/// Joins the two flanks when a context is rendered. Never occurs in sequence data.
pub const CONTEXT_SEPARATOR: u8 = b'|';

/// Number of symbols captured on each side of a window.
pub const DEFAULT_FLANK_LEN: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Context {
    /// Up to `flank_len` symbols immediately before the window.
    pub left: Vec<u8>,
    /// Up to `flank_len` symbols immediately after the window.
    pub right: Vec<u8>,
}

impl Context {
    /// Cuts the flanks of the window `[offset, offset + query_len)` out of `haystack`.
    ///
    /// Both slices clamp to the extent of the haystack and may be shorter than
    /// `flank_len`, or empty, at sequence edges.
    pub fn extract(haystack: &[u8], offset: usize, query_len: usize, flank_len: usize) -> Context {
        let len = haystack.len();
        let left_end = offset.min(len);
        let left_start = offset.saturating_sub(flank_len).min(left_end);
        let right_start = offset.saturating_add(query_len).min(len);
        let right_end = right_start.saturating_add(flank_len).min(len);

        Context {
            left: haystack[left_start..left_end].to_vec(),
            right: haystack[right_start..right_end].to_vec(),
        }
    }

    /// Both flanks concatenated without the separator; the query of the second stage.
    pub fn probe(&self) -> Vec<u8> {
        [self.left.as_slice(), self.right.as_slice()].concat()
    }

    pub fn len(&self) -> usize {
        self.left.len() + self.right.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            String::from_utf8_lossy(&self.left),
            CONTEXT_SEPARATOR as char,
            String::from_utf8_lossy(&self.right)
        )
    }
}
