use super::{Context, DistanceMetric, LocateError};

/// Best-scoring window of a haystack for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowMatch {
    /// Distance of the best window to the query.
    pub distance: u32,
    /// 0-based start of the best window in the haystack.
    pub offset: usize,
    /// Content of the best window.
    pub window: Vec<u8>,
    /// Flanks of the best window, cut from the haystack.
    pub context: Context,
}

impl WindowMatch {
    fn at(haystack: &[u8], offset: usize, needle_len: usize, distance: u32, flank_len: usize) -> Self {
        WindowMatch {
            distance,
            offset,
            window: haystack[offset..offset + needle_len].to_vec(),
            context: Context::extract(haystack, offset, needle_len, flank_len),
        }
    }

    /// Builds the match at the first minimum of precomputed `distances`, as
    /// returned by [`window_distances`]. `None` if there are no windows.
    pub fn first_minimum(
        haystack: &[u8],
        needle_len: usize,
        distances: &[u32],
        flank_len: usize,
    ) -> Option<Self> {
        let (offset, &distance) = distances
            .iter()
            .enumerate()
            .min_by_key(|&(offset, &distance)| (distance, offset))?;
        Some(Self::at(haystack, offset, needle_len, distance, flank_len))
    }
}

fn check_lengths(haystack: &[u8], needle: &[u8]) -> Result<usize, LocateError> {
    if haystack.len() <= needle.len() {
        return Err(LocateError::InsufficientLength {
            haystack: haystack.len(),
            needle: needle.len(),
        });
    }
    // The last window, starting at len(haystack) - len(needle), is not scanned.
    // Template coordinates downstream are computed under this convention.
    Ok(haystack.len() - needle.len())
}

/// Distance of `needle` to every window scanned by [`scan`], indexed by offset.
pub fn window_distances(
    haystack: &[u8],
    needle: &[u8],
    metric: DistanceMetric,
) -> Result<Vec<u32>, LocateError> {
    let num_windows = check_lengths(haystack, needle)?;
    Ok((0..num_windows)
        .map(|offset| metric.distance(&haystack[offset..offset + needle.len()], needle))
        .collect())
}

/// Slides `needle` across `haystack` and reports the window with the minimum
/// distance. On ties the lowest offset wins.
pub fn scan(
    haystack: &[u8],
    needle: &[u8],
    metric: DistanceMetric,
    flank_len: usize,
) -> Result<WindowMatch, LocateError> {
    let num_windows = check_lengths(haystack, needle)?;

    let mut best_offset = 0;
    let mut best_distance = u32::MAX;
    for offset in 0..num_windows {
        let distance = metric.distance(&haystack[offset..offset + needle.len()], needle);
        if distance < best_distance {
            best_offset = offset;
            best_distance = distance;
            if distance == 0 {
                break;
            }
        }
    }

    Ok(WindowMatch::at(
        haystack,
        best_offset,
        needle.len(),
        best_distance,
        flank_len,
    ))
}
