use super::{scan, DistanceMetric, LocateError, ReadRecord, WindowMatch, DEFAULT_FLANK_LEN};

/// Parameters shared by every read of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocateParams {
    pub metric: DistanceMetric,
    /// Symbols of context captured on each side of the read-local match.
    pub flank_len: usize,
}

impl Default for LocateParams {
    fn default() -> Self {
        Self {
            metric: DistanceMetric::default(),
            flank_len: DEFAULT_FLANK_LEN,
        }
    }
}

/// A read together with where its insert sits in the read and in the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedRead {
    pub record: ReadRecord,
    /// Best window of the read for the insert query.
    pub read_match: WindowMatch,
    /// Best window of the template for the read-local context.
    pub template_match: WindowMatch,
    /// Insertion point in template coordinates.
    pub insertion_pos: usize,
}

/// Two-stage localization of the insert carried by `record`.
///
/// The insert is first located in the read. Its flanks, joined without the
/// separator, are then located in the template. The left flank precedes the
/// insertion point, so the template coordinate is the template window offset
/// shifted by `flank_len`.
pub fn locate(
    record: ReadRecord,
    query: &[u8],
    template: &[u8],
    params: &LocateParams,
) -> Result<MappedRead, LocateError> {
    let read_match = scan(&record.seq, query, params.metric, params.flank_len)?;

    let probe = read_match.context.probe();
    let template_match = scan(template, &probe, params.metric, params.flank_len)?;
    let insertion_pos = template_match.offset + params.flank_len;

    Ok(MappedRead {
        record,
        read_match,
        template_match,
        insertion_pos,
    })
}
