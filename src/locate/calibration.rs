use super::{scan, LocateParams, MappedRead, WindowMatch};
use crate::utils::Result;

/// Fixed margin between the template baseline and the acceptance cutoff.
pub const CUTOFF_MARGIN: i64 = 2;

/// Baseline for telling real inserts apart from chance matches.
///
/// The insert is scanned against the unmodified template. A read that truly
/// carries the insert should match it clearly better than the template does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calibration {
    /// Best window of the template for the insert query.
    pub template_match: WindowMatch,
    /// Read-local distances strictly below this value count as detections.
    pub cutoff: i64,
}

impl Calibration {
    pub fn new(template: &[u8], query: &[u8], params: &LocateParams) -> Result<Self> {
        let template_match = scan(template, query, params.metric, params.flank_len)
            .map_err(|e| format!("Cannot calibrate against the template: {}", e))?;
        Ok(Self::from_match(template_match))
    }

    /// Calibration from an already computed best template window.
    pub fn from_match(template_match: WindowMatch) -> Self {
        let cutoff = template_match.distance as i64 - CUTOFF_MARGIN;
        Calibration {
            template_match,
            cutoff,
        }
    }

    pub fn template_distance(&self) -> u32 {
        self.template_match.distance
    }

    pub fn below_cutoff(&self, mapped: &MappedRead) -> bool {
        (mapped.read_match.distance as i64) < self.cutoff
    }

    /// A template offset of zero is never accepted, whatever the distance.
    pub fn passes(&self, mapped: &MappedRead) -> bool {
        mapped.template_match.offset > 0 && self.below_cutoff(mapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locate::{locate, Context, DistanceMetric, ReadRecord};

    fn window_match(distance: u32, offset: usize) -> WindowMatch {
        WindowMatch {
            distance,
            offset,
            window: Vec::new(),
            context: Context::default(),
        }
    }

    fn mapped(read_distance: u32, template_offset: usize) -> MappedRead {
        let record =
            ReadRecord::from_sam_line("r\t0\tchr\t1\t60\t*\t*\t0\t0\tACGTACGT\t*").unwrap();
        MappedRead {
            record,
            read_match: window_match(read_distance, 3),
            template_match: window_match(0, template_offset),
            insertion_pos: template_offset + 25,
        }
    }

    #[test]
    fn test_cutoff_is_template_distance_minus_margin() {
        let template = b"ACACACACACACACACACAC";
        let calibration =
            Calibration::new(template, b"GGGGGG", &LocateParams::default()).unwrap();
        assert_eq!(calibration.template_distance(), 6);
        assert_eq!(calibration.cutoff, 4);
    }

    #[test]
    fn test_cutoff_may_be_negative() {
        let calibration =
            Calibration::new(b"ACGTTTACGT", b"TTT", &LocateParams::default()).unwrap();
        assert_eq!(calibration.template_distance(), 0);
        assert_eq!(calibration.cutoff, -2);
        assert!(!calibration.below_cutoff(&mapped(0, 10)));
    }

    #[test]
    fn test_calibration_requires_longer_template() {
        assert!(Calibration::new(b"ACGT", b"ACGTACGT", &LocateParams::default()).is_err());
    }

    #[test]
    fn test_filter_boundaries() {
        let calibration = Calibration {
            template_match: window_match(6, 0),
            cutoff: 4,
        };
        assert!(calibration.passes(&mapped(3, 1)));
        assert!(!calibration.passes(&mapped(4, 1)));
        assert!(calibration.below_cutoff(&mapped(3, 0)));
        assert!(!calibration.passes(&mapped(0, 0)));
    }

    #[test]
    fn test_read_carrying_insert_scores_at_most_template_baseline() {
        let template = b"GATCCTAGGCTAACGTTGCAAGTCCGATTGCACTGGATCAAGCTTGACCATGCGTAACGGTTAC";
        let insert = b"TTTTTTTT";
        let params = LocateParams {
            metric: DistanceMetric::Levenshtein,
            flank_len: 10,
        };
        let calibration = Calibration::new(template, insert, &params).unwrap();

        for site in [25, 30, 40] {
            let seq = [&template[site - 20..site], &insert[..], &template[site..site + 20]].concat();
            let line = format!(
                "r\t0\tchr\t1\t60\t*\t*\t0\t0\t{}\t*",
                std::str::from_utf8(&seq).unwrap()
            );
            let record = ReadRecord::from_sam_line(&line).unwrap();
            let mapped = locate(record, insert, template, &params).unwrap();
            assert!(
                mapped.read_match.distance <= calibration.template_distance(),
                "read distance {} exceeds template baseline {} at site {}",
                mapped.read_match.distance,
                calibration.template_distance(),
                site
            );
            assert!(calibration.passes(&mapped));
            assert_eq!(mapped.insertion_pos, site);
        }
    }
}
