use super::{locate, Calibration, LocateError, LocateParams, MappedRead, ReadRecord};
use crate::utils::Result;
use rayon::{prelude::*, ThreadPoolBuilder};
use std::collections::BTreeMap;

/// Result of locating the insert in one read.
pub type ReadOutcome = std::result::Result<MappedRead, LocateError>;

/// Inputs shared read-only by every worker of a run.
#[derive(Debug, Clone)]
pub struct LocateInputs {
    pub query: Vec<u8>,
    pub template: Vec<u8>,
    pub params: LocateParams,
}

impl LocateInputs {
    pub fn locate(&self, record: ReadRecord) -> ReadOutcome {
        locate(record, &self.query, &self.template, &self.params)
    }

    /// Locates the insert in one read and applies the cutoff filter. Reads
    /// that cannot be located are logged and reported as `Skipped`.
    pub fn judge(&self, record: ReadRecord, calibration: &Calibration) -> Verdict {
        let read_id = record.id.clone();
        let outcome = self.locate(record);
        if let Err(e) = &outcome {
            log::debug!("Skipping read {}: {}", read_id, e);
        }
        Verdict::judge(outcome, calibration)
    }
}

/// What is left of one read once the cutoff filter has been applied.
///
/// Only `Pass` keeps the read itself, so outcomes waiting to be reordered
/// cost little unless they are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Passed the final filter.
    Pass(MappedRead),
    /// Located but rejected. `below_cutoff` is still counted.
    Fail { below_cutoff: bool },
    /// Too short to be located.
    Skipped,
}

impl Verdict {
    pub fn judge(outcome: ReadOutcome, calibration: &Calibration) -> Self {
        match outcome {
            Ok(mapped) if calibration.passes(&mapped) => Verdict::Pass(mapped),
            Ok(mapped) => Verdict::Fail {
                below_cutoff: calibration.below_cutoff(&mapped),
            },
            Err(_) => Verdict::Skipped,
        }
    }

    pub fn is_below_cutoff(&self) -> bool {
        match self {
            Verdict::Pass(_) => true,
            Verdict::Fail { below_cutoff } => *below_cutoff,
            Verdict::Skipped => false,
        }
    }
}

/// Mapped reads in input order, plus the reads that could not be located.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub mapped: Vec<MappedRead>,
    pub skipped: Vec<(String, LocateError)>,
}

pub fn initialize_thread_pool(num_threads: usize) -> Result<rayon::ThreadPool> {
    if num_threads == 0 {
        return Err("Number of threads must be at least 1".to_string());
    }
    ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("insite-{}", i))
        .build()
        .map_err(|e| format!("Failed to initialize thread pool: {}", e))
}

/// Locates the insert in every read on a pool of `num_threads` workers.
///
/// Library entry point for reads already in memory; no cutoff is applied. The
/// `locate` command streams reads through [`LocateInputs::judge`] instead.
/// Reads are processed independently; a read that cannot be located is
/// reported in `skipped` and does not affect the others. Output order follows
/// input order whatever the order of completion.
pub fn run_batch(
    reads: Vec<ReadRecord>,
    inputs: &LocateInputs,
    num_threads: usize,
) -> Result<BatchOutcome> {
    let pool = initialize_thread_pool(num_threads)?;
    let outcomes: Vec<(String, ReadOutcome)> = pool.install(|| {
        reads
            .into_par_iter()
            .map(|record| (record.id.clone(), inputs.locate(record)))
            .collect()
    });

    let mut batch = BatchOutcome::default();
    for (id, outcome) in outcomes {
        match outcome {
            Ok(mapped) => batch.mapped.push(mapped),
            Err(e) => {
                log::debug!("Skipping read {}: {}", id, e);
                batch.skipped.push((id, e));
            }
        }
    }
    Ok(batch)
}

/// Restores input order for results that arrive tagged with their input index.
#[derive(Debug)]
pub struct ReorderBuffer<T> {
    next_index: usize,
    pending: BTreeMap<usize, T>,
}

impl<T> Default for ReorderBuffer<T> {
    fn default() -> Self {
        Self {
            next_index: 0,
            pending: BTreeMap::new(),
        }
    }
}

impl<T> ReorderBuffer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an item and returns every item that is now contiguous with those
    /// already released, in index order.
    pub fn push(&mut self, index: usize, item: T) -> Vec<T> {
        self.pending.insert(index, item);
        let mut ready = Vec::new();
        while let Some(item) = self.pending.remove(&self.next_index) {
            ready.push(item);
            self.next_index += 1;
        }
        ready
    }

    pub fn num_pending(&self) -> usize {
        self.pending.len()
    }

    /// Releases whatever remains, in index order, including items after a gap.
    pub fn drain(self) -> impl Iterator<Item = T> {
        self.pending.into_values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locate::DistanceMetric;
    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
    use std::collections::HashMap;

    const TEMPLATE: &str = "GATCCTAGGCTAACGTTGCAAGTCCGATTGCACTGGATCAAGCTTGACCATGCGTAACGGTTAC";
    const INSERT: &str = "TTTTTTTT";

    fn inputs() -> LocateInputs {
        LocateInputs {
            query: INSERT.as_bytes().to_vec(),
            template: TEMPLATE.as_bytes().to_vec(),
            params: LocateParams {
                metric: DistanceMetric::Levenshtein,
                flank_len: 10,
            },
        }
    }

    fn reads() -> Vec<ReadRecord> {
        let mut reads = Vec::new();
        for (i, site) in (20..44).enumerate() {
            let seq = format!(
                "{}{}{}",
                &TEMPLATE[site - 20..site],
                INSERT,
                &TEMPLATE[site..site + 20]
            );
            let line = format!("read{}\t0\tchr\t{}\t60\t*\t*\t0\t0\t{}\t*", i, site, seq);
            reads.push(ReadRecord::from_sam_line(&line).unwrap());
        }
        // Shorter than the insert
        reads.push(ReadRecord::from_sam_line("short\t0\tchr\t1\t60\t*\t*\t0\t0\tTTT\t*").unwrap());
        reads
    }

    #[test]
    fn test_run_batch_preserves_input_order() {
        let reads = reads();
        let expected_ids: Vec<String> = reads
            .iter()
            .filter(|r| r.id != "short")
            .map(|r| r.id.clone())
            .collect();
        let batch = run_batch(reads, &inputs(), 4).unwrap();
        let ids: Vec<String> = batch.mapped.iter().map(|m| m.record.id.clone()).collect();
        assert_eq!(ids, expected_ids);
    }

    #[test]
    fn test_run_batch_tolerates_failed_reads() {
        let batch = run_batch(reads(), &inputs(), 2).unwrap();
        assert_eq!(batch.mapped.len(), 24);
        assert_eq!(batch.skipped.len(), 1);
        assert_eq!(batch.skipped[0].0, "short");
        assert!(matches!(
            batch.skipped[0].1,
            LocateError::InsufficientLength { .. }
        ));
    }

    #[test]
    fn test_run_batch_is_order_invariant() {
        let reads = reads();
        let mut shuffled = reads.clone();
        shuffled.shuffle(&mut StdRng::seed_from_u64(42));

        let by_id = |batch: BatchOutcome| -> HashMap<String, MappedRead> {
            batch
                .mapped
                .into_iter()
                .map(|m| (m.record.id.clone(), m))
                .collect()
        };
        let original = by_id(run_batch(reads, &inputs(), 3).unwrap());
        let permuted = by_id(run_batch(shuffled, &inputs(), 5).unwrap());
        assert_eq!(original, permuted);
    }

    #[test]
    fn test_run_batch_recovers_insertion_sites() {
        let batch = run_batch(reads(), &inputs(), 4).unwrap();
        for mapped in &batch.mapped {
            let site = mapped.record.pos as usize;
            // Preceded by a T, the insert is found one base early
            if TEMPLATE.as_bytes()[site - 1] == b'T' {
                assert_eq!(mapped.read_match.distance, 0);
                assert!(mapped.read_match.offset < 20);
                continue;
            }
            assert_eq!(mapped.read_match.offset, 20);
            assert_eq!(mapped.insertion_pos, site);
        }
    }

    #[test]
    fn test_judge_keeps_only_passing_reads() {
        let inputs = inputs();
        let calibration =
            Calibration::new(TEMPLATE.as_bytes(), INSERT.as_bytes(), &inputs.params).unwrap();
        assert!(calibration.cutoff > 0);
        let mut reads = reads().into_iter();

        let carrying = reads.next().unwrap();
        let verdict = inputs.judge(carrying.clone(), &calibration);
        assert!(matches!(&verdict, Verdict::Pass(m) if m.record == carrying));
        assert!(verdict.is_below_cutoff());

        let short = reads.last().unwrap();
        assert_eq!(inputs.judge(short, &calibration), Verdict::Skipped);

        // Unmodified template sequence scores no better than the baseline
        let line = format!("plain\t0\tchr\t1\t60\t*\t*\t0\t0\t{}\t*", &TEMPLATE[0..40]);
        let plain = ReadRecord::from_sam_line(&line).unwrap();
        assert_eq!(
            inputs.judge(plain, &calibration),
            Verdict::Fail {
                below_cutoff: false
            }
        );
    }

    #[test]
    fn test_judge_counts_template_start_below_cutoff() {
        let inputs = inputs();
        let calibration =
            Calibration::new(TEMPLATE.as_bytes(), INSERT.as_bytes(), &inputs.params).unwrap();
        let mut mapped = inputs.locate(reads().remove(0)).unwrap();
        mapped.template_match.offset = 0;
        let verdict = Verdict::judge(Ok(mapped), &calibration);
        assert_eq!(verdict, Verdict::Fail { below_cutoff: true });
        assert!(verdict.is_below_cutoff());
    }

    #[test]
    fn test_run_batch_rejects_zero_threads() {
        assert!(run_batch(reads(), &inputs(), 0).is_err());
    }

    #[test]
    fn test_reorder_buffer_releases_contiguous_items() {
        let mut buffer = ReorderBuffer::new();
        assert!(buffer.push(2, "c").is_empty());
        assert!(buffer.push(1, "b").is_empty());
        assert_eq!(buffer.num_pending(), 2);
        assert_eq!(buffer.push(0, "a"), vec!["a", "b", "c"]);
        assert_eq!(buffer.num_pending(), 0);
        assert_eq!(buffer.push(3, "d"), vec!["d"]);
    }

    #[test]
    fn test_reorder_buffer_drain_after_gap() {
        let mut buffer = ReorderBuffer::new();
        assert_eq!(buffer.push(0, 0), vec![0]);
        assert!(buffer.push(3, 3).is_empty());
        assert!(buffer.push(2, 2).is_empty());
        assert_eq!(buffer.drain().collect::<Vec<_>>(), vec![2, 3]);
    }
}
