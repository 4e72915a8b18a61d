use crate::cli::LocateArgs;
use crate::locate::{
    initialize_thread_pool, stream_records_into_channel, Calibration, LocateInputs,
    LocateParams, ReadFilter, RecordStats, ReorderBuffer, TsvWriter, Verdict,
};
use crate::utils::{load_template, open_reader, output_path, parse_sequence, Result};
use crossbeam_channel::{bounded, Receiver};
use rayon::iter::{ParallelBridge, ParallelIterator};
use std::{
    fs::File,
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

const CHANNEL_BUFFER_SIZE: usize = 2048;

/// Tallies of the output pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LocateSummary {
    pub records: RecordStats,
    /// Reads with a read-local distance below the cutoff.
    pub below_cutoff: usize,
    /// Reads that passed the final filter and were written.
    pub written: usize,
    /// Reads too short to be located, in the read or in the template.
    pub skipped: usize,
    pub elapsed: Duration,
}

pub fn locate(args: LocateArgs) -> Result<LocateSummary> {
    let start_timer = Instant::now();

    let query = parse_sequence(&args.query)?;
    log::info!("Query length: {}", query.len());

    let template = load_template(&args.template_path)?;
    log::info!("Template length: {}", template.len());

    let params = LocateParams {
        metric: args.metric,
        flank_len: args.flank_len,
    };
    let calibration = Calibration::new(&template, &query, &params)?;
    log::info!(
        "Template-query distance: {} at offset {} ({} distance)",
        calibration.template_distance(),
        calibration.template_match.offset,
        params.metric
    );

    if calibration.cutoff <= 0 {
        log::warn!(
            "Cutoff is {}; no read can pass, the output will be empty",
            calibration.cutoff
        );
    }

    let filter = ReadFilter::new(
        args.min_len.unwrap_or(query.len()),
        args.max_len.unwrap_or(template.len()),
    )?;
    log::info!(
        "Mapping reads of size {} to {} with a cutoff of {}",
        filter.min_len,
        filter.max_len,
        calibration.cutoff
    );

    let reads_reader = open_reader(&args.reads_path)?;
    let output_path = output_path(&args.output_prefix, "tsv");
    let tsv_writer = TsvWriter::new(&output_path)?;
    let pool = initialize_thread_pool(args.num_threads)?;

    let (sender_record, receiver_record) = bounded(CHANNEL_BUFFER_SIZE);
    let record_stream_thread =
        thread::spawn(move || stream_records_into_channel(reads_reader, filter, sender_record));

    let (sender_result, receiver_result) = bounded(CHANNEL_BUFFER_SIZE);
    let writer_calibration = calibration.clone();
    let writer_thread =
        thread::spawn(move || write_results(receiver_result, tsv_writer, writer_calibration));

    let inputs = Arc::new(LocateInputs {
        query,
        template,
        params,
    });

    log::debug!("Locating inserts with {} threads...", args.num_threads);
    pool.install(|| {
        receiver_record
            .into_iter()
            .par_bridge()
            .for_each_with(&sender_result, |s, (index, record)| {
                let verdict = inputs.judge(record, &calibration);
                if let Err(e) = s.send((index, verdict)) {
                    log::error!("Failed to send read result to writer thread: {}", e);
                }
            });
    });

    // Clean-up
    drop(sender_result);
    let writer_result = writer_thread.join().expect("Writer thread panicked");
    log::trace!("Writer thread finished");
    let records = record_stream_thread
        .join()
        .expect("Record stream thread panicked")?;
    log::trace!("Record stream thread finished");
    let mut summary = writer_result?;
    summary.records = records;

    log::info!(
        "Total candidate reads: {} ({} filtered, {} malformed)",
        records.kept,
        records.filtered(),
        records.malformed
    );
    if summary.skipped > 0 {
        log::info!("Skipped {} reads too short to locate", summary.skipped);
    }
    log::info!("Mapped hits in {} reads", summary.below_cutoff);
    log::info!("Wrote {} reads to {}", summary.written, output_path);
    summary.elapsed = start_timer.elapsed();
    log::info!("Done in {:.2} minutes", summary.elapsed.as_secs_f64() / 60.0);
    Ok(summary)
}

/// Receives per-read verdicts in completion order and writes the passing
/// reads in input order.
fn write_results(
    receiver: Receiver<(usize, Verdict)>,
    mut writer: TsvWriter<File>,
    calibration: Calibration,
) -> Result<LocateSummary> {
    let mut summary = LocateSummary::default();
    let mut reorder = ReorderBuffer::new();

    let mut handle = |verdict: Verdict, summary: &mut LocateSummary| -> Result<()> {
        if verdict.is_below_cutoff() {
            summary.below_cutoff += 1;
        }
        match verdict {
            Verdict::Pass(mapped) => {
                writer.write(&mapped, &calibration)?;
                summary.written += 1;
            }
            Verdict::Fail { .. } => {}
            Verdict::Skipped => summary.skipped += 1,
        }
        Ok(())
    };

    for (index, verdict) in &receiver {
        for verdict in reorder.push(index, verdict) {
            handle(verdict, &mut summary)?;
        }
    }
    for verdict in reorder.drain() {
        handle(verdict, &mut summary)?;
    }

    writer.finish()?;
    Ok(summary)
}
