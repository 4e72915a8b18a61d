mod batch;
mod calibration;
mod context;
mod distance;
mod error;
mod locator;
mod record;
mod scan;
mod writer;

pub use batch::{
    initialize_thread_pool, run_batch, BatchOutcome, LocateInputs, ReadOutcome, ReorderBuffer,
    Verdict,
};
pub use calibration::{Calibration, CUTOFF_MARGIN};
pub use context::{Context, CONTEXT_SEPARATOR, DEFAULT_FLANK_LEN};
pub use distance::DistanceMetric;
pub use error::LocateError;
pub use locator::{locate, LocateParams, MappedRead};
pub use record::{
    stream_records_into_channel, ReadFilter, ReadRecord, RecordStats, SAM_FIELDS,
    UNMAPPED_TEMPLATE,
};
pub use scan::{scan, window_distances, WindowMatch};
pub use writer::TsvWriter;
