//! Simulation engine for Strata.
//!
//! Drives a group of workers through the generation loop:
//!
//! ```text
//! INIT ─► ( EXCHANGE ─► COMPUTE ─► DIAGNOSE ─► SNAPSHOT ─► SWAP ) × generations ─► BARRIER ─► DONE
//! ```
//!
//! [`run_worker`] is one worker's whole life, generic over the
//! [`Communicator`](strata_comm::Communicator) it talks through.
//! [`run_group`] spawns a worker thread per endpoint of an in-process
//! channel group, joins them, and folds the outcomes into a
//! [`GroupReport`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod diagnostics;
pub mod error;
pub mod group;
pub mod metrics;
pub mod snapshot;
pub mod worker;

pub use diagnostics::{report_on_coordinator, should_sample, GenerationStats};
pub use error::{GroupError, WorkerError};
pub use group::{run_group, GroupOptions, GroupReport};
pub use metrics::StepMetrics;
pub use snapshot::{
    snapshot_file_name, write_snapshot, CellRecord, DirectorySink, NoSnapshots, SnapshotSink,
};
pub use worker::{run_worker, Worker, WorkerOutcome, WorkerReport};
