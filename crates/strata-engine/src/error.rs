//! Error types for a single worker and for a whole group run.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use strata_comm::CommError;
use strata_core::{ConfigError, PartitionError, WorkerId};

// ── WorkerError ────────────────────────────────────────────────────

/// Why one worker stopped before finishing its run.
#[derive(Debug)]
pub enum WorkerError {
    /// The worker's partition could not be computed.
    Partition(PartitionError),
    /// A halo exchange, reduction or barrier failed.
    Comm(CommError),
    /// A snapshot artifact could not be written.
    Snapshot {
        /// File being written.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// The statistics line could not be written.
    Report(io::Error),
}

impl WorkerError {
    /// Whether this failure only echoes another worker's abort.
    pub fn is_secondary(&self) -> bool {
        matches!(self, Self::Comm(e) if e.is_secondary())
    }
}

impl fmt::Display for WorkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Partition(e) => write!(f, "partition: {e}"),
            Self::Comm(e) => write!(f, "communication: {e}"),
            Self::Snapshot { path, source } => {
                write!(f, "cannot write snapshot '{}': {source}", path.display())
            }
            Self::Report(e) => write!(f, "cannot write statistics: {e}"),
        }
    }
}

impl Error for WorkerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Partition(e) => Some(e),
            Self::Comm(e) => Some(e),
            Self::Snapshot { source, .. } => Some(source),
            Self::Report(e) => Some(e),
        }
    }
}

impl From<PartitionError> for WorkerError {
    fn from(e: PartitionError) -> Self {
        Self::Partition(e)
    }
}

impl From<CommError> for WorkerError {
    fn from(e: CommError) -> Self {
        Self::Comm(e)
    }
}

// ── GroupError ─────────────────────────────────────────────────────

/// Why a group run failed.
///
/// When several workers fail, the group reports the first one (in worker
/// order) whose failure is not just the echo of someone else's abort.
#[derive(Debug)]
pub enum GroupError {
    /// The configuration breaks an invariant.
    Config(ConfigError),
    /// The group could not be partitioned (no workers).
    Partition(PartitionError),
    /// A worker returned an error.
    Worker {
        /// The failing worker.
        worker: WorkerId,
        /// What went wrong.
        source: WorkerError,
    },
    /// A worker thread panicked.
    WorkerPanicked {
        /// The worker whose thread panicked.
        worker: WorkerId,
        /// The panic message, if it was a string.
        message: String,
    },
    /// A worker thread could not be spawned.
    ThreadSpawnFailed {
        /// The worker whose thread could not be started.
        worker: WorkerId,
        /// Description of the failure.
        reason: String,
    },
}

impl GroupError {
    /// Whether this failure only echoes another worker's abort.
    pub fn is_secondary(&self) -> bool {
        matches!(self, Self::Worker { source, .. } if source.is_secondary())
    }
}

impl fmt::Display for GroupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Partition(e) => write!(f, "partition: {e}"),
            Self::Worker { worker, source } => write!(f, "worker {worker} failed: {source}"),
            Self::WorkerPanicked { worker, message } => {
                write!(f, "worker {worker} panicked: {message}")
            }
            Self::ThreadSpawnFailed { worker, reason } => {
                write!(f, "cannot spawn thread for worker {worker}: {reason}")
            }
        }
    }
}

impl Error for GroupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Partition(e) => Some(e),
            Self::Worker { source, .. } => Some(source),
            Self::WorkerPanicked { .. } | Self::ThreadSpawnFailed { .. } => None,
        }
    }
}

impl From<ConfigError> for GroupError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<PartitionError> for GroupError {
    fn from(e: PartitionError) -> Self {
        Self::Partition(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aborted_comm_is_secondary() {
        let echo = WorkerError::Comm(CommError::Aborted { by: WorkerId(2) });
        assert!(echo.is_secondary());
        let cause = WorkerError::Comm(CommError::RowWidthMismatch {
            peer: WorkerId(1),
            expected: 4,
            found: 6,
        });
        assert!(!cause.is_secondary());

        let group = GroupError::Worker {
            worker: WorkerId(0),
            source: echo,
        };
        assert!(group.is_secondary());
    }

    #[test]
    fn source_chain_reaches_the_comm_error() {
        let err = GroupError::Worker {
            worker: WorkerId(1),
            source: WorkerError::Comm(CommError::Aborted { by: WorkerId(0) }),
        };
        let worker = err.source().unwrap();
        assert!(worker.to_string().starts_with("communication:"));
        assert!(worker.source().is_some());
        assert!(err.to_string().starts_with("worker 1 failed"));
    }

    #[test]
    fn snapshot_error_names_the_file() {
        let err = WorkerError::Snapshot {
            path: PathBuf::from("out/gol_it_00000000_rank_00000000.dat"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("gol_it_00000000_rank_00000000.dat"));
    }
}
