//! Error types for configuration loading and partitioning.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors from loading or validating a [`SimulationConfig`](crate::SimulationConfig).
///
/// Individual fields never produce an error: a missing or malformed field
/// falls back to its default. Only an unreadable file, a document that is not
/// TOML at all, or a hand-built config that breaks an invariant ends up here.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// The document is not valid TOML, or a section is not a table.
    Parse {
        /// The underlying TOML error.
        source: toml::de::Error,
    },
    /// A field that must be positive is zero.
    NonPositive {
        /// Name of the offending field.
        field: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config '{}': {source}", path.display())
            }
            Self::Parse { source } => write!(f, "invalid config document: {source}"),
            Self::NonPositive { field } => write!(f, "{field} must be positive"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source } => Some(source),
            Self::NonPositive { .. } => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(source: toml::de::Error) -> Self {
        Self::Parse { source }
    }
}

/// Errors from [`compute_partition`](crate::compute_partition).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PartitionError {
    /// The group has no workers.
    NoWorkers,
    /// The worker index is not below the worker count.
    WorkerOutOfRange {
        /// The requested worker index.
        worker: usize,
        /// The number of workers in the group.
        workers: usize,
    },
}

impl fmt::Display for PartitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWorkers => write!(f, "worker group is empty"),
            Self::WorkerOutOfRange { worker, workers } => {
                write!(f, "worker {worker} out of range for a group of {workers}")
            }
        }
    }
}

impl Error for PartitionError {}
