//! Core types for the Strata distributed Game of Life.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! values every worker agrees on before the first generation runs: the
//! immutable [`SimulationConfig`], the [`WorkerId`] newtype, and the static
//! row [`Partition`] with its ring neighbours.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod id;
pub mod partition;

pub use config::{InitialPattern, SimulationConfig};
pub use error::{ConfigError, PartitionError};
pub use id::WorkerId;
pub use partition::{active_workers, compute_partition, partition_all, Partition, Ring};
