//! Strata: Conway's Game of Life on a square torus, split by rows across a
//! group of message-passing workers.
//!
//! This is the facade crate that re-exports the public API from all Strata
//! sub-crates, plus the command-line definition used by the `strata`
//! binary.
//!
//! # Quick start
//!
//! ```rust
//! use strata::prelude::*;
//!
//! let config = SimulationConfig {
//!     grid_size: 8,
//!     generations: 4,
//!     pattern: InitialPattern::Glider,
//!     ..SimulationConfig::default()
//! };
//! let report = run_group(config, GroupOptions::new(3)).unwrap();
//! assert_eq!(report.outcomes().len(), 3);
//! assert!(report.stats().iter().all(|s| s.live_cells == 5));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `strata-core` | Config, worker ids, partitioning |
//! | [`grid`] | `strata-grid` | Halo-padded buffers, seeding, the stencil |
//! | [`comm`] | `strata-comm` | Communicator, collectives, halo exchange |
//! | [`engine`] | `strata-engine` | Worker loop, diagnostics, snapshots, group runner |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cli;

/// Configuration, worker ids and partitioning (`strata-core`).
pub use strata_core as types;

/// Halo-padded double buffers, initial patterns and the Life stencil
/// (`strata-grid`).
pub use strata_grid as grid;

/// Point-to-point messaging, collectives and halo exchange
/// (`strata-comm`).
///
/// [`comm::Communicator`] is the seam a different transport plugs into;
/// [`comm::ChannelComm`] is the in-process one.
pub use strata_comm as comm;

/// Worker loop, diagnostics, snapshot artifacts and the group runner
/// (`strata-engine`).
pub use strata_engine as engine;

/// Common imports for typical Strata usage.
///
/// ```rust
/// use strata::prelude::*;
/// ```
pub mod prelude {
    // Configuration and partitioning
    pub use strata_core::{
        compute_partition, InitialPattern, Partition, Ring, SimulationConfig, WorkerId,
    };

    // Errors
    pub use strata_comm::CommError;
    pub use strata_core::{ConfigError, PartitionError};
    pub use strata_engine::{GroupError, WorkerError};

    // Grid
    pub use strata_grid::{Cell, DoubleBuffer, GridBuffer};

    // Communication
    pub use strata_comm::{channel_group, Communicator};

    // Engine
    pub use strata_engine::{
        run_group, run_worker, DirectorySink, GenerationStats, GroupOptions, GroupReport,
        NoSnapshots, SnapshotSink, WorkerOutcome,
    };
}
