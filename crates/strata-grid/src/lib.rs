//! Per-worker cell storage for Strata.
//!
//! Each worker owns a [`DoubleBuffer`]: two [`GridBuffer`]s of
//! `(local_rows + 2) × n` cells, where the extra top and bottom rows hold
//! copies of the neighbours' boundary rows. The [`stencil`] reads the
//! current buffer and writes the owned rows of the next one; [`init`] seeds
//! the owned rows before generation 0.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod init;
pub mod stencil;

pub use buffer::{DoubleBuffer, GridBuffer};

/// State of one cell: [`DEAD`] or [`ALIVE`].
pub type Cell = u8;

/// A dead cell.
pub const DEAD: Cell = 0;

/// A live cell.
pub const ALIVE: Cell = 1;
