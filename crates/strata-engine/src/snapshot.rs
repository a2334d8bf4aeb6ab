//! Per-worker, per-generation snapshot artifacts.
//!
//! Each sampled generation every active worker dumps its owned cells, in
//! global coordinates, to its own file:
//!
//! ```text
//! gol_it_00000004_rank_00000001.dat
//! #1:row    2:col    3:state
//! 3    0    0
//! 3    1    1
//! ...
//! ```
//!
//! Files from different workers are never merged.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use strata_core::{Partition, WorkerId};
use strata_grid::{Cell, GridBuffer};

use crate::error::WorkerError;

/// Header line of every snapshot file.
pub const SNAPSHOT_HEADER: &str = "#1:row    2:col    3:state";

/// One cell of a snapshot, in global coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRecord {
    /// Global row.
    pub row: usize,
    /// Column.
    pub col: usize,
    /// Cell state, 0 or 1.
    pub state: Cell,
}

impl fmt::Display for CellRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}    {}    {}", self.row, self.col, self.state)
    }
}

/// File name of `worker`'s snapshot at generation `step`.
pub fn snapshot_file_name(step: u64, worker: WorkerId) -> String {
    format!("gol_it_{step:08}_rank_{:08}.dat", worker.index())
}

/// Owned cells of `grid` as records, row-major.
pub fn cell_records<'a>(
    partition: &'a Partition,
    grid: &'a GridBuffer,
) -> impl Iterator<Item = CellRecord> + 'a {
    grid.owned_rows().flat_map(move |local| {
        let row = partition.global_row(local);
        grid.row(local)
            .iter()
            .enumerate()
            .map(move |(col, &state)| CellRecord { row, col, state })
    })
}

/// Write the header and every owned cell of `grid` to `out`.
pub fn write_snapshot<W: Write + ?Sized>(
    out: &mut W,
    partition: &Partition,
    grid: &GridBuffer,
) -> io::Result<()> {
    writeln!(out, "{SNAPSHOT_HEADER}")?;
    for record in cell_records(partition, grid) {
        writeln!(out, "{record}")?;
    }
    Ok(())
}

// ── Sinks ──────────────────────────────────────────────────────────

/// Destination for snapshot artifacts.
///
/// Shared by every worker of a group, so implementations must be
/// thread-safe. Each call covers one worker at one generation.
pub trait SnapshotSink: fmt::Debug + Send + Sync {
    /// Store `grid`'s owned cells for generation `step`.
    fn write(&self, step: u64, partition: &Partition, grid: &GridBuffer)
        -> Result<(), WorkerError>;
}

/// Discards every snapshot.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSnapshots;

impl SnapshotSink for NoSnapshots {
    fn write(&self, _: u64, _: &Partition, _: &GridBuffer) -> Result<(), WorkerError> {
        Ok(())
    }
}

/// Writes one file per worker per sampled generation into a directory.
#[derive(Clone, Debug)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Write into `dir`, which must exist by the time the first snapshot
    /// is taken.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write into `dir`, creating it (and its parents) first.
    pub fn create(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of `worker`'s snapshot at generation `step`.
    pub fn path_for(&self, step: u64, worker: WorkerId) -> PathBuf {
        self.dir.join(snapshot_file_name(step, worker))
    }
}

impl SnapshotSink for DirectorySink {
    fn write(
        &self,
        step: u64,
        partition: &Partition,
        grid: &GridBuffer,
    ) -> Result<(), WorkerError> {
        let path = self.path_for(step, partition.worker);
        let result = File::create(&path).and_then(|file| {
            let mut out = BufWriter::new(file);
            write_snapshot(&mut out, partition, grid)?;
            out.flush()
        });
        result.map_err(|source| WorkerError::Snapshot { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::compute_partition;
    use strata_test_utils::parse_grid;

    #[test]
    fn file_names_are_zero_padded() {
        assert_eq!(
            snapshot_file_name(0, WorkerId(0)),
            "gol_it_00000000_rank_00000000.dat"
        );
        assert_eq!(
            snapshot_file_name(1234, WorkerId(17)),
            "gol_it_00001234_rank_00000017.dat"
        );
    }

    #[test]
    fn records_use_global_rows() {
        // Worker 1 of 3 on an 8-row grid owns global rows 3..6.
        let p = compute_partition(8, 3, WorkerId(1)).unwrap();
        let grid = GridBuffer::from_owned_rows(&parse_grid("#.\n..\n.#"), 2);
        let live: Vec<CellRecord> = cell_records(&p, &grid).filter(|r| r.state == 1).collect();
        assert_eq!(
            live,
            vec![
                CellRecord {
                    row: 3,
                    col: 0,
                    state: 1
                },
                CellRecord {
                    row: 5,
                    col: 1,
                    state: 1
                },
            ]
        );
        assert_eq!(cell_records(&p, &grid).count(), 6);
    }

    #[test]
    fn written_format() {
        let p = compute_partition(4, 2, WorkerId(1)).unwrap();
        let grid = GridBuffer::from_owned_rows(&parse_grid(".#\n#."), 2);
        let mut out = Vec::new();
        write_snapshot(&mut out, &p, &grid).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "#1:row    2:col    3:state\n\
             2    0    0\n\
             2    1    1\n\
             3    0    1\n\
             3    1    0\n"
        );
    }

    #[test]
    fn directory_sink_reports_the_path_on_failure() {
        let missing = std::env::temp_dir()
            .join(format!("strata-missing-{}", std::process::id()))
            .join("nested");
        let sink = DirectorySink::new(&missing);
        let p = compute_partition(2, 1, WorkerId(0)).unwrap();
        let grid = GridBuffer::new(2, 2);
        match sink.write(3, &p, &grid) {
            Err(WorkerError::Snapshot { path, .. }) => {
                assert_eq!(path, missing.join("gol_it_00000003_rank_00000000.dat"));
            }
            other => panic!("expected a snapshot error, got {other:?}"),
        }
    }
}
