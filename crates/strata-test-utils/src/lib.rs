//! Test utilities for Strata development.
//!
//! Everything here works on plain row-major `&[u8]` grids so that any crate
//! in the workspace can use it without pulling in the types under test.
//! [`serial_step`] is a deliberately naive single-grid torus implementation
//! used as the reference the distributed engine is checked against.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{glider_grid, BLINKER, BLOCK, GLIDER};

/// Parse an ASCII grid: `#` is live, `.` is dead.
///
/// Blank lines and surrounding whitespace are ignored, so indented raw
/// strings work.
///
/// # Panics
///
/// Panics on other characters or ragged rows.
pub fn parse_grid(text: &str) -> Vec<u8> {
    let rows: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let width = rows.first().map_or(0, |r| r.len());
    let mut cells = Vec::with_capacity(rows.len() * width);
    for row in rows {
        assert_eq!(row.len(), width, "ragged row {row:?}");
        for ch in row.chars() {
            cells.push(match ch {
                '#' => 1,
                '.' => 0,
                other => panic!("unexpected grid character {other:?}"),
            });
        }
    }
    cells
}

/// Render a grid with `cols` columns back to ASCII, one line per row.
pub fn render_grid(cells: &[u8], cols: usize) -> String {
    let mut out = String::with_capacity(cells.len() + cells.len() / cols.max(1));
    for row in cells.chunks(cols) {
        for &c in row {
            out.push(if c == 0 { '.' } else { '#' });
        }
        out.push('\n');
    }
    out
}

/// One B3/S23 generation on an `n × n` torus.
pub fn serial_step(cells: &[u8], n: usize) -> Vec<u8> {
    assert_eq!(cells.len(), n * n, "grid is not {n}×{n}");
    let mut next = vec![0; n * n];
    for r in 0..n {
        for c in 0..n {
            let mut sum = 0;
            for dr in [n - 1, 0, 1] {
                for dc in [n - 1, 0, 1] {
                    if dr == 0 && dc == 0 {
                        continue;
                    }
                    sum += cells[((r + dr) % n) * n + (c + dc) % n];
                }
            }
            let alive = cells[r * n + c] == 1;
            next[r * n + c] = u8::from(sum == 3 || (alive && sum == 2));
        }
    }
    next
}

/// Run `generations` serial steps.
pub fn serial_run(cells: &[u8], n: usize, generations: u64) -> Vec<u8> {
    let mut cells = cells.to_vec();
    for _ in 0..generations {
        cells = serial_step(&cells, n);
    }
    cells
}

/// Shift a torus grid by `(dr, dc)` with wrap.
pub fn translate(cells: &[u8], n: usize, dr: usize, dc: usize) -> Vec<u8> {
    let mut out = vec![0; n * n];
    for r in 0..n {
        for c in 0..n {
            out[((r + dr) % n) * n + (c + dc) % n] = cells[r * n + c];
        }
    }
    out
}

/// Number of live cells.
pub fn live_cells(cells: &[u8]) -> u64 {
    cells.iter().map(|&c| u64::from(c)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_render_agree() {
        let text = "
            .#.
            ..#
            ###
        ";
        let cells = parse_grid(text);
        assert_eq!(cells, vec![0, 1, 0, 0, 0, 1, 1, 1, 1]);
        assert_eq!(render_grid(&cells, 3), ".#.\n..#\n###\n");
    }

    #[test]
    fn block_is_still_life() {
        let block = parse_grid(BLOCK);
        assert_eq!(serial_step(&block, 4), block);
    }

    #[test]
    fn glider_translates_after_four_generations() {
        let start = glider_grid(8);
        let after = serial_run(&start, 8, 4);
        assert_eq!(after, translate(&start, 8, 1, 1));
        assert_eq!(live_cells(&after), 5);
    }
}
