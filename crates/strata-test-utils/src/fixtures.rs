//! Named patterns as ASCII grids.

use crate::parse_grid;

/// Glider moving down-right.
pub const GLIDER: &str = "
    .#.
    ..#
    ###
";

/// Period-2 oscillator on a 5×5 field.
pub const BLINKER: &str = "
    .....
    ..#..
    ..#..
    ..#..
    .....
";

/// Still life on a 4×4 field.
pub const BLOCK: &str = "
    ....
    .##.
    .##.
    ....
";

/// An `n × n` grid, `n >= 3`, with [`GLIDER`] in the top-left corner.
pub fn glider_grid(n: usize) -> Vec<u8> {
    assert!(n >= 3, "a glider needs at least a 3×3 grid");
    let glider = parse_grid(GLIDER);
    let mut cells = vec![0; n * n];
    for r in 0..3 {
        cells[r * n..r * n + 3].copy_from_slice(&glider[r * 3..r * 3 + 3]);
    }
    cells
}
