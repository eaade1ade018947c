use rand::Rng;
use serde::Serialize;

use crate::types::Direction;

pub const SIZE: usize = 4;
pub const WIN_TILE: u32 = 2048;
const FOUR_PROBABILITY: f64 = 0.1;

/// Clockwise quarter turns applied before and after `compress_left`,
/// indexed by `Direction as usize`. Each pair sums to a full turn.
const ROTATIONS: [(u8, u8); 4] = [
    (3, 1), // up
    (1, 3), // down
    (0, 0), // left
    (2, 2), // right
];

/// 4x4 tile matrix, row-major. 0 is an empty cell, anything else is a power of two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Grid([[u32; SIZE]; SIZE]);

/// Result of sliding a grid in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slide {
    pub grid: Grid,
    /// `true` iff any cell differs from the input grid.
    pub moved: bool,
    /// Sum of the values of all tiles produced by merges.
    pub score: u32,
}

impl Grid {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: [[u32; SIZE]; SIZE]) -> Self {
        Self(rows)
    }

    pub fn rows(&self) -> &[[u32; SIZE]; SIZE] {
        &self.0
    }

    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.0[row][col]
    }

    /// Returns the number of empty cells.
    pub fn empty_count(&self) -> usize {
        self.cells().filter(|&v| v == 0).count()
    }

    /// Returns the number of non-empty cells.
    pub fn tile_count(&self) -> usize {
        SIZE * SIZE - self.empty_count()
    }

    pub fn max_tile(&self) -> u32 {
        self.cells().max().unwrap_or(0)
    }

    pub fn contains(&self, value: u32) -> bool {
        self.cells().any(|v| v == value)
    }

    /// Iterates `(row, col)` of every empty cell in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..SIZE)
            .flat_map(|row| (0..SIZE).map(move |col| (row, col)))
            .filter(|&(row, col)| self.0[row][col] == 0)
    }

    /// Returns a copy rotated 90 degrees clockwise.
    pub fn rotate_clockwise(&self) -> Self {
        let mut rotated = [[0u32; SIZE]; SIZE];
        for (i, out_row) in rotated.iter_mut().enumerate() {
            for (j, cell) in out_row.iter_mut().enumerate() {
                *cell = self.0[SIZE - 1 - j][i];
            }
        }
        Self(rotated)
    }

    pub fn rotate_times(&self, turns: u8) -> Self {
        (0..turns % 4).fold(*self, |grid, _| grid.rotate_clockwise())
    }

    /// Slides every row toward column 0, merging equal neighbours.
    /// A tile produced by a merge does not merge again in the same pass.
    pub fn compress_left(&self) -> Slide {
        let mut rows = [[0u32; SIZE]; SIZE];
        let mut score = 0u32;

        for (out, row) in rows.iter_mut().zip(self.0.iter()) {
            let (compressed, gained) = compress_row(row);
            *out = compressed;
            score += gained;
        }

        let grid = Self(rows);
        Slide {
            grid,
            moved: grid != *self,
            score,
        }
    }

    /// Slides the whole board toward `direction`.
    pub fn slide(&self, direction: Direction) -> Slide {
        let (rotate_in, rotate_out) = ROTATIONS[direction as usize];
        let compressed = self.rotate_times(rotate_in).compress_left();
        let grid = compressed.grid.rotate_times(rotate_out);

        Slide {
            grid,
            moved: compressed.moved,
            score: compressed.score,
        }
    }

    /// `true` when the board is full and no two orthogonal neighbours are equal.
    pub fn is_terminal(&self) -> bool {
        for row in 0..SIZE {
            for col in 0..SIZE {
                let value = self.0[row][col];
                if value == 0 {
                    return false;
                }
                if col + 1 < SIZE && self.0[row][col + 1] == value {
                    return false;
                }
                if row + 1 < SIZE && self.0[row + 1][col] == value {
                    return false;
                }
            }
        }
        true
    }

    fn cells(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().flat_map(|row| row.iter().copied())
    }

    #[cfg(test)]
    pub(crate) fn set(&mut self, row: usize, col: usize, value: u32) {
        self.0[row][col] = value;
    }
}

/// Places a 2 (90%) or 4 (10%) on a uniformly chosen empty cell.
/// A full grid is returned unchanged.
pub fn spawn_tile<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Grid {
    let empties: Vec<(usize, usize)> = grid.empty_cells().collect();
    if empties.is_empty() {
        return *grid;
    }

    let (row, col) = empties[rng.gen_range(0..empties.len())];
    let mut next = *grid;
    next.0[row][col] = if rng.gen_bool(FOUR_PROBABILITY) { 4 } else { 2 };
    next
}

fn compress_row(row: &[u32; SIZE]) -> ([u32; SIZE], u32) {
    let mut out = [0u32; SIZE];
    let mut cursor = 0usize;
    let mut pending: Option<u32> = None;
    let mut gained = 0u32;

    for &value in row.iter().filter(|&&v| v != 0) {
        if pending == Some(value) {
            let merged = value * 2;
            out[cursor - 1] = merged;
            gained += merged;
            pending = None;
        } else {
            out[cursor] = value;
            cursor += 1;
            pending = Some(value);
        }
    }

    (out, gained)
}
