//! Heuristic readers over the board occupancy.
//!
//! Heights are measured from the bottom: a column whose topmost occupied
//! cell is in row `r` has height `HEIGHT - r`, and an empty column has
//! height 0. All readers are pure and scan the whole grid.

use std::iter;

use crate::core::{HEIGHT, Position, WIDTH};

use super::Board;

impl Board {
    /// Height of the tallest column.
    #[must_use]
    pub fn max_height(&self) -> usize {
        self.grid()
            .rows()
            .position(|row| row.iter().any(|&cell| cell))
            .map_or(0, |row| HEIGHT - row)
    }

    /// Sum of all column heights.
    #[must_use]
    pub fn total_height(&self) -> usize {
        (0..WIDTH).map(|col| self.column_height(col)).sum()
    }

    /// Number of empty cells lying below the topmost occupied cell of their
    /// column.
    #[must_use]
    pub fn covered_cells(&self) -> usize {
        (0..WIDTH).map(|col| self.column_covered_cells(col)).sum()
    }

    /// Sum of absolute height differences between neighboring columns.
    #[must_use]
    pub fn bumpiness(&self) -> usize {
        let heights: Vec<usize> = (0..WIDTH).map(|col| self.column_height(col)).collect();
        iter::zip(&heights, &heights[1..])
            .map(|(left, right)| left.abs_diff(*right))
            .sum()
    }

    /// Number of horizontally adjacent cell pairs with differing occupancy.
    ///
    /// The walls are not counted.
    #[must_use]
    pub fn row_transitions(&self) -> usize {
        self.grid()
            .rows()
            .map(|row| row.windows(2).filter(|pair| pair[0] != pair[1]).count())
            .sum()
    }

    /// Number of occupied cells sitting above an empty cell of the same
    /// column, scanning each column from the bottom up.
    ///
    /// Once the scan has passed an empty cell, every occupied cell after it
    /// counts, so a column with several gaps counts its overhangs once per
    /// cell, not once per gap.
    #[must_use]
    pub fn roof_cells(&self) -> usize {
        (0..WIDTH)
            .map(|col| {
                let mut seen_empty = false;
                let mut roofs = 0;
                for occupied in self.grid().column(col).rev() {
                    if !occupied {
                        seen_empty = true;
                    } else if seen_empty {
                        roofs += 1;
                    }
                }
                roofs
            })
            .sum()
    }

    /// Height of column `col`.
    #[must_use]
    pub fn column_height(&self, col: usize) -> usize {
        self.top_row(col).map_or(0, |row| HEIGHT - row)
    }

    /// Number of empty cells below the topmost occupied cell of column `col`.
    #[must_use]
    pub fn column_covered_cells(&self, col: usize) -> usize {
        let Some(top) = self.top_row(col) else {
            return 0;
        };
        (top..HEIGHT)
            .filter(|&row| !self.grid().is_occupied(Position::new(row, col)))
            .count()
    }

    fn top_row(&self, col: usize) -> Option<usize> {
        self.grid().column(col).position(|occupied| occupied)
    }
}
