//! Board state and the operations that drive it.
//!
//! - [`Board`] - occupancy grid plus score and loss state for one playthrough
//! - [`Landing`] - where a dropped shape came to rest
//! - Heuristic readers on [`Board`] (`max_height`, `covered_cells`, ...) used by
//!   the feature extractor
//!
//! # Turn Flow
//!
//! 1. Check the move with [`Board::is_placeable`] at the spawn row
//! 2. Drop the shape with [`Board::drop_shape`]
//! 3. Remove full rows with [`Board::clear_lines`]
//! 4. Check the next shape with [`Board::is_topped_out`]

pub use self::board::*;

mod board;
mod board_metrics;
