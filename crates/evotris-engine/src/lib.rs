//! Board simulation for the falling-block puzzle.
//!
//! The engine is deliberately small: a fixed 10×24 occupancy [`Grid`], a
//! catalog of seven [`ShapeKind`]s with four rotation variants each, and a
//! [`Board`] that drops shapes straight down from the spawn row, clears full
//! rows and keeps score.
//!
//! There is no falling-piece state, no lateral movement and no rotation
//! system: a move is a `(column, rotation)` pair that is either placeable at
//! the spawn row or not.
//!
//! # Example
//!
//! ```
//! use evotris_engine::{Board, ShapeKind};
//!
//! let mut board = Board::new();
//! let shape = ShapeKind::I.rotation(0);
//!
//! let landing = board.drop_shape(shape, 0).unwrap();
//! assert_eq!(landing.resting_row(), 23);
//! assert_eq!(board.clear_lines(), 0);
//! assert_eq!(board.points(), 23);
//! assert_eq!(board.max_height(), 1);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Returned when a shape does not fit at the spawn row of the requested column.
///
/// Callers are expected to check [`Board::is_placeable`] first; receiving this
/// error means the caller skipped that check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("shape cannot be placed at the spawn row of column {column}")]
pub struct IllegalPlacementError {
    pub column: usize,
}
