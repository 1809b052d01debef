pub use self::{grid::*, shape::*};

pub(crate) mod grid;
pub(crate) mod shape;

/// Number of columns on the board.
pub const WIDTH: usize = 10;
/// Number of rows on the board. Row 0 is the spawn row at the top.
pub const HEIGHT: usize = 24;
pub(crate) const CELL_COUNT: usize = WIDTH * HEIGHT;

/// Column used as the spawn origin when checking for a top-out.
pub const SPAWN_COLUMN: usize = 4;
/// Number of rotation variants every shape kind provides.
pub const ROTATION_COUNT: usize = 4;
