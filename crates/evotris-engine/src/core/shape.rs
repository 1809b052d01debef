use rand::{Rng, distr::StandardUniform, prelude::Distribution};

use super::{ROTATION_COUNT, grid::Position};

/// One rotation variant of a shape: four cell offsets relative to its origin.
///
/// Offsets are never negative, so the origin is the top-left corner of the
/// shape's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    cells: [Position; 4],
}

impl Shape {
    const fn from_offsets(offsets: [(usize, usize); 4]) -> Self {
        let mut cells = [Position::new(0, 0); 4];
        let mut i = 0;
        while i < offsets.len() {
            cells[i] = Position::new(offsets[i].0, offsets[i].1);
            i += 1;
        }
        Self { cells }
    }

    /// Returns the relative cell offsets.
    #[must_use]
    pub const fn cells(&self) -> &[Position; 4] {
        &self.cells
    }

    /// Iterates over the absolute cell positions when placed at `origin`.
    pub fn cells_at(&self, origin: Position) -> impl Iterator<Item = Position> + '_ {
        self.cells.iter().map(move |&offset| origin.offset_by(offset))
    }

    /// Number of columns spanned by the shape.
    #[must_use]
    pub fn width(&self) -> usize {
        self.cells.iter().map(|c| c.col()).max().unwrap_or(0) + 1
    }

    /// Number of rows spanned by the shape.
    #[must_use]
    pub fn height(&self) -> usize {
        self.cells.iter().map(|c| c.row()).max().unwrap_or(0) + 1
    }
}

/// The seven shape kinds of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ShapeKind {
    I,
    L,
    J,
    T,
    O,
    S,
    Z,
}

impl ShapeKind {
    pub const LEN: usize = 7;
    pub const ALL: [Self; Self::LEN] = [
        Self::I,
        Self::L,
        Self::J,
        Self::T,
        Self::O,
        Self::S,
        Self::Z,
    ];

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::I => 'I',
            Self::L => 'L',
            Self::J => 'J',
            Self::T => 'T',
            Self::O => 'O',
            Self::S => 'S',
            Self::Z => 'Z',
        }
    }

    /// Returns all four rotation variants, in rotation-index order.
    #[must_use]
    pub fn rotations(self) -> &'static [Shape; ROTATION_COUNT] {
        &SHAPE_CATALOG[self as usize]
    }

    /// Returns the rotation variant at `rotation`.
    ///
    /// # Panics
    ///
    /// Panics if `rotation >= ROTATION_COUNT`.
    #[must_use]
    pub fn rotation(self, rotation: usize) -> &'static Shape {
        &self.rotations()[rotation]
    }
}

impl Distribution<ShapeKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeKind {
        ShapeKind::ALL[rng.random_range(0..ShapeKind::LEN)]
    }
}

const I_HORIZONTAL: Shape = Shape::from_offsets([(0, 0), (0, 1), (0, 2), (0, 3)]);
const I_VERTICAL: Shape = Shape::from_offsets([(0, 0), (1, 0), (2, 0), (3, 0)]);

const L_0: Shape = Shape::from_offsets([(0, 0), (1, 0), (2, 0), (2, 1)]);
const L_1: Shape = Shape::from_offsets([(0, 0), (0, 1), (0, 2), (1, 0)]);
const L_2: Shape = Shape::from_offsets([(0, 0), (0, 1), (1, 1), (2, 1)]);
const L_3: Shape = Shape::from_offsets([(0, 2), (1, 0), (1, 1), (1, 2)]);

const J_0: Shape = Shape::from_offsets([(0, 1), (1, 1), (2, 0), (2, 1)]);
const J_1: Shape = Shape::from_offsets([(0, 0), (1, 0), (1, 1), (1, 2)]);
const J_2: Shape = Shape::from_offsets([(0, 0), (0, 1), (1, 0), (2, 0)]);
const J_3: Shape = Shape::from_offsets([(0, 0), (0, 1), (0, 2), (1, 2)]);

const T_0: Shape = Shape::from_offsets([(0, 0), (0, 1), (0, 2), (1, 1)]);
const T_1: Shape = Shape::from_offsets([(0, 1), (1, 0), (1, 1), (2, 1)]);
const T_2: Shape = Shape::from_offsets([(0, 1), (1, 0), (1, 1), (1, 2)]);
const T_3: Shape = Shape::from_offsets([(0, 0), (1, 0), (1, 1), (2, 0)]);

const O_0: Shape = Shape::from_offsets([(0, 0), (0, 1), (1, 0), (1, 1)]);

const S_HORIZONTAL: Shape = Shape::from_offsets([(0, 1), (0, 2), (1, 0), (1, 1)]);
// Older tables reuse the T_1 cells `(0, 1), (1, 0), (1, 1), (2, 1)` for
// vertical S. This is the real S rotation.
const S_VERTICAL: Shape = Shape::from_offsets([(0, 0), (1, 0), (1, 1), (2, 1)]);

const Z_HORIZONTAL: Shape = Shape::from_offsets([(0, 0), (0, 1), (1, 1), (1, 2)]);
const Z_VERTICAL: Shape = Shape::from_offsets([(0, 1), (1, 0), (1, 1), (2, 0)]);

// Indexed by `ShapeKind as usize`.
static SHAPE_CATALOG: [[Shape; ROTATION_COUNT]; ShapeKind::LEN] = [
    [I_HORIZONTAL, I_VERTICAL, I_HORIZONTAL, I_VERTICAL],
    [L_0, L_1, L_2, L_3],
    [J_0, J_1, J_2, J_3],
    [T_0, T_1, T_2, T_3],
    [O_0, O_0, O_0, O_0],
    [S_HORIZONTAL, S_VERTICAL, S_HORIZONTAL, S_VERTICAL],
    [Z_HORIZONTAL, Z_VERTICAL, Z_HORIZONTAL, Z_VERTICAL],
];
