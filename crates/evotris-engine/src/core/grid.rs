use std::{fmt, ops::Range};

use super::{CELL_COUNT, HEIGHT, WIDTH};

/// A cell coordinate on the grid, or a relative offset inside a shape.
///
/// Rows grow downward from the spawn row (row 0); columns grow to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    row: usize,
    col: usize,
}

impl Position {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    #[must_use]
    pub const fn row(self) -> usize {
        self.row
    }

    #[must_use]
    pub const fn col(self) -> usize {
        self.col
    }

    /// Returns this position moved by `offset`.
    ///
    /// The result may lie outside the grid; use [`Grid::get`] to test it.
    #[must_use]
    pub const fn offset_by(self, offset: Position) -> Self {
        Self {
            row: self.row + offset.row,
            col: self.col + offset.col,
        }
    }
}

/// Binary occupancy grid stored as a flat `row * WIDTH + col` buffer.
///
/// Every read goes through a bounds check that maps out-of-range positions to
/// `None`, so callers can never index past the grid. `Clone` copies the whole
/// buffer; two grids never share storage.
///
/// # Example
///
/// ```
/// use evotris_engine::{Grid, Position};
///
/// let grid = Grid::from_ascii(
///     "
///     ..........
///     .#.#######
///     ",
/// );
/// assert_eq!(grid.get(Position::new(23, 0)), Some(false));
/// assert_eq!(grid.get(Position::new(23, 1)), Some(true));
/// assert_eq!(grid.get(Position::new(23, 2)), Some(false));
/// assert_eq!(grid.get(Position::new(24, 0)), None);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    cells: [bool; CELL_COUNT],
}

impl Default for Grid {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("occupied", &self.occupied_count())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for &cell in row {
                f.write_str(if cell { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Grid {
    pub const WIDTH: usize = WIDTH;
    pub const HEIGHT: usize = HEIGHT;

    pub const EMPTY: Self = Self {
        cells: [false; CELL_COUNT],
    };

    const fn index(pos: Position) -> Option<usize> {
        if pos.row < HEIGHT && pos.col < WIDTH {
            Some(pos.row * WIDTH + pos.col)
        } else {
            None
        }
    }

    const fn row_range(row: usize) -> Range<usize> {
        row * WIDTH..(row + 1) * WIDTH
    }

    /// Returns the occupancy at `pos`, or `None` if `pos` is outside the grid.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<bool> {
        Self::index(pos).map(|i| self.cells[i])
    }

    /// Returns `true` if `pos` is inside the grid and occupied.
    #[must_use]
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.get(pos) == Some(true)
    }

    /// Returns `true` if `pos` is inside the grid and empty.
    #[must_use]
    pub fn is_vacant(&self, pos: Position) -> bool {
        self.get(pos) == Some(false)
    }

    /// Marks `pos` as occupied.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the grid.
    pub fn occupy(&mut self, pos: Position) {
        let Some(i) = Self::index(pos) else {
            panic!("position {pos:?} is outside the {WIDTH}x{HEIGHT} grid");
        };
        self.cells[i] = true;
    }

    /// Returns the cells of `row`, left to right.
    #[must_use]
    pub fn row(&self, row: usize) -> &[bool] {
        &self.cells[Self::row_range(row)]
    }

    /// Iterates over all rows from the spawn row down to the bottom row.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks_exact(WIDTH)
    }

    /// Iterates over the cells of `col`, top to bottom.
    pub fn column(&self, col: usize) -> impl DoubleEndedIterator<Item = bool> + '_ {
        assert!(col < WIDTH, "column {col} is outside the grid");
        (0..HEIGHT).map(move |row| self.cells[row * WIDTH + col])
    }

    #[must_use]
    pub fn is_row_filled(&self, row: usize) -> bool {
        self.row(row).iter().all(|&cell| cell)
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }

    pub(crate) fn copy_row(&mut self, src: usize, dst: usize) {
        self.cells.copy_within(Self::row_range(src), dst * WIDTH);
    }

    pub(crate) fn clear_rows(&mut self, rows: Range<usize>) {
        self.cells[rows.start * WIDTH..rows.end * WIDTH].fill(false);
    }

    /// Creates a grid from ASCII art for tests and examples.
    ///
    /// `#` is an occupied cell and `.` is an empty one; other characters are
    /// ignored and blank lines are skipped. The rows are aligned to the
    /// bottom of the grid: the last line describes row `HEIGHT - 1`.
    ///
    /// # Panics
    ///
    /// Panics if a line does not contain exactly `WIDTH` cells or if there
    /// are more than `HEIGHT` lines.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(
            lines.len() <= HEIGHT,
            "at most {HEIGHT} rows are allowed, got {}",
            lines.len()
        );

        let mut grid = Self::EMPTY;
        let top = HEIGHT - lines.len();
        for (i, line) in lines.iter().enumerate() {
            let cells: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
            assert_eq!(
                cells.len(),
                WIDTH,
                "Each row must have exactly {} cells, got {} at line {}",
                WIDTH,
                cells.len(),
                i
            );
            for (col, &ch) in cells.iter().enumerate() {
                if ch == '#' {
                    grid.occupy(Position::new(top + i, col));
                }
            }
        }
        grid
    }
}
