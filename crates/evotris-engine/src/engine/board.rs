use std::fmt;

use crate::{
    IllegalPlacementError,
    core::{Grid, HEIGHT, Position, SPAWN_COLUMN, Shape},
};

/// Points awarded by a single [`Board::clear_lines`] call, indexed by the
/// number of rows it removed.
///
/// Clearing several rows at once is worth more than clearing them one at a
/// time. Clears of more than four rows (only possible on hand-built boards)
/// are paid as four.
pub const LINE_CLEAR_REWARDS: [usize; 5] = [0, 25, 100, 400, 1600];

/// Where a dropped shape came to rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landing {
    origin: Position,
}

impl Landing {
    /// Returns the origin the shape was locked at.
    #[must_use]
    pub const fn origin(self) -> Position {
        self.origin
    }

    /// Returns the resting row, which is also the soft-drop bonus awarded.
    #[must_use]
    pub const fn resting_row(self) -> usize {
        self.origin.row()
    }
}

/// Occupancy grid together with the score and loss state of one playthrough.
///
/// A board is owned by exactly one episode. `Clone` is a deep copy, so a
/// simulated drop on a clone never leaks into the original.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    grid: Grid,
    points: usize,
    lost: bool,
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.grid)?;
        write!(f, "points: {}", self.points)?;
        if self.lost {
            write!(f, " (lost)")?;
        }
        Ok(())
    }
}

impl Board {
    /// Creates an empty board with zero points.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            grid: Grid::EMPTY,
            points: 0,
            lost: false,
        }
    }

    /// Creates a board with the given occupancy and zero points.
    #[must_use]
    pub const fn from_grid(grid: Grid) -> Self {
        Self {
            grid,
            points: 0,
            lost: false,
        }
    }

    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub const fn points(&self) -> usize {
        self.points
    }

    #[must_use]
    pub const fn is_lost(&self) -> bool {
        self.lost
    }

    pub fn mark_lost(&mut self) {
        self.lost = true;
    }

    /// Returns `true` if every cell of `shape` placed at `origin` lies inside
    /// the grid and is empty.
    #[must_use]
    pub fn is_placeable(&self, shape: &Shape, origin: Position) -> bool {
        shape.cells_at(origin).all(|pos| self.grid.is_vacant(pos))
    }

    /// Drops `shape` straight down in `column` and locks it in place.
    ///
    /// The shape must fit at the spawn row; it then falls until the next row
    /// down would collide. The resting row index is added to the points as a
    /// drop bonus. Full rows are left in place until [`Self::clear_lines`].
    pub fn drop_shape(
        &mut self,
        shape: &Shape,
        column: usize,
    ) -> Result<Landing, IllegalPlacementError> {
        if !self.is_placeable(shape, Position::new(0, column)) {
            return Err(IllegalPlacementError { column });
        }

        let mut row = 1;
        while self.is_placeable(shape, Position::new(row, column)) {
            row += 1;
        }
        let origin = Position::new(row - 1, column);

        for pos in shape.cells_at(origin) {
            self.grid.occupy(pos);
        }
        self.points += origin.row();
        Ok(Landing { origin })
    }

    /// Removes every full row and pays the reward for the number removed.
    ///
    /// Rows above a removed row move down by one for each removed row below
    /// them; the vacated rows at the top become empty.
    ///
    /// # Returns
    ///
    /// The number of rows removed.
    pub fn clear_lines(&mut self) -> usize {
        let mut count = 0;
        for row in (0..HEIGHT).rev() {
            if self.grid.is_row_filled(row) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.grid.copy_row(row, row + count);
            }
        }
        self.grid.clear_rows(0..count);

        self.points += LINE_CLEAR_REWARDS[count.min(LINE_CLEAR_REWARDS.len() - 1)];
        count
    }

    /// Returns the board that would result from dropping `shape` in `column`
    /// and clearing lines, leaving `self` untouched.
    pub fn simulate_drop(&self, shape: &Shape, column: usize) -> Result<Self, IllegalPlacementError> {
        let mut next = self.clone();
        next.drop_shape(shape, column)?;
        next.clear_lines();
        Ok(next)
    }

    /// Returns `true` if `shape` cannot be placed at the spawn position.
    #[must_use]
    pub fn is_topped_out(&self, shape: &Shape) -> bool {
        !self.is_placeable(shape, Position::new(0, SPAWN_COLUMN))
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{ShapeKind, WIDTH};

    use super::*;

    fn board(art: &str) -> Board {
        Board::from_grid(Grid::from_ascii(art))
    }

    #[test]
    fn test_horizontal_line_on_empty_board() {
        let mut board = Board::new();
        let landing = board.drop_shape(ShapeKind::I.rotation(0), 0).unwrap();

        assert_eq!(landing.resting_row(), HEIGHT - 1);
        assert_eq!(board.points(), 23);
        for col in 0..WIDTH {
            assert_eq!(board.grid().is_occupied(Position::new(HEIGHT - 1, col)), col < 4);
        }

        assert_eq!(board.clear_lines(), 0);
        assert_eq!(board.points(), 23);
        assert_eq!(board.max_height(), 1);
    }

    #[test]
    fn test_placeable_rejects_out_of_bounds() {
        let board = Board::new();
        let line = ShapeKind::I.rotation(0);
        assert!(board.is_placeable(line, Position::new(0, 6)));
        assert!(!board.is_placeable(line, Position::new(0, 7)));

        let vertical = ShapeKind::I.rotation(1);
        assert!(board.is_placeable(vertical, Position::new(HEIGHT - 4, 0)));
        assert!(!board.is_placeable(vertical, Position::new(HEIGHT - 3, 0)));
    }

    #[test]
    fn test_placeable_rejects_occupied_cells() {
        let board = board("#.........");
        let square = ShapeKind::O.rotation(0);
        assert!(!board.is_placeable(square, Position::new(HEIGHT - 2, 0)));
        assert!(board.is_placeable(square, Position::new(HEIGHT - 3, 0)));
        assert!(board.is_placeable(square, Position::new(HEIGHT - 2, 1)));
    }

    #[test]
    fn test_drop_rests_on_stack() {
        let mut board = board(
            "
            ..#.......
            ..#.......
            ",
        );
        let landing = board.drop_shape(ShapeKind::O.rotation(0), 1).unwrap();
        assert_eq!(landing.resting_row(), HEIGHT - 4);
        assert_eq!(board.points(), HEIGHT - 4);
        assert!(board.grid().is_occupied(Position::new(HEIGHT - 3, 1)));
        assert!(board.grid().is_occupied(Position::new(HEIGHT - 4, 2)));
    }

    #[test]
    fn test_drop_blocked_at_spawn_row_fails() {
        let mut board = Board::new();
        for _ in 0..HEIGHT / 4 {
            board.drop_shape(ShapeKind::I.rotation(1), 0).unwrap();
        }
        let before = board.clone();
        let result = board.drop_shape(ShapeKind::I.rotation(1), 0);
        assert_eq!(result, Err(IllegalPlacementError { column: 0 }));
        assert_eq!(board, before);
    }

    #[test]
    fn test_drop_out_of_range_column_fails() {
        let mut board = Board::new();
        assert!(board.drop_shape(ShapeKind::I.rotation(0), WIDTH).is_err());
        assert_eq!(board.points(), 0);
    }

    #[test]
    fn test_single_line_clear_shifts_rows_down() {
        let mut board = board(
            "
            .#........
            #.#.......
            ####.#####
            ",
        );
        board.drop_shape(ShapeKind::I.rotation(1), 4).unwrap();
        assert_eq!(board.clear_lines(), 1);

        let expected = Grid::from_ascii(
            "
            ....#.....
            .#..#.....
            #.#.#.....
            ",
        );
        assert_eq!(board.grid(), &expected);
        assert_eq!(board.points(), (HEIGHT - 4) + 25);
    }

    #[test]
    fn test_reward_table() {
        for cleared in 0..=4 {
            let full_rows = "##########\n".repeat(cleared);
            let mut board = board(&format!("#.........\n{full_rows}"));
            assert_eq!(board.clear_lines(), cleared);
            assert_eq!(board.points(), LINE_CLEAR_REWARDS[cleared]);
        }
        assert_eq!(LINE_CLEAR_REWARDS, [0, 25, 100, 400, 1600]);
    }

    #[test]
    fn test_simultaneous_clears_beat_sequential_clears() {
        let mut together = board(
            "
            ##########
            ##########
            ",
        );
        together.clear_lines();

        let mut apart = board("##########");
        apart.clear_lines();
        apart.grid = Grid::from_ascii("##########");
        apart.clear_lines();

        assert_eq!(together.points(), 100);
        assert_eq!(apart.points(), 50);
        assert!(together.points() > apart.points());
    }

    #[test]
    fn test_clear_more_than_four_rows_saturates() {
        let mut board = board(&"##########\n".repeat(5));
        assert_eq!(board.clear_lines(), 5);
        assert_eq!(board.points(), 1600);
        assert_eq!(board.grid().occupied_count(), 0);
    }

    #[test]
    fn test_separated_full_rows_are_cleared() {
        let mut board = board(
            "
            ..#.......
            ##########
            #.........
            ##########
            .........#
            ",
        );
        assert_eq!(board.clear_lines(), 2);
        let expected = Grid::from_ascii(
            "
            ..#.......
            #.........
            .........#
            ",
        );
        assert_eq!(board.grid(), &expected);
    }

    #[test]
    fn test_simulate_drop_leaves_original_untouched() {
        let board = board("####.#####");
        let next = board
            .simulate_drop(ShapeKind::I.rotation(1), 4)
            .unwrap();

        assert_eq!(board.grid().occupied_count(), 9);
        assert_eq!(board.points(), 0);
        assert_eq!(next.grid().occupied_count(), 3);
        assert_eq!(next.points(), (HEIGHT - 4) + 25);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Board::new();
        let mut copy = original.clone();
        copy.drop_shape(ShapeKind::O.rotation(0), 3).unwrap();
        copy.mark_lost();

        assert_eq!(original.grid().occupied_count(), 0);
        assert_eq!(original.points(), 0);
        assert!(!original.is_lost());

        let mut original = original;
        original.drop_shape(ShapeKind::I.rotation(0), 0).unwrap();
        assert_eq!(copy.grid().occupied_count(), 4);
        assert!(!copy.grid().is_occupied(Position::new(HEIGHT - 1, 0)));
    }

    #[test]
    fn test_topped_out_checks_spawn_position() {
        let mut board = Board::new();
        assert!(!board.is_topped_out(ShapeKind::O.rotation(0)));
        for _ in 0..HEIGHT / 2 {
            board.drop_shape(ShapeKind::O.rotation(0), SPAWN_COLUMN).unwrap();
        }
        assert!(board.is_topped_out(ShapeKind::O.rotation(0)));
        assert!(board.is_topped_out(ShapeKind::I.rotation(1)));
    }
}
