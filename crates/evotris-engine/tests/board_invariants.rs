//! Generated checks for placement and line-clear invariants.
//!
//! Boards are built by dropping random shapes into random columns, so every
//! generated board is reachable through normal play.

use evotris_engine::{Board, HEIGHT, LINE_CLEAR_REWARDS, Position, ROTATION_COUNT, ShapeKind, WIDTH};
use proptest::prelude::*;

fn build_board(moves: &[(usize, usize, usize)]) -> Board {
    let mut board = Board::new();
    for &(kind, rotation, column) in moves {
        let shape = ShapeKind::ALL[kind].rotation(rotation);
        if board.drop_shape(shape, column).is_ok() {
            board.clear_lines();
        }
    }
    board
}

fn moves_strategy() -> impl Strategy<Value = Vec<(usize, usize, usize)>> {
    prop::collection::vec(
        (0..ShapeKind::LEN, 0..ROTATION_COUNT, 0..WIDTH),
        0..60,
    )
}

proptest! {
    #[test]
    fn placeable_implies_cells_in_bounds_and_vacant(
        moves in moves_strategy(),
        kind in 0..ShapeKind::LEN,
        rotation in 0..ROTATION_COUNT,
        row in 0..HEIGHT + 2,
        col in 0..WIDTH + 2,
    ) {
        let board = build_board(&moves);
        let shape = ShapeKind::ALL[kind].rotation(rotation);
        let origin = Position::new(row, col);
        if board.is_placeable(shape, origin) {
            for pos in shape.cells_at(origin) {
                prop_assert!(pos.row() < HEIGHT && pos.col() < WIDTH);
                prop_assert_eq!(board.grid().get(pos), Some(false));
            }
        }
    }

    #[test]
    fn drop_adds_four_cells_and_resting_row(
        moves in moves_strategy(),
        kind in 0..ShapeKind::LEN,
        rotation in 0..ROTATION_COUNT,
        column in 0..WIDTH,
    ) {
        let board = build_board(&moves);
        let shape = ShapeKind::ALL[kind].rotation(rotation);
        let mut next = board.clone();
        match next.drop_shape(shape, column) {
            Ok(landing) => {
                prop_assert_eq!(next.grid().occupied_count(), board.grid().occupied_count() + 4);
                prop_assert_eq!(next.points(), board.points() + landing.resting_row());
                // one row further down must collide or leave the grid
                let below = Position::new(landing.resting_row() + 1, column);
                prop_assert!(!board.is_placeable(shape, below));
            }
            Err(_) => {
                prop_assert!(!board.is_placeable(shape, Position::new(0, column)));
                prop_assert_eq!(&next, &board);
            }
        }
    }

    #[test]
    fn clear_lines_removes_only_full_rows(
        moves in moves_strategy(),
        kind in 0..ShapeKind::LEN,
        rotation in 0..ROTATION_COUNT,
        column in 0..WIDTH,
    ) {
        let mut board = build_board(&moves);
        let shape = ShapeKind::ALL[kind].rotation(rotation);
        prop_assume!(board.drop_shape(shape, column).is_ok());

        let full_rows: Vec<usize> = (0..HEIGHT).filter(|&r| board.grid().is_row_filled(r)).collect();
        let kept_rows: Vec<Vec<bool>> = (0..HEIGHT)
            .filter(|r| !full_rows.contains(r))
            .map(|r| board.grid().row(r).to_vec())
            .collect();
        let before_points = board.points();

        let cleared = board.clear_lines();
        prop_assert_eq!(cleared, full_rows.len());
        prop_assert_eq!(before_points + LINE_CLEAR_REWARDS[cleared], board.points());

        for row in 0..cleared {
            prop_assert!(board.grid().row(row).iter().all(|&c| !c));
        }
        for (i, kept) in kept_rows.iter().enumerate() {
            prop_assert_eq!(board.grid().row(cleared + i), kept.as_slice());
        }
    }
}
