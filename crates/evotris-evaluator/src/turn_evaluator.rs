//! Turn evaluation: selecting the move for the current shape.
//!
//! This module implements the second level of the evaluator architecture:
//! choosing where to drop the current shape by scoring the board every legal
//! move would produce and keeping the best one.
//!
//! # How It Works
//!
//! 1. **Enumerate Moves** - Every `(column, rotation)` pair, column-major with
//!    the rotation varying fastest, so the move index is `column * 4 + rotation`
//! 2. **Filter** - A move is legal if its rotation fits at row 0 of its column
//! 3. **Score** - Drop the shape on a copy of the board, clear lines, and
//!    evaluate the result with the [`BoardEvaluator`]
//! 4. **Select** - Keep the highest score; on ties the first move in
//!    enumeration order wins
//!
//! # Design: Greedy One-Step Lookahead
//!
//! The [`TurnEvaluator`] looks at the immediate placement only. The next shape
//! is not known to the policy and no move sequence is searched.
//!
//! When no move is legal, [`TurnEvaluator::select_best_move`] returns `None`;
//! the caller treats that as a loss.

use std::fmt;

use arrayvec::ArrayVec;
use evotris_engine::{Board, Position, ROTATION_COUNT, ShapeKind, WIDTH};
use serde::Serialize;

use crate::linear_evaluator::BoardEvaluator;

/// Upper bound on the number of moves for one shape.
pub const MAX_MOVES: usize = WIDTH * ROTATION_COUNT;

/// A candidate move: drop rotation `rotation` of the shape into `column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Move {
    column: usize,
    rotation: usize,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "column {} rotation {}", self.column, self.rotation)
    }
}

impl Move {
    /// Creates a move.
    ///
    /// # Panics
    ///
    /// Panics if `column >= WIDTH` or `rotation >= ROTATION_COUNT`.
    #[must_use]
    pub const fn new(column: usize, rotation: usize) -> Self {
        assert!(column < WIDTH && rotation < ROTATION_COUNT);
        Self { column, rotation }
    }

    /// Inverse of [`Self::index`].
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::new(index / ROTATION_COUNT, index % ROTATION_COUNT)
    }

    #[must_use]
    pub const fn column(self) -> usize {
        self.column
    }

    #[must_use]
    pub const fn rotation(self) -> usize {
        self.rotation
    }

    /// Position of this move in enumeration order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.column * ROTATION_COUNT + self.rotation
    }
}

/// Enumerates the legal moves for `kind` on `board`, in move-index order.
#[must_use]
pub fn legal_moves(board: &Board, kind: ShapeKind) -> ArrayVec<Move, MAX_MOVES> {
    (0..MAX_MOVES)
        .map(Move::from_index)
        .filter(|mv| board.is_placeable(kind.rotation(mv.rotation), Position::new(0, mv.column)))
        .collect()
}

/// Board produced by a move after line clears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    board: Board,
    cleared_rows: usize,
}

impl MoveOutcome {
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn into_board(self) -> Board {
        self.board
    }

    /// Number of rows the move cleared.
    #[must_use]
    pub const fn cleared_rows(&self) -> usize {
        self.cleared_rows
    }
}

/// Greedy move selector built on a board evaluator.
#[derive(Debug, Clone, Copy)]
pub struct TurnEvaluator<'a> {
    evaluator: &'a dyn BoardEvaluator,
}

impl<'a> TurnEvaluator<'a> {
    #[must_use]
    pub fn new(evaluator: &'a dyn BoardEvaluator) -> Self {
        Self { evaluator }
    }

    #[must_use]
    pub fn evaluator(&self) -> &'a dyn BoardEvaluator {
        self.evaluator
    }

    /// Selects the best move for `kind` on `board`.
    ///
    /// # Returns
    ///
    /// `Some((move, outcome))` for the highest-scoring legal move, the first
    /// one in enumeration order on ties. `None` if no move is legal.
    #[must_use]
    pub fn select_best_move(&self, board: &Board, kind: ShapeKind) -> Option<(Move, MoveOutcome)> {
        let mut best: Option<(f32, Move, MoveOutcome)> = None;

        for mv in legal_moves(board, kind) {
            let mut next = board.clone();
            if next.drop_shape(kind.rotation(mv.rotation), mv.column).is_err() {
                continue;
            }
            let cleared_rows = next.clear_lines();
            let score = self.evaluator.evaluate_board(&next);
            if best.as_ref().is_none_or(|(best_score, ..)| score > *best_score) {
                best = Some((score, mv, MoveOutcome { board: next, cleared_rows }));
            }
        }

        best.map(|(_score, mv, outcome)| (mv, outcome))
    }
}
