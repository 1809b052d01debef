//! Move evaluation for the falling-block board.
//!
//! This crate implements a three-level evaluation architecture:
//!
//! 1. **Board Evaluation** ([`linear_evaluator`]) - Scores a board by a
//!    weighted sum of six normalized features ([`board_feature`]).
//!
//! 2. **Turn Evaluation** ([`turn_evaluator`]) - Selects the move for the
//!    current shape by scoring the board each legal move would produce and
//!    keeping the best one.
//!
//! 3. **Episode Evaluation** ([`episode_runner`]) - Plays whole episodes with a
//!    turn evaluator and averages their final points into a fitness value used
//!    for training.
//!
//! # Architecture
//!
//! ```text
//! Episode Runner (fitness for training)
//!     ↓ uses
//! Turn Evaluator (select best move)
//!     ↓ uses
//! Board Evaluator (score a resulting board)
//!     ↓ uses
//! Feature Vector (six board heuristics)
//! ```
//!
//! # Example
//!
//! ```
//! use evotris_engine::{Board, ShapeKind};
//! use evotris_evaluator::{linear_evaluator::LinearEvaluator, turn_evaluator::TurnEvaluator};
//!
//! let evaluator = LinearEvaluator::from_weights([-1.0, -0.5, -1.0, -0.2, -0.1, -0.3]);
//! let turn_evaluator = TurnEvaluator::new(&evaluator);
//!
//! let board = Board::new();
//! let (best_move, outcome) = turn_evaluator
//!     .select_best_move(&board, ShapeKind::I)
//!     .expect("an empty board always has a legal move");
//! assert_eq!(outcome.board().grid().occupied_count(), 4);
//! assert_eq!(outcome.cleared_rows(), 0);
//! # let _ = best_move;
//! ```

pub mod board_feature;
pub mod episode_runner;
pub mod linear_evaluator;
pub mod turn_evaluator;
