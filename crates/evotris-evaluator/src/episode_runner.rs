//! Episode evaluation: playing whole episodes to compute fitness.
//!
//! This module implements the third level of the evaluator architecture. An
//! episode starts from an empty board and repeats:
//!
//! 1. Ask the [`TurnEvaluator`] for the best move for the current shape
//! 2. Drop the shape and clear lines
//! 3. Draw the next shape uniformly at random
//!
//! The episode ends as a loss when the policy finds no legal move or when the
//! next shape cannot be placed at the spawn position, and ends normally when
//! the step limit is reached.
//!
//! # Fitness
//!
//! ```text
//! fitness = Σ points(episodeᵢ) / episodes
//! ```
//!
//! Points combine the drop bonus (the resting row of every shape) and the
//! line-clear rewards, so fitness rewards both survival and multi-line clears.
//!
//! # Usage
//!
//! ```
//! use evotris_evaluator::{
//!     episode_runner::EpisodeRunner, linear_evaluator::LinearEvaluator,
//!     turn_evaluator::TurnEvaluator,
//! };
//!
//! let evaluator = LinearEvaluator::from_weights([-1.0, -0.5, -1.0, -0.2, -0.1, -0.3]);
//! let runner = EpisodeRunner::new(50);
//! let fitness = runner.evaluate_fitness(&TurnEvaluator::new(&evaluator), 3, &mut rand::rng());
//! assert!(fitness > 0.0);
//! ```

use evotris_engine::{Board, LINE_CLEAR_REWARDS, ShapeKind};
use rand::Rng;
use serde::Serialize;

use crate::turn_evaluator::TurnEvaluator;

/// Default maximum number of shapes dropped per episode.
pub const DEFAULT_STEP_LIMIT: usize = 400;

/// Outcome of one episode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EpisodeStats {
    points: usize,
    steps: usize,
    lost: bool,
    line_clears: [usize; LINE_CLEAR_REWARDS.len()],
}

impl EpisodeStats {
    /// Final points of the board.
    #[must_use]
    pub const fn points(&self) -> usize {
        self.points
    }

    /// Number of shapes dropped.
    #[must_use]
    pub const fn steps(&self) -> usize {
        self.steps
    }

    /// Whether the episode ended by a loss rather than the step limit.
    #[must_use]
    pub const fn is_lost(&self) -> bool {
        self.lost
    }

    /// Number of drops by rows cleared, `0..=4`.
    #[must_use]
    pub const fn line_clears(&self) -> &[usize; LINE_CLEAR_REWARDS.len()] {
        &self.line_clears
    }

    /// Total number of rows cleared.
    #[must_use]
    pub fn cleared_rows(&self) -> usize {
        self.line_clears
            .iter()
            .enumerate()
            .map(|(rows, count)| rows * count)
            .sum()
    }
}

/// Plays episodes with a fixed step limit.
#[derive(Debug, Clone, Copy)]
pub struct EpisodeRunner {
    step_limit: usize,
}

impl Default for EpisodeRunner {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_LIMIT)
    }
}

impl EpisodeRunner {
    #[must_use]
    pub const fn new(step_limit: usize) -> Self {
        Self { step_limit }
    }

    #[must_use]
    pub const fn step_limit(&self) -> usize {
        self.step_limit
    }

    /// Plays one episode from an empty board.
    pub fn play_episode<R>(&self, turn_evaluator: &TurnEvaluator, rng: &mut R) -> EpisodeStats
    where
        R: Rng + ?Sized,
    {
        let mut board = Board::new();
        let mut stats = EpisodeStats::default();
        let mut kind: ShapeKind = rng.random();

        while stats.steps < self.step_limit {
            let Some((_mv, outcome)) = turn_evaluator.select_best_move(&board, kind) else {
                board.mark_lost();
                break;
            };
            stats.line_clears[outcome.cleared_rows().min(LINE_CLEAR_REWARDS.len() - 1)] += 1;
            board = outcome.into_board();

            kind = rng.random();
            stats.steps += 1;
            if board.is_topped_out(kind.rotation(0)) {
                board.mark_lost();
                break;
            }
        }

        stats.points = board.points();
        stats.lost = board.is_lost();
        stats
    }

    /// Plays `episodes` independent episodes.
    pub fn play_episodes<R>(
        &self,
        turn_evaluator: &TurnEvaluator,
        episodes: usize,
        rng: &mut R,
    ) -> Vec<EpisodeStats>
    where
        R: Rng + ?Sized,
    {
        (0..episodes)
            .map(|_| self.play_episode(turn_evaluator, rng))
            .collect()
    }

    /// Plays `episodes` independent episodes and returns their mean points.
    ///
    /// # Panics
    ///
    /// Panics if `episodes` is zero.
    #[expect(clippy::cast_precision_loss)]
    pub fn evaluate_fitness<R>(
        &self,
        turn_evaluator: &TurnEvaluator,
        episodes: usize,
        rng: &mut R,
    ) -> f32
    where
        R: Rng + ?Sized,
    {
        assert!(episodes > 0, "at least one episode is required");
        let total_points: usize = (0..episodes)
            .map(|_| self.play_episode(turn_evaluator, rng).points)
            .sum();
        total_points as f32 / episodes as f32
    }
}
