//! Board features: the six normalized heuristics fed to the evaluator.
//!
//! Each feature reads one heuristic from the board and scales it into a small
//! non-negative range:
//!
//! | Feature           | Formula                                  |
//! |-------------------|------------------------------------------|
//! | `max_height`      | `(max_height / HEIGHT)²`                 |
//! | `total_height`    | `total_height / (WIDTH × HEIGHT)`        |
//! | `covered_cells`   | `covered_cells / (WIDTH × HEIGHT)`       |
//! | `bumpiness`       | `bumpiness / (WIDTH × HEIGHT)`           |
//! | `row_transitions` | `row_transitions / (WIDTH × HEIGHT)`     |
//! | `roof_cells`      | `roof_cells / (WIDTH × HEIGHT)`          |
//!
//! Only the maximum height is squared, so that tall stacks weigh
//! disproportionately. The formulas fix the input distribution the trained
//! weights were tuned against; changing them invalidates saved weights.
//!
//! Features carry no state. A [`FeatureVector`] is recomputed from the board
//! for every evaluation.

use std::{iter, ops::Index};

use evotris_engine::{Board, HEIGHT, WIDTH};

/// Number of features, and therefore the length of every weight vector.
pub const FEATURE_COUNT: usize = 6;

/// Identifies one of the six board features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardFeature {
    MaxHeight,
    TotalHeight,
    CoveredCells,
    Bumpiness,
    RowTransitions,
    RoofCells,
}

impl BoardFeature {
    /// All features in weight order.
    pub const ALL: [Self; FEATURE_COUNT] = [
        Self::MaxHeight,
        Self::TotalHeight,
        Self::CoveredCells,
        Self::Bumpiness,
        Self::RowTransitions,
        Self::RoofCells,
    ];

    /// Stable identifier used in saved model files.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::MaxHeight => "max_height",
            Self::TotalHeight => "total_height",
            Self::CoveredCells => "covered_cells",
            Self::Bumpiness => "bumpiness",
            Self::RowTransitions => "row_transitions",
            Self::RoofCells => "roof_cells",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MaxHeight => "Max Height (squared)",
            Self::TotalHeight => "Total Height",
            Self::CoveredCells => "Covered Cells",
            Self::Bumpiness => "Bumpiness",
            Self::RowTransitions => "Row Transitions",
            Self::RoofCells => "Roof Cells",
        }
    }

    /// Reads the raw, unnormalized heuristic from the board.
    #[must_use]
    pub fn raw_value(self, board: &Board) -> usize {
        match self {
            Self::MaxHeight => board.max_height(),
            Self::TotalHeight => board.total_height(),
            Self::CoveredCells => board.covered_cells(),
            Self::Bumpiness => board.bumpiness(),
            Self::RowTransitions => board.row_transitions(),
            Self::RoofCells => board.roof_cells(),
        }
    }

    /// Computes the normalized feature value.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn compute(self, board: &Board) -> f32 {
        let raw = self.raw_value(board) as f32;
        match self {
            Self::MaxHeight => (raw / HEIGHT as f32).powi(2),
            _ => raw / (WIDTH * HEIGHT) as f32,
        }
    }
}

/// The six normalized features of one board, in [`BoardFeature::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f32; FEATURE_COUNT]);

impl FeatureVector {
    /// Extracts all features from `board`.
    #[must_use]
    pub fn from_board(board: &Board) -> Self {
        Self(BoardFeature::ALL.map(|feature| feature.compute(board)))
    }

    #[must_use]
    pub const fn from_values(values: [f32; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    #[must_use]
    pub const fn values(&self) -> &[f32; FEATURE_COUNT] {
        &self.0
    }

    /// Pairs every value with the feature it was computed from.
    pub fn iter(&self) -> impl Iterator<Item = (BoardFeature, f32)> + '_ {
        iter::zip(BoardFeature::ALL, self.0)
    }
}

impl Index<BoardFeature> for FeatureVector {
    type Output = f32;

    fn index(&self, feature: BoardFeature) -> &f32 {
        &self.0[feature as usize]
    }
}
