//! Board evaluation: a linear form over the six board features.
//!
//! # Design: Linear Weighted Sum
//!
//! The [`LinearEvaluator`] scores a board as
//!
//! ```text
//! score = w₀·f₀ + w₁·f₁ + ... + w₅·f₅
//! ```
//!
//! where `fᵢ` are the normalized features of [`FeatureVector`] and `wᵢ` are
//! the weights evolved by the trainer. Weights may be negative; since every
//! feature measures something undesirable, good weight vectors are mostly
//! negative.
//!
//! There is no hidden layer and no bias term.
//!
//! # Weights File
//!
//! Weights are saved as plain text, one value per line in feature order, with
//! no header:
//!
//! ```text
//! -0.51
//! -0.76
//! -0.35
//! -0.18
//! 0.02
//! -0.44
//! ```

use std::{
    fmt,
    fs::File,
    io::{self, BufRead, BufWriter, Write},
    iter,
    num::ParseFloatError,
    path::Path,
};

use evotris_engine::Board;
use rand::Rng;

use crate::board_feature::{FEATURE_COUNT, FeatureVector};

/// Scores boards; higher is better.
///
/// This is the seam the [`TurnEvaluator`](crate::turn_evaluator::TurnEvaluator)
/// depends on.
pub trait BoardEvaluator: fmt::Debug + Send + Sync {
    /// Evaluates the board reached after a move.
    fn evaluate_board(&self, board: &Board) -> f32;
}

/// Weight vector of the linear board evaluator.
///
/// `Clone` copies the weights; a clone can be mutated without affecting the
/// original.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinearEvaluator {
    weights: [f32; FEATURE_COUNT],
}

impl LinearEvaluator {
    /// Creates an evaluator with all weights set to zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            weights: [0.0; FEATURE_COUNT],
        }
    }

    #[must_use]
    pub const fn from_weights(weights: [f32; FEATURE_COUNT]) -> Self {
        Self { weights }
    }

    /// Creates an evaluator with weights drawn uniformly from `[-scale, scale]`.
    #[must_use]
    pub fn random<R>(rng: &mut R, scale: f32) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut evaluator = Self::new();
        evaluator.randomize(rng, scale);
        evaluator
    }

    #[must_use]
    pub const fn weights(&self) -> &[f32; FEATURE_COUNT] {
        &self.weights
    }

    /// Returns the dot product of the weights and `features`.
    #[must_use]
    pub fn evaluate(&self, features: &FeatureVector) -> f32 {
        iter::zip(&self.weights, features.values())
            .map(|(w, f)| w * f)
            .sum()
    }

    /// Replaces every weight with a value drawn uniformly from `[-scale, scale]`.
    pub fn randomize<R>(&mut self, rng: &mut R, scale: f32)
    where
        R: Rng + ?Sized,
    {
        if scale == 0.0 {
            self.set_all(0.0);
            return;
        }
        for w in &mut self.weights {
            *w = rng.random_range(-scale..=scale);
        }
    }

    /// Perturbs each weight independently with probability `chance` by a value
    /// drawn uniformly from `[-scale, scale]`.
    ///
    /// # Panics
    ///
    /// Panics if `chance` is outside `[0, 1]`.
    pub fn mutate<R>(&mut self, rng: &mut R, chance: f32, scale: f32)
    where
        R: Rng + ?Sized,
    {
        for w in &mut self.weights {
            if rng.random_bool(chance.into()) && scale > 0.0 {
                *w += rng.random_range(-scale..=scale);
            }
        }
    }

    pub fn set_all(&mut self, value: f32) {
        self.weights.fill(value);
    }

    /// Replaces all weights.
    ///
    /// # Panics
    ///
    /// Panics if `weights.len() != FEATURE_COUNT`.
    pub fn set_weights(&mut self, weights: &[f32]) {
        assert_eq!(
            weights.len(),
            FEATURE_COUNT,
            "weight vector length must match the feature count"
        );
        self.weights.copy_from_slice(weights);
    }

    /// Writes the weights as text, one value per line.
    pub fn write_weights<W>(&self, mut writer: W) -> io::Result<()>
    where
        W: Write,
    {
        for w in &self.weights {
            writeln!(writer, "{w}")?;
        }
        writer.flush()
    }

    /// Saves the weights to `path`, replacing any existing file.
    pub fn save_weights<P>(&self, path: P) -> io::Result<()>
    where
        P: AsRef<Path>,
    {
        let file = File::create(path)?;
        self.write_weights(BufWriter::new(file))
    }

    /// Reads weights written by [`Self::write_weights`].
    ///
    /// Blank lines are ignored. Exactly [`FEATURE_COUNT`] values are required.
    pub fn read_weights<R>(reader: R) -> Result<Self, ReadWeightsError>
    where
        R: BufRead,
    {
        let mut values = Vec::with_capacity(FEATURE_COUNT);
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            let value = text
                .parse::<f32>()
                .map_err(|source| ReadWeightsError::InvalidValue { line: i + 1, source })?;
            values.push(value);
        }
        if values.len() != FEATURE_COUNT {
            return Err(ReadWeightsError::WrongCount {
                expected: FEATURE_COUNT,
                found: values.len(),
            });
        }
        let mut evaluator = Self::new();
        evaluator.set_weights(&values);
        Ok(evaluator)
    }
}

impl BoardEvaluator for LinearEvaluator {
    #[inline]
    fn evaluate_board(&self, board: &Board) -> f32 {
        self.evaluate(&FeatureVector::from_board(board))
    }
}

/// Failure to read a weights file.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ReadWeightsError {
    #[display("failed to read weights: {_0}")]
    Io(io::Error),
    #[display("invalid weight on line {line}: {source}")]
    InvalidValue { line: usize, source: ParseFloatError },
    #[display("expected {expected} weights, found {found}")]
    WrongCount { expected: usize, found: usize },
}

impl From<io::Error> for ReadWeightsError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn features() -> FeatureVector {
        FeatureVector::from_values([0.1, 0.2, 0.3, 0.4, 0.5, 0.6])
    }

    #[test]
    fn test_evaluate_is_dot_product() {
        let evaluator = LinearEvaluator::from_weights([1.0, -1.0, 2.0, 0.0, 0.5, -0.5]);
        let expected = 0.1 - 0.2 + 0.6 + 0.0 + 0.25 - 0.3;
        assert!((evaluator.evaluate(&features()) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_zero_weights_evaluate_to_zero() {
        let evaluator = LinearEvaluator::new();
        assert_eq!(evaluator.evaluate(&features()), 0.0);
        assert_eq!(evaluator.evaluate(&FeatureVector::from_values([9.0; 6])), 0.0);
    }

    #[test]
    fn test_evaluate_is_linear_in_weights() {
        let weights = [0.3, -0.7, 1.1, -0.2, 0.05, 0.9];
        let base = LinearEvaluator::from_weights(weights).evaluate(&features());
        for k in [-2.0_f32, 0.5, 3.0] {
            let scaled = LinearEvaluator::from_weights(weights.map(|w| w * k));
            assert!((scaled.evaluate(&features()) - k * base).abs() < 1e-5);
        }
    }

    #[test]
    fn test_randomize_stays_in_range() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut evaluator = LinearEvaluator::new();
        for _ in 0..100 {
            evaluator.randomize(&mut rng, 0.5);
            assert!(evaluator.weights().iter().all(|w| (-0.5..=0.5).contains(w)));
        }
        evaluator.randomize(&mut rng, 0.0);
        assert_eq!(evaluator.weights(), &[0.0; FEATURE_COUNT]);
    }

    #[test]
    fn test_mutate_with_zero_chance_is_noop() {
        let mut rng = Pcg32::seed_from_u64(2);
        let original = LinearEvaluator::random(&mut rng, 1.0);
        let mut mutated = original;
        mutated.mutate(&mut rng, 0.0, 10.0);
        assert_eq!(mutated, original);
    }

    #[test]
    fn test_mutate_with_full_chance_changes_every_weight() {
        let mut rng = Pcg32::seed_from_u64(3);
        let original = LinearEvaluator::random(&mut rng, 1.0);
        let mut mutated = original;
        mutated.mutate(&mut rng, 1.0, 0.5);
        for (before, after) in iter::zip(original.weights(), mutated.weights()) {
            assert_ne!(before, after);
            assert!((after - before).abs() <= 0.5 + f32::EPSILON);
        }
    }

    #[test]
    fn test_clone_is_independent() {
        let mut rng = Pcg32::seed_from_u64(4);
        let original = LinearEvaluator::random(&mut rng, 1.0);
        let snapshot = original;
        let mut copy = original;
        copy.mutate(&mut rng, 1.0, 1.0);
        copy.set_all(7.0);
        assert_eq!(original, snapshot);
        assert_eq!(copy.weights(), &[7.0; FEATURE_COUNT]);
    }

    #[test]
    #[should_panic(expected = "weight vector length")]
    fn test_set_weights_rejects_wrong_length() {
        LinearEvaluator::new().set_weights(&[1.0, 2.0]);
    }

    #[test]
    fn test_weights_text_format() {
        let evaluator = LinearEvaluator::from_weights([-0.5, 1.0, 0.25, -2.0, 0.0, 3.5]);
        let mut buf = Vec::new();
        evaluator.write_weights(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "-0.5\n1\n0.25\n-2\n0\n3.5\n");
    }

    #[test]
    fn test_read_weights() {
        let text = "-0.5\n1\n\n0.25\n-2\n0\n3.5\n";
        let evaluator = LinearEvaluator::read_weights(text.as_bytes()).unwrap();
        assert_eq!(evaluator.weights(), &[-0.5, 1.0, 0.25, -2.0, 0.0, 3.5]);
    }

    #[test]
    fn test_read_weights_errors() {
        let err = LinearEvaluator::read_weights("1\n2\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            ReadWeightsError::WrongCount {
                expected: 6,
                found: 2
            }
        ));

        let err = LinearEvaluator::read_weights("1\nabc\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ReadWeightsError::InvalidValue { line: 2, .. }));
    }
}
