//! Genetic algorithm over linear evaluator weights.
//!
//! # Algorithm Overview
//!
//! Every generation runs the same cycle:
//!
//! 1. **Evaluate Fitness** - Each specimen plays episodes and receives the mean
//!    of their points as fitness
//! 2. **Rank** - Specimens are sorted by fitness, best first
//! 3. **Elite Selection** - The top `elite_count` specimens are copied
//!    unchanged into the next generation
//! 4. **Reproduction** - Every other slot is filled with a copy of a uniformly
//!    chosen elite, mutated with uniform noise
//!
//! There is no crossover. The mutation scale is the same in every generation.
//!
//! # Parallelization
//!
//! Fitness evaluation runs one scoped thread per specimen. Each thread owns a
//! `&mut` to exactly one specimen and its own `Pcg32` generator, built from the
//! generation seed with the specimen index as stream, so no generator is shared
//! and no locking is needed. The scope joins every thread before ranking.
//!
//! # Example
//!
//! ```
//! use evotris_evaluator::episode_runner::EpisodeRunner;
//! use evotris_training::genetic::{Population, PopulationEvolver};
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//!
//! let mut rng = Pcg32::seed_from_u64(42);
//! let mut population = Population::random(8, &mut rng, 1.0);
//! let evolver = PopulationEvolver {
//!     elite_count: 2,
//!     mutation_chance: 0.2,
//!     mutation_scale: 1.0,
//! };
//!
//! for generation in 0..2 {
//!     population.evaluate_fitness(&EpisodeRunner::new(20), 2, generation);
//!     population = evolver.evolve(&population, &mut rng);
//! }
//! assert_eq!(population.len(), 8);
//! ```

use std::{cmp::Ordering, thread};

use evotris_evaluator::{
    episode_runner::EpisodeRunner, linear_evaluator::LinearEvaluator,
    turn_evaluator::TurnEvaluator,
};
use rand::Rng;
use rand_pcg::Pcg32;

use crate::summary::FitnessSummary;

/// A candidate weight vector and its fitness.
///
/// `None` fitness marks a specimen that has not been evaluated since it was
/// created.
#[derive(Debug, Clone, PartialEq)]
pub struct Specimen {
    evaluator: LinearEvaluator,
    fitness: Option<f32>,
}

impl Specimen {
    /// Creates an unscored specimen.
    #[must_use]
    pub const fn new(evaluator: LinearEvaluator) -> Self {
        Self {
            evaluator,
            fitness: None,
        }
    }

    #[must_use]
    pub const fn evaluator(&self) -> &LinearEvaluator {
        &self.evaluator
    }

    #[must_use]
    pub const fn fitness(&self) -> Option<f32> {
        self.fitness
    }
}

/// The specimens of one generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    specimens: Vec<Specimen>,
}

impl Population {
    /// Creates `count` unscored specimens with weights drawn uniformly from
    /// `[-scale, scale]`.
    #[must_use]
    pub fn random<R>(count: usize, rng: &mut R, scale: f32) -> Self
    where
        R: Rng + ?Sized,
    {
        let specimens = (0..count)
            .map(|_| Specimen::new(LinearEvaluator::random(rng, scale)))
            .collect();
        Self { specimens }
    }

    #[must_use]
    pub fn from_specimens(specimens: Vec<Specimen>) -> Self {
        Self { specimens }
    }

    #[must_use]
    pub fn specimens(&self) -> &[Specimen] {
        &self.specimens
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.specimens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specimens.is_empty()
    }

    /// Returns the first specimen, which is the best one once ranked.
    #[must_use]
    pub fn best(&self) -> Option<&Specimen> {
        self.specimens.first()
    }

    /// Evaluates the fitness of every specimen in parallel, then ranks the
    /// population best first.
    ///
    /// The specimen at index `i` plays its episodes with
    /// `Pcg32::new(generation_seed, i)`.
    pub fn evaluate_fitness(
        &mut self,
        runner: &EpisodeRunner,
        episodes: usize,
        generation_seed: u64,
    ) {
        thread::scope(|s| {
            for (index, specimen) in self.specimens.iter_mut().enumerate() {
                s.spawn(move || {
                    let mut rng = Pcg32::new(generation_seed, index as u64);
                    let turn_evaluator = TurnEvaluator::new(&specimen.evaluator);
                    let fitness = runner.evaluate_fitness(&turn_evaluator, episodes, &mut rng);
                    specimen.fitness = Some(fitness);
                });
            }
        });

        self.rank();
    }

    /// Stable sort by fitness, best first; unscored specimens go last.
    pub fn rank(&mut self) {
        self.specimens
            .sort_by(|a, b| compare_fitness(b.fitness, a.fitness));
    }

    #[must_use]
    pub fn is_ranked(&self) -> bool {
        self.specimens
            .is_sorted_by(|a, b| compare_fitness(a.fitness, b.fitness) != Ordering::Less)
    }

    /// Summarizes the fitness of the scored specimens.
    #[must_use]
    pub fn fitness_summary(&self) -> Option<FitnessSummary> {
        FitnessSummary::new(self.specimens.iter().filter_map(Specimen::fitness))
    }
}

// Unscored ranks below any score.
fn compare_fitness(a: Option<f32>, b: Option<f32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Controls how one generation produces the next.
#[derive(Debug, Clone, Copy)]
pub struct PopulationEvolver {
    /// Number of top specimens preserved unchanged (elitism)
    pub elite_count: usize,
    /// Probability of mutating each weight of an offspring
    pub mutation_chance: f32,
    /// Half-width of the uniform mutation noise
    pub mutation_scale: f32,
}

impl PopulationEvolver {
    /// Creates the next generation from a ranked population.
    ///
    /// 1. Copies the top `elite_count` specimens unchanged, fitness included
    /// 2. Fills the remaining slots with mutated copies of uniformly chosen
    ///    elites, unscored
    ///
    /// The returned population has the same size as `population`.
    ///
    /// # Panics
    ///
    /// Panics if `population` is not ranked or `elite_count` is zero or larger
    /// than the population.
    #[must_use]
    pub fn evolve<R>(&self, population: &Population, rng: &mut R) -> Population
    where
        R: Rng + ?Sized,
    {
        assert!(population.is_ranked(), "population must be ranked");
        assert!(
            (1..=population.len()).contains(&self.elite_count),
            "elite count must be between 1 and the population size"
        );

        let elites = &population.specimens[..self.elite_count];
        let mut next_specimens = Vec::with_capacity(population.len());
        next_specimens.extend_from_slice(elites);

        while next_specimens.len() < population.len() {
            let parent = &elites[rng.random_range(0..elites.len())];
            let mut evaluator = parent.evaluator;
            evaluator.mutate(rng, self.mutation_chance, self.mutation_scale);
            next_specimens.push(Specimen::new(evaluator));
        }

        Population {
            specimens: next_specimens,
        }
    }
}
