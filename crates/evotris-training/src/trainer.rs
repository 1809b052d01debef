//! The generation loop.
//!
//! A [`Trainer`] owns the population and a single run generator seeded once.
//! Each generation draws a fresh seed from it for the parallel fitness
//! evaluation, so a whole run is reproducible from its seed.

use evotris_evaluator::{board_feature::FEATURE_COUNT, episode_runner::EpisodeRunner};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{
    config::{ConfigError, TrainingConfig},
    genetic::{Population, PopulationEvolver},
    summary::FitnessSummary,
};

/// Result of one generation, taken after ranking and before reproduction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    /// 1-based number of the generation.
    pub generation: usize,
    pub best_weights: [f32; FEATURE_COUNT],
    pub best_fitness: f32,
    pub mutation_scale: f32,
    pub summary: FitnessSummary,
}

/// Receives a report after every generation.
pub trait GenerationObserver {
    fn on_generation(&mut self, report: &GenerationReport);
}

impl<F> GenerationObserver for F
where
    F: FnMut(&GenerationReport),
{
    fn on_generation(&mut self, report: &GenerationReport) {
        self(report);
    }
}

#[derive(Debug)]
pub struct Trainer {
    config: TrainingConfig,
    rng: Pcg32,
    runner: EpisodeRunner,
    evolver: PopulationEvolver,
    population: Population,
    generation: usize,
}

impl Trainer {
    /// Validates `config` and creates the initial population.
    pub fn new(config: TrainingConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = Pcg32::seed_from_u64(seed);
        let population =
            Population::random(config.population_size, &mut rng, config.initial_weight_scale);
        let runner = EpisodeRunner::new(config.step_limit);
        let evolver = PopulationEvolver {
            elite_count: config.elite_count,
            mutation_chance: config.mutation_chance,
            mutation_scale: config.mutation_scale,
        };

        Ok(Self {
            config,
            rng,
            runner,
            evolver,
            population,
            generation: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Number of completed generations.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Runs one evaluate, rank, report, reproduce cycle.
    pub fn run_generation(&mut self) -> GenerationReport {
        let generation_seed = self.rng.random::<u64>();
        self.population.evaluate_fitness(
            &self.runner,
            self.config.episodes_per_specimen,
            generation_seed,
        );
        self.generation += 1;

        let best = self
            .population
            .best()
            .expect("validated population is never empty");
        let summary = self
            .population
            .fitness_summary()
            .expect("every specimen is scored after evaluation");
        let report = GenerationReport {
            generation: self.generation,
            best_weights: *best.evaluator().weights(),
            best_fitness: best.fitness().unwrap_or(summary.max),
            mutation_scale: self.evolver.mutation_scale,
            summary,
        };
        log::debug!(
            "generation {}: fitness min={:.2} max={:.2} mean={:.2} median={:.2} std_dev={:.2}",
            report.generation,
            summary.min,
            summary.max,
            summary.mean,
            summary.median,
            summary.std_dev,
        );

        self.population = self.evolver.evolve(&self.population, &mut self.rng);
        report
    }

    /// Runs every remaining generation, reporting each to `observer`.
    ///
    /// Returns the report of the last generation run, or `None` if the
    /// configured number of generations had already been reached.
    pub fn run<O>(&mut self, observer: &mut O) -> Option<GenerationReport>
    where
        O: GenerationObserver + ?Sized,
    {
        let mut last = None;
        while self.generation < self.config.generations {
            let report = self.run_generation();
            observer.on_generation(&report);
            last = Some(report);
        }
        last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> TrainingConfig {
        TrainingConfig {
            population_size: 6,
            elite_count: 2,
            episodes_per_specimen: 2,
            generations: 3,
            step_limit: 25,
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = TrainingConfig {
            elite_count: 0,
            ..small_config()
        };
        assert!(Trainer::new(config, 0).is_err());
    }

    #[test]
    fn test_run_reports_every_generation() {
        let mut trainer = Trainer::new(small_config(), 1).unwrap();
        let mut reports = vec![];
        let last = trainer
            .run(&mut |report: &GenerationReport| reports.push(report.clone()))
            .unwrap();

        assert_eq!(reports.len(), 3);
        assert_eq!(last, reports[2]);
        for (i, report) in reports.iter().enumerate() {
            assert_eq!(report.generation, i + 1);
            assert_eq!(report.best_fitness, report.summary.max);
            assert_eq!(report.mutation_scale, 1.0);
        }
        assert_eq!(trainer.generation(), 3);
        assert_eq!(trainer.population().len(), 6);
        assert!(trainer.run(&mut |_: &GenerationReport| {}).is_none());
    }

    #[test]
    fn test_elites_carry_over_between_generations() {
        let mut trainer = Trainer::new(small_config(), 2).unwrap();
        let report = trainer.run_generation();

        let population = trainer.population();
        assert_eq!(population.specimens()[0].evaluator().weights(), &report.best_weights);
        assert_eq!(population.specimens()[0].fitness(), Some(report.best_fitness));
        assert!(population.specimens()[2..].iter().all(|s| s.fitness().is_none()));
    }

    #[test]
    fn test_same_seed_reproduces_run() {
        let collect = |seed| {
            let mut trainer = Trainer::new(small_config(), seed).unwrap();
            let mut reports = vec![];
            trainer.run(&mut |report: &GenerationReport| reports.push(report.clone()));
            reports
        };
        assert_eq!(collect(5), collect(5));
    }

    #[test]
    fn test_zero_initial_scale_starts_from_zero_weights() {
        let config = TrainingConfig {
            initial_weight_scale: 0.0,
            ..small_config()
        };
        let trainer = Trainer::new(config, 3).unwrap();
        assert!(
            trainer
                .population()
                .specimens()
                .iter()
                .all(|s| s.evaluator().weights() == &[0.0; FEATURE_COUNT])
        );
    }
}
