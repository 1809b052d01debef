//! Training system for evolving linear evaluator weights.
//!
//! # How Training Works
//!
//! 1. **Population** - Create specimens, each with random weights
//! 2. **Evaluation** - Every specimen plays episodes in its own thread; its
//!    fitness is the mean of the episode points
//! 3. **Ranking** - Sort specimens by fitness, best first
//! 4. **Selection** - The top specimens become the elite and survive unchanged
//! 5. **Reproduction** - The remaining slots get mutated copies of random elites
//! 6. **Repeat** - For a fixed number of generations, with no early stopping
//!
//! # Architecture
//!
//! ```text
//! Trainer (generation loop, run seed)
//!     ↓ drives
//! Population / PopulationEvolver (genetic)
//!     ↓ evaluated by
//! EpisodeRunner (evotris-evaluator)
//!     ↓ uses
//! TurnEvaluator + LinearEvaluator
//! ```
//!
//! # Example
//!
//! ```
//! use evotris_training::{
//!     config::TrainingConfig,
//!     trainer::{GenerationReport, Trainer},
//! };
//!
//! let config = TrainingConfig {
//!     population_size: 4,
//!     elite_count: 1,
//!     episodes_per_specimen: 1,
//!     generations: 2,
//!     step_limit: 20,
//!     ..TrainingConfig::default()
//! };
//! let mut trainer = Trainer::new(config, 42)?;
//! let last = trainer.run(&mut |report: &GenerationReport| {
//!     println!("generation {}: {}", report.generation, report.best_fitness);
//! });
//! assert_eq!(last.map(|r| r.generation), Some(2));
//! # Ok::<(), evotris_training::config::ConfigError>(())
//! ```
//!
//! # Current Limitations
//!
//! - **Fixed mutation scale**: The scale never decays over the run
//! - **No crossover**: Offspring derive from a single elite
//! - **Noisy fitness**: Each generation plays fresh random shape sequences, so
//!   an elite's fitness changes between generations

pub mod config;
pub mod genetic;
pub mod summary;
pub mod trainer;
