use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::Utc;
use evotris_evaluator::linear_evaluator::LinearEvaluator;
use evotris_training::{
    config::TrainingConfig,
    trainer::{GenerationObserver, GenerationReport, Trainer},
};

use crate::{
    model::TrainedModel,
    output::{self, LineLog},
};

const DEFAULT_WEIGHTS_OUTPUT: &str = "weights.txt";
const DEFAULT_PROGRESS_OUTPUT: &str = "bests.txt";

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Training configuration JSON file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of specimens per generation
    #[arg(long)]
    population_size: Option<usize>,
    /// Number of top specimens kept unchanged each generation
    #[arg(long)]
    elite_count: Option<usize>,
    /// Episodes played per specimen to compute its fitness
    #[arg(long)]
    episodes: Option<usize>,
    #[arg(long)]
    generations: Option<usize>,
    /// Maximum shapes dropped per episode
    #[arg(long)]
    step_limit: Option<usize>,
    /// Per-weight mutation probability
    #[arg(long)]
    mutation_chance: Option<f32>,
    /// Half-width of the uniform mutation noise
    #[arg(long)]
    mutation_scale: Option<f32>,
    /// Half-width of the initial weight range (0 starts from zero weights)
    #[arg(long)]
    initial_weight_scale: Option<f32>,
    /// Run seed; a random seed is used if omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Best weights file, rewritten every generation
    #[arg(long, default_value = DEFAULT_WEIGHTS_OUTPUT)]
    weights_output: PathBuf,
    /// Best fitness log, one line per generation
    #[arg(long, default_value = DEFAULT_PROGRESS_OUTPUT)]
    progress_output: PathBuf,
    /// Model JSON output path (stdout if omitted)
    #[arg(long)]
    model_output: Option<PathBuf>,
    /// Name recorded in the model file
    #[arg(long, default_value = "evotris")]
    model_name: String,
}

impl Default for TrainArg {
    fn default() -> Self {
        Self {
            config: None,
            population_size: None,
            elite_count: None,
            episodes: None,
            generations: None,
            step_limit: None,
            mutation_chance: None,
            mutation_scale: None,
            initial_weight_scale: None,
            seed: None,
            weights_output: PathBuf::from(DEFAULT_WEIGHTS_OUTPUT),
            progress_output: PathBuf::from(DEFAULT_PROGRESS_OUTPUT),
            model_output: None,
            model_name: "evotris".to_owned(),
        }
    }
}

impl TrainArg {
    fn build_config(&self) -> anyhow::Result<TrainingConfig> {
        let mut config = match &self.config {
            Some(path) => output::read_json_file::<TrainingConfig, _>("training config", path)?,
            None => TrainingConfig::default(),
        };

        let overrides = [
            (&mut config.population_size, self.population_size),
            (&mut config.elite_count, self.elite_count),
            (&mut config.episodes_per_specimen, self.episodes),
            (&mut config.generations, self.generations),
            (&mut config.step_limit, self.step_limit),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }
        let overrides = [
            (&mut config.mutation_chance, self.mutation_chance),
            (&mut config.mutation_scale, self.mutation_scale),
            (&mut config.initial_weight_scale, self.initial_weight_scale),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }

        Ok(config)
    }
}

/// Persists the best specimen of every generation.
///
/// Write failures are logged and skipped so that training goes on.
#[derive(Debug)]
struct TrainProgress {
    generations: usize,
    weights_path: PathBuf,
    progress_log: LineLog,
}

impl TrainProgress {
    fn create(
        generations: usize,
        weights_path: &Path,
        progress_path: &Path,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            generations,
            weights_path: weights_path.to_owned(),
            progress_log: LineLog::create(progress_path)?,
        })
    }
}

impl GenerationObserver for TrainProgress {
    fn on_generation(&mut self, report: &GenerationReport) {
        log::info!(
            "generation {}/{}: best {}    scale {}",
            report.generation,
            self.generations,
            report.best_fitness,
            report.mutation_scale,
        );

        let best = LinearEvaluator::from_weights(report.best_weights);
        if let Err(err) = best.save_weights(&self.weights_path) {
            log::warn!(
                "Failed to save weights to {}: {err}",
                self.weights_path.display()
            );
        }
        if let Err(err) = self.progress_log.append(report.best_fitness) {
            log::warn!(
                "Failed to append to {}: {err}",
                self.progress_log.path().display()
            );
        }
    }
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let config = arg.build_config()?;
    let seed = arg.seed.unwrap_or_else(rand::random);
    log::info!(
        "training with seed {seed}: population {}, elites {}, episodes {}, generations {}, step limit {}",
        config.population_size,
        config.elite_count,
        config.episodes_per_specimen,
        config.generations,
        config.step_limit,
    );

    let mut trainer =
        Trainer::new(config.clone(), seed).context("Invalid training configuration")?;
    let mut progress =
        TrainProgress::create(config.generations, &arg.weights_output, &arg.progress_output)?;
    let last = trainer
        .run(&mut progress)
        .context("Training finished without running a generation")?;

    eprintln!("Best Specimens:");
    let population = trainer.population();
    for (i, specimen) in population.specimens().iter().take(5).enumerate() {
        let fitness = specimen
            .fitness()
            .map_or_else(|| "unscored".to_owned(), |f| format!("{f:.1}"));
        eprintln!("  {i:2}: {:.3?} => {fitness}", specimen.evaluator().weights());
    }
    eprintln!(
        "  Last generation: max {:.1}, mean {:.1}, std dev {:.1}",
        last.summary.max, last.summary.mean, last.summary.std_dev
    );
    eprintln!("Training completed after {} generations.", last.generation);

    let model = TrainedModel {
        name: arg.model_name.clone(),
        trained_at: Utc::now(),
        seed,
        generations: last.generation,
        final_fitness: last.best_fitness,
        weights: TrainedModel::weights_by_feature(&last.best_weights),
    };
    output::save_json(&model, arg.model_output.as_deref())?;

    eprintln!();
    eprintln!("Model saved successfully");
    if let Some(path) = &arg.model_output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Name: {}", model.name);
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!("  Final fitness: {:.3}", model.final_fitness);
    eprintln!("  Weights: {}", arg.weights_output.display());
    eprintln!("  Progress log: {}", arg.progress_output.display());

    Ok(())
}
