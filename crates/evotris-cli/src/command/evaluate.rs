use std::{fs::File, io::BufReader, iter, path::PathBuf};

use anyhow::Context as _;
use evotris_evaluator::{
    board_feature::{BoardFeature, FEATURE_COUNT},
    episode_runner::{DEFAULT_STEP_LIMIT, EpisodeRunner, EpisodeStats},
    linear_evaluator::LinearEvaluator,
    turn_evaluator::TurnEvaluator,
};
use evotris_training::summary::FitnessSummary;
use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{model::TrainedModel, output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Weights file written by `train`
    #[arg(long, required_unless_present = "model", conflicts_with = "model")]
    weights: Option<PathBuf>,
    /// Model JSON file written by `train`
    #[arg(long)]
    model: Option<PathBuf>,
    /// Number of episodes to play
    #[arg(long, default_value_t = 20)]
    episodes: usize,
    /// Maximum shapes dropped per episode
    #[arg(long, default_value_t = DEFAULT_STEP_LIMIT)]
    step_limit: usize,
    /// Seed for the shape sequence; a random seed is used if omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Report JSON output path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct EvaluationReport {
    seed: u64,
    episodes: usize,
    step_limit: usize,
    weights: [f32; FEATURE_COUNT],
    fitness: f32,
    points: FitnessSummary,
    steps: FitnessSummary,
    losses: usize,
    /// Number of drops by rows cleared, `0..=4`.
    line_clears: [usize; 5],
}

impl EvaluateArg {
    fn load_evaluator(&self) -> anyhow::Result<LinearEvaluator> {
        match (&self.weights, &self.model) {
            (Some(path), _) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open weights file: {}", path.display()))?;
                LinearEvaluator::read_weights(BufReader::new(file))
                    .with_context(|| format!("Failed to read weights file: {}", path.display()))
            }
            (None, Some(path)) => TrainedModel::open(path)?.to_evaluator(),
            (None, None) => anyhow::bail!("Either --weights or --model is required"),
        }
    }
}

#[expect(clippy::cast_precision_loss)]
fn summarize(episodes: &[EpisodeStats], value: impl Fn(&EpisodeStats) -> usize) -> FitnessSummary {
    FitnessSummary::new(episodes.iter().map(|e| value(e) as f32))
        .expect("at least one episode is played")
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    anyhow::ensure!(arg.episodes > 0, "--episodes must be at least 1");
    anyhow::ensure!(arg.step_limit > 0, "--step-limit must be at least 1");

    let evaluator = arg.load_evaluator()?;
    let seed = arg.seed.unwrap_or_else(rand::random);
    log::info!(
        "playing {} episodes of up to {} steps with seed {seed}",
        arg.episodes,
        arg.step_limit
    );

    let runner = EpisodeRunner::new(arg.step_limit);
    let mut rng = Pcg32::seed_from_u64(seed);
    let episodes = runner.play_episodes(&TurnEvaluator::new(&evaluator), arg.episodes, &mut rng);

    let mut line_clears = [0; 5];
    for stats in &episodes {
        for (total, count) in iter::zip(&mut line_clears, stats.line_clears()) {
            *total += count;
        }
    }
    let points = summarize(&episodes, EpisodeStats::points);
    let report = EvaluationReport {
        seed,
        episodes: arg.episodes,
        step_limit: arg.step_limit,
        weights: *evaluator.weights(),
        fitness: points.mean,
        points,
        steps: summarize(&episodes, EpisodeStats::steps),
        losses: episodes.iter().filter(|e| e.is_lost()).count(),
        line_clears,
    };

    eprintln!("Weights:");
    for (feature, weight) in iter::zip(BoardFeature::ALL, evaluator.weights()) {
        eprintln!("  {:<22} {weight:>8.3}", feature.name());
    }
    eprintln!("Points:");
    eprintln!("  Min:     {:.1}", report.points.min);
    eprintln!("  Max:     {:.1}", report.points.max);
    eprintln!("  Mean:    {:.1}", report.points.mean);
    eprintln!("  Median:  {:.1}", report.points.median);
    eprintln!("  Std dev: {:.1}", report.points.std_dev);
    eprintln!("Steps:");
    eprintln!("  Mean:    {:.1}", report.steps.mean);
    eprintln!("  Losses:  {}/{}", report.losses, report.episodes);
    eprintln!("Line clears:");
    for (rows, count) in report.line_clears.iter().enumerate().skip(1) {
        eprintln!("  {rows} rows:  {count}");
    }

    output::save_json(&report, arg.output.as_deref())?;
    Ok(())
}
