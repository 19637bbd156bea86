use std::path::PathBuf;

use anyhow::{Context as _, bail};
use chrono::Utc;
use jumpevo_course::{Course, CourseConfig, CourseSeed};
use jumpevo_evolution::{Evolution, Options};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use tracing::info;

use crate::{
    record::{self, TrainingRecord},
    util,
};

const DEFAULT_GENERATIONS: usize = 50;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// JSON file with evolution options; missing fields take their defaults
    #[arg(long)]
    options: Option<PathBuf>,
    /// Training record to continue; its stored options are used as-is
    #[arg(long, conflicts_with = "options")]
    resume: Option<PathBuf>,
    /// Number of generations to score
    #[arg(long, default_value_t = DEFAULT_GENERATIONS)]
    generations: usize,
    /// Networks per generation (fresh runs only)
    #[arg(long)]
    population: Option<usize>,
    /// Seed for breeding and course layouts
    #[arg(long)]
    seed: Option<u64>,
    /// Episode length cap in ticks
    #[arg(long)]
    max_ticks: Option<u64>,
    /// Stop once a generation's best network survives this many ticks
    #[arg(long)]
    target: Option<u64>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let mut master = match arg.seed {
        Some(seed) => Pcg32::seed_from_u64(seed),
        None => Pcg32::from_rng(&mut rand::rng()),
    };
    let evolution_rng = Pcg32::from_rng(&mut master);

    let (mut evolution, mut course, generations_before) = match &arg.resume {
        Some(path) => {
            if arg.population.is_some() {
                bail!("--population cannot be changed when resuming a run");
            }
            let record = TrainingRecord::open(path)?;
            info!(
                path = %path.display(),
                generations_run = record.generations_run,
                "resuming training record"
            );
            let evolution = Evolution::restore(record.snapshot, evolution_rng)
                .with_context(|| format!("Failed to restore training record: {}", path.display()))?;
            (evolution, record.course, record.generations_run)
        }
        None => {
            let mut options = match &arg.options {
                Some(path) => util::read_json_file::<Options, _>("options", path)?,
                None => Options::default(),
            };
            if let Some(population) = arg.population {
                options.population = population;
            }
            let evolution = Evolution::with_rng(options, evolution_rng)
                .context("Invalid evolution options")?;
            (evolution, CourseConfig::default(), 0)
        }
    };
    if let Some(max_ticks) = arg.max_ticks {
        course.max_ticks = max_ticks;
    }

    let topology = &evolution.options().topology;
    record::ensure_pilot_shape(topology.inputs, topology.outputs)?;
    info!(
        population = evolution.options().population,
        generations = arg.generations,
        seed = ?arg.seed,
        max_ticks = course.max_ticks,
        "starting training run"
    );

    let mut generations_run = generations_before;
    for _ in 0..arg.generations {
        let mut networks = evolution.next_generation()?;
        let seed: CourseSeed = master.random();
        let outcomes = Course::with_seed(course.clone(), seed).run_episode(&mut networks);
        for (network, outcome) in networks.iter().zip(&outcomes) {
            #[expect(clippy::cast_precision_loss)]
            let score = outcome.ticks as f64;
            evolution.add_with_score(network, score)?;
        }
        generations_run += 1;

        let finished = outcomes.iter().filter(|o| o.finished).count();
        let most_pipes = outcomes.iter().map(|o| o.pipes_passed).max().unwrap_or(0);
        let Some(summary) = evolution.generations().current().and_then(|g| g.summary()) else {
            continue;
        };
        eprintln!(
            "Generation #{generations_run}: best {:.0} / mean {:.1} / median {:.1} ticks, \
             {most_pipes} pipe(s), {finished}/{} reached the cap",
            summary.max,
            summary.mean,
            summary.median,
            outcomes.len(),
        );

        if let Some(target) = arg.target {
            #[expect(clippy::cast_precision_loss)]
            let target_score = target as f64;
            if summary.max >= target_score {
                eprintln!("Target of {target} ticks reached");
                break;
            }
        }
    }

    if let Some(trend) = evolution.generations().trend() {
        eprintln!();
        eprintln!(
            "Best score {:.0} (generation #{}), {} generation(s) without improvement",
            trend.best,
            evolution.generations().first_epoch() + trend.best_generation,
            trend.stagnant_for
        );
    }

    let record = TrainingRecord {
        trained_at: Utc::now(),
        generations_run,
        course,
        snapshot: evolution.snapshot(),
    };
    util::write_json(&record, arg.output.as_deref())?;
    info!(
        generations_run = record.generations_run,
        retained = record.snapshot.generations.len(),
        "training record saved"
    );

    eprintln!();
    eprintln!("Training record saved successfully");
    if let Some(path) = &arg.output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Trained at: {}", record.trained_at);
    eprintln!("  Generations: {}", record.generations_run);
    eprintln!(
        "  Retained generations: {}",
        record.snapshot.generations.len()
    );

    Ok(())
}
