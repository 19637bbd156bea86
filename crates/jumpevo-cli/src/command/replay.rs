use std::path::PathBuf;

use jumpevo_course::{Course, CourseSeed};
use rand::Rng as _;
use tracing::info;

use crate::record::TrainingRecord;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ReplayArg {
    /// Training record written by `train`
    #[arg(long)]
    record: PathBuf,
    /// Course layout seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Episode length cap in ticks
    #[arg(long)]
    max_ticks: Option<u64>,
}

pub(crate) fn run(arg: &ReplayArg) -> anyhow::Result<()> {
    let record = TrainingRecord::open(&arg.record)?;
    let (generation, genome, network) = record.champion_network()?;

    let mut course = record.course.clone();
    if let Some(max_ticks) = arg.max_ticks {
        course.max_ticks = max_ticks;
    }
    let seed = arg
        .seed
        .map_or_else(|| rand::rng().random(), CourseSeed::from_u64);

    info!(generation, %seed, max_ticks = course.max_ticks, "replaying champion");
    let outcomes = Course::with_seed(course, seed).run_episode(&mut [network]);
    let Some(outcome) = outcomes.first() else {
        anyhow::bail!("Course returned no outcome");
    };

    eprintln!(
        "Champion of generation #{generation} (trained score {:.0})",
        genome.score
    );
    eprintln!("  Course seed: {seed}");
    eprintln!("  Ticks survived: {}", outcome.ticks);
    eprintln!("  Pipes passed: {}", outcome.pipes_passed);
    eprintln!(
        "  Result: {}",
        if outcome.finished {
            "reached the tick cap"
        } else {
            "crashed"
        }
    );

    Ok(())
}
