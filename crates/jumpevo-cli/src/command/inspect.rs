use std::path::PathBuf;

use jumpevo_stats::{summary::Summary, trend::Trend};
use serde::Serialize;

use crate::{record::TrainingRecord, util};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct InspectArg {
    /// Training record written by `train`
    #[arg(long)]
    record: PathBuf,
    /// Write a JSON report to this file
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Report {
    generations_run: usize,
    retained: usize,
    generations: Vec<GenerationReport>,
    trend: Option<Trend>,
}

#[derive(Debug, Serialize)]
struct GenerationReport {
    generation: usize,
    stored_networks: usize,
    summary: Option<Summary>,
}

pub(crate) fn run(arg: &InspectArg) -> anyhow::Result<()> {
    let record = TrainingRecord::open(&arg.record)?;
    let history = &record.snapshot.generations;
    let first_epoch = history.first_epoch();

    let generations = history
        .generations()
        .iter()
        .enumerate()
        .map(|(i, generation)| GenerationReport {
            generation: first_epoch + i,
            stored_networks: generation
                .genomes()
                .iter()
                .filter(|g| !g.is_pruned())
                .count(),
            summary: generation.summary(),
        })
        .collect::<Vec<_>>();

    eprintln!(
        "{}: trained at {}, {} generation(s) run, {} retained",
        arg.record.display(),
        record.trained_at,
        record.generations_run,
        generations.len()
    );
    eprintln!(
        "{:>6} {:>6} {:>8} {:>10} {:>10} {:>10} {:>10}",
        "gen", "scored", "networks", "best", "mean", "median", "std dev"
    );
    for report in &generations {
        match &report.summary {
            Some(s) => eprintln!(
                "{:>6} {:>6} {:>8} {:>10.1} {:>10.1} {:>10.1} {:>10.2}",
                report.generation,
                s.count,
                report.stored_networks,
                s.max,
                s.mean,
                s.median,
                s.std_dev
            ),
            None => eprintln!("{:>6} {:>6}", report.generation, "-"),
        }
    }

    let trend = history.trend();
    if let Some(trend) = &trend {
        eprintln!();
        eprintln!(
            "Best score {:.1} first reached in generation #{}",
            trend.best,
            first_epoch + trend.best_generation
        );
        if trend.improved_last() {
            eprintln!("The newest generation set a new best");
        } else {
            eprintln!("No improvement for {} generation(s)", trend.stagnant_for);
        }
    }

    if let Some(output) = &arg.output {
        let report = Report {
            generations_run: record.generations_run,
            retained: generations.len(),
            generations,
            trend,
        };
        util::write_json(&report, Some(output))?;
        eprintln!("Report written to {}", output.display());
    }

    Ok(())
}
