use std::path::Path;

use anyhow::{Context as _, ensure};
use chrono::{DateTime, Utc};
use jumpevo_course::CourseConfig;
use jumpevo_evolution::{EvolutionSnapshot, Genome};
use jumpevo_network::Network;
use serde::{Deserialize, Serialize};

use crate::util;

/// Observation values fed to a pilot network each tick.
const PILOT_INPUTS: usize = 2;

/// Saved result of a `train` run, resumable with `train --resume`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainingRecord {
    pub trained_at: DateTime<Utc>,
    /// Generations scored by the run that wrote this record, resumed runs included.
    pub generations_run: usize,
    #[serde(default)]
    pub course: CourseConfig,
    pub snapshot: EvolutionSnapshot,
}

impl TrainingRecord {
    pub fn open<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        util::read_json_file("training record", path)
    }

    /// Best genome of the newest generation that still stores its network.
    pub fn champion(&self) -> Option<(usize, &Genome)> {
        let generations = &self.snapshot.generations;
        let first_epoch = generations.first_epoch();
        generations
            .generations()
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, generation)| {
                generation
                    .best_with_network()
                    .map(|genome| (first_epoch + i, genome))
            })
    }

    /// Rebuilds the champion as a network that can pilot a jumper.
    pub fn champion_network(&self) -> anyhow::Result<(usize, &Genome, Network)> {
        let (generation, genome) = self.champion().context("Training record holds no network")?;
        let state = genome
            .network
            .as_ref()
            .context("Training record holds no network")?;
        let network = Network::from_state(state, self.snapshot.options.activation)
            .with_context(|| format!("Stored network of generation #{generation} is corrupt"))?;
        ensure_pilot_shape(network.input_count(), network.output_count())
            .with_context(|| format!("Stored network of generation #{generation} cannot pilot"))?;
        Ok((generation, genome, network))
    }
}

/// Fails unless a network with this many inputs and outputs can pilot a jumper.
pub fn ensure_pilot_shape(inputs: usize, outputs: usize) -> anyhow::Result<()> {
    ensure!(
        inputs == PILOT_INPUTS && outputs >= 1,
        "network topology must take {PILOT_INPUTS} inputs and produce at least 1 output, \
         got {inputs} -> {outputs}"
    );
    Ok(())
}
