use std::collections::HashSet;

use jumpevo_network::{Network, NetworkId, NetworkState, RandomSource};
use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{EvolutionError, Generations, Genome, Options};

/// Everything needed to resume a training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionSnapshot {
    pub options: Options,
    pub generations: Generations,
}

/// Drives generation transitions for a simulation.
///
/// The simulation calls [`next_generation`](Self::next_generation) to obtain a
/// population, runs every network until its episode ends, reports each score with
/// [`add_with_score`](Self::add_with_score), and then asks for the next
/// generation.
///
/// Advancing before every issued network was scored is allowed but breeds from an
/// incomplete pool; the unscored networks are forgotten and a warning is logged.
///
/// # Examples
///
/// ```
/// use jumpevo_evolution::{Evolution, Options};
///
/// let options = Options { population: 8, ..Options::default() };
/// let mut evolution = Evolution::with_seed(options, 42).unwrap();
///
/// for _ in 0..3 {
///     let mut networks = evolution.next_generation().unwrap();
///     assert_eq!(networks.len(), 8);
///     for network in &mut networks {
///         let output = network.compute(&[0.5, 1.0]).unwrap();
///         evolution.add_with_score(network, output[0]).unwrap();
///     }
/// }
/// assert_eq!(evolution.generations().epoch(), 3);
/// ```
#[derive(Debug)]
pub struct Evolution<R = Pcg32> {
    options: Options,
    generations: Generations,
    rng: R,
    pending: HashSet<NetworkId>,
    issued_from: u64,
    next_id: u64,
}

impl Evolution<Pcg32> {
    /// Creates a controller with a randomly seeded generator.
    pub fn new(options: Options) -> Result<Self, EvolutionError> {
        Self::with_rng(options, Pcg32::from_rng(&mut rand::rng()))
    }

    /// Creates a controller whose whole run is reproducible from `seed`.
    pub fn with_seed(options: Options, seed: u64) -> Result<Self, EvolutionError> {
        Self::with_rng(options, Pcg32::seed_from_u64(seed))
    }
}

impl<R> Evolution<R>
where
    R: RandomSource,
{
    pub fn with_rng(options: Options, rng: R) -> Result<Self, EvolutionError> {
        options.validate()?;
        Ok(Self {
            options,
            generations: Generations::new(),
            rng,
            pending: HashSet::new(),
            issued_from: 0,
            next_id: 0,
        })
    }

    /// Resumes a run from a snapshot.
    ///
    /// The options and every stored network are validated before the controller
    /// is built. Nothing is issued yet; call [`next_generation`](Self::next_generation)
    /// to breed from the snapshot's current generation.
    pub fn restore(snapshot: EvolutionSnapshot, rng: R) -> Result<Self, EvolutionError> {
        let EvolutionSnapshot {
            options,
            generations,
        } = snapshot;
        for state in generations
            .generations()
            .iter()
            .flat_map(|g| g.genomes())
            .filter_map(|g| g.network.as_ref())
        {
            state
                .validate()
                .map_err(jumpevo_network::NetworkError::from)?;
        }
        let mut this = Self::with_rng(options, rng)?;
        this.generations = generations;
        Ok(this)
    }

    #[must_use]
    pub fn snapshot(&self) -> EvolutionSnapshot {
        EvolutionSnapshot {
            options: self.options.clone(),
            generations: self.generations.clone(),
        }
    }

    /// Issues the next population.
    ///
    /// The first call (and the first call after [`reset`](Self::reset)) returns
    /// random networks; later calls breed from the current generation. The result
    /// always holds exactly `options.population` freshly built networks.
    pub fn next_generation(&mut self) -> Result<Vec<Network>, EvolutionError> {
        if !self.pending.is_empty() {
            warn!(
                unscored = self.pending.len(),
                "advancing before every network was scored"
            );
        }
        let previous = self.generations.current().and_then(|g| {
            let summary = g.summary()?;
            Some((g.len(), summary))
        });

        let states = self
            .generations
            .next_generation(&self.options, &mut self.rng)?;
        let networks = self.issue(&states)?;

        match previous {
            Some((genomes, summary)) => info!(
                generation = self.generations.epoch(),
                genomes,
                best = summary.max,
                mean = summary.mean,
                "bred next generation"
            ),
            None => info!(
                generation = self.generations.epoch(),
                population = networks.len(),
                "started random population"
            ),
        }
        Ok(networks)
    }

    fn issue(&mut self, states: &[NetworkState]) -> Result<Vec<Network>, EvolutionError> {
        let activation = self.options.activation;
        let networks = states
            .iter()
            .map(|state| Network::restore(state, activation, &mut self.rng))
            .collect::<Result<Vec<_>, _>>()?;

        self.pending.clear();
        self.issued_from = self.next_id;
        let networks = networks
            .into_iter()
            .map(|network| {
                let id = NetworkId(self.next_id);
                self.next_id += 1;
                self.pending.insert(id);
                network.with_id(id)
            })
            .collect();
        Ok(networks)
    }

    /// Records the score of a network issued by the latest
    /// [`next_generation`](Self::next_generation) call.
    ///
    /// # Errors
    ///
    /// - [`EvolutionError::UnknownNetwork`] if the network was not issued by the
    ///   latest call
    /// - [`EvolutionError::AlreadyScored`] if its score was already recorded
    pub fn add_with_score(&mut self, network: &Network, score: f64) -> Result<(), EvolutionError> {
        let id = network.id().ok_or(EvolutionError::UnknownNetwork { id: None })?;
        if !self.pending.remove(&id) {
            if (self.issued_from..self.next_id).contains(&id.0) {
                return Err(EvolutionError::AlreadyScored { id });
            }
            return Err(EvolutionError::UnknownNetwork { id: Some(id) });
        }
        self.generations
            .add_genome(Genome::new(score, network.to_state()));
        Ok(())
    }

    /// Forgets the whole history; the next call to
    /// [`next_generation`](Self::next_generation) starts from random networks.
    pub fn reset(&mut self) {
        self.generations.clear();
        self.pending.clear();
        self.issued_from = self.next_id;
    }

    /// Number of issued networks whose score was not reported yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    #[must_use]
    pub fn generations(&self) -> &Generations {
        &self.generations
    }
}
