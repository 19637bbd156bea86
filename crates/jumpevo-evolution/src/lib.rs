//! Neuroevolution engine for fixed-topology jump controllers.
//!
//! The engine evolves a population of [`Network`](jumpevo_network::Network)s from
//! nothing but one fitness score per network. A simulation drives it through the
//! [`Evolution`] controller:
//!
//! 1. [`Evolution::next_generation`] issues `population` networks
//! 2. the simulation runs each network and reports its score with
//!    [`Evolution::add_with_score`]
//! 3. once every network is scored, the next call breeds a new population from the
//!    ranked [`Generation`] through elitism, random reintroduction, crossover, and
//!    mutation
//!
//! Past generations live in [`Generations`], which applies the retention policy of
//! [`Options`] after every transition. [`EvolutionSnapshot`] captures the options and
//! the history for saving and resuming a run.
//!
//! All randomness comes from the controller's own generator, so a run seeded with
//! [`Evolution::with_seed`] is reproducible.

pub use self::{
    evolution::*,
    generation::{Generation, breed, random_population},
    genome::*,
    history::*,
    options::*,
};

use jumpevo_network::{NetworkError, NetworkId};

mod evolution;
mod generation;
mod genome;
mod history;
mod options;

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum EvolutionError {
    #[display("{_0}")]
    #[from]
    Network(NetworkError),
    #[display("invalid options: {_0}")]
    #[from]
    InvalidOptions(OptionsError),
    #[display("network was not issued by the latest generation")]
    UnknownNetwork { id: Option<NetworkId> },
    #[display("network {id} was already scored")]
    AlreadyScored { id: NetworkId },
    #[display("stored networks do not share one topology")]
    MixedTopologies,
}

#[cfg(test)]
mod testing {
    use jumpevo_network::RandomSource;

    /// Replays fixed value cycles instead of drawing random numbers.
    #[derive(Debug)]
    pub(crate) struct Scripted {
        unit: Vec<f64>,
        clamped: Vec<f64>,
        unit_pos: usize,
        clamped_pos: usize,
    }

    impl Scripted {
        pub(crate) fn new(unit: &[f64], clamped: &[f64]) -> Self {
            Self {
                unit: unit.to_vec(),
                clamped: clamped.to_vec(),
                unit_pos: 0,
                clamped_pos: 0,
            }
        }
    }

    impl RandomSource for Scripted {
        fn random_clamped(&mut self) -> f64 {
            let value = self.clamped[self.clamped_pos % self.clamped.len()];
            self.clamped_pos += 1;
            value
        }

        fn random_unit(&mut self) -> f64 {
            let value = self.unit[self.unit_pos % self.unit.len()];
            self.unit_pos += 1;
            value
        }
    }
}
