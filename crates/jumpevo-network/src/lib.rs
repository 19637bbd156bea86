//! Fixed-topology feed-forward networks for the jump controller.
//!
//! This crate provides the phenotype side of the neuroevolution engine: a layered,
//! fully-connected network that maps an observation vector to an action vector, and
//! the flat [`NetworkState`] representation that the evolution engine stores, breeds,
//! and persists.
//!
//! # Key Components
//!
//! - [`Topology`] - Layer sizes `(inputs, hidden[], outputs)` of a network
//! - [`Network`] - Live network with per-neuron activation values
//! - [`NetworkState`] - Flattened neuron counts plus concatenated weights
//! - [`Activation`] - Activation applied to every non-input neuron
//! - [`RandomSource`] - Uniform randomness used to initialize weights
//!
//! # Weight Layout
//!
//! Weights are stored layer-then-neuron-then-weight. Neuron `j` of layer `i` owns one
//! weight per neuron of layer `i - 1`; input-layer neurons own none. For the default
//! topology `(2, [2], 1)` this gives `2 * 2 + 2 * 1 = 6` weights.
//!
//! # Example
//!
//! ```
//! use jumpevo_network::{Activation, Network, Topology};
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//!
//! let mut rng = Pcg32::seed_from_u64(7);
//! let topology = Topology::new(2, [3], 1);
//! let mut network = Network::build(&topology, Activation::Sigmoid, &mut rng).unwrap();
//!
//! let output = network.compute(&[0.25, -1.0]).unwrap();
//! assert_eq!(output.len(), 1);
//!
//! // The flat state rebuilds an identical network.
//! let mut restored = Network::from_state(&network.to_state(), Activation::Sigmoid).unwrap();
//! assert_eq!(restored.compute(&[0.25, -1.0]).unwrap(), output);
//! ```

pub use self::{activation::*, network::*, random::*, state::*, topology::*};

mod activation;
mod network;
mod random;
mod state;
mod topology;

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum NetworkError {
    #[display("layer {layer} of the topology has no neurons")]
    InvalidTopology { layer: usize },
    #[display("topology needs more weights than can be addressed")]
    TopologyTooLarge,
    #[display("expected {expected} inputs, got {actual}")]
    InputSizeMismatch { expected: usize, actual: usize },
    #[display("corrupt network state: {_0}")]
    #[from]
    CorruptNetworkState(StateCorruption),
}

/// Reason a [`NetworkState`] cannot be turned back into a [`Network`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum StateCorruption {
    #[display("state describes {layers} layer(s), at least 2 are required")]
    TooFewLayers { layers: usize },
    #[display("layer {layer} has no neurons")]
    EmptyLayer { layer: usize },
    #[display("neuron counts require {expected} weights, found {actual}")]
    WeightCount { expected: usize, actual: usize },
    #[display("neuron counts require more weights than can be addressed")]
    WeightCountOverflow,
}
