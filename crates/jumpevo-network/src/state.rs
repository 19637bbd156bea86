use serde::{Deserialize, Serialize};

use crate::{RandomSource, StateCorruption, Topology};

/// Flattened, order-preserving form of a [`Network`](crate::Network).
///
/// `neurons` holds the neuron count of each layer, input layer first. `weights`
/// concatenates every neuron's incoming weights in layer-then-neuron-then-weight
/// order. This is the unit the evolution engine stores in genomes, breeds, and
/// persists; cloning it yields fully independent weight storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkState {
    pub neurons: Vec<usize>,
    pub weights: Vec<f64>,
}

impl NetworkState {
    /// Number of weights the recorded neuron counts call for, or `None` if it
    /// does not fit in `usize`.
    ///
    /// # Examples
    ///
    /// ```
    /// use jumpevo_network::NetworkState;
    ///
    /// let state = NetworkState { neurons: vec![2, 3, 1], weights: vec![] };
    /// assert_eq!(state.expected_weight_count(), Some(2 * 3 + 3 * 1));
    ///
    /// let huge = NetworkState { neurons: vec![1 << 40, 1 << 40], weights: vec![] };
    /// assert_eq!(huge.expected_weight_count(), None);
    /// ```
    #[must_use]
    pub fn expected_weight_count(&self) -> Option<usize> {
        weight_count(&self.neurons)
    }

    /// Checks that the state can be rebuilt into a network without filling gaps.
    pub fn validate(&self) -> Result<(), StateCorruption> {
        self.validate_layers()?;
        let expected = self
            .expected_weight_count()
            .ok_or(StateCorruption::WeightCountOverflow)?;
        if self.weights.len() != expected {
            return Err(StateCorruption::WeightCount {
                expected,
                actual: self.weights.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn validate_layers(&self) -> Result<(), StateCorruption> {
        if self.neurons.len() < 2 {
            return Err(StateCorruption::TooFewLayers {
                layers: self.neurons.len(),
            });
        }
        if let Some(layer) = self.neurons.iter().position(|&count| count == 0) {
            return Err(StateCorruption::EmptyLayer { layer });
        }
        Ok(())
    }

    /// Whether `other` has the same layer sizes and weight count, i.e. the two
    /// states can be crossed over weight by weight.
    #[must_use]
    pub fn is_compatible_with(&self, other: &Self) -> bool {
        self.neurons == other.neurons && self.weights.len() == other.weights.len()
    }

    /// Whether the state was built for `topology`.
    #[must_use]
    pub fn matches_topology(&self, topology: &Topology) -> bool {
        self.neurons.iter().copied().eq(topology.layer_sizes())
    }

    /// Overwrites every weight with a fresh `random_clamped()` value, keeping the
    /// layer layout.
    pub fn randomize_weights<R>(&mut self, rng: &mut R)
    where
        R: RandomSource + ?Sized,
    {
        for weight in &mut self.weights {
            *weight = rng.random_clamped();
        }
    }
}

/// Sum of the products of adjacent layer sizes, checked for overflow.
pub(crate) fn weight_count(sizes: &[usize]) -> Option<usize> {
    sizes
        .windows(2)
        .try_fold(0_usize, |total, pair| total.checked_add(pair[0].checked_mul(pair[1])?))
}
