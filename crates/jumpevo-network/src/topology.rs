use std::iter;

use serde::{Deserialize, Serialize};

use crate::{NetworkError, state};

/// Layer sizes of a feed-forward network.
///
/// A topology always has an input and an output layer, with any number of hidden
/// layers between them. Every layer must have at least one neuron.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    pub inputs: usize,
    pub hidden: Vec<usize>,
    pub outputs: usize,
}

impl Default for Topology {
    /// Two observations, one hidden layer of two neurons, one jump output.
    fn default() -> Self {
        Self::new(2, [2], 1)
    }
}

impl Topology {
    #[must_use]
    pub fn new<H>(inputs: usize, hidden: H, outputs: usize) -> Self
    where
        H: Into<Vec<usize>>,
    {
        Self {
            inputs,
            hidden: hidden.into(),
            outputs,
        }
    }

    /// Iterates layer sizes from the input layer to the output layer.
    pub fn layer_sizes(&self) -> impl Iterator<Item = usize> + '_ {
        iter::once(self.inputs)
            .chain(self.hidden.iter().copied())
            .chain(iter::once(self.outputs))
    }

    /// Number of layers, input and output included.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.hidden.len() + 2
    }

    /// Total number of weights a network of this topology carries, or `None` if
    /// it does not fit in `usize`.
    ///
    /// # Examples
    ///
    /// ```
    /// use jumpevo_network::Topology;
    ///
    /// assert_eq!(Topology::new(2, [2], 1).weight_count(), Some(6));
    /// assert_eq!(Topology::new(3, [4, 2], 1).weight_count(), Some(3 * 4 + 4 * 2 + 2));
    /// assert_eq!(Topology::new(usize::MAX, [2], 1).weight_count(), None);
    /// ```
    #[must_use]
    pub fn weight_count(&self) -> Option<usize> {
        state::weight_count(&self.layer_sizes().collect::<Vec<_>>())
    }

    pub fn validate(&self) -> Result<(), NetworkError> {
        if let Some(layer) = self.layer_sizes().position(|size| size == 0) {
            return Err(NetworkError::InvalidTopology { layer });
        }
        if self.weight_count().is_none() {
            return Err(NetworkError::TopologyTooLarge);
        }
        Ok(())
    }
}
