use crate::{Activation, NetworkError, NetworkState, RandomSource, StateCorruption, Topology};

/// Identity stamped on a network when the evolution controller issues it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("#{_0}")]
pub struct NetworkId(pub u64);

/// A single neuron: its last activation value and one weight per neuron of the
/// previous layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Neuron {
    value: f64,
    weights: Vec<f64>,
}

impl Neuron {
    fn new(weights: Vec<f64>) -> Self {
        Self {
            value: 0.0,
            weights,
        }
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    index: usize,
    neurons: Vec<Neuron>,
}

impl Layer {
    /// Builds a layer of `size` neurons, each with `inputs` weights drawn from `next_weight`.
    fn from_fn<F>(index: usize, size: usize, inputs: usize, mut next_weight: F) -> Self
    where
        F: FnMut() -> f64,
    {
        let neurons = (0..size)
            .map(|_| Neuron::new((0..inputs).map(|_| next_weight()).collect()))
            .collect();
        Self { index, neurons }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.neurons.iter().map(|n| n.value)
    }
}

/// A fully-connected feed-forward network.
///
/// Layer 0 is the input layer; its neurons carry no weights and take their values
/// straight from the input vector. Every later neuron computes the weighted sum of
/// the previous layer's values and passes it through the network's [`Activation`].
///
/// Weights never change after construction. [`Network::compute`] only rewrites the
/// transient neuron values, so the output depends on nothing but the weights and
/// the input.
#[derive(Debug, Clone)]
pub struct Network {
    id: Option<NetworkId>,
    layers: Vec<Layer>,
    activation: Activation,
}

impl Network {
    /// Builds a network for `topology` with every weight drawn from `random_clamped()`.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidTopology`] if any layer has zero neurons, and
    /// [`NetworkError::TopologyTooLarge`] if its weight count overflows `usize`.
    pub fn build<R>(
        topology: &Topology,
        activation: Activation,
        rng: &mut R,
    ) -> Result<Self, NetworkError>
    where
        R: RandomSource + ?Sized,
    {
        topology.validate()?;
        let mut layers = Vec::with_capacity(topology.layer_count());
        let mut previous = 0;
        for (index, size) in topology.layer_sizes().enumerate() {
            layers.push(Layer::from_fn(index, size, previous, || {
                rng.random_clamped()
            }));
            previous = size;
        }
        Ok(Self {
            id: None,
            layers,
            activation,
        })
    }

    /// Rebuilds a network from its flat state.
    ///
    /// The state must be internally consistent: at least two non-empty layers and
    /// exactly as many weights as the neuron counts require.
    pub fn from_state(state: &NetworkState, activation: Activation) -> Result<Self, NetworkError> {
        state.validate()?;
        let mut weights = state.weights.iter().copied();
        Ok(Self::assemble(state, activation, || {
            weights.next().unwrap_or_default()
        }))
    }

    /// Rebuilds a network from a state that may be missing trailing weights.
    ///
    /// Weights the state provides are used as-is in flat index order; any that are
    /// missing at the end are drawn from `random_clamped()`. This lets a population
    /// saved with fewer weights be resumed after neurons were appended to a layer.
    ///
    /// # Errors
    ///
    /// Fails with [`NetworkError::CorruptNetworkState`] if the state has fewer than
    /// two layers, an empty layer, or more weights than its neuron counts allow.
    ///
    /// # Examples
    ///
    /// ```
    /// use jumpevo_network::{Activation, Network, NetworkState};
    /// use rand::SeedableRng as _;
    /// use rand_pcg::Pcg32;
    ///
    /// let mut rng = Pcg32::seed_from_u64(0);
    /// let partial = NetworkState { neurons: vec![2, 2, 1], weights: vec![0.1, 0.2, 0.3] };
    /// let network = Network::restore(&partial, Activation::Sigmoid, &mut rng).unwrap();
    ///
    /// let state = network.to_state();
    /// assert_eq!(state.weights.len(), 6);
    /// assert_eq!(&state.weights[..3], &[0.1, 0.2, 0.3]);
    /// ```
    pub fn restore<R>(
        state: &NetworkState,
        activation: Activation,
        rng: &mut R,
    ) -> Result<Self, NetworkError>
    where
        R: RandomSource + ?Sized,
    {
        state.validate_layers()?;
        let expected = state
            .expected_weight_count()
            .ok_or(StateCorruption::WeightCountOverflow)?;
        if state.weights.len() > expected {
            return Err(StateCorruption::WeightCount {
                expected,
                actual: state.weights.len(),
            }
            .into());
        }
        let mut weights = state.weights.iter().copied();
        Ok(Self::assemble(state, activation, || {
            weights.next().unwrap_or_else(|| rng.random_clamped())
        }))
    }

    fn assemble<F>(state: &NetworkState, activation: Activation, mut next_weight: F) -> Self
    where
        F: FnMut() -> f64,
    {
        let mut previous = 0;
        let layers = state
            .neurons
            .iter()
            .enumerate()
            .map(|(index, &size)| {
                let layer = Layer::from_fn(index, size, previous, &mut next_weight);
                previous = size;
                layer
            })
            .collect();
        Self {
            id: None,
            layers,
            activation,
        }
    }

    /// Flattens the network into neuron counts and concatenated weights.
    #[must_use]
    pub fn to_state(&self) -> NetworkState {
        let neurons = self.layers.iter().map(Layer::len).collect();
        let weights = self
            .layers
            .iter()
            .flat_map(|layer| &layer.neurons)
            .flat_map(|neuron| neuron.weights.iter().copied())
            .collect();
        NetworkState { neurons, weights }
    }

    /// Runs a forward pass and returns the output layer's values in neuron order.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InputSizeMismatch`] if `inputs` does not have one
    /// value per input neuron. The network is left untouched in that case.
    pub fn compute(&mut self, inputs: &[f64]) -> Result<Vec<f64>, NetworkError> {
        let expected = self.input_count();
        if inputs.len() != expected {
            return Err(NetworkError::InputSizeMismatch {
                expected,
                actual: inputs.len(),
            });
        }

        for (neuron, &input) in self.layers[0].neurons.iter_mut().zip(inputs) {
            neuron.value = input;
        }
        for i in 1..self.layers.len() {
            let (done, rest) = self.layers.split_at_mut(i);
            let previous = &done[i - 1];
            for neuron in &mut rest[0].neurons {
                let sum: f64 = previous
                    .values()
                    .zip(&neuron.weights)
                    .map(|(value, weight)| value * weight)
                    .sum();
                neuron.value = self.activation.apply(sum);
            }
        }

        Ok(self.outputs().collect())
    }

    /// Values of the output layer from the last [`compute`](Self::compute) call.
    pub fn outputs(&self) -> impl Iterator<Item = f64> + '_ {
        self.layers.last().into_iter().flat_map(Layer::values)
    }

    #[must_use]
    pub fn id(&self) -> Option<NetworkId> {
        self.id
    }

    #[must_use]
    pub fn with_id(mut self, id: NetworkId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[must_use]
    pub fn activation(&self) -> Activation {
        self.activation
    }

    #[must_use]
    pub fn input_count(&self) -> usize {
        self.layers.first().map_or(0, Layer::len)
    }

    #[must_use]
    pub fn output_count(&self) -> usize {
        self.layers.last().map_or(0, Layer::len)
    }
}
