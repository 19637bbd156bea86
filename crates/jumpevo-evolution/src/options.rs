use jumpevo_network::{Activation, NetworkError, Topology};
use serde::{Deserialize, Serialize};

/// Parameters of a training run.
///
/// Options are fixed for the lifetime of an [`Evolution`](crate::Evolution); they
/// are persisted alongside the history so that a saved run resumes with the same
/// parameters. Missing fields take their default when deserialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Number of networks per generation.
    pub population: usize,
    /// Fraction of the population copied unchanged from the best genomes.
    pub elitism: f64,
    /// Fraction of the population re-randomized from the best genomes' layouts.
    pub random_behaviour: f64,
    /// Per-weight probability of a mutation.
    pub mutation_rate: f64,
    /// Mutations add a value drawn uniformly from `[-mutation_range, mutation_range]`.
    pub mutation_range: f64,
    /// Per-weight probability of taking the second parent's weight.
    pub crossover: f64,
    /// Number of past generations kept besides the current one; `None` keeps all.
    pub historic: Option<usize>,
    /// Drop stored networks of every generation except the two newest.
    pub low_historic: bool,
    /// Children produced by each breeding pair.
    pub children: usize,
    pub topology: Topology,
    pub activation: Activation,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            population: 50,
            elitism: 0.2,
            random_behaviour: 0.2,
            mutation_rate: 0.1,
            mutation_range: 0.5,
            crossover: 0.5,
            historic: Some(0),
            low_historic: false,
            children: 1,
            topology: Topology::default(),
            activation: Activation::Sigmoid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum OptionsError {
    #[display("population must contain at least one network")]
    EmptyPopulation,
    #[display("{name} must be a fraction in [0, 1], got {value}")]
    FractionOutOfRange { name: &'static str, value: f64 },
    #[display("mutation range must be positive, got {value}")]
    NonPositiveMutationRange { value: f64 },
    #[display("each breeding pair must produce at least one child")]
    NoChildren,
    #[display("topology layer {layer} has no neurons")]
    EmptyLayer { layer: usize },
    #[display("topology needs more weights than can be addressed")]
    TopologyTooLarge,
}

impl Options {
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.population == 0 {
            return Err(OptionsError::EmptyPopulation);
        }
        for (name, value) in [
            ("elitism", self.elitism),
            ("random_behaviour", self.random_behaviour),
            ("mutation_rate", self.mutation_rate),
            ("crossover", self.crossover),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(OptionsError::FractionOutOfRange { name, value });
            }
        }
        if !(self.mutation_range > 0.0 && self.mutation_range.is_finite()) {
            return Err(OptionsError::NonPositiveMutationRange {
                value: self.mutation_range,
            });
        }
        if self.children == 0 {
            return Err(OptionsError::NoChildren);
        }
        match self.topology.validate() {
            Ok(()) => Ok(()),
            Err(NetworkError::InvalidTopology { layer }) => Err(OptionsError::EmptyLayer { layer }),
            Err(_) => Err(OptionsError::TopologyTooLarge),
        }
    }

    /// Number of elite slots, `elitism * population` rounded half to even.
    ///
    /// # Examples
    ///
    /// ```
    /// use jumpevo_evolution::Options;
    ///
    /// let options = Options { population: 50, elitism: 0.2, ..Options::default() };
    /// assert_eq!(options.elite_count(), 10);
    ///
    /// // 0.5 * 5 = 2.5 rounds to the even neighbour
    /// let options = Options { population: 5, elitism: 0.5, ..Options::default() };
    /// assert_eq!(options.elite_count(), 2);
    /// ```
    #[must_use]
    pub fn elite_count(&self) -> usize {
        self.fraction_of_population(self.elitism)
    }

    /// Number of re-randomized slots, `random_behaviour * population` rounded half to even.
    #[must_use]
    pub fn random_count(&self) -> usize {
        self.fraction_of_population(self.random_behaviour)
    }

    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn fraction_of_population(&self, fraction: f64) -> usize {
        (fraction * self.population as f64).round_ties_even() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let options = Options::default();
        assert_eq!(options.validate(), Ok(()));
        assert_eq!(options.elite_count(), 10);
        assert_eq!(options.random_count(), 10);
    }

    #[test]
    fn test_rounding_half_to_even() {
        let options = Options {
            population: 3,
            elitism: 0.5,
            random_behaviour: 1.0 / 6.0,
            ..Options::default()
        };
        assert_eq!(options.elite_count(), 2);
        assert_eq!(options.random_count(), 0);
    }

    #[test]
    fn test_validate_rejections() {
        let cases = [
            (
                Options {
                    population: 0,
                    ..Options::default()
                },
                OptionsError::EmptyPopulation,
            ),
            (
                Options {
                    crossover: 1.5,
                    ..Options::default()
                },
                OptionsError::FractionOutOfRange {
                    name: "crossover",
                    value: 1.5,
                },
            ),
            (
                Options {
                    mutation_range: 0.0,
                    ..Options::default()
                },
                OptionsError::NonPositiveMutationRange { value: 0.0 },
            ),
            (
                Options {
                    children: 0,
                    ..Options::default()
                },
                OptionsError::NoChildren,
            ),
            (
                Options {
                    topology: Topology::new(2, [2, 0], 1),
                    ..Options::default()
                },
                OptionsError::EmptyLayer { layer: 2 },
            ),
            (
                Options {
                    topology: Topology::new(usize::MAX, [2], 1),
                    ..Options::default()
                },
                OptionsError::TopologyTooLarge,
            ),
        ];
        for (options, expected) in cases {
            assert_eq!(options.validate(), Err(expected));
        }
    }

    #[test]
    fn test_nan_fraction_is_rejected() {
        let options = Options {
            elitism: f64::NAN,
            ..Options::default()
        };
        assert!(matches!(
            options.validate(),
            Err(OptionsError::FractionOutOfRange {
                name: "elitism",
                ..
            })
        ));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let options: Options =
            serde_json::from_str(r#"{"population": 8, "historic": null}"#).unwrap();
        assert_eq!(options.population, 8);
        assert_eq!(options.historic, None);
        assert_eq!(options.children, 1);
        assert_eq!(options.topology, Topology::default());
    }
}
