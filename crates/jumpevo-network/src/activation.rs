use serde::{Deserialize, Serialize};

/// Activation function applied to the weighted input sum of every non-input neuron.
///
/// The built-in variants serialize by name. [`Activation::Custom`] carries a plain
/// function pointer so callers can plug in their own curve; it cannot be persisted
/// and must be re-attached after loading a saved configuration.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// Logistic sigmoid `1 / (1 + e^-x)`.
    #[default]
    Sigmoid,
    /// Hyperbolic tangent.
    Tanh,
    /// Rectified linear unit `max(0, x)`.
    Relu,
    /// Pass-through.
    Identity,
    #[serde(skip)]
    Custom(fn(f64) -> f64),
}

impl Activation {
    /// Applies the activation to a weighted sum.
    ///
    /// # Examples
    ///
    /// ```
    /// use jumpevo_network::Activation;
    ///
    /// assert_eq!(Activation::Sigmoid.apply(0.0), 0.5);
    /// assert_eq!(Activation::Relu.apply(-3.0), 0.0);
    /// assert_eq!(Activation::Custom(|x| 2.0 * x).apply(1.5), 3.0);
    /// ```
    #[must_use]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Sigmoid => sigmoid(x),
            Self::Tanh => x.tanh(),
            Self::Relu => x.max(0.0),
            Self::Identity => x,
            Self::Custom(f) => f(x),
        }
    }
}

#[must_use]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_is_symmetric_around_half() {
        for x in [0.1, 0.5, 1.0, 4.0] {
            let sum = sigmoid(x) + sigmoid(-x);
            assert!((sum - 1.0).abs() < 1e-12, "{x}: {sum}");
        }
    }

    #[test]
    fn test_builtin_variants_round_trip_by_name() {
        let json = serde_json::to_string(&Activation::Tanh).unwrap();
        assert_eq!(json, "\"tanh\"");
        let parsed: Activation = serde_json::from_str("\"relu\"").unwrap();
        assert!(matches!(parsed, Activation::Relu));
    }

    #[test]
    fn test_custom_variant_is_not_serializable() {
        assert!(serde_json::to_string(&Activation::Custom(f64::abs)).is_err());
    }
}
