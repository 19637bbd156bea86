use jumpevo_network::NetworkState;
use serde::{Deserialize, Serialize};

/// A scored network: the unit of selection.
///
/// `Clone` is a deep copy; the clone owns its own weight storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    #[serde(default)]
    pub score: f64,
    /// Stored network, `None` once pruned by the low-historic policy.
    #[serde(default)]
    pub network: Option<NetworkState>,
}

impl Genome {
    #[must_use]
    pub fn new(score: f64, network: NetworkState) -> Self {
        Self {
            score,
            network: Some(network),
        }
    }

    /// Drops the stored network, keeping only the score.
    pub fn prune(&mut self) {
        self.network = None;
    }

    #[must_use]
    pub fn is_pruned(&self) -> bool {
        self.network.is_none()
    }

    /// Score used for ranking; `NaN` ranks below every other score.
    pub(crate) fn rank_score(&self) -> f64 {
        if self.score.is_nan() {
            f64::NEG_INFINITY
        } else {
            self.score
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_is_independent() {
        let original = Genome::new(
            3.0,
            NetworkState {
                neurons: vec![1, 1],
                weights: vec![0.25],
            },
        );
        let mut copy = original.clone();
        if let Some(network) = &mut copy.network {
            network.weights[0] = 9.0;
        }
        assert_eq!(original.network.unwrap().weights, [0.25]);
    }

    #[test]
    fn test_prune_keeps_score() {
        let mut genome = Genome::new(
            7.5,
            NetworkState {
                neurons: vec![1, 1],
                weights: vec![0.25],
            },
        );
        genome.prune();
        assert!(genome.is_pruned());
        assert_eq!(genome.score, 7.5);
        assert_eq!(
            serde_json::to_string(&genome).unwrap(),
            r#"{"score":7.5,"network":null}"#
        );
    }

    #[test]
    fn test_missing_score_defaults_to_zero() {
        let genome: Genome =
            serde_json::from_str(r#"{"network":{"neurons":[1,1],"weights":[0.5]}}"#).unwrap();
        assert_eq!(genome.score, 0.0);
        assert!(!genome.is_pruned());
    }
}
