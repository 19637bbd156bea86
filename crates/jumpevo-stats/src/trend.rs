use serde::{Deserialize, Serialize};

/// Progress of the best score over consecutive generations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    /// Number of generations observed.
    pub generations: usize,
    /// Best score seen in any generation.
    pub best: f64,
    /// Index of the first generation that reached `best`.
    pub best_generation: usize,
    /// Generations observed after `best_generation` without a new best.
    pub stagnant_for: usize,
    /// Best-so-far score after each generation.
    pub best_so_far: Vec<f64>,
}

impl Trend {
    /// Builds a trend from each generation's best score, oldest first.
    ///
    /// Returns `None` when no generation was observed.
    #[must_use]
    pub fn new<I>(per_generation_best: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut best_so_far = Vec::new();
        let mut best = f64::NEG_INFINITY;
        let mut best_generation = 0;
        for (i, score) in per_generation_best.into_iter().enumerate() {
            if score > best {
                best = score;
                best_generation = i;
            }
            best_so_far.push(best);
        }
        if best_so_far.is_empty() {
            return None;
        }
        let generations = best_so_far.len();
        Some(Self {
            generations,
            best,
            best_generation,
            stagnant_for: generations - 1 - best_generation,
            best_so_far,
        })
    }

    /// Whether the most recent generation set a new best.
    #[must_use]
    pub fn improved_last(&self) -> bool {
        self.stagnant_for == 0
    }
}
