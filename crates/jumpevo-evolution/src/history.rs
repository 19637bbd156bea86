use jumpevo_network::{NetworkState, RandomSource};
use jumpevo_stats::trend::Trend;
use serde::{Deserialize, Serialize};

use crate::{EvolutionError, Generation, Genome, Options, generation};

/// Past generations, oldest first. The last one is the current generation and
/// is the only one that receives new genomes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Generations {
    generations: Vec<Generation>,
    /// Generations created so far, including ones dropped by retention.
    #[serde(default)]
    epoch: usize,
}

impl Generations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh random population and opens a generation to score it.
    pub fn first_generation<R>(
        &mut self,
        options: &Options,
        rng: &mut R,
    ) -> Result<Vec<NetworkState>, EvolutionError>
    where
        R: RandomSource + ?Sized,
    {
        let states = generation::random_population(options, rng)?;
        self.open_generation(options);
        Ok(states)
    }

    /// Breeds the current generation, opens a new one to score the offspring, and
    /// applies the retention policy.
    ///
    /// Falls back to [`first_generation`](Self::first_generation) when there is no
    /// generation yet. On error the history is left unchanged.
    pub fn next_generation<R>(
        &mut self,
        options: &Options,
        rng: &mut R,
    ) -> Result<Vec<NetworkState>, EvolutionError>
    where
        R: RandomSource + ?Sized,
    {
        let Some(current) = self.current() else {
            return self.first_generation(options, rng);
        };
        let states = current.generate_next(options, rng)?;
        self.open_generation(options);
        Ok(states)
    }

    fn open_generation(&mut self, options: &Options) {
        self.generations.push(Generation::new());
        self.epoch += 1;
        self.apply_retention(options);
    }

    /// Adds a scored genome to the current generation.
    pub fn add_genome(&mut self, genome: Genome) {
        if self.generations.is_empty() {
            self.generations.push(Generation::new());
            self.epoch += 1;
        }
        if let Some(current) = self.generations.last_mut() {
            current.add_genome(genome);
        }
    }

    /// Prunes and truncates old generations according to `options`.
    ///
    /// With `low_historic`, the networks of the second-to-last generation are
    /// dropped. With `historic = Some(h)`, only the newest `h + 1` generations are
    /// kept.
    pub fn apply_retention(&mut self, options: &Options) {
        if options.low_historic {
            if let Some(index) = self.generations.len().checked_sub(2) {
                self.generations[index].prune();
            }
        }
        if let Some(historic) = options.historic {
            let keep = historic.saturating_add(1);
            let excess = self.generations.len().saturating_sub(keep);
            self.generations.drain(..excess);
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&Generation> {
        self.generations.last()
    }

    #[must_use]
    pub fn generations(&self) -> &[Generation] {
        &self.generations
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.generations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    /// Total number of generations created, unaffected by truncation.
    #[must_use]
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    /// 1-based number of the oldest retained generation.
    #[must_use]
    pub fn first_epoch(&self) -> usize {
        self.epoch.saturating_sub(self.generations.len()) + 1
    }

    /// Best score of every retained generation that has at least one genome.
    #[must_use]
    pub fn trend(&self) -> Option<Trend> {
        Trend::new(
            self.generations
                .iter()
                .filter_map(Generation::best)
                .map(|g| g.score),
        )
    }

    pub fn clear(&mut self) {
        self.generations.clear();
        self.epoch = 0;
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn score_all(history: &mut Generations, states: Vec<NetworkState>) {
        for (score, state) in (0_u8..).zip(states) {
            history.add_genome(Genome::new(f64::from(score), state));
        }
    }

    fn options(historic: Option<usize>, low_historic: bool) -> Options {
        Options {
            population: 6,
            historic,
            low_historic,
            ..Options::default()
        }
    }

    fn run(options: &Options, transitions: usize) -> Generations {
        let mut rng = Pcg32::seed_from_u64(17);
        let mut history = Generations::new();
        let states = history.first_generation(options, &mut rng).unwrap();
        score_all(&mut history, states);
        for _ in 0..transitions {
            let states = history.next_generation(options, &mut rng).unwrap();
            assert_eq!(states.len(), options.population);
            score_all(&mut history, states);
        }
        history
    }

    #[test]
    fn test_first_generation_opens_empty_current() {
        let mut history = Generations::new();
        let states = history
            .first_generation(&options(None, false), &mut Pcg32::seed_from_u64(0))
            .unwrap();
        assert_eq!(states.len(), 6);
        assert_eq!(history.len(), 1);
        assert!(history.current().unwrap().is_empty());
        assert_eq!(history.epoch(), 1);
    }

    #[test]
    fn test_historic_one_keeps_two_generations() {
        let history = run(&options(Some(1), false), 5);
        assert_eq!(history.len(), 2);
        assert_eq!(history.epoch(), 6);
        assert_eq!(history.first_epoch(), 5);
    }

    #[test]
    fn test_unlimited_history() {
        let history = run(&options(None, false), 5);
        assert_eq!(history.len(), 6);
        assert!(
            history
                .generations()
                .iter()
                .flat_map(Generation::genomes)
                .all(|g| !g.is_pruned())
        );
    }

    #[test]
    fn test_truncation_keeps_newest() {
        let mut history = Generations::new();
        let options = options(None, false);
        for score in [1.0, 2.0, 3.0] {
            history.generations.push(Generation::new());
            history.add_genome(Genome {
                score,
                network: None,
            });
        }
        history.apply_retention(&Options {
            historic: Some(1),
            ..options
        });
        let bests = history
            .generations()
            .iter()
            .map(|g| g.best().unwrap().score)
            .collect::<Vec<_>>();
        assert_eq!(bests, [2.0, 3.0]);
    }

    #[test]
    fn test_low_historic_prunes_all_but_newest() {
        let history = run(&options(None, true), 4);
        let (newest, older) = history.generations().split_last().unwrap();
        assert_eq!(older.len(), 4);
        for generation in older {
            assert_eq!(generation.len(), 6);
            assert!(generation.genomes().iter().all(Genome::is_pruned));
        }
        assert!(newest.genomes().iter().all(|g| !g.is_pruned()));
    }

    #[test]
    fn test_trend_tracks_scored_generations() {
        let history = run(&options(None, false), 2);
        let trend = history.trend().unwrap();
        assert_eq!(trend.generations, 3);
        assert_eq!(trend.best, 5.0);
    }

    #[test]
    fn test_failed_transition_leaves_history_unchanged() {
        let mut history = Generations::new();
        history.add_genome(Genome::new(
            1.0,
            NetworkState {
                neurons: vec![2, 1],
                weights: vec![0.0; 2],
            },
        ));
        history.add_genome(Genome::new(
            2.0,
            NetworkState {
                neurons: vec![3, 1],
                weights: vec![0.0; 3],
            },
        ));
        let before = history.clone();
        assert!(
            history
                .next_generation(&options(None, false), &mut Pcg32::seed_from_u64(0))
                .is_err()
        );
        assert_eq!(history, before);
    }
}
