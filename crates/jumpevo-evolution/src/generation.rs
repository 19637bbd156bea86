//! One scored population and the breeding step that produces its successor.
//!
//! # Breeding
//!
//! [`Generation::generate_next`] fills exactly `population` slots, in order:
//!
//! 1. **Elitism** - unchanged copies of the best `elite_count()` genomes
//! 2. **Random reintroduction** - copies of the best `random_count()` genomes with
//!    every weight redrawn, keeping their layer layout
//! 3. **Breeding** - rounds over an increasing partner index `max`: genome `i` is
//!    bred with genome `max` for every `i < max`, each pair yielding `children`
//!    offspring. `max` wraps back to 0 when it reaches the end of the pool, so the
//!    fill continues until every slot is taken.
//!
//! A child starts as a copy of the first parent. Each weight independently takes
//! the second parent's value with probability `crossover`, then independently
//! receives a uniform perturbation in `[-mutation_range, mutation_range]` with
//! probability `mutation_rate`.
//!
//! Genomes whose network was pruned do not take part in breeding.

use jumpevo_network::{Network, NetworkError, NetworkState, RandomSource};
use jumpevo_stats::summary::Summary;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{EvolutionError, Genome, Options};

/// Genomes of one epoch, kept sorted by descending score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawGeneration")]
pub struct Generation {
    genomes: Vec<Genome>,
}

#[derive(Deserialize)]
struct RawGeneration {
    #[serde(default)]
    genomes: Vec<Genome>,
}

impl From<RawGeneration> for Generation {
    fn from(raw: RawGeneration) -> Self {
        let mut generation = Self::new();
        for genome in raw.genomes {
            generation.add_genome(genome);
        }
        generation
    }
}

impl Generation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a genome, keeping the population sorted by descending score.
    ///
    /// A genome tied with existing ones is placed after them. `NaN` scores rank last.
    pub fn add_genome(&mut self, genome: Genome) {
        let key = genome.rank_score();
        let position = self
            .genomes
            .partition_point(|g| g.rank_score().total_cmp(&key).is_ge());
        self.genomes.insert(position, genome);
    }

    #[must_use]
    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    #[must_use]
    pub fn best(&self) -> Option<&Genome> {
        self.genomes.first()
    }

    /// Best genome that still carries its network.
    #[must_use]
    pub fn best_with_network(&self) -> Option<&Genome> {
        self.genomes.iter().find(|g| !g.is_pruned())
    }

    /// Score statistics, `None` while no genome was added.
    #[must_use]
    pub fn summary(&self) -> Option<Summary> {
        Summary::new(self.genomes.iter().map(|g| g.score))
    }

    /// Drops every stored network, keeping the scores.
    pub fn prune(&mut self) {
        for genome in &mut self.genomes {
            genome.prune();
        }
    }

    /// Produces the network states of the next generation.
    ///
    /// Always returns exactly `options.population` states. When no genome carries
    /// a network, the result is a fresh random population for `options.topology`.
    ///
    /// # Errors
    ///
    /// Returns [`EvolutionError::MixedTopologies`] if the stored networks do not
    /// share one layout, since crossover pairs weights by flat index.
    pub fn generate_next<R>(
        &self,
        options: &Options,
        rng: &mut R,
    ) -> Result<Vec<NetworkState>, EvolutionError>
    where
        R: RandomSource + ?Sized,
    {
        let population = options.population;
        let pool = self
            .genomes
            .iter()
            .filter_map(|g| g.network.as_ref())
            .collect::<Vec<_>>();
        let Some((&first, rest)) = pool.split_first() else {
            warn!("no scored network to breed from, starting from a random population");
            return Ok(random_population(options, rng)?);
        };
        if rest.iter().any(|state| !state.is_compatible_with(first)) {
            return Err(EvolutionError::MixedTopologies);
        }

        let mut next = Vec::with_capacity(population);

        let elites = options.elite_count().min(population).min(pool.len());
        next.extend(pool[..elites].iter().map(|&state| state.clone()));

        let randoms = options.random_count().min(population - next.len());
        for i in 0..randoms {
            let mut state = pool[i % pool.len()].clone();
            state.randomize_weights(rng);
            next.push(state);
        }

        let bred = population - next.len();
        if bred > 0 && pool.len() < 2 {
            warn!(
                genomes = pool.len(),
                "too few genomes to breed, cloning the best one"
            );
            next.resize(population, first.clone());
        } else if bred > 0 {
            // With only two genomes the pair (0, 1) must stay reachable.
            let wrap_at = (pool.len() - 1).max(2);
            let mut max = 0;
            'fill: loop {
                for i in 0..max {
                    for _ in 0..options.children {
                        next.push(breed(pool[i], pool[max], options, rng));
                        if next.len() >= population {
                            break 'fill;
                        }
                    }
                }
                max += 1;
                if max >= wrap_at {
                    max = 0;
                }
            }
        }

        debug!(elites, randoms, bred, "generated next population");
        Ok(next)
    }
}

/// Breeds one child from two parents of identical layout.
///
/// # Examples
///
/// ```
/// use jumpevo_evolution::{Options, breed};
/// use jumpevo_network::NetworkState;
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
///
/// let mother = NetworkState { neurons: vec![2, 1], weights: vec![1.0, 1.0] };
/// let father = NetworkState { neurons: vec![2, 1], weights: vec![-1.0, -1.0] };
/// let options = Options { crossover: 1.0, mutation_rate: 0.0, ..Options::default() };
///
/// let child = breed(&mother, &father, &options, &mut Pcg32::seed_from_u64(0));
/// assert_eq!(child, father);
/// ```
pub fn breed<R>(
    mother: &NetworkState,
    father: &NetworkState,
    options: &Options,
    rng: &mut R,
) -> NetworkState
where
    R: RandomSource + ?Sized,
{
    let mut child = mother.clone();
    for (weight, &other) in child.weights.iter_mut().zip(&father.weights) {
        if rng.random_unit() < options.crossover {
            *weight = other;
        }
    }
    for weight in &mut child.weights {
        if rng.random_unit() < options.mutation_rate {
            *weight += rng.random_clamped() * options.mutation_range;
        }
    }
    child
}

/// Builds `options.population` freshly initialized network states.
pub fn random_population<R>(options: &Options, rng: &mut R) -> Result<Vec<NetworkState>, NetworkError>
where
    R: RandomSource + ?Sized,
{
    (0..options.population)
        .map(|_| {
            Network::build(&options.topology, options.activation, rng).map(|n| n.to_state())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use jumpevo_network::Topology;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::testing::Scripted;

    fn state(weights: &[f64]) -> NetworkState {
        NetworkState {
            neurons: vec![2, 2, 1],
            weights: weights.to_vec(),
        }
    }

    fn uniform_state(value: f64) -> NetworkState {
        state(&[value; 6])
    }

    /// Genomes whose weights all equal their score, so offspring reveal their parents.
    fn scored_generation(scores: &[f64]) -> Generation {
        let mut generation = Generation::new();
        for &score in scores {
            generation.add_genome(Genome::new(score, uniform_state(score)));
        }
        generation
    }

    #[test]
    fn test_add_genome_keeps_descending_order() {
        let generation = scored_generation(&[3.0, 10.0, 1.0, 5.0, 5.0, f64::NAN, 7.0]);
        let scores = generation
            .genomes()
            .iter()
            .map(|g| g.score)
            .collect::<Vec<_>>();
        assert_eq!(&scores[..6], &[10.0, 7.0, 5.0, 5.0, 3.0, 1.0]);
        assert!(scores[6].is_nan());
        assert_eq!(generation.best().unwrap().score, 10.0);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut generation = Generation::new();
        generation.add_genome(Genome::new(1.0, uniform_state(0.1)));
        generation.add_genome(Genome::new(1.0, uniform_state(0.2)));
        let firsts = generation
            .genomes()
            .iter()
            .map(|g| g.network.as_ref().unwrap().weights[0])
            .collect::<Vec<_>>();
        assert_eq!(firsts, [0.1, 0.2]);
    }

    #[test]
    fn test_deserialization_sorts_genomes() {
        let json = r#"{"genomes":[
            {"score":1.0,"network":null},
            {"score":4.0,"network":null},
            {"network":null}
        ]}"#;
        let generation: Generation = serde_json::from_str(json).unwrap();
        let scores = generation
            .genomes()
            .iter()
            .map(|g| g.score)
            .collect::<Vec<_>>();
        assert_eq!(scores, [4.0, 1.0, 0.0]);
    }

    #[test]
    fn test_scenario_elite_random_and_bred() {
        let options = Options {
            population: 4,
            elitism: 0.25,
            random_behaviour: 0.25,
            crossover: 0.5,
            mutation_rate: 0.0,
            children: 2,
            ..Options::default()
        };
        let generation = scored_generation(&[10.0, 5.0, 3.0, 1.0]);
        let mut rng = Scripted::new(&[0.2, 0.8], &[0.9]);

        let next = generation.generate_next(&options, &mut rng).unwrap();

        assert_eq!(next.len(), 4);
        assert_eq!(next[0], uniform_state(10.0));
        assert_eq!(next[1], uniform_state(0.9));
        // Even weight indices draw 0.2 < 0.5 and cross over from genome 1.
        let child = state(&[5.0, 10.0, 5.0, 10.0, 5.0, 10.0]);
        assert_eq!(next[2], child);
        assert_eq!(next[3], child);
    }

    #[test]
    fn test_single_child_pairs_follow_partner_rounds() {
        let options = Options {
            population: 3,
            elitism: 0.0,
            random_behaviour: 0.0,
            crossover: 1.0,
            mutation_rate: 0.0,
            ..Options::default()
        };
        let generation = scored_generation(&[10.0, 5.0, 3.0, 1.0]);
        let next = generation
            .generate_next(&options, &mut Pcg32::seed_from_u64(0))
            .unwrap();
        // crossover 1.0 copies the second parent: rounds give (0,1), (0,2), (1,2)
        assert_eq!(next, [uniform_state(5.0), uniform_state(3.0), uniform_state(3.0)]);
    }

    #[test]
    fn test_partner_index_wraps() {
        let options = Options {
            population: 5,
            elitism: 0.0,
            random_behaviour: 0.0,
            crossover: 1.0,
            mutation_rate: 0.0,
            ..Options::default()
        };
        let generation = scored_generation(&[10.0, 5.0, 3.0, 1.0]);
        let next = generation
            .generate_next(&options, &mut Pcg32::seed_from_u64(0))
            .unwrap();
        // rounds max = 1, 2, then wrap back to 1
        let seconds = next.iter().map(|s| s.weights[0]).collect::<Vec<_>>();
        assert_eq!(seconds, [5.0, 3.0, 3.0, 5.0, 3.0]);
    }

    #[test]
    fn test_population_size_holds_for_many_options() {
        let mut rng = Pcg32::seed_from_u64(42);
        for population in [1, 2, 3, 7, 20] {
            for genomes in [1_u32, 2, 3, 5, 30] {
                for (elitism, random_behaviour) in [(0.0, 0.0), (0.2, 0.2), (1.0, 1.0), (0.5, 0.0)]
                {
                    let options = Options {
                        population,
                        elitism,
                        random_behaviour,
                        ..Options::default()
                    };
                    let scores = (0..genomes).map(f64::from).collect::<Vec<_>>();
                    let next = scored_generation(&scores)
                        .generate_next(&options, &mut rng)
                        .unwrap();
                    assert_eq!(next.len(), population, "{options:?} with {genomes} genomes");
                }
            }
        }
    }

    #[test]
    fn test_best_genome_survives_as_elite() {
        let mut rng = Pcg32::seed_from_u64(3);
        let options = Options {
            population: 10,
            ..Options::default()
        };
        let mut generation = Generation::new();
        let states = random_population(&options, &mut rng).unwrap();
        for (score, state) in (0_u8..).zip(states) {
            generation.add_genome(Genome::new(f64::from(score), state));
        }
        let best = generation.best().unwrap().network.clone().unwrap();
        let next = generation.generate_next(&options, &mut rng).unwrap();
        assert_eq!(next[0], best);
    }

    #[test]
    fn test_single_genome_is_cloned() {
        let options = Options {
            population: 4,
            elitism: 0.0,
            random_behaviour: 0.0,
            ..Options::default()
        };
        let next = scored_generation(&[2.0])
            .generate_next(&options, &mut Pcg32::seed_from_u64(0))
            .unwrap();
        assert_eq!(next, vec![uniform_state(2.0); 4]);
    }

    #[test]
    fn test_single_slot_full_elitism() {
        let options = Options {
            population: 1,
            elitism: 1.0,
            ..Options::default()
        };
        let next = scored_generation(&[4.0, 8.0])
            .generate_next(&options, &mut Pcg32::seed_from_u64(0))
            .unwrap();
        assert_eq!(next, [uniform_state(8.0)]);
    }

    #[test]
    fn test_empty_pool_starts_over() {
        let options = Options {
            population: 6,
            topology: Topology::new(3, [4], 2),
            ..Options::default()
        };
        let mut generation = scored_generation(&[1.0, 2.0]);
        generation.prune();
        let next = generation
            .generate_next(&options, &mut Pcg32::seed_from_u64(0))
            .unwrap();
        assert_eq!(next.len(), 6);
        assert!(next.iter().all(|s| s.matches_topology(&options.topology)));
    }

    #[test]
    fn test_mixed_topologies_are_rejected() {
        let mut generation = scored_generation(&[1.0]);
        generation.add_genome(Genome::new(
            2.0,
            NetworkState {
                neurons: vec![2, 3, 1],
                weights: vec![0.0; 9],
            },
        ));
        let err = generation
            .generate_next(&Options::default(), &mut Pcg32::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, EvolutionError::MixedTopologies));
    }

    #[test]
    fn test_mutation_stays_within_range() {
        let options = Options {
            crossover: 0.0,
            mutation_rate: 1.0,
            mutation_range: 0.25,
            ..Options::default()
        };
        let mother = uniform_state(1.0);
        let child = breed(&mother, &uniform_state(-1.0), &options, &mut Pcg32::seed_from_u64(8));
        assert!(child.weights.iter().all(|w| (0.75..=1.25).contains(w)));
        assert_ne!(child, mother);
    }

    #[test]
    fn test_breed_leaves_parents_untouched() {
        let options = Options {
            crossover: 0.5,
            mutation_rate: 1.0,
            ..Options::default()
        };
        let mother = uniform_state(1.0);
        let father = uniform_state(2.0);
        let _ = breed(&mother, &father, &options, &mut Pcg32::seed_from_u64(1));
        assert_eq!(mother, uniform_state(1.0));
        assert_eq!(father, uniform_state(2.0));
    }
}
