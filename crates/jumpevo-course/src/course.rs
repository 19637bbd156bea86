use std::collections::VecDeque;

use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{CourseConfig, CourseSeed, Pilot, config::PIXEL_TO_UNIT};

/// A pipe pair with an opening centered at `gap_height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipe {
    pub x: f64,
    pub gap_height: f64,
}

/// What a pilot sees before each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Jumper's own height.
    pub height: f64,
    /// Gap height of the next pipe the jumper has not cleared yet.
    pub next_gap_height: f64,
    /// Horizontal distance to that pipe.
    pub next_pipe_distance: f64,
}

impl Observation {
    /// Network inputs: own height and next gap height.
    #[must_use]
    pub fn inputs(&self) -> [f64; 2] {
        [self.height, self.next_gap_height]
    }
}

/// Result of one jumper's episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Ticks survived; the fitness score.
    pub ticks: u64,
    pub pipes_passed: u32,
    /// Whether the jumper was still alive when the tick cap was reached.
    pub finished: bool,
}

#[derive(Debug, Clone)]
struct Jumper {
    height: f64,
    velocity: f64,
    pipes_passed: u32,
    outcome: Option<Outcome>,
}

impl Jumper {
    fn new(config: &CourseConfig) -> Self {
        Self {
            height: config.start_height,
            velocity: config.start_velocity,
            pipes_passed: 0,
            outcome: None,
        }
    }

    fn jump(&mut self, config: &CourseConfig) {
        self.velocity = if self.height >= config.top_limit {
            config.jump_above_limit_velocity
        } else {
            config.jump_velocity
        };
    }

    fn step(&mut self, config: &CourseConfig) {
        let t = config.time_step;
        self.height += self.velocity * t + config.gravity * t * t / 2.0;
        self.velocity += config.gravity * t;
    }

    fn is_out_of_bounds(&self, config: &CourseConfig) -> bool {
        self.height <= config.bottom_limit
    }

    fn hits(&self, pipe: &Pipe, config: &CourseConfig) -> bool {
        let overlaps_x =
            (pipe.x - config.jumper_x).abs() < config.pipe_half_width + config.jumper_radius;
        let outside_gap =
            (self.height - pipe.gap_height).abs() > config.gap_half_height - config.jumper_radius;
        overlaps_x && outside_gap
    }
}

/// Headless side-scrolling course shared by a whole population.
///
/// Every jumper starts at the same height and faces the same pipes, so scores of
/// one episode are directly comparable. The pipe layout depends only on the seed.
#[derive(Debug, Clone)]
pub struct Course {
    config: CourseConfig,
    rng: Pcg32,
    pipes: VecDeque<Pipe>,
}

impl Course {
    #[must_use]
    pub fn with_seed(config: CourseConfig, seed: CourseSeed) -> Self {
        let mut rng = Pcg32::from_seed(seed.0);
        let pipes = (0..config.pipe_count)
            .map(|i| {
                #[expect(clippy::cast_precision_loss)]
                let x = config.first_pipe_x + i as f64 * config.pipe_spacing;
                Pipe {
                    x,
                    gap_height: random_gap_height(&config, &mut rng),
                }
            })
            .collect();
        Self { config, rng, pipes }
    }

    #[must_use]
    pub fn config(&self) -> &CourseConfig {
        &self.config
    }

    pub fn pipes(&self) -> impl Iterator<Item = &Pipe> + '_ {
        self.pipes.iter()
    }

    /// Runs one episode with one jumper per pilot and returns their outcomes in
    /// pilot order.
    ///
    /// Each tick, a live jumper first dies if it is out of bounds or inside a
    /// pipe; otherwise its pilot observes the course and may jump. Then pipes
    /// scroll and jumpers fall. The episode ends when every jumper is dead or the
    /// tick cap is reached.
    ///
    /// # Examples
    ///
    /// ```
    /// use jumpevo_course::{Course, CourseConfig, CourseSeed, pilot};
    ///
    /// let course = Course::with_seed(CourseConfig::default(), CourseSeed::from_u64(1));
    /// let outcomes = course.run_episode(&mut [pilot::from_fn(|_| false)]);
    /// assert!(!outcomes[0].finished);
    /// assert!(outcomes[0].ticks > 0);
    /// ```
    pub fn run_episode<P>(mut self, pilots: &mut [P]) -> Vec<Outcome>
    where
        P: Pilot,
    {
        let config = self.config.clone();
        let mut jumpers = pilots.iter().map(|_| Jumper::new(&config)).collect::<Vec<_>>();

        for tick in 0..config.max_ticks {
            let mut alive = 0;
            for (jumper, pilot) in jumpers.iter_mut().zip(pilots.iter_mut()) {
                if jumper.outcome.is_some() {
                    continue;
                }
                let crashed = jumper.is_out_of_bounds(&config)
                    || self.pipes.iter().any(|pipe| jumper.hits(pipe, &config));
                if crashed {
                    jumper.outcome = Some(Outcome {
                        ticks: tick,
                        pipes_passed: jumper.pipes_passed,
                        finished: false,
                    });
                    continue;
                }
                alive += 1;
                let observation = self.observe(jumper);
                if pilot.wants_jump(&observation) {
                    jumper.jump(&config);
                }
            }
            if alive == 0 {
                break;
            }

            let passed = self.scroll();
            for jumper in jumpers.iter_mut().filter(|j| j.outcome.is_none()) {
                jumper.pipes_passed += passed;
                jumper.step(&config);
            }
        }

        jumpers
            .into_iter()
            .map(|jumper| {
                jumper.outcome.unwrap_or(Outcome {
                    ticks: config.max_ticks,
                    pipes_passed: jumper.pipes_passed,
                    finished: true,
                })
            })
            .collect()
    }

    fn observe(&self, jumper: &Jumper) -> Observation {
        let next = self.next_pipe();
        Observation {
            height: jumper.height,
            next_gap_height: next.map_or(0.0, |p| p.gap_height),
            next_pipe_distance: next.map_or(f64::INFINITY, |p| p.x - self.config.jumper_x),
        }
    }

    /// Nearest pipe whose trailing edge is still ahead of the jumper.
    fn next_pipe(&self) -> Option<&Pipe> {
        let behind = self.config.jumper_x - self.config.jumper_radius;
        self.pipes
            .iter()
            .filter(|p| p.x + self.config.pipe_half_width > behind)
            .min_by(|a, b| a.x.total_cmp(&b.x))
    }

    /// Moves pipes left by one tick, recycles those off screen, and returns how
    /// many pipes crossed the jumpers' position.
    fn scroll(&mut self) -> u32 {
        let dx = self.config.scroll_speed * self.config.time_step;
        let mut passed = 0;
        for pipe in &mut self.pipes {
            let before = pipe.x;
            pipe.x -= dx;
            if before >= self.config.jumper_x && pipe.x < self.config.jumper_x {
                passed += 1;
            }
        }
        while self
            .pipes
            .front()
            .is_some_and(|p| p.x + self.config.pipe_half_width < self.config.recycle_x)
        {
            let last_x = self.pipes.back().map_or(self.config.first_pipe_x, |p| p.x);
            self.pipes.pop_front();
            let gap_height = random_gap_height(&self.config, &mut self.rng);
            self.pipes.push_back(Pipe {
                x: last_x + self.config.pipe_spacing,
                gap_height,
            });
        }
        passed
    }
}

fn random_gap_height(config: &CourseConfig, rng: &mut Pcg32) -> f64 {
    let (min, max) = config.gap_height_hundredths;
    let hundredths = if min < max {
        rng.random_range(min..max)
    } else {
        min
    };
    PIXEL_TO_UNIT * f64::from(hundredths)
}
