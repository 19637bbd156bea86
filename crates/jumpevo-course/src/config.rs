use serde::{Deserialize, Serialize};

/// Physical constants and limits of the course, in world units and seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseConfig {
    /// Simulated seconds per tick.
    pub time_step: f64,
    /// Vertical acceleration (negative pulls down).
    pub gravity: f64,
    pub start_height: f64,
    pub start_velocity: f64,
    pub jump_velocity: f64,
    /// Jump velocity once the jumper is at or above `top_limit`.
    pub jump_above_limit_velocity: f64,
    pub top_limit: f64,
    /// Falling to or below this height ends the episode.
    pub bottom_limit: f64,
    /// Fixed horizontal position of every jumper.
    pub jumper_x: f64,
    pub jumper_radius: f64,
    /// Horizontal distance between consecutive pipes.
    pub pipe_spacing: f64,
    pub first_pipe_x: f64,
    pub scroll_speed: f64,
    pub pipe_half_width: f64,
    /// Half the height of the opening centered on each pipe's gap height.
    pub gap_half_height: f64,
    /// Gap heights are drawn uniformly from `[min, max)` hundredths of a unit.
    pub gap_height_hundredths: (u32, u32),
    /// Pipes further left than this are recycled to the end of the course.
    pub recycle_x: f64,
    /// Number of pipes on the course at any time.
    pub pipe_count: usize,
    /// Episode length cap; jumpers still alive then score this many ticks.
    pub max_ticks: u64,
}

pub(crate) const PIXEL_TO_UNIT: f64 = 0.01;
const TOP_LIMIT: f64 = (568.0 - 200.0) * PIXEL_TO_UNIT;

impl Default for CourseConfig {
    fn default() -> Self {
        Self {
            time_step: 1.0 / 60.0,
            gravity: -17.0,
            start_height: 0.0,
            start_velocity: 7.0,
            jump_velocity: 6.5,
            jump_above_limit_velocity: 2.0,
            top_limit: TOP_LIMIT,
            bottom_limit: -TOP_LIMIT * 1.2,
            jumper_x: -1.0,
            jumper_radius: 0.25,
            pipe_spacing: 4.0,
            first_pipe_x: 4.0,
            scroll_speed: 2.9,
            pipe_half_width: 0.5,
            gap_half_height: 1.0,
            gap_height_hundredths: (50, 225),
            recycle_x: -4.0,
            pipe_count: 5,
            max_ticks: 60 * 60,
        }
    }
}
