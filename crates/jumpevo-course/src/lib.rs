//! Headless jump course used to score controllers.
//!
//! A fixed-step stand-in for the game: jumpers fall under gravity at a fixed
//! horizontal position while pipes scroll towards them. Each tick every live
//! jumper's [`Pilot`] sees an [`Observation`] and may jump. A jumper dies when it
//! touches a pipe outside the pipe's gap or falls below the bottom limit, and
//! scores the number of ticks it survived.
//!
//! The pipe layout is drawn from a [`CourseSeed`], so an episode replays exactly.

pub use self::{config::*, course::*, pilot::Pilot, seed::*};

mod config;
mod course;
pub mod pilot;
mod seed;
