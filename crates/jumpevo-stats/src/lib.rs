//! Fitness statistics for evolving populations.
//!
//! - [`summary`]: descriptive statistics over one generation's scores
//! - [`trend`]: progress of the best score across generations
//!
//! # Examples
//!
//! ```
//! use jumpevo_stats::{summary::Summary, trend::Trend};
//!
//! let stats = Summary::new([10.0, 5.0, 3.0, 1.0]).unwrap();
//! assert_eq!(stats.max, 10.0);
//! assert_eq!(stats.median, 4.0);
//!
//! let trend = Trend::new([3.0, 7.0, 6.0, 7.0]).unwrap();
//! assert_eq!(trend.best, 7.0);
//! assert_eq!(trend.best_generation, 1);
//! assert_eq!(trend.stagnant_for, 2);
//! ```

pub mod summary;
pub mod trend;
