//! **mazes** generates rectangular mazes with a randomized depth first backtracker, optionally
//! braids them with extra passages, and finds routes through them with A*.
//!
//! Generation can run all at once or one carving step at a time for animation.

pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid_dimensions;
pub mod maze;
pub mod path;
pub mod pathing;
pub mod priority_queue;
pub mod random;
pub mod units;
