//! Sliding-tile (N×N "15-puzzle") simulation environment.
//!
//! [`Puzzle`] holds the board and applies moves, [`solvability`] decides
//! reachability from the solved board, and [`TileEnv`] wraps both in a
//! reset/step API with scrambles that are always solvable.

pub mod config;
pub mod env;
pub mod error;
pub mod permutation;
pub mod puzzle;
pub mod solvability;

pub use config::{Encoding, EnvConfig, OutOfBoundsPolicy, RewardScheme};
pub use env::{Environment, Observation, Step, StepInfo, TileEnv};
pub use error::{Error, Result};
pub use puzzle::{Move, Puzzle};
