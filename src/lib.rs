//! An exact solver for positions of the board game 'Connect 4'
//!
//! Positions are given as the sequence of columns played so far and scored by
//! an alpha-beta game tree search, which reports how many moves remain until
//! a forced win, loss or draw under perfect play.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_solver::{position::Position, solver::{SolveMode, Solver}};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let mut solver = Solver::new(Position::from_moves("112233")?);
//! let score = solver.solve(SolveMode::Exact)?;
//!
//! assert_eq!((score, solver.node_count()), (18, 1));
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod error;

pub mod position;

pub mod transposition_table;

pub mod solver;

pub mod benchmark;


pub use benchmark::{Benchmark, LineResult, Summary};
pub use error::{Error, Result};
pub use position::Position;
pub use solver::{SolveMode, Solver};

/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

// ensure that the given dimensions fit in a u64 for the bitboard representation
const_assert!(WIDTH * (HEIGHT + 1) < 64);
