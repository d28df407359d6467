//! `canon-othello` is the Othello board engine behind the position encoder.
//!
//! This package implements two levels of abstraction:
//!
//!  - [`Board`] holds a bordered 10x10 grid and implements the raw game
//!    dynamics: legal moves, flipping, turn and pass bookkeeping, and scoring.
//!    Callers drive the turn order themselves, so this suits engines and
//!    analysis code that clone boards to explore branches.
//!  - [`Game`] is a high-level, safe session that pairs every action with
//!    the right turn bookkeeping and tracks termination.

pub mod test_utils;
pub mod utils;

mod board;
mod game;
mod location;

pub use board::*;
pub use game::*;
pub use location::*;

/// The number of spaces on one edge of an Othello board.
pub const EDGE_LENGTH: usize = 8;

/// The number of spaces on an Othello board.
pub const NUM_SPACES: usize = 64;
