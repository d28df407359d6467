//! `canon-player` turns Othello positions into training and inference inputs
//! for a learned evaluator, and plays games with whatever evaluator it is given.
//!
//! The pipeline for one candidate move:
//!
//!  - [`region`] picks the board symmetry that canonicalizes the move.
//!  - [`parity`] splits the empty squares into odd and even areas.
//!  - [`encoder`] projects the board through that symmetry into a
//!    `(CHANNELS, 8, 8)` tensor.
//!
//! [`record`] and [`dataset`] turn annotated game records into labelled
//! examples, and [`operator`] and [`autoplay`] drive games through the
//! [`evaluator::Evaluator`] seam. [`endgame`] searches late positions to the
//! end of the game.

pub mod autoplay;
pub mod dataset;
pub mod encoder;
pub mod endgame;
pub mod evaluator;
pub mod operator;
pub mod parity;
pub mod record;
pub mod region;

/// The number of feature planes in an encoded position.
pub const CHANNELS: usize = 16;
