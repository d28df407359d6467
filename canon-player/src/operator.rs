//! Move-choosing players.

use crate::encoder::{self, EncodedState};
use crate::evaluator::Evaluator;
use canon_othello::{Board, Location, LocationList};
use rand::rngs::StdRng;
use rand::seq::{IteratorRandom, SliceRandom};
use rand::SeedableRng;
use std::cmp::Ordering;

/// Candidates whose value is this close to the best are treated as ties.
pub const TIE_DELTA: f32 = 0.01;

/// Something that picks a move for the side to move on `board`.
pub trait Operator {
    /// Choose one of `moves`, which are the legal moves on `board`.
    /// Returns None only when `moves` is empty.
    fn choose(&mut self, board: &Board, moves: LocationList) -> Option<Location>;
}

/// Plays uniformly at random.
pub struct RandomOperator {
    rng: StdRng,
}

impl RandomOperator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Operator for RandomOperator {
    fn choose(&mut self, _board: &Board, moves: LocationList) -> Option<Location> {
        moves.choose(&mut self.rng)
    }
}

/// Plays the move an [`Evaluator`] likes best, breaking near-ties at random.
/// Near-ties chain: a run of values each within [`TIE_DELTA`] of the next
/// better one all count as tied with the best.
pub struct EvaluatorOperator<E> {
    evaluator: E,
    rng: StdRng,
}

impl<E: Evaluator> EvaluatorOperator<E> {
    pub fn new(evaluator: E, seed: u64) -> Self {
        Self {
            evaluator,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Encode and score every candidate, in row-major order.
    pub fn evaluate_moves(&mut self, board: &Board, moves: LocationList) -> Vec<(Location, f32)> {
        let (locations, states): (Vec<Location>, Vec<EncodedState>) = moves
            .filter_map(|loc| encoder::encode(board, loc).ok().map(|state| (loc, state)))
            .unzip();
        let values = self.evaluator.evaluate_batch(&states);
        locations.into_iter().zip(values).collect()
    }
}

impl<E: Evaluator> Operator for EvaluatorOperator<E> {
    fn choose(&mut self, board: &Board, moves: LocationList) -> Option<Location> {
        let evals = self.evaluate_moves(board, moves);
        near_best(evals).choose(&mut self.rng).copied()
    }
}

/// Walk the candidates from best to worst, keeping each one while it is
/// within [`TIE_DELTA`] of the last one kept.
fn near_best(mut evals: Vec<(Location, f32)>) -> Vec<Location> {
    evals.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let mut kept = Vec::new();
    let mut last = f32::NEG_INFINITY;
    for (loc, value) in evals {
        if value + TIE_DELTA < last {
            break;
        }
        kept.push(loc);
        last = value;
    }
    kept
}
