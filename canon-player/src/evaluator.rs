//! Interfaces to the collaborators outside this crate: a learned evaluator
//! that scores encoded positions, and a sink that stores labelled examples.

use crate::encoder::EncodedState;
use std::convert::Infallible;

/// Something that can score encoded candidate positions for the side to move.
/// Higher values are better for the mover.
pub trait Evaluator {
    fn evaluate(&mut self, state: &EncodedState) -> f32;

    /// Score several candidates at once. Results line up with `states`.
    fn evaluate_batch(&mut self, states: &[EncodedState]) -> Vec<f32> {
        states.iter().map(|state| self.evaluate(state)).collect()
    }
}

impl<F: FnMut(&EncodedState) -> f32> Evaluator for F {
    fn evaluate(&mut self, state: &EncodedState) -> f32 {
        self(state)
    }
}

/// A destination for `(encoded position, label)` training examples.
pub trait Sink {
    type Error;

    fn persist(&mut self, state: EncodedState, label: f32) -> Result<(), Self::Error>;
}

/// Collect examples in memory.
impl Sink for Vec<(EncodedState, f32)> {
    type Error = Infallible;

    fn persist(&mut self, state: EncodedState, label: f32) -> Result<(), Self::Error> {
        self.push((state, label));
        Ok(())
    }
}
