//! Conversion of annotated game records into training examples.
//!
//! A record file holds the moves of one game on its first line (`F5D6C3...`),
//! then one evaluation line per move listing every candidate considered at
//! that ply (see [`record`](crate::record)).

use crate::encoder::{self, EncodedState, PACKED_BYTES};
use crate::evaluator::Sink;
use crate::record::{self, MalformedRecordError};
use crate::CHANNELS;
use canon_othello::{Board, IllegalMoveError, InvalidCoordinateText, Location, EDGE_LENGTH};
use derive_more::{Display, Error, From};
use ndarray::{ArrayD, IxDyn};
use std::convert::Infallible;
use std::fmt;
use std::path::Path;

/// Reasons a game record cannot be replayed. Plies count from 1.
#[derive(Debug, Display, Error, From)]
pub enum RecordError {
    #[display(fmt = "invalid move record: {}", _0)]
    MoveText(InvalidCoordinateText),
    #[display(fmt = "ply {}: {}", ply, source)]
    #[from(ignore)]
    Evaluations {
        ply: usize,
        source: MalformedRecordError,
    },
    #[display(fmt = "ply {}: {}", ply, source)]
    #[from(ignore)]
    IllegalMove { ply: usize, source: IllegalMoveError },
    #[display(fmt = "ply {}: no evaluation line", ply)]
    #[from(ignore)]
    MissingEvaluations { ply: usize },
    #[display(fmt = "ply {}: neither player can move", ply)]
    #[from(ignore)]
    NoLegalMoves { ply: usize },
    #[display(fmt = "could not store example: {}", message)]
    #[from(ignore)]
    Sink { message: String },
}

/// One parsed record file.
#[derive(Clone, Debug, PartialEq)]
pub struct GameRecord {
    pub moves: Vec<Location>,
    pub evaluations: Vec<String>,
}

impl std::str::FromStr for GameRecord {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines().map(str::trim).filter(|line| !line.is_empty());
        let moves = match lines.next() {
            Some(line) => record::parse_move_record(line)?,
            None => Vec::new(),
        };
        let evaluations = lines.map(str::to_string).collect();

        Ok(Self { moves, evaluations })
    }
}

/// Replay `moves` from the opening and persist every evaluated candidate.
///
/// Before each move, the candidates of the matching evaluation line are encoded
/// and persisted with their normalized values. A player without moves passes
/// automatically. Returns the number of examples written.
pub fn replay_record<S, L>(
    moves: &[Location],
    evaluations: &[L],
    sink: &mut S,
) -> Result<usize, RecordError>
where
    S: Sink,
    S::Error: fmt::Display,
    L: AsRef<str>,
{
    let mut board = Board::new();
    let mut written = 0;

    for (index, &actual) in moves.iter().enumerate() {
        let ply = index + 1;

        if board.legal_moves().is_empty() {
            board.advance_turn(true);
            if board.legal_moves().is_empty() {
                return Err(RecordError::NoLegalMoves { ply });
            }
        }

        let line = evaluations
            .get(index)
            .ok_or(RecordError::MissingEvaluations { ply })?;
        let entries = record::parse_eval_record(line.as_ref())
            .map_err(|source| RecordError::Evaluations { ply, source })?;

        for entry in entries {
            let state = encoder::encode(&board, entry.location)
                .map_err(|source| RecordError::IllegalMove { ply, source })?;
            sink.persist(state, entry.value as f32)
                .map_err(|err| RecordError::Sink {
                    message: err.to_string(),
                })?;
            written += 1;
        }

        board
            .apply_move(actual)
            .map_err(|source| RecordError::IllegalMove { ply, source })?;
        board.advance_turn(false);
    }

    Ok(written)
}

/// How an [`NpySink`] lays out each state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateLayout {
    /// One byte per value, shape `[N, 16, 8, 8]`.
    Planes,
    /// Big-endian plane bitboards, shape `[N, 128]`.
    Packed,
}

#[derive(Debug, Display, Error, From)]
pub enum WriteDatasetError {
    Shape(ndarray::ShapeError),
    Npy(ndarray_npy::WriteNpyError),
}

/// Collects examples in memory and writes them as a pair of `.npy` files.
#[derive(Clone, Debug)]
pub struct NpySink {
    layout: StateLayout,
    states: Vec<u8>,
    labels: Vec<f32>,
}

impl NpySink {
    pub fn new(layout: StateLayout) -> Self {
        Self {
            layout,
            states: Vec::new(),
            labels: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Build the `(states, labels)` arrays.
    pub fn to_arrays(&self) -> Result<(ArrayD<u8>, ArrayD<f32>), ndarray::ShapeError> {
        let n = self.len();
        let shape = match self.layout {
            StateLayout::Planes => vec![n, CHANNELS, EDGE_LENGTH, EDGE_LENGTH],
            StateLayout::Packed => vec![n, PACKED_BYTES],
        };

        let states = ArrayD::from_shape_vec(IxDyn(&shape), self.states.clone())?;
        let labels = ArrayD::from_shape_vec(IxDyn(&[n]), self.labels.clone())?;
        Ok((states, labels))
    }

    /// Write `u8` states and `f32` labels to two `.npy` files.
    pub fn write<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        states_path: P,
        labels_path: Q,
    ) -> Result<(), WriteDatasetError> {
        let (states, labels) = self.to_arrays()?;
        ndarray_npy::write_npy(states_path, &states)?;
        ndarray_npy::write_npy(labels_path, &labels)?;
        Ok(())
    }
}

impl NpySink {
    fn push(&mut self, state: &EncodedState, label: f32) {
        match self.layout {
            StateLayout::Planes => self.states.extend(state.to_bytes()),
            StateLayout::Packed => self.states.extend_from_slice(&state.to_packed_bytes()),
        }
        self.labels.push(label);
    }
}

impl Sink for NpySink {
    type Error = Infallible;

    fn persist(&mut self, state: EncodedState, label: f32) -> Result<(), Self::Error> {
        self.push(&state, label);
        Ok(())
    }
}

impl Extend<(EncodedState, f32)> for NpySink {
    fn extend<I: IntoIterator<Item = (EncodedState, f32)>>(&mut self, iter: I) {
        for (state, label) in iter {
            self.push(&state, label);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::channel;

    const RECORD: &str = "
        F5D6C3
        F5, 0, ----, D3, 0, ----, C4, 0, ----, E6, 0, ----
        F4, 3, ----, D6, -3, ----, F6, Win, ----
        C3, 1, 2.5, C5, Loss, ----
    ";

    #[test]
    fn parse_game_record() {
        let record: GameRecord = RECORD.parse().unwrap();
        assert_eq!(record.moves.len(), 3);
        assert_eq!(record.moves[2], "C3".parse().unwrap());
        assert_eq!(record.evaluations.len(), 3);
        assert!(record.evaluations[2].starts_with("C3, 1, 2.5"));

        assert!("F5D6Z9".parse::<GameRecord>().is_err());
        assert!("".parse::<GameRecord>().unwrap().moves.is_empty());
    }

    #[test]
    fn replay_persists_every_candidate() {
        let record: GameRecord = RECORD.parse().unwrap();
        let mut sink: Vec<(EncodedState, f32)> = Vec::new();
        let written = replay_record(&record.moves, &record.evaluations, &mut sink).unwrap();

        assert_eq!(written, 9);
        assert_eq!(sink.len(), 9);

        // Equal scores normalize to zero; outcomes keep their value.
        assert!(sink[..4].iter().all(|&(_, label)| label == 0.0));
        assert_eq!(sink[6].1, 1.0);
        assert_eq!(sink[8].1, -1.0);
        assert!(sink[4].1 > 0.0 && sink[5].1 < 0.0);

        // The first ply is encoded from the opening.
        let expected = encoder::encode(&Board::new(), "F5".parse().unwrap()).unwrap();
        assert_eq!(sink[0].0, expected);
        // Every example holds exactly one move square.
        for (state, _) in &sink {
            assert_eq!(state.plane(channel::MOVE).sum(), 1.0);
        }
    }

    #[test]
    fn replay_requires_evaluations() {
        let record: GameRecord = RECORD.parse().unwrap();
        let mut sink: Vec<(EncodedState, f32)> = Vec::new();
        let err = replay_record(&record.moves, &record.evaluations[..2], &mut sink).unwrap_err();

        assert!(matches!(err, RecordError::MissingEvaluations { ply: 3 }));
    }

    #[test]
    fn replay_rejects_illegal_moves() {
        let mut sink: Vec<(EncodedState, f32)> = Vec::new();

        let moves: Vec<Location> = vec!["A1".parse().unwrap()];
        let err = replay_record(&moves, &["F5, 1, ----"], &mut sink).unwrap_err();
        assert!(matches!(err, RecordError::IllegalMove { ply: 1, .. }));

        let moves: Vec<Location> = vec!["F5".parse().unwrap()];
        let err = replay_record(&moves, &["A1, 1, ----"], &mut sink).unwrap_err();
        assert!(matches!(err, RecordError::IllegalMove { ply: 1, .. }));

        let err = replay_record(&moves, &["F5, 1"], &mut sink).unwrap_err();
        assert!(matches!(err, RecordError::Evaluations { ply: 1, .. }));
    }

    #[test]
    fn replay_stops_when_nobody_can_move() {
        // Black wipes out White; a tenth ply cannot be played by anyone.
        let moves: Vec<Location> = ["E6", "F4", "E3", "F6", "G5", "D6", "E7", "F5", "C5", "A1"]
            .iter()
            .map(|text| text.parse().unwrap())
            .collect();
        let evaluations = vec![""; moves.len()];
        let mut sink = NpySink::new(StateLayout::Planes);

        let err = replay_record(&moves, &evaluations, &mut sink).unwrap_err();
        assert!(matches!(err, RecordError::Evaluations { ply: 1, .. }));

        let evaluations: Vec<String> = moves.iter().map(|m| format!("{}, 0, ----", m)).collect();
        let err = replay_record(&moves, &evaluations, &mut sink).unwrap_err();
        assert!(matches!(err, RecordError::NoLegalMoves { ply: 10 }));
        assert_eq!(sink.len(), 9);
    }

    #[test]
    fn npy_sink_shapes() {
        let board = Board::new();
        let state = encoder::encode(&board, "C4".parse().unwrap()).unwrap();

        let mut planes = NpySink::new(StateLayout::Planes);
        let mut packed = NpySink::new(StateLayout::Packed);
        assert!(planes.is_empty());
        for label in &[0.25, -0.5] {
            planes.persist(state.clone(), *label).unwrap();
        }
        packed.extend(vec![(state.clone(), 0.25), (state.clone(), -0.5)]);
        assert_eq!(packed.len(), 2);

        let (states, labels) = planes.to_arrays().unwrap();
        assert_eq!(states.shape(), &[2, CHANNELS, 8, 8]);
        assert_eq!(labels.as_slice().unwrap(), &[0.25, -0.5]);
        let bytes = state.to_bytes();
        assert_eq!(states.as_slice().unwrap()[..bytes.len()], bytes[..]);

        let (states, _) = packed.to_arrays().unwrap();
        assert_eq!(states.shape(), &[2, PACKED_BYTES]);
        assert_eq!(states.as_slice().unwrap()[..PACKED_BYTES], state.to_packed_bytes()[..]);
    }
}
