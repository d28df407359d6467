//! Featurization of a candidate move into a `(16, 8, 8)` tensor.
//!
//! Every plane is written in the move's canonical frame (see [`Region`]), so
//! positions related by a board symmetry produce the same tensor.

use crate::parity::{AreaState, ParityMap};
use crate::region::Region;
use crate::CHANNELS;
use byteorder::{BigEndian, ByteOrder};
use canon_othello::{Board, IllegalMoveError, Location, EDGE_LENGTH, NUM_SPACES};
use ndarray::{Array3, ArrayView2, ArrayView3};

/// Channel layout of an [`EncodedState`].
pub mod channel {
    pub const MOVER: usize = 0;
    pub const OPPONENT: usize = 1;
    pub const EMPTY: usize = 2;
    pub const MOVE: usize = 3;
    pub const CHANGED: usize = 4;
    pub const ODD_AREA: usize = 5;
    pub const EVEN_AREA: usize = 6;
    pub const PAST_EARLY_STAGE: usize = 7;
    pub const ODD_EMPTIES: usize = 8;
    pub const FAVORABLE_PARITY: usize = 9;
    /// Channels `FLIP_COUNT..FLIP_COUNT + 6` one-hot the number of times a
    /// square was set, saturating at 6.
    pub const FLIP_COUNT: usize = 10;
}

const MAX_FLIP_BUCKET: u16 = 6;

/// Bytes in the packed form of an [`EncodedState`].
pub const PACKED_BYTES: usize = CHANNELS * NUM_SPACES / 8;

/// A position encoded for one candidate move. Shape `(CHANNELS, 8, 8)`,
/// indexed `[channel, row, col]` in the canonical frame, values 0 or 1.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedState(Array3<f32>);

impl EncodedState {
    fn zeros() -> Self {
        Self(Array3::zeros((CHANNELS, EDGE_LENGTH, EDGE_LENGTH)))
    }

    pub fn as_array(&self) -> ArrayView3<f32> {
        self.0.view()
    }

    /// Get one `8x8` plane.
    pub fn plane(&self, channel: usize) -> ArrayView2<f32> {
        self.0.index_axis(ndarray::Axis(0), channel)
    }

    /// Pack each plane into a `u64`, upper-left square in the most significant bit.
    pub fn to_bits(&self) -> [u64; CHANNELS] {
        let mut bits = [0; CHANNELS];
        for ((channel, row, col), &value) in self.0.indexed_iter() {
            if value != 0.0 {
                bits[channel] |= 1 << (NUM_SPACES - 1 - (row * EDGE_LENGTH + col));
            }
        }
        bits
    }

    /// Pack the planes into big-endian bytes, channel 0 first.
    pub fn to_packed_bytes(&self) -> [u8; PACKED_BYTES] {
        let mut packed = [0; PACKED_BYTES];
        BigEndian::write_u64_into(&self.to_bits(), &mut packed);
        packed
    }

    /// Copy out as one byte per value, in `[channel, row, col]` order.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.iter().map(|&value| value as u8).collect()
    }

    fn set(&mut self, channel: usize, (col, row): (usize, usize)) {
        self.0[[channel, row, col]] = 1.0;
    }

    fn fill(&mut self, channel: usize) {
        self.0.index_axis_mut(ndarray::Axis(0), channel).fill(1.0);
    }
}

/// Encode `board` with the side to move playing `loc`.
/// `board` is not modified; fails if the move is illegal.
pub fn encode(board: &Board, loc: Location) -> Result<EncodedState, IllegalMoveError> {
    let mover = board.current_color();

    let mut after = board.clone();
    let flips = after.apply_move(loc)?;
    let transform = Region::classify(&after, loc, mover).transform();
    let parity = ParityMap::analyze(board);

    let mut state = EncodedState::zeros();

    for square in Location::all() {
        let target = transform.apply(square);

        match board.cell(square).player() {
            Some(player) if player == mover => state.set(channel::MOVER, target),
            Some(_) => state.set(channel::OPPONENT, target),
            None => state.set(channel::EMPTY, target),
        }

        match parity.area(square) {
            AreaState::Odd => state.set(channel::ODD_AREA, target),
            AreaState::Even => state.set(channel::EVEN_AREA, target),
            _ => {}
        }

        let flip_count = board.flip_count(square);
        if flip_count > 0 {
            let bucket = flip_count.min(MAX_FLIP_BUCKET) as usize;
            state.set(channel::FLIP_COUNT - 1 + bucket, target);
        }
    }

    state.set(channel::MOVE, transform.apply(loc));
    state.set(channel::CHANGED, transform.apply(loc));
    for &flipped in &flips {
        state.set(channel::CHANGED, transform.apply(flipped));
    }

    if !parity.early_stage {
        state.fill(channel::PAST_EARLY_STAGE);
    }
    if parity.empty_count % 2 == 1 {
        state.fill(channel::ODD_EMPTIES);
    }
    if parity.odd_count == 1 || parity.odd_count % 2 == 0 {
        state.fill(channel::FAVORABLE_PARITY);
    }

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Transform;

    fn loc(text: &str) -> Location {
        text.parse().unwrap()
    }

    fn count(state: &EncodedState, channel: usize) -> usize {
        state.plane(channel).iter().filter(|&&v| v == 1.0).count()
    }

    #[test]
    fn opening_move_planes() {
        let board = Board::new();
        let state = encode(&board, loc("F5")).unwrap();

        assert_eq!(state.as_array().shape(), &[CHANNELS, 8, 8]);
        assert_eq!(count(&state, channel::MOVER), 2);
        assert_eq!(count(&state, channel::OPPONENT), 2);
        assert_eq!(count(&state, channel::EMPTY), 60);
        assert_eq!(count(&state, channel::MOVE), 1);
        assert_eq!(count(&state, channel::CHANGED), 2);
        assert_eq!(count(&state, channel::ODD_AREA), 0);
        assert_eq!(count(&state, channel::EVEN_AREA), 60);
        assert_eq!(count(&state, channel::PAST_EARLY_STAGE), 0);
        assert_eq!(count(&state, channel::ODD_EMPTIES), 0);
        // Zero odd areas counts as even.
        assert_eq!(count(&state, channel::FAVORABLE_PARITY), 64);
        assert_eq!(count(&state, channel::FLIP_COUNT), 4);
        for bucket in 1..6 {
            assert_eq!(count(&state, channel::FLIP_COUNT + bucket), 0);
        }
    }

    #[test]
    fn move_lands_in_canonical_triangle() {
        let board = Board::new();
        for square in board.legal_moves() {
            let state = encode(&board, square).unwrap();
            let plane = state.plane(channel::MOVE);
            let (row, col) = plane
                .indexed_iter()
                .find(|&(_, &v)| v == 1.0)
                .map(|(index, _)| index)
                .unwrap();
            assert!(col >= row && col < 4, "{} -> ({}, {})", square, col, row);
        }
    }

    #[test]
    fn planes_follow_region_transform() {
        // F5 is region 7, the anti-transpose.
        let board = Board::new();
        let state = encode(&board, loc("F5")).unwrap();
        let transform = Transform::AntiTranspose;

        let (col, row) = transform.apply(loc("F5"));
        assert_eq!(state.plane(channel::MOVE)[[row, col]], 1.0);
        let (col, row) = transform.apply(loc("E5"));
        assert_eq!(state.plane(channel::CHANGED)[[row, col]], 1.0);
        let (col, row) = transform.apply(loc("E4"));
        assert_eq!(state.plane(channel::MOVER)[[row, col]], 1.0);
        let (col, row) = transform.apply(loc("D4"));
        assert_eq!(state.plane(channel::OPPONENT)[[row, col]], 1.0);
    }

    #[test]
    fn encode_leaves_board_untouched() {
        let board = Board::new();
        let before = board.clone();
        encode(&board, loc("D3")).unwrap();
        assert_eq!(board, before);
    }

    #[test]
    fn illegal_move_rejected() {
        let board = Board::new();
        assert_eq!(
            encode(&board, loc("A1")),
            Err(IllegalMoveError {
                location: loc("A1")
            })
        );
        assert!(encode(&board, loc("D4")).is_err());
    }

    #[test]
    fn flip_count_buckets() {
        let mut board = Board::new();
        // E5 starts at 1 and is flipped by the first three moves.
        for &text in &["F5", "F6", "E6", "F4"] {
            board.apply_move(loc(text)).unwrap();
            board.advance_turn(false);
        }
        assert_eq!(board.flip_count(loc("E5")), 4);

        let square = board.legal_moves().next().unwrap();
        let state = encode(&board, square).unwrap();

        let mut after = board.clone();
        after.apply_move(square).unwrap();
        let transform = Region::classify(&after, square, board.current_color()).transform();
        let (col, row) = transform.apply(loc("E5"));
        assert_eq!(state.plane(channel::FLIP_COUNT + 3)[[row, col]], 1.0);

        let occupied = 64 - board.disc_counts().empty as usize;
        let set: usize = (0..6).map(|b| count(&state, channel::FLIP_COUNT + b)).sum();
        assert_eq!(set, occupied);
    }

    #[test]
    fn parity_flags() {
        // One disc on the edge, and 59 empties in one area.
        let mut board: Board = "
            ---X----
            --------
            --------
            ---OX---
            ---XO---
            --------
            --------
            --------"
            .parse()
            .unwrap();
        board.advance_turn(false);
        let square = board.legal_moves().next().unwrap();
        let state = encode(&board, square).unwrap();

        assert_eq!(count(&state, channel::PAST_EARLY_STAGE), 64);
        assert_eq!(count(&state, channel::ODD_EMPTIES), 64);
        assert_eq!(count(&state, channel::ODD_AREA), 59);
        assert_eq!(count(&state, channel::FAVORABLE_PARITY), 64);
    }

    #[test]
    fn packed_forms_agree() {
        let board = Board::new();
        let state = encode(&board, loc("C4")).unwrap();

        let bits = state.to_bits();
        assert_eq!(bits[channel::FAVORABLE_PARITY], u64::MAX);
        assert_eq!(bits[channel::MOVE].count_ones(), 1);

        let bytes = state.to_bytes();
        assert_eq!(bytes.len(), CHANNELS * 64);
        for channel in 0..CHANNELS {
            for square in 0..64 {
                let bit = (bits[channel] >> (63 - square)) & 1;
                assert_eq!(bytes[channel * 64 + square] as u64, bit);
            }
        }

        let packed = state.to_packed_bytes();
        assert_eq!(BigEndian::read_u64(&packed[8 * channel::MOVE..]), bits[channel::MOVE]);
    }
}
