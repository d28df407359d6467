//! Encodings must not depend on whether a position is played rotated half a
//! turn or mirrored along either center line.

use canon_othello::{Board, Location};
use canon_player::encoder;
use canon_player::parity::{AreaState, ParityMap};
use canon_player::region::Transform;
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;

/// Play `plies` random moves from the opening, passing when forced.
fn random_position(seed: u64, plies: usize) -> Board {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut board = Board::new();

    for _ in 0..plies {
        match board.legal_moves().choose(&mut rng) {
            Some(loc) => {
                board.apply_move(loc).unwrap();
                if board.is_game_over(false) {
                    break;
                }
                board.advance_turn(false);
            }
            None => {
                if board.is_game_over(true) {
                    break;
                }
                board.advance_turn(true);
            }
        }
    }

    board
}

fn assert_invariant(board: &Board, transform: Transform) {
    let mapped = board.remap(|loc| transform.map(loc));

    let moves: Vec<Location> = board.legal_moves().collect();
    let mut mapped_moves: Vec<Location> = mapped.legal_moves().collect();
    let mut expected: Vec<Location> = moves.iter().map(|&loc| transform.map(loc)).collect();
    mapped_moves.sort();
    expected.sort();
    assert_eq!(mapped_moves, expected);

    for loc in moves {
        let original = encoder::encode(board, loc).unwrap();
        let symmetric = encoder::encode(&mapped, transform.map(loc)).unwrap();
        assert_eq!(
            original.to_bits(),
            symmetric.to_bits(),
            "{:?} of move {} on\n{}",
            transform,
            loc,
            board
        );
    }
}

#[test]
fn rotated_positions_encode_identically() {
    for seed in 0..20 {
        for plies in &[0, 1, 5, 12, 30, 50] {
            let board = random_position(seed, *plies);
            assert_invariant(&board, Transform::Rotate180);
        }
    }
}

#[test]
fn mirrored_positions_encode_identically() {
    for seed in 100..110 {
        for plies in &[3, 20, 40] {
            let board = random_position(seed, *plies);
            assert_invariant(&board, Transform::MirrorHorizontal);
            assert_invariant(&board, Transform::MirrorVertical);
        }
    }
}

#[test]
fn opening_is_rotation_symmetric() {
    let board = Board::new();
    assert_eq!(board.remap(|loc| Transform::Rotate180.map(loc)), board);
    assert_eq!(board.remap(Location::transpose), board);
}

#[test]
fn opening_parity() {
    let parity = ParityMap::analyze(&Board::new());
    assert_eq!(parity.empty_count, 60);
    assert_eq!((parity.odd_count, parity.even_count), (0, 1));
    assert_eq!(parity.area("A1".parse().unwrap()), AreaState::Even);
}
