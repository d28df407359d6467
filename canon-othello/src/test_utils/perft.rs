//! "Perft" performance test: count the number of leaves at a given depth.
//! Useful for checking move generation against known counts.
//! See: http://www.aartbik.com/MISC/reversi.html

use crate::board::Board;

pub fn run_perft(depth: u64) -> u64 {
    leaves_below(&Board::new(), depth)
}

fn leaves_below(board: &Board, depth: u64) -> u64 {
    // Leaf node for this depth
    if depth == 0 {
        return 1;
    }

    let all_moves = board.legal_moves();
    if all_moves.is_empty() {
        // Both players passed: game is over
        if board.passed_previously() {
            return 1;
        }

        let mut passed = board.clone();
        passed.advance_turn(true);
        return leaves_below(&passed, depth - 1);
    }

    all_moves
        .map(|mv| {
            let mut child = board.clone();
            child
                .apply_move(mv)
                .expect("generated move was rejected as illegal");
            child.advance_turn(false);
            leaves_below(&child, depth - 1)
        })
        .sum()
}

#[test]
fn perft_01() {
    assert_eq!(run_perft(1), 4);
}

#[test]
fn perft_02() {
    assert_eq!(run_perft(2), 12);
}

#[test]
fn perft_03() {
    assert_eq!(run_perft(3), 56);
}

#[test]
fn perft_04() {
    assert_eq!(run_perft(4), 244);
}

#[test]
fn perft_05() {
    assert_eq!(run_perft(5), 1396);
}

#[test]
fn perft_06() {
    assert_eq!(run_perft(6), 8200);
}

#[test]
fn perft_07() {
    assert_eq!(run_perft(7), 55092);
}
