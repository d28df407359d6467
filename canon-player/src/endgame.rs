//! Exact win/loss search to the end of the game.

use crate::operator::Operator;
use arrayvec::ArrayVec;
use canon_othello::{Board, Location, LocationList, Player, NUM_SPACES};

/// Positions from this turn on are searched to the end of the game.
pub const ENDGAME_TURN: u32 = 50;

/// Most legal moves in any reachable position.
const MAX_MOVES: usize = 33;

/// Bound on any final margin, wider than the largest possible.
const MARGIN_BOUND: i8 = NUM_SPACES as i8 + 1;

/// Get the final disc margin for `player`, empty squares going to the winner.
fn margin(board: &Board, player: Player) -> i8 {
    let score = board.score();
    let (own, other) = match player {
        Player::Black => (score.black, score.white),
        Player::White => (score.white, score.black),
    };
    own as i8 - other as i8
}

/// Play `loc` on a copy of `board` and hand the turn over.
fn successor(board: &Board, loc: Location) -> Option<Board> {
    let mut next = board.clone();
    next.apply_move(loc).ok()?;
    next.advance_turn(false);
    Some(next)
}

/// Find the move with the best final margin for the side to move, and that margin.
/// Ties go to the earliest move in row-major order. None if the side to move must pass.
pub fn solve(board: &Board) -> Option<(Location, i8)> {
    let mut best: Option<(Location, i8)> = None;

    for loc in board.legal_moves() {
        let next = match successor(board, loc) {
            Some(next) => next,
            None => continue,
        };

        let alpha = best.map_or(-MARGIN_BOUND, |(_, value)| value);
        let value = -window(&next, -MARGIN_BOUND, -alpha);
        if best.is_none() || value > alpha {
            best = Some((loc, value));
        }
    }

    best
}

/// Search `board` to the end and get the final margin for the side to move,
/// clamped to `[alpha, beta]`.
pub fn window(board: &Board, alpha: i8, beta: i8) -> i8 {
    window_fastest_first(board, alpha, beta)
}

/// Window search, using "fastest first" move ordering which first
/// explores moves where the opponent has the fewest legal moves.
fn window_fastest_first(board: &Board, mut alpha: i8, beta: i8) -> i8 {
    // Below this many empties, stop sorting moves.
    const MAX_SORT_DEPTH: u8 = 6;

    if board.disc_counts().empty < MAX_SORT_DEPTH {
        return window_unsorted(board, alpha, beta);
    }

    let moves = board.legal_moves();
    if let Some(value) = terminal_or_pass(board, moves, alpha, beta, window_fastest_first) {
        return value;
    }

    let mut next_states: ArrayVec<Board, MAX_MOVES> =
        moves.filter_map(|loc| successor(board, loc)).collect();
    next_states.sort_by_key(|next| next.legal_moves().len());

    // Visit states by lowest-mobility first
    for next in next_states.iter() {
        let score = -window_fastest_first(next, -beta, -alpha);

        // Fail high: the opponent will not allow this line
        if score >= beta {
            return beta;
        }

        if score > alpha {
            alpha = score;
        }
    }

    alpha
}

/// Window search without move ordering, which is faster for shallow trees.
fn window_unsorted(board: &Board, mut alpha: i8, beta: i8) -> i8 {
    let moves = board.legal_moves();
    if let Some(value) = terminal_or_pass(board, moves, alpha, beta, window_unsorted) {
        return value;
    }

    for next in moves.filter_map(|loc| successor(board, loc)) {
        let score = -window_unsorted(&next, -beta, -alpha);

        if score >= beta {
            return beta;
        }

        if score > alpha {
            alpha = score;
        }
    }

    alpha
}

/// Settle nodes without a move to search: finished games, and forced passes
/// which continue with `search` from the opponent's side.
fn terminal_or_pass(
    board: &Board,
    moves: LocationList,
    alpha: i8,
    beta: i8,
    search: fn(&Board, i8, i8) -> i8,
) -> Option<i8> {
    if board.is_game_over(false) {
        return Some(clamp(margin(board, board.current_color()), alpha, beta));
    }

    if !moves.is_empty() {
        return None;
    }

    // Both players pass: game ends
    if board.is_game_over(true) {
        return Some(clamp(margin(board, board.current_color()), alpha, beta));
    }

    let mut passed = board.clone();
    passed.advance_turn(true);
    Some(-search(&passed, -beta, -alpha))
}

fn clamp(value: i8, alpha: i8, beta: i8) -> i8 {
    value.max(alpha).min(beta)
}

/// Plays perfectly from [`ENDGAME_TURN`] on, and defers to `fallback` before that.
pub struct EndgameOperator<O> {
    fallback: O,
    from_turn: u32,
}

impl<O: Operator> EndgameOperator<O> {
    pub fn new(fallback: O) -> Self {
        Self {
            fallback,
            from_turn: ENDGAME_TURN,
        }
    }

    /// Start searching at `turn` instead.
    pub fn from_turn(mut self, turn: u32) -> Self {
        self.from_turn = turn;
        self
    }
}

impl<O: Operator> Operator for EndgameOperator<O> {
    fn choose(&mut self, board: &Board, moves: LocationList) -> Option<Location> {
        if board.turn_count() >= self.from_turn {
            if let Some((loc, _)) = solve(board) {
                return Some(loc);
            }
        }
        self.fallback.choose(board, moves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::RandomOperator;
    use rand::rngs::StdRng;
    use rand::seq::IteratorRandom;
    use rand::SeedableRng;

    fn loc(text: &str) -> Location {
        text.parse().unwrap()
    }

    /// Play random moves until at most `empties` squares are left.
    fn late_position(seed: u64, empties: u8) -> Board {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut board = Board::new();

        while board.disc_counts().empty > empties && !board.is_game_over(false) {
            match board.legal_moves().choose(&mut rng) {
                Some(mv) => {
                    board.apply_move(mv).unwrap();
                    board.advance_turn(false);
                }
                None if board.is_game_over(true) => break,
                None => board.advance_turn(true),
            }
        }

        board
    }

    /// Plain negamax over every line, for reference.
    fn exhaustive(board: &Board) -> i8 {
        if board.is_game_over(false) {
            return margin(board, board.current_color());
        }

        let moves = board.legal_moves();
        if moves.is_empty() {
            if board.is_game_over(true) {
                return margin(board, board.current_color());
            }
            let mut passed = board.clone();
            passed.advance_turn(true);
            return -exhaustive(&passed);
        }

        moves
            .map(|mv| -exhaustive(&successor(board, mv).unwrap()))
            .max()
            .unwrap()
    }

    #[test]
    fn last_move_wipes_out() {
        let board: Board = "
            X X X X X X X X
            X X X X X X X X
            X X X X X X X X
            X X X X X X X X
            X X X X X X X X
            X X X X X X X X
            X X X X X X X X
            X X X X X X O ."
            .parse()
            .unwrap();

        assert_eq!(solve(&board), Some((loc("H8"), 64)));
        assert_eq!(window(&board, -MARGIN_BOUND, MARGIN_BOUND), 64);
    }

    #[test]
    fn forced_pass_is_searched() {
        let mut board: Board = "
            X X X X X X X X
            X X X X X X X X
            X X X X X X X X
            X X X X X X X X
            X X X X X X X X
            X X X X X X X X
            X X X X X X X X
            X X X X X X O ."
            .parse()
            .unwrap();
        board.advance_turn(false);

        // White has no move, so Black takes H8 after the pass.
        assert!(board.legal_moves().is_empty());
        assert_eq!(solve(&board), None);
        assert_eq!(window(&board, -MARGIN_BOUND, MARGIN_BOUND), -64);
    }

    #[test]
    fn search_matches_exhaustive() {
        for seed in 0..8 {
            let board = late_position(seed, 8);
            if board.is_game_over(false) || board.legal_moves().is_empty() {
                continue;
            }

            let expected = exhaustive(&board);
            let (best, value) = solve(&board).unwrap();
            assert_eq!(value, expected, "seed {} on\n{}", seed, board);
            assert_eq!(-exhaustive(&successor(&board, best).unwrap()), expected);

            // Windows around the value still see it; windows away from it clamp.
            assert_eq!(window(&board, expected - 1, expected + 1), expected);
            assert_eq!(window(&board, expected + 2, expected + 4), expected + 2);
            assert_eq!(window(&board, expected - 4, expected - 2), expected - 2);
        }
    }

    struct Fixed(Option<Location>);

    impl Operator for Fixed {
        fn choose(&mut self, _board: &Board, _moves: LocationList) -> Option<Location> {
            self.0
        }
    }

    #[test]
    fn operator_defers_before_endgame() {
        let board = Board::new();
        let mut operator = EndgameOperator::new(Fixed(Some(loc("A1"))));
        assert_eq!(operator.choose(&board, board.legal_moves()), Some(loc("A1")));
    }

    #[test]
    fn operator_solves_late_positions() {
        for seed in 20..24 {
            let board = late_position(seed, 7);
            let moves = board.legal_moves();
            if board.is_game_over(false) || moves.is_empty() {
                continue;
            }

            let mut operator = EndgameOperator::new(RandomOperator::new(seed)).from_turn(0);
            let choice = operator.choose(&board, moves).unwrap();
            assert!(moves.contains(choice));

            let value = -exhaustive(&successor(&board, choice).unwrap());
            assert_eq!(value, exhaustive(&board));
        }
    }
}
