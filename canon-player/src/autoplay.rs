//! Self-play between two operators.

use crate::operator::Operator;
use canon_othello::{Action, Game, IllegalMoveError, Player, Score};

/// Play one game from the opening and return its final score.
/// Passes are played automatically. Fails if an operator picks an illegal move.
pub fn play_game<'a>(
    black: &'a mut dyn Operator,
    white: &'a mut dyn Operator,
) -> Result<Score, IllegalMoveError> {
    let mut game = Game::new();

    while !game.is_finished() {
        let board = game.board();
        let moves = board.legal_moves();
        let operator: &mut dyn Operator = match board.current_color() {
            Player::Black => &mut *black,
            Player::White => &mut *white,
        };

        let action = match operator.choose(board, moves) {
            Some(loc) => Action::Move(loc),
            None => Action::Pass,
        };
        game.act(action)?;
    }

    Ok(game.score())
}

/// Running win/loss/draw totals from one player's point of view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl Tally {
    /// Record the result of a game in which we played `color`.
    pub fn record(&mut self, score: Score, color: Player) {
        match score.winner {
            Some(winner) if winner == color => self.wins += 1,
            Some(_) => self.losses += 1,
            None => self.draws += 1,
        }
    }

    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.draws
    }
}
