//! Implements game-level Othello logic.
//!
//! [`Game`] is the safe session-level driver: it pairs every placement or pass
//! with the turn bookkeeping of the underlying [`Board`] and remembers whether
//! the game has ended. Engines that need raw access can work with [`Board`]
//! directly.

use crate::board::{Board, FlipSet, IllegalMoveError};
use crate::location::{Location, LocationList};
use std::fmt;

/// One of the two players in a game.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Player {
    Black,
    White,
}

impl Default for Player {
    /// Gets the starting player (black).
    fn default() -> Self {
        Self::Black
    }
}

impl std::ops::Not for Player {
    type Output = Self;

    /// Gets the other player.
    fn not(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Black => f.write_str("black"),
            Player::White => f.write_str("white"),
        }
    }
}

/// Final disc counts, with the empty squares credited to the winner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Score {
    /// None for a draw.
    pub winner: Option<Player>,
    pub black: u8,
    pub white: u8,
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.winner {
            Some(player) => write!(f, "winner:{}", player)?,
            None => f.write_str("winner:draw")?,
        }
        write!(f, " black:{} white:{}", self.black, self.white)
    }
}

/// An action in an Othello game: pass or select a location.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Move(Location),
    Pass,
}

impl From<Location> for Action {
    fn from(loc: Location) -> Self {
        Self::Move(loc)
    }
}

/// A game session: one owned [`Board`] plus the termination flag.
#[derive(Clone, Debug, Default)]
pub struct Game {
    board: Board,
    finished: bool,
}

impl Game {
    /// Start a new game from the standard opening.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume a session from an existing board.
    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            finished: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Get the locations the active player may move to.
    pub fn legal_moves(&self) -> LocationList {
        self.board.legal_moves()
    }

    /// Take one action for the active player and hand the turn over.
    ///
    /// A placement must be legal, and a pass is only legal when no placement
    /// is. On error the session is left unchanged.
    pub fn act(&mut self, action: Action) -> Result<FlipSet, IllegalMoveError> {
        let (flips, passed) = match action {
            Action::Move(loc) => (self.board.apply_move(loc)?, false),
            Action::Pass => {
                if let Some(location) = self.board.legal_moves().next() {
                    return Err(IllegalMoveError { location });
                }
                (FlipSet::default(), true)
            }
        };

        if self.board.is_game_over(passed) {
            self.finished = true;
        } else {
            self.board.advance_turn(passed);
        }
        Ok(flips)
    }

    /// Whether the last action ended the game.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Get the winner-takes-empties score of the current board.
    pub fn score(&self) -> Score {
        self.board.score()
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.board)?;
        write!(
            f,
            "move count:{} move:{}",
            self.board.turn_count(),
            self.board.current_color()
        )?;
        if self.board.passed_previously() {
            f.write_str(" (last move was a pass)")?;
        }
        Ok(())
    }
}
