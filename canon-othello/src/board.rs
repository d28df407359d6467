//! The bordered Othello board and its move dynamics.
//!
//! The 8x8 playing field is stored inside a 10x10 grid whose outer ring is
//! filled with [`Cell::Border`] sentinels, so walking along a ray always stops
//! before leaving the array. Cells are indexed `[row][column]` with the
//! playing field at `1..=8` on both axes.

use crate::game::{Player, Score};
use crate::location::{Location, LocationList};
use crate::{utils, EDGE_LENGTH, NUM_SPACES};
use arrayvec::ArrayVec;
use derive_more::{Deref, Display, Error};
use std::fmt;

/// Width of the board grid, including the border ring.
pub const BOARD_WIDTH: usize = EDGE_LENGTH + 2;

/// Upper bound on the discs a single move can flip: six along each direction.
pub const MAX_FLIPS: usize = 48;

/// The four discs of the standard opening.
const OPENING: [(Location, Player); 4] = [
    (Location::at(4, 4), Player::White),
    (Location::at(5, 4), Player::Black),
    (Location::at(4, 5), Player::Black),
    (Location::at(5, 5), Player::White),
];

/// Unit steps `(dx, dy)`: N, NE, E, SE, S, SW, W, NW.
const DIRECTIONS: [(isize, isize); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// The contents of one grid cell.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Black,
    White,
    Border,
}

impl Cell {
    /// Get the player owning the disc on this cell, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Black => Some(Player::Black),
            Cell::White => Some(Player::White),
            _ => None,
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::Black => Cell::Black,
            Player::White => Cell::White,
        }
    }
}

/// Number of cells in each playable state. Always sums to 64.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiscCounts {
    pub empty: u8,
    pub black: u8,
    pub white: u8,
}

impl DiscCounts {
    fn of_mut(&mut self, player: Player) -> &mut u8 {
        match player {
            Player::Black => &mut self.black,
            Player::White => &mut self.white,
        }
    }

    #[inline]
    fn total(self) -> usize {
        self.empty as usize + self.black as usize + self.white as usize
    }
}

/// Discs flipped by one move, ordered by direction and then outward along each ray.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deref)]
pub struct FlipSet(ArrayVec<Location, MAX_FLIPS>);

impl<'a> IntoIterator for &'a FlipSet {
    type Item = &'a Location;
    type IntoIter = std::slice::Iter<'a, Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Tried to place a disc where the active player has no legal move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Error)]
#[display(fmt = "illegal move {}", location)]
pub struct IllegalMoveError {
    pub location: Location,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Error)]
#[display(fmt = "board text must hold exactly 64 cells of 'X', 'O', '-' or '.'")]
pub struct ParseBoardError;

/// The complete state of an Othello board for one game session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; BOARD_WIDTH]; BOARD_WIDTH],
    counts: DiscCounts,
    flip_counts: [u16; NUM_SPACES],
    current_color: Player,
    turn_count: u32,
    passed_previously: bool,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Get a board set up in the standard opening position.
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.reset();
        board
    }

    /// A board with no discs, Black to move.
    fn empty() -> Self {
        let mut cells = [[Cell::Border; BOARD_WIDTH]; BOARD_WIDTH];
        for row in cells.iter_mut().take(EDGE_LENGTH + 1).skip(1) {
            for cell in row.iter_mut().take(EDGE_LENGTH + 1).skip(1) {
                *cell = Cell::Empty;
            }
        }

        Self {
            cells,
            counts: DiscCounts {
                empty: NUM_SPACES as u8,
                black: 0,
                white: 0,
            },
            flip_counts: [0; NUM_SPACES],
            current_color: Player::Black,
            turn_count: 1,
            passed_previously: false,
        }
    }

    /// Reset to the four-disc opening: D4 and E5 white, E4 and D5 black.
    pub fn reset(&mut self) {
        *self = Self::empty();
        for &(loc, player) in OPENING.iter() {
            self.place(loc, player);
        }
    }

    /// Put a disc on an empty square without any flipping.
    fn place(&mut self, loc: Location, player: Player) {
        self.cells[loc.row()][loc.col()] = Cell::from(player);
        self.counts.empty -= 1;
        *self.counts.of_mut(player) += 1;
        self.flip_counts[loc.to_index() as usize] = 1;
    }

    /// Get the contents of a playable square.
    #[inline]
    pub fn cell(&self, loc: Location) -> Cell {
        self.cells[loc.row()][loc.col()]
    }

    /// Get the contents of a grid cell by 0-based grid coordinates,
    /// where `0` and `9` address the border ring.
    #[inline]
    pub fn grid_cell(&self, col: usize, row: usize) -> Cell {
        self.cells[row][col]
    }

    pub fn disc_counts(&self) -> DiscCounts {
        self.counts
    }

    /// How many times a disc has been set on `loc`: once when placed,
    /// plus once per flip.
    pub fn flip_count(&self, loc: Location) -> u16 {
        self.flip_counts[loc.to_index() as usize]
    }

    pub fn current_color(&self) -> Player {
        self.current_color
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn passed_previously(&self) -> bool {
        self.passed_previously
    }

    /// Walk from `loc` along `(dx, dy)` and check whether `color` brackets a
    /// run of at least one opponent disc.
    fn brackets(&self, color: Player, loc: Location, (dx, dy): (isize, isize)) -> bool {
        let own = Cell::from(color);
        let opponent = Cell::from(!color);

        let mut col = loc.col() as isize + dx;
        let mut row = loc.row() as isize + dy;
        if self.cells[row as usize][col as usize] != opponent {
            return false;
        }

        loop {
            col += dx;
            row += dy;
            match self.cells[row as usize][col as usize] {
                cell if cell == opponent => continue,
                cell => return cell == own,
            }
        }
    }

    /// Whether `color` may place a disc on `loc`.
    pub fn is_legal_for(&self, color: Player, loc: Location) -> bool {
        self.cell(loc) == Cell::Empty
            && DIRECTIONS
                .iter()
                .any(|&direction| self.brackets(color, loc, direction))
    }

    /// Get the legal moves for `color`, in row-major order.
    /// An empty list means `color` must pass.
    pub fn legal_moves_for(&self, color: Player) -> LocationList {
        Location::all()
            .filter(|&loc| self.is_legal_for(color, loc))
            .collect()
    }

    /// Get the legal moves for the active player.
    pub fn legal_moves(&self) -> LocationList {
        self.legal_moves_for(self.current_color)
    }

    /// Compute the discs `color` would flip by moving to `loc`.
    /// Empty when the move is illegal.
    pub fn compute_flips_for(&self, color: Player, loc: Location) -> FlipSet {
        let mut flips = FlipSet::default();
        if self.cell(loc) != Cell::Empty {
            return flips;
        }

        let opponent = Cell::from(!color);
        for &(dx, dy) in DIRECTIONS.iter() {
            if !self.brackets(color, loc, (dx, dy)) {
                continue;
            }

            let mut col = loc.col() as isize + dx;
            let mut row = loc.row() as isize + dy;
            while self.cells[row as usize][col as usize] == opponent {
                // Bracketed rays never reach the border, so this always succeeds.
                if let Some(flipped) = Location::from_coords(col as u8, row as u8) {
                    flips.0.push(flipped);
                }
                col += dx;
                row += dy;
            }
        }

        flips
    }

    /// Compute the discs the active player would flip by moving to `loc`.
    pub fn compute_flips(&self, loc: Location) -> FlipSet {
        self.compute_flips_for(self.current_color, loc)
    }

    /// Place a disc for the active player and flip every bracketed disc.
    /// Does not hand over the turn; see [`Board::advance_turn`].
    ///
    /// Fails without touching the board if the move is not legal.
    pub fn apply_move(&mut self, loc: Location) -> Result<FlipSet, IllegalMoveError> {
        let flips = self.compute_flips(loc);
        if flips.is_empty() {
            return Err(IllegalMoveError { location: loc });
        }

        let color = self.current_color;
        let own = Cell::from(color);

        self.cells[loc.row()][loc.col()] = own;
        self.flip_counts[loc.to_index() as usize] += 1;
        self.counts.empty -= 1;
        *self.counts.of_mut(color) += 1;

        for flipped in &flips {
            self.cells[flipped.row()][flipped.col()] = own;
            self.flip_counts[flipped.to_index() as usize] += 1;
        }
        let flipped = flips.len() as u8;
        *self.counts.of_mut(color) += flipped;
        *self.counts.of_mut(!color) -= flipped;

        debug_assert_eq!(self.counts.total(), NUM_SPACES);
        Ok(flips)
    }

    /// Whether the game is over, given whether the active player just passed.
    ///
    /// The game ends when the board is full, when either player has no discs
    /// left, or when this pass follows a pass by the other player.
    pub fn is_game_over(&self, just_passed: bool) -> bool {
        self.counts.empty == 0
            || self.counts.black == 0
            || self.counts.white == 0
            || (just_passed && self.passed_previously)
    }

    /// Hand the turn to the other player, recording whether this turn was a pass.
    pub fn advance_turn(&mut self, passed: bool) {
        self.current_color = !self.current_color;
        self.turn_count += 1;
        self.passed_previously = passed;
    }

    /// Score the board, crediting all empty squares to the player with more discs.
    pub fn score(&self) -> Score {
        let DiscCounts {
            empty,
            mut black,
            mut white,
        } = self.counts;

        let winner = if black > white {
            black += empty;
            Some(Player::Black)
        } else if white > black {
            white += empty;
            Some(Player::White)
        } else {
            None
        };

        Score {
            winner,
            black,
            white,
        }
    }

    /// Build a copy of this board with every square moved by `f`.
    /// `f` must be a bijection on the 64 squares, e.g. a board symmetry.
    pub fn remap<F: Fn(Location) -> Location>(&self, f: F) -> Self {
        let mut remapped = self.clone();
        for loc in Location::all() {
            let target = f(loc);
            remapped.cells[target.row()][target.col()] = self.cell(loc);
            remapped.flip_counts[target.to_index() as usize] = self.flip_count(loc);
        }
        remapped
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        utils::format_grid(f, |loc| match self.cell(loc) {
            Cell::Black => 'X',
            Cell::White => 'O',
            _ => '.',
        })
    }
}

/// Parse 64 cells in row-major order: `X` black, `O` white, `-` or `.` empty.
/// Whitespace is ignored. Black is to move, and every disc counts as placed once.
impl std::str::FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut board = Self::empty();
        let mut cells = s.chars().filter(|c| !c.is_whitespace());

        for loc in Location::all() {
            match cells.next().ok_or(ParseBoardError)? {
                'X' | 'x' => board.place(loc, Player::Black),
                'O' | 'o' => board.place(loc, Player::White),
                '-' | '.' => {}
                _ => return Err(ParseBoardError),
            }
        }

        if cells.next().is_some() {
            return Err(ParseBoardError);
        }

        let discs = (board.counts.black + board.counts.white) as u32;
        board.turn_count = discs.saturating_sub(3).max(1);
        Ok(board)
    }
}
