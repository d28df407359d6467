//! Code for working with [`Location`]s on the Othello board.

use crate::EDGE_LENGTH;
use derive_more::{Display, Error, From, Into};
use std::fmt::{self, Formatter, Write};

const COLUMN_LETTERS: &str = "ABCDEFGH";
const ROW_DIGITS: &str = "12345678";

/// A playable square, stored as 1-based column and row.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct Location {
    // Row first, so the derived ordering is row-major.
    row: u8,
    col: u8,
}

/// An ordered set of locations, which can be iterated in row-major order.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, PartialOrd, Ord, From, Into)]
pub struct LocationList(u64);

/// Move text that does not name a square between `A1` and `H8`.
#[derive(Clone, Debug, PartialEq, Eq, Display, Error)]
#[display(fmt = "invalid coordinate text {:?}", text)]
pub struct InvalidCoordinateText {
    pub text: String,
}

impl Location {
    /// Construct from 1-based column and row coordinates.
    /// Returns None if either is outside `1..=8`.
    pub fn from_coords(col: u8, row: u8) -> Option<Self> {
        let valid = 1..=EDGE_LENGTH as u8;
        if valid.contains(&col) && valid.contains(&row) {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Construct from coordinates already known to lie in `1..=8`.
    pub(crate) const fn at(col: u8, row: u8) -> Self {
        Self { row, col }
    }

    /// Construct from a row-major square index in `0..64`.
    pub fn from_index(index: u8) -> Option<Self> {
        let edge = EDGE_LENGTH as u8;
        Self::from_coords(index % edge + 1, index / edge + 1)
    }

    /// Convert into a row-major square index in `0..64`.
    #[inline]
    pub fn to_index(self) -> u8 {
        (self.row - 1) * EDGE_LENGTH as u8 + (self.col - 1)
    }

    /// Get the 1-based `(column, row)` coordinates.
    #[inline]
    pub fn to_coords(self) -> (u8, u8) {
        (self.col, self.row)
    }

    /// 1-based column, `A` is 1.
    #[inline]
    pub fn col(self) -> usize {
        self.col as usize
    }

    /// 1-based row.
    #[inline]
    pub fn row(self) -> usize {
        self.row as usize
    }

    /// Iterate over all 64 locations in row-major order.
    pub fn all() -> impl Iterator<Item = Location> {
        (0..crate::NUM_SPACES as u8).filter_map(Location::from_index)
    }

    /// Whether this square lies on the outer ring of the board.
    pub fn is_edge(self) -> bool {
        let last = EDGE_LENGTH as u8;
        self.col == 1 || self.row == 1 || self.col == last || self.row == last
    }

    /// Mirror across the vertical center line (`A` <-> `H`).
    #[inline]
    pub fn flip_horizontal(self) -> Self {
        Self {
            row: self.row,
            col: EDGE_LENGTH as u8 + 1 - self.col,
        }
    }

    /// Mirror across the horizontal center line (`1` <-> `8`).
    #[inline]
    pub fn flip_vertical(self) -> Self {
        Self {
            row: EDGE_LENGTH as u8 + 1 - self.row,
            col: self.col,
        }
    }

    /// Mirror across the A1-H8 diagonal.
    #[inline]
    pub fn transpose(self) -> Self {
        Self {
            row: self.col,
            col: self.row,
        }
    }

    #[inline]
    fn bit(self) -> u64 {
        1 << self.to_index()
    }
}

/// Convert this [`Location`] into string notation ("C4").
impl fmt::Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let col_str = COLUMN_LETTERS
            .chars()
            .nth(self.col as usize - 1)
            .ok_or(fmt::Error)?;
        let row_str = ROW_DIGITS
            .chars()
            .nth(self.row as usize - 1)
            .ok_or(fmt::Error)?;
        f.write_char(col_str)?;
        f.write_char(row_str)
    }
}

/// Build a [`Location`] from 1-based string notation ("C4").
/// The column letter may be lower case.
impl std::str::FromStr for Location {
    type Err = InvalidCoordinateText;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || InvalidCoordinateText {
            text: s.to_string(),
        };

        let mut chars = s.chars();
        let col_str = chars.next().ok_or_else(err)?.to_ascii_uppercase();
        let col = COLUMN_LETTERS.find(col_str).ok_or_else(err)? as u8 + 1;
        let row = chars.next().ok_or_else(err)?.to_digit(10).ok_or_else(err)? as u8;

        if chars.next().is_some() {
            return Err(err());
        }

        Self::from_coords(col, row).ok_or_else(err)
    }
}

/// Parse algebraic move text into 1-based `(column, row)`.
pub fn move_to_coordinate(text: &str) -> Result<(u8, u8), InvalidCoordinateText> {
    text.parse::<Location>().map(Location::to_coords)
}

/// Render 1-based `(column, row)` as algebraic move text.
/// Returns None for coordinates off the board.
pub fn coordinate_to_move(col: u8, row: u8) -> Option<String> {
    Location::from_coords(col, row).map(|loc| loc.to_string())
}

impl LocationList {
    /// Returns whether the list is empty.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns whether `loc` is in this list.
    #[inline]
    pub fn contains(self, loc: Location) -> bool {
        self.0 & loc.bit() != 0
    }

    /// Add `loc` to this list.
    #[inline]
    pub fn insert(&mut self, loc: Location) {
        self.0 |= loc.bit();
    }
}

impl std::iter::FromIterator<Location> for LocationList {
    fn from_iter<I: IntoIterator<Item = Location>>(iter: I) -> Self {
        let mut list = Self::default();
        for loc in iter {
            list.insert(loc);
        }
        list
    }
}

impl ExactSizeIterator for LocationList {
    fn len(&self) -> usize {
        self.0.count_ones() as usize
    }
}

impl Iterator for LocationList {
    type Item = Location;

    fn next(&mut self) -> Option<Location> {
        if self.0 == 0 {
            return None;
        }

        let index = self.0.trailing_zeros() as u8;
        self.0 ^= 1 << index;

        Location::from_index(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl fmt::Display for LocationList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let string = self
            .into_iter()
            .map(|mv| mv.to_string())
            .collect::<Vec<String>>()
            .join(", ");

        f.write_fmt(format_args!("[{}]", string))
    }
}
