//! Symmetry classes ("regions") of the board.
//!
//! The 8x8 board has the symmetries of a square. Every move is assigned one of
//! 16 regions, and each region selects the transform that carries the move
//! into a single canonical triangle (rows 1-4, column right of the diagonal).
//! Moves on a diagonal are fixed by a reflection, so for those the board
//! itself decides between the two candidate transforms.

use canon_othello::{Board, Location, Player};

/// Base region of every square, indexed `[row - 1][col - 1]`.
/// Off-diagonal squares take 0-7; the diagonals take 8, 10, 12 and 14.
const REGION_TABLE: [[u8; 8]; 8] = [
    [8, 0, 0, 0, 2, 2, 2, 10],
    [1, 8, 0, 0, 2, 2, 10, 3],
    [1, 1, 8, 0, 2, 10, 3, 3],
    [1, 1, 1, 8, 10, 3, 3, 3],
    [5, 5, 5, 12, 14, 7, 7, 7],
    [5, 5, 12, 4, 6, 14, 7, 7],
    [5, 12, 4, 4, 6, 6, 14, 7],
    [12, 4, 4, 4, 6, 6, 6, 14],
];

/// One of the eight symmetries of the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Transform {
    Identity,
    /// Mirror left-right.
    MirrorHorizontal,
    /// Mirror top-bottom.
    MirrorVertical,
    Rotate180,
    /// Mirror across the A1-H8 diagonal.
    Transpose,
    /// Rotate a quarter turn counter-clockwise.
    RotateLeft,
    /// Rotate a quarter turn clockwise.
    RotateRight,
    /// Mirror across the H1-A8 diagonal.
    AntiTranspose,
}

impl Transform {
    pub const ALL: [Transform; 8] = [
        Transform::Identity,
        Transform::MirrorHorizontal,
        Transform::MirrorVertical,
        Transform::Rotate180,
        Transform::Transpose,
        Transform::RotateLeft,
        Transform::RotateRight,
        Transform::AntiTranspose,
    ];

    /// Move a square to where this symmetry sends it.
    pub fn map(self, loc: Location) -> Location {
        match self {
            Transform::Identity => loc,
            Transform::MirrorHorizontal => loc.flip_horizontal(),
            Transform::MirrorVertical => loc.flip_vertical(),
            Transform::Rotate180 => loc.flip_horizontal().flip_vertical(),
            Transform::Transpose => loc.transpose(),
            Transform::RotateLeft => loc.flip_horizontal().transpose(),
            Transform::RotateRight => loc.flip_vertical().transpose(),
            Transform::AntiTranspose => loc.flip_horizontal().flip_vertical().transpose(),
        }
    }

    /// Get the 0-based `(column, row)` a square lands on, for tensor indexing.
    #[inline]
    pub fn apply(self, loc: Location) -> (usize, usize) {
        let mapped = self.map(loc);
        (mapped.col() - 1, mapped.row() - 1)
    }

    /// Get the symmetry that undoes this one.
    pub fn inverse(self) -> Self {
        match self {
            Transform::RotateLeft => Transform::RotateRight,
            Transform::RotateRight => Transform::RotateLeft,
            other => other,
        }
    }

    /// Apply this symmetry, then mirror across the A1-H8 diagonal.
    pub fn then_transpose(self) -> Self {
        match self {
            Transform::Identity => Transform::Transpose,
            Transform::MirrorHorizontal => Transform::RotateLeft,
            Transform::MirrorVertical => Transform::RotateRight,
            Transform::Rotate180 => Transform::AntiTranspose,
            Transform::Transpose => Transform::Identity,
            Transform::RotateLeft => Transform::MirrorHorizontal,
            Transform::RotateRight => Transform::MirrorVertical,
            Transform::AntiTranspose => Transform::Rotate180,
        }
    }
}

/// A symmetry class of a move, in `0..16`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Region(u8);

impl Region {
    /// The number of distinct regions.
    pub const COUNT: usize = 16;

    /// Look up the static region of a square.
    pub fn base(loc: Location) -> Self {
        Self(REGION_TABLE[loc.row() - 1][loc.col() - 1])
    }

    /// Classify a move from the board after it was played.
    ///
    /// Diagonal moves are refined by viewing `board` through the base
    /// transform and comparing each square above the diagonal with its mirror
    /// below it.
    pub fn classify(board: &Board, loc: Location, mover: Player) -> Self {
        let base = Self::base(loc);
        if base.is_diagonal() && needs_transpose(board, base.transform(), mover) {
            Self(base.0 + 1)
        } else {
            base
        }
    }

    /// Whether this region lies on one of the two long diagonals.
    pub fn is_diagonal(self) -> bool {
        self.0 >= 8
    }

    pub fn id(self) -> u8 {
        self.0
    }

    /// Get the transform that canonicalizes coordinates for this region.
    pub fn transform(self) -> Transform {
        match self.0 {
            0 | 8 => Transform::Identity,
            2 | 10 => Transform::MirrorHorizontal,
            4 | 12 => Transform::MirrorVertical,
            6 | 14 => Transform::Rotate180,
            1 | 9 => Transform::Transpose,
            3 | 11 => Transform::RotateLeft,
            5 | 13 => Transform::RotateRight,
            _ => Transform::AntiTranspose,
        }
    }
}

/// Check the board, seen through `frame`, for asymmetry across the main diagonal.
/// At the first square above the diagonal that differs from its mirror, the
/// transpose is needed unless that upper square holds a `mover` disc.
fn needs_transpose(board: &Board, frame: Transform, mover: Player) -> bool {
    let source = frame.inverse();

    for upper in Location::all().filter(|loc| loc.col() > loc.row()) {
        let above = board.cell(source.map(upper));
        let below = board.cell(source.map(upper.transpose()));
        if above != below {
            return above.player() != Some(mover);
        }
    }

    false
}
