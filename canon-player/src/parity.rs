//! Odd/even analysis of the empty squares.
//!
//! Splits the empty squares into 4-connected areas and classifies each by the
//! parity of its size, the classic endgame parity heuristic.

use arrayvec::ArrayVec;
use canon_othello::{utils, Board, Cell, Location, BOARD_WIDTH, NUM_SPACES};
use std::fmt;

/// Classification of one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AreaState {
    /// Empty and not yet reached by a flood fill.
    Empty,
    Odd,
    Even,
    /// Reached by the flood fill in progress.
    Unclassified,
    /// Holds a disc, or is part of the border.
    Occupied,
}

/// The parity partition of one board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParityMap {
    areas: [[AreaState; BOARD_WIDTH]; BOARD_WIDTH],
    pub odd_count: u8,
    pub even_count: u8,
    pub empty_count: u8,
    /// True while no disc has reached the outer ring.
    pub early_stage: bool,
}

/// 4-neighborhood steps `(dx, dy)`: W, N, E, S.
const NEIGHBORS: [(isize, isize); 4] = [(-1, 0), (0, -1), (1, 0), (0, 1)];

impl ParityMap {
    /// Partition the empty squares of `board`.
    pub fn analyze(board: &Board) -> Self {
        let mut map = Self {
            areas: [[AreaState::Occupied; BOARD_WIDTH]; BOARD_WIDTH],
            odd_count: 0,
            even_count: 0,
            empty_count: 0,
            early_stage: true,
        };

        for loc in Location::all() {
            match board.cell(loc) {
                Cell::Empty => map.areas[loc.row()][loc.col()] = AreaState::Empty,
                Cell::Black | Cell::White if loc.is_edge() => map.early_stage = false,
                _ => {}
            }
        }

        for loc in Location::all() {
            if map.areas[loc.row()][loc.col()] != AreaState::Empty {
                continue;
            }

            let size = map.flood(loc);
            map.empty_count += size;
            if size % 2 == 1 {
                map.odd_count += 1;
            } else {
                map.even_count += 1;
            }
        }

        map
    }

    /// Mark the area containing `start` and return its size.
    fn flood(&mut self, start: Location) -> u8 {
        let mut stack: ArrayVec<(usize, usize), NUM_SPACES> = ArrayVec::new();
        let mut area: ArrayVec<(usize, usize), NUM_SPACES> = ArrayVec::new();

        self.areas[start.row()][start.col()] = AreaState::Unclassified;
        stack.push((start.col(), start.row()));

        while let Some((col, row)) = stack.pop() {
            area.push((col, row));
            for &(dx, dy) in NEIGHBORS.iter() {
                // The border ring is Occupied, so neighbors never leave the grid.
                let next_col = (col as isize + dx) as usize;
                let next_row = (row as isize + dy) as usize;
                if self.areas[next_row][next_col] == AreaState::Empty {
                    self.areas[next_row][next_col] = AreaState::Unclassified;
                    stack.push((next_col, next_row));
                }
            }
        }

        let class = if area.len() % 2 == 1 {
            AreaState::Odd
        } else {
            AreaState::Even
        };
        for &(col, row) in area.iter() {
            self.areas[row][col] = class;
        }

        area.len() as u8
    }

    /// Get the classification of a playable square.
    pub fn area(&self, loc: Location) -> AreaState {
        self.areas[loc.row()][loc.col()]
    }

    /// Get the classification of a grid cell by 0-based grid coordinates.
    pub fn grid_area(&self, col: usize, row: usize) -> AreaState {
        self.areas[row][col]
    }
}

/// Render odd areas as `o`, even areas as `e` and discs as `#`.
impl fmt::Display for ParityMap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        utils::format_grid(f, |loc| match self.area(loc) {
            AreaState::Odd => 'o',
            AreaState::Even => 'e',
            AreaState::Occupied => '#',
            _ => '?',
        })
    }
}
