//! Text rendering shared by board-shaped types.

use crate::location::Location;
use std::fmt::{self, Formatter};

/// Write a grid labelled with column letters and row digits, one board row
/// per line, asking `symbol` for the character of each square.
pub fn format_grid<F: Fn(Location) -> char>(f: &mut Formatter, symbol: F) -> fmt::Result {
    f.write_str("  A B C D E F G H")?;

    for loc in Location::all() {
        if loc.col() == 1 {
            write!(f, "\n{}", loc.row())?;
        }
        write!(f, " {}", symbol(loc))?;
    }

    Ok(())
}
