//! Decoded board: an 11×11 array of cell symbols plus the display-only view
//! that overlays highlights and the king-on-restricted variant.

use core::fmt;

use crate::bitboard::TileSet;
use crate::common::{Coord, Side};
use crate::config::{is_restricted, BOARD_SIZE, RESTRICTED};

const N: usize = BOARD_SIZE as usize;

/// A stored cell symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Cell {
    #[default]
    Empty,
    Attacker,
    Defender,
    King,
    /// Corner or throne with nothing on it.
    Restricted,
}

impl Cell {
    /// Side a piece belongs to. The king fights for the defenders.
    pub fn side(self) -> Option<Side> {
        match self {
            Cell::Attacker => Some(Side::Attackers),
            Cell::Defender | Cell::King => Some(Side::Defenders),
            Cell::Empty | Cell::Restricted => None,
        }
    }

    pub fn is_piece(self) -> bool {
        self.side().is_some()
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Attacker => 'b',
            Cell::Defender => 'w',
            Cell::King => 'k',
            Cell::Restricted => 'x',
        }
    }
}

/// What a front-end should draw for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellView {
    Empty,
    Attacker,
    Defender,
    King,
    Restricted,
    /// King standing on a corner or the throne.
    KingOnRestricted,
    /// Legal destination of the current selection.
    Highlighted,
    /// The currently selected piece.
    Selected(Cell),
}

impl CellView {
    pub fn symbol(self) -> char {
        match self {
            CellView::Empty => '.',
            CellView::Attacker => 'b',
            CellView::Defender => 'w',
            CellView::King => 'k',
            CellView::Restricted => 'x',
            CellView::KingOnRestricted => 'K',
            CellView::Highlighted => '*',
            CellView::Selected(cell) => cell.symbol().to_ascii_uppercase(),
        }
    }
}

/// The renderable form of a position's board. Always produced fresh by the
/// decoder; callers never patch it in place.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: [[Cell; N]; N],
}

impl Grid {
    /// All empty, with the corners and throne marked restricted.
    pub fn new() -> Self {
        let mut cells = [[Cell::Empty; N]; N];
        for coord in RESTRICTED {
            cells[coord.row()][coord.col()] = Cell::Restricted;
        }
        Grid { cells }
    }

    pub fn get(&self, coord: Coord) -> Option<Cell> {
        self.cells
            .get(coord.row())
            .and_then(|row| row.get(coord.col()))
            .copied()
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, cell: Cell) -> bool {
        match self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    pub fn rows(&self) -> &[[Cell; N]; N] {
        &self.cells
    }

    /// Number of cells holding pieces of `side` (king included for defenders).
    pub fn count(&self, side: Side) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.side() == Some(side))
            .count()
    }

    pub fn king(&self) -> Option<Coord> {
        self.coords().find(|c| self.get(*c) == Some(Cell::King))
    }

    /// Every board coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        (0..BOARD_SIZE).flat_map(|r| (0..BOARD_SIZE).map(move |c| Coord::new(r, c)))
    }

    /// Display view of one cell given the current selection.
    pub fn view_cell(&self, coord: Coord, origin: Option<Coord>, highlights: &TileSet) -> CellView {
        let cell = match self.get(coord) {
            Some(cell) => cell,
            None => return CellView::Empty,
        };
        if origin == Some(coord) {
            return CellView::Selected(cell);
        }
        if highlights.contains(coord) {
            return CellView::Highlighted;
        }
        match cell {
            Cell::Empty => CellView::Empty,
            Cell::Attacker => CellView::Attacker,
            Cell::Defender => CellView::Defender,
            Cell::King if is_restricted(coord) => CellView::KingOnRestricted,
            Cell::King => CellView::King,
            Cell::Restricted => CellView::Restricted,
        }
    }

    /// Display view of the whole board.
    pub fn view(&self, origin: Option<Coord>, highlights: &TileSet) -> [[CellView; N]; N] {
        let mut out = [[CellView::Empty; N]; N];
        for coord in self.coords() {
            out[coord.row()][coord.col()] = self.view_cell(coord, origin, highlights);
        }
        out
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid:")?;
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.view(None, &TileSet::new());
        for (r, row) in view.iter().enumerate() {
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
            if r + 1 < N {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
