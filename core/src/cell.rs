use serde::{Deserialize, Serialize};

use crate::{CellIndex, Coord2};

/// One board position.
///
/// Opening a cell always clears its flag, so `opened && flagged` never holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    index: CellIndex,
    coords: Coord2,
    has_mine: bool,
    adjacent_mines: u8,
    opened: bool,
    flagged: bool,
}

impl Cell {
    pub(crate) const fn new(index: CellIndex, coords: Coord2) -> Self {
        Self {
            index,
            coords,
            has_mine: false,
            adjacent_mines: 0,
            opened: false,
            flagged: false,
        }
    }

    pub const fn index(&self) -> CellIndex {
        self.index
    }

    pub const fn coords(&self) -> Coord2 {
        self.coords
    }

    pub const fn has_mine(&self) -> bool {
        self.has_mine
    }

    /// Mines in the 3×3 block around this cell, valid once adjacency was recomputed.
    pub const fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    pub const fn is_opened(&self) -> bool {
        self.opened
    }

    pub const fn is_flagged(&self) -> bool {
        self.flagged
    }

    pub const fn view(&self) -> CellView {
        match (self.opened, self.flagged, self.has_mine) {
            (false, false, _) => CellView::Hidden,
            (false, true, _) => CellView::Flagged,
            (true, _, true) => CellView::Mine,
            (true, _, false) => CellView::Revealed(self.adjacent_mines),
        }
    }

    pub(crate) fn set_mine(&mut self, has_mine: bool) {
        self.has_mine = has_mine;
    }

    pub(crate) fn set_adjacent_mines(&mut self, count: u8) {
        self.adjacent_mines = count;
    }

    /// Marks the cell opened, returns whether a flag was removed in the process.
    pub(crate) fn open(&mut self) -> bool {
        self.opened = true;
        core::mem::replace(&mut self.flagged, false)
    }

    pub(crate) fn toggle_flag(&mut self) -> bool {
        self.flagged = !self.flagged;
        self.flagged
    }
}

/// What a renderer shows for a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    #[default]
    Hidden,
    Flagged,
    Revealed(u8),
    Mine,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_clears_flag() {
        let mut cell = Cell::new(0, (0, 0));
        assert!(cell.toggle_flag());
        assert_eq!(cell.view(), CellView::Flagged);

        assert!(cell.open());
        assert!(cell.is_opened());
        assert!(!cell.is_flagged());
    }

    #[test]
    fn view_shows_mine_only_when_opened() {
        let mut cell = Cell::new(3, (1, 0));
        cell.set_mine(true);
        assert_eq!(cell.view(), CellView::Hidden);
        assert_eq!(cell.view(), CellView::default());

        cell.open();
        assert_eq!(cell.view(), CellView::Mine);
    }
}
