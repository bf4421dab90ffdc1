#![no_std]

extern crate alloc;

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use difficulty::*;
pub use engine::*;
pub use error::*;
pub use game::*;
pub use generator::*;
pub use settings::*;
pub use stats::*;
pub use storage::*;
pub use types::*;

mod board;
mod cell;
mod difficulty;
mod engine;
mod error;
mod game;
mod generator;
mod settings;
mod stats;
mod storage;
mod types;

/// Board dimensions and mine count, `size` is `(columns, rows)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl BoardConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Clamps to the closest configuration that [`validate`](Self::validate) accepts, when one exists.
    pub fn new((columns, rows): Coord2, mines: CellCount) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        let max_mines = mult(columns, rows).saturating_sub(1).max(1);
        Self::new_unchecked((columns, rows), mines.clamp(1, max_mines))
    }

    pub const fn columns(&self) -> Coord {
        self.size.0
    }

    pub const fn rows(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cell_count(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }

    /// At least one column and row, at least one mine, and at least one safe cell.
    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Err(GameError::EmptyBoard);
        }

        if self.mines == 0 {
            return Err(GameError::NoMines);
        }

        let total = self.total_cells();
        if self.mines >= total {
            return Err(GameError::TooManyMines {
                mines: self.mines,
                eligible: total - 1,
            });
        }

        Ok(())
    }
}

/// Where the mines go, produced by a [`MineGenerator`] and applied to a [`Board`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX);
        Self {
            mine_mask,
            mine_count,
        }
    }

    pub fn from_mine_indices(size: Coord2, mine_indices: &[CellIndex]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());
        let total = mult(size.0, size.1);

        for &index in mine_indices {
            if index >= total {
                return Err(GameError::InvalidIndex(index));
            }
            mine_mask[coords_from_index(index, size.1).to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(mine_mask))
    }

    pub fn size(&self) -> Coord2 {
        let (x, y) = self.mine_mask.dim();
        (
            x.try_into().unwrap_or(Coord::MAX),
            y.try_into().unwrap_or(Coord::MAX),
        )
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, (x, y): Coord2) -> &Self::Output {
        &self.mine_mask[(x as usize, y as usize)]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_validation_rejects_degenerate_boards() {
        assert_eq!(
            BoardConfig::new_unchecked((0, 5), 1).validate(),
            Err(GameError::EmptyBoard)
        );
        assert_eq!(
            BoardConfig::new_unchecked((3, 3), 0).validate(),
            Err(GameError::NoMines)
        );
        assert_eq!(
            BoardConfig::new_unchecked((3, 3), 9).validate(),
            Err(GameError::TooManyMines {
                mines: 9,
                eligible: 8
            })
        );
        assert_eq!(BoardConfig::new_unchecked((2, 1), 1).validate(), Ok(()));
    }

    #[test]
    fn config_new_clamps_into_valid_range() {
        let config = BoardConfig::new((0, 4), 200);

        assert_eq!(config.size, (1, 4));
        assert_eq!(config.mines, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn layout_from_indices_uses_column_major_order() {
        let layout = MineLayout::from_mine_indices((3, 2), &[1, 4]).unwrap();

        assert_eq!(layout.mine_count(), 2);
        assert!(layout.contains_mine((0, 1)));
        assert!(layout.contains_mine((2, 0)));
        assert_eq!(
            MineLayout::from_mine_indices((3, 2), &[6]),
            Err(GameError::InvalidIndex(6))
        );
    }
}
