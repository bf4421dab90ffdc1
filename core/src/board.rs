use alloc::vec::Vec;
use ndarray::Array2;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Cells of one board, indexed `0..columns*rows` in column-major order.
///
/// Neighbor lookups go through coordinates, since column-major indices of
/// adjacent cells are not simply `±1` apart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    config: BoardConfig,
    cells: Array2<Cell>,
}

impl Board {
    pub fn configure(config: BoardConfig) -> Result<Self> {
        config.validate()?;

        let rows = config.rows();
        let cells = Array2::from_shape_fn(config.size.to_nd_index(), |(x, y)| {
            let coords = (x as Coord, y as Coord);
            Cell::new(index_from_coords(coords, rows), coords)
        });
        log::debug!(
            "Configured {}x{} board with {} mines",
            config.columns(),
            config.rows(),
            config.mines
        );

        Ok(Self { config, cells })
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn columns(&self) -> Coord {
        self.config.columns()
    }

    pub fn rows(&self) -> Coord {
        self.config.rows()
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines
    }

    pub fn total_cells(&self) -> CellCount {
        self.config.total_cells()
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.config.safe_cell_count()
    }

    pub fn validate_index(&self, index: CellIndex) -> Result<Coord2> {
        if index < self.total_cells() {
            Ok(coords_from_index(index, self.rows()))
        } else {
            Err(GameError::InvalidIndex(index))
        }
    }

    pub fn index_of(&self, coords: Coord2) -> Result<CellIndex> {
        let (columns, rows) = self.size();
        if coords.0 < columns && coords.1 < rows {
            Ok(index_from_coords(coords, rows))
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn cell(&self, index: CellIndex) -> Result<&Cell> {
        let coords = self.validate_index(index)?;
        Ok(&self.cells[coords.to_nd_index()])
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<&Cell> {
        let index = self.index_of(coords)?;
        self.cell(index)
    }

    /// All cells in index order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Number of cells currently holding a mine.
    pub fn mined_count(&self) -> CellCount {
        self.count_cells(|cell| cell.has_mine())
    }

    /// Cells that are neither mined nor opened, the game is won when this reaches zero.
    pub fn hidden_safe_count(&self) -> CellCount {
        self.count_cells(|cell| !cell.has_mine() && !cell.is_opened())
    }

    pub fn flagged_count(&self) -> CellCount {
        self.count_cells(|cell| cell.is_flagged())
    }

    /// Indices of the 3×3 block around `index`, the cell itself included.
    pub fn neighbors_of(&self, index: CellIndex) -> Result<SmallVec<[CellIndex; 9]>> {
        self.validate_index(index)?;
        Ok(self.iter_neighbor_indices(index).collect())
    }

    /// Replaces every mine with the layout chosen by `generator`.
    pub fn place_mines(
        &mut self,
        generator: impl MineGenerator,
        forbidden: Option<CellIndex>,
    ) -> Result<()> {
        if let Some(index) = forbidden {
            self.validate_index(index)?;
        }

        let layout = generator.generate(self.config, forbidden)?;
        if layout.size() != self.size() || layout.mine_count() != self.mine_count() {
            return Err(GameError::LayoutMismatch {
                expected: self.mine_count(),
                actual: layout.mine_count(),
            });
        }

        for cell in self.cells.iter_mut() {
            cell.set_mine(layout[cell.coords()]);
        }
        Ok(())
    }

    /// Moves the mine at `from` to a random mine-free cell other than `exclude`.
    ///
    /// Returns the new mine's index, or `None` when `from` held no mine.
    pub fn relocate_mine(
        &mut self,
        from: CellIndex,
        exclude: CellIndex,
        rng: &mut SmallRng,
    ) -> Result<Option<CellIndex>> {
        self.validate_index(exclude)?;
        if !self.cell(from)?.has_mine() {
            return Ok(None);
        }

        let candidates = self.count_cells(|cell| {
            cell.index() != exclude && (!cell.has_mine() || cell.index() == from)
        });
        if candidates == 0 {
            return Err(GameError::TooManyMines {
                mines: self.mined_count(),
                eligible: 0,
            });
        }

        self.cell_mut(from).set_mine(false);
        let total = self.total_cells();
        loop {
            let target: CellIndex = rng.random_range(0..total);
            if target == exclude || self.cell_mut(target).has_mine() {
                continue;
            }
            self.cell_mut(target).set_mine(true);
            log::debug!("Relocated mine from {} to {}", from, target);
            return Ok(Some(target));
        }
    }

    /// Refreshes every cell's adjacent mine count from the current mine placement.
    pub fn recompute_adjacency(&mut self) {
        let counts: Vec<u8> = self
            .cells
            .iter()
            .map(|cell| self.count_adjacent_mines(cell.coords()))
            .collect();

        for (cell, count) in self.cells.iter_mut().zip(counts) {
            cell.set_adjacent_mines(count);
        }
    }

    fn count_adjacent_mines(&self, coords: Coord2) -> u8 {
        NeighborIter::new(coords, self.size())
            .filter(|&pos| self.cells[pos.to_nd_index()].has_mine())
            .count() as u8
    }

    fn count_cells(&self, predicate: impl Fn(&Cell) -> bool) -> CellCount {
        self.cells.iter().filter(|cell| predicate(cell)).count() as CellCount
    }

    pub(crate) fn iter_neighbor_indices(
        &self,
        index: CellIndex,
    ) -> impl Iterator<Item = CellIndex> + use<> {
        let rows = self.rows();
        NeighborIter::new(coords_from_index(index, rows), self.size())
            .map(move |coords| index_from_coords(coords, rows))
    }

    /// Caller guarantees `index` was validated.
    pub(crate) fn cell_mut(&mut self, index: CellIndex) -> &mut Cell {
        let coords = coords_from_index(index, self.rows());
        &mut self.cells[coords.to_nd_index()]
    }

    /// Opens every cell, returns how many flags were cleared.
    pub(crate) fn open_all(&mut self) -> CellCount {
        self.cells
            .iter_mut()
            .map(|cell| cell.open())
            .filter(|&had_flag| had_flag)
            .count() as CellCount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(size: Coord2, mines: &[CellIndex]) -> Board {
        let mut board = Board::configure(BoardConfig::new_unchecked(size, mines.len() as CellCount))
            .unwrap();
        board
            .place_mines(PresetMineGenerator::new(mines), None)
            .unwrap();
        board.recompute_adjacency();
        board
    }

    #[test]
    fn cells_are_numbered_column_major() {
        let board = Board::configure(BoardConfig::new_unchecked((3, 2), 1)).unwrap();

        let coords: Vec<_> = board.cells().map(|cell| (cell.index(), cell.coords())).collect();

        assert_eq!(
            coords,
            [
                (0, (0, 0)),
                (1, (0, 1)),
                (2, (1, 0)),
                (3, (1, 1)),
                (4, (2, 0)),
                (5, (2, 1)),
            ]
        );
    }

    #[test]
    fn configure_rejects_invalid_config() {
        let err = Board::configure(BoardConfig::new_unchecked((2, 2), 4)).unwrap_err();

        assert!(err.is_configuration());
    }

    #[test]
    fn random_placement_sets_exact_count() {
        let mut board = Board::configure(BoardConfig::new_unchecked((9, 9), 10)).unwrap();

        board.place_mines(RandomMineGenerator::new(3), Some(40)).unwrap();

        assert_eq!(board.mined_count(), 10);
        assert!(!board.cell(40).unwrap().has_mine());
    }

    #[test]
    fn adjacency_counts_match_three_by_three_block() {
        let board = board((4, 4), &[0, 5, 15]);

        for cell in board.cells() {
            let expected = board
                .neighbors_of(cell.index())
                .unwrap()
                .iter()
                .filter(|&&i| board.cell(i).unwrap().has_mine())
                .count() as u8;
            assert_eq!(cell.adjacent_mines(), expected);
        }
        // (0,1) touches (0,0) and (1,1)
        assert_eq!(board.cell_at((0, 1)).unwrap().adjacent_mines(), 2);
    }

    #[test]
    fn neighbors_are_found_by_coordinates() {
        let board = board((3, 3), &[0]);

        // index 2 is (0,2) and index 3 is (1,0), not adjacent despite being consecutive
        let neighbors = board.neighbors_of(2).unwrap();

        assert_eq!(neighbors.as_slice(), &[1, 4, 2, 5]);
        assert!(!neighbors.contains(&3));
        assert_eq!(board.neighbors_of(9), Err(GameError::InvalidIndex(9)));
    }

    #[test]
    fn relocation_preserves_mine_count_and_clears_source() {
        let mut board = board((9, 9), &[40, 0, 1, 2, 3, 4, 5, 6, 7, 8]);
        let mut rng = SmallRng::seed_from_u64(11);

        let target = board.relocate_mine(40, 40, &mut rng).unwrap().unwrap();

        assert_ne!(target, 40);
        assert!(!board.cell(40).unwrap().has_mine());
        assert!(board.cell(target).unwrap().has_mine());
        assert_eq!(board.mined_count(), 10);
    }

    #[test]
    fn relocation_without_mine_is_noop() {
        let mut board = board((3, 3), &[0]);
        let mut rng = SmallRng::seed_from_u64(0);

        assert_eq!(board.relocate_mine(4, 4, &mut rng), Ok(None));
        assert_eq!(board.mined_count(), 1);
    }

    #[test]
    fn relocation_on_saturated_board_picks_only_free_cell() {
        // 2x2 with 3 mines: only index 3 is free, clicked cell 0 is mined
        let mut board = board((2, 2), &[0, 1, 2]);
        let mut rng = SmallRng::seed_from_u64(5);

        assert_eq!(board.relocate_mine(0, 0, &mut rng), Ok(Some(3)));
    }
}
