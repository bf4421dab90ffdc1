use ndarray::Array2;
use rand::prelude::*;

use super::*;

/// Uniform sampling without replacement over every eligible cell.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMineGenerator {
    seed: u64,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(self, config: BoardConfig, forbidden: Option<CellIndex>) -> Result<MineLayout> {
        let total_cells = config.total_cells();
        if let Some(index) = forbidden {
            if index >= total_cells {
                return Err(GameError::InvalidIndex(index));
            }
        }

        let eligible = eligible_cells(config, forbidden);
        if config.mines > eligible {
            return Err(GameError::TooManyMines {
                mines: config.mines,
                eligible,
            });
        }

        let rows = config.rows();
        let mut mines: Array2<bool> = Array2::default(config.size.to_nd_index());
        // park the forbidden cell as taken so the walk below skips it
        if let Some(index) = forbidden {
            mines[coords_from_index(index, rows).to_nd_index()] = true;
        }

        let mut free_cells = eligible;
        let mut mines_placed = 0;
        let mut rng = SmallRng::seed_from_u64(self.seed);
        while mines_placed < config.mines {
            if free_cells == 0 {
                break;
            }
            let mut place: CellCount = rng.random_range(0..free_cells);
            for (i, cell) in mines.iter_mut().enumerate() {
                let i = i as CellCount;
                if *cell {
                    place += 1;
                }
                if i == place {
                    *cell = true;
                    mines_placed += 1;
                    free_cells -= 1;
                    break;
                }
            }
        }

        // undo to keep the forbidden cell safe
        if let Some(index) = forbidden {
            mines[coords_from_index(index, rows).to_nd_index()] = false;
        }

        let layout = MineLayout::from_mine_mask(mines);
        if layout.mine_count() != config.mines {
            log::warn!(
                "Generated layout count mismatch, actual: {}, requested: {}",
                layout.mine_count(),
                config.mines
            );
            return Err(GameError::LayoutMismatch {
                expected: config.mines,
                actual: layout.mine_count(),
            });
        }
        log::debug!(
            "Placed {} mines on {}x{} board",
            config.mines,
            config.columns(),
            config.rows()
        );
        Ok(layout)
    }
}
