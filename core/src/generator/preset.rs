use alloc::vec::Vec;

use super::*;

/// Places mines at fixed indices, used for debugging and reproducing boards.
#[derive(Clone, Debug, PartialEq)]
pub struct PresetMineGenerator {
    indices: Vec<CellIndex>,
}

impl PresetMineGenerator {
    pub fn new(indices: impl Into<Vec<CellIndex>>) -> Self {
        Self {
            indices: indices.into(),
        }
    }
}

impl MineGenerator for PresetMineGenerator {
    fn generate(self, config: BoardConfig, forbidden: Option<CellIndex>) -> Result<MineLayout> {
        if let Some(index) = forbidden.filter(|index| self.indices.contains(index)) {
            return Err(GameError::InvalidIndex(index));
        }

        let layout = MineLayout::from_mine_indices(config.size, &self.indices)?;
        if layout.mine_count() != config.mines {
            return Err(GameError::LayoutMismatch {
                expected: config.mines,
                actual: layout.mine_count(),
            });
        }

        Ok(layout)
    }
}
