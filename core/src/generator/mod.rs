use crate::*;
pub use preset::*;
pub use random::*;

mod preset;
mod random;

/// Strategy deciding where the mines of a board go.
///
/// `forbidden`, when given, names a cell that must stay mine-free.
pub trait MineGenerator {
    fn generate(self, config: BoardConfig, forbidden: Option<CellIndex>) -> Result<MineLayout>;
}

/// Cells a generator may choose from once `forbidden` is taken out.
pub(crate) fn eligible_cells(config: BoardConfig, forbidden: Option<CellIndex>) -> CellCount {
    let total = config.total_cells();
    match forbidden {
        Some(index) if index < total => total - 1,
        _ => total,
    }
}
