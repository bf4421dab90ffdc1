use serde::{Deserialize, Serialize};

use crate::*;

/// Player-chosen difficulty as kept in the key-value store.
///
/// Stored under `level`, plus `columns`, `rows` and `mines` for the custom tier.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub difficulty: Difficulty,
}

impl Settings {
    pub const COLUMNS_KEY: &'static str = "columns";
    pub const ROWS_KEY: &'static str = "rows";
    pub const MINES_KEY: &'static str = "mines";

    pub fn new(difficulty: Difficulty) -> Self {
        Self { difficulty }
    }

    /// Reads the stored difficulty, writing back corrected values for anything missing or out of range.
    pub fn load(store: &mut impl KeyValueStore) -> Result<Self> {
        let tier = match store.load::<Tier>() {
            Some(tier) => tier,
            None => {
                log::warn!("No valid level stored, falling back to {}", Tier::default());
                store.save(&Tier::default())?;
                Tier::default()
            }
        };

        if let Some(difficulty) = Difficulty::preset(tier) {
            return Ok(Self::new(difficulty));
        }

        let default = Difficulty::CUSTOM_DEFAULT;
        let side_range = (
            i64::from(Difficulty::CUSTOM_MIN_SIDE),
            i64::from(Difficulty::CUSTOM_MAX_SIDE),
        );
        let columns = repair(store, Self::COLUMNS_KEY, default.columns().into(), side_range)?;
        let rows = repair(store, Self::ROWS_KEY, default.rows().into(), side_range)?;
        let mines = repair(
            store,
            Self::MINES_KEY,
            default.mines.into(),
            (1, columns * rows - 1),
        )?;

        // all three were clamped above, so the narrowing casts are lossless
        Ok(Self::new(Difficulty::custom(
            columns as Coord,
            rows as Coord,
            mines as CellCount,
        )))
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<()> {
        store.save(&self.difficulty.tier)?;
        if self.difficulty.tier == Tier::Custom {
            let config = self.difficulty.config;
            store.set(Self::COLUMNS_KEY, &config.columns())?;
            store.set(Self::ROWS_KEY, &config.rows())?;
            store.set(Self::MINES_KEY, &config.mines)?;
        }
        Ok(())
    }
}

/// Reads `key`, clamping into `min..=max` or falling back to `default`, and persists any correction.
fn repair(
    store: &mut impl KeyValueStore,
    key: &str,
    default: i64,
    (min, max): (i64, i64),
) -> Result<i64> {
    let value = match store.get::<i64>(key) {
        Some(value) if (min..=max).contains(&value) => return Ok(value),
        Some(value) => value.clamp(min, max),
        None => default,
    };
    log::debug!("Repairing stored {} to {}", key, value);
    store.set(key, &value)?;
    Ok(value)
}
