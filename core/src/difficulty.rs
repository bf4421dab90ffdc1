use alloc::string::ToString;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Named difficulty, only the fixed tiers feed aggregate stats.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Beginner,
    Intermediate,
    Expert,
    Custom,
}

impl Tier {
    pub const TRACKED: [Tier; 3] = [Tier::Beginner, Tier::Intermediate, Tier::Expert];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Expert => "expert",
            Self::Custom => "custom",
        }
    }

    pub const fn is_tracked(self) -> bool {
        !matches!(self, Self::Custom)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "expert" => Ok(Self::Expert),
            "custom" => Ok(Self::Custom),
            other => Err(GameError::UnknownTier(other.to_string())),
        }
    }
}

/// A tier together with the board it plays on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    pub tier: Tier,
    pub config: BoardConfig,
}

impl Difficulty {
    pub const CUSTOM_MIN_SIDE: Coord = 7;
    pub const CUSTOM_MAX_SIDE: Coord = 58;
    pub const CUSTOM_DEFAULT: BoardConfig = BoardConfig::new_unchecked((9, 9), 10);

    pub const fn beginner() -> Self {
        Self {
            tier: Tier::Beginner,
            config: BoardConfig::new_unchecked((9, 9), 10),
        }
    }

    pub const fn intermediate() -> Self {
        Self {
            tier: Tier::Intermediate,
            config: BoardConfig::new_unchecked((16, 16), 40),
        }
    }

    pub const fn expert() -> Self {
        Self {
            tier: Tier::Expert,
            config: BoardConfig::new_unchecked((30, 16), 99),
        }
    }

    /// Custom board clamped to `[7, 58]` per side and `[1, columns*rows - 1]` mines.
    pub fn custom(columns: Coord, rows: Coord, mines: CellCount) -> Self {
        let columns = columns.clamp(Self::CUSTOM_MIN_SIDE, Self::CUSTOM_MAX_SIDE);
        let rows = rows.clamp(Self::CUSTOM_MIN_SIDE, Self::CUSTOM_MAX_SIDE);
        let mines = mines.clamp(1, mult(columns, rows) - 1);
        Self {
            tier: Tier::Custom,
            config: BoardConfig::new_unchecked((columns, rows), mines),
        }
    }

    /// Preset for a fixed tier, `None` for [`Tier::Custom`].
    pub const fn preset(tier: Tier) -> Option<Self> {
        match tier {
            Tier::Beginner => Some(Self::beginner()),
            Tier::Intermediate => Some(Self::intermediate()),
            Tier::Expert => Some(Self::expert()),
            Tier::Custom => None,
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::beginner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_beginner() {
        assert_eq!(Tier::default(), Tier::Beginner);
        assert_eq!(Difficulty::default(), Difficulty::preset(Tier::default()).unwrap());
    }

    #[test]
    fn tier_names_roundtrip() {
        for tier in [Tier::Beginner, Tier::Intermediate, Tier::Expert, Tier::Custom] {
            assert_eq!(tier.as_str().parse::<Tier>(), Ok(tier));
        }
        assert!(matches!("Expert".parse::<Tier>(), Err(GameError::UnknownTier(_))));
    }

    #[test]
    fn custom_is_clamped_into_range() {
        let small = Difficulty::custom(2, 100, 0);
        assert_eq!(small.config.size, (7, 58));
        assert_eq!(small.config.mines, 1);

        let crowded = Difficulty::custom(7, 7, 60);
        assert_eq!(crowded.config.mines, 48);
        assert!(crowded.config.validate().is_ok());
    }

    #[test]
    fn presets_are_valid_and_tracked() {
        for tier in Tier::TRACKED {
            let difficulty = Difficulty::preset(tier).unwrap();
            assert!(difficulty.config.validate().is_ok());
            assert!(difficulty.tier.is_tracked());
        }
        assert!(!Tier::Custom.is_tracked());
        assert_eq!(Difficulty::preset(Tier::Custom), None);
    }
}
