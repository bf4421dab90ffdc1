use alloc::string::String;
use thiserror::Error;

use crate::{CellCount, CellIndex};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board needs at least one column and one row")]
    EmptyBoard,
    #[error("Board needs at least one mine")]
    NoMines,
    #[error("Too many mines, requested {mines} but only {eligible} cells are eligible")]
    TooManyMines {
        mines: CellCount,
        eligible: CellCount,
    },
    #[error("Mine layout does not match the board, expected {expected} mines but got {actual}")]
    LayoutMismatch {
        expected: CellCount,
        actual: CellCount,
    },
    #[error("Unknown difficulty tier {0:?}")]
    UnknownTier(String),
    #[error("Invalid cell index {0}")]
    InvalidIndex(CellIndex),
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Storage failure: {0}")]
    Storage(String),
}

impl GameError {
    /// Errors that reject a board before any session can start.
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::EmptyBoard
                | Self::NoMines
                | Self::TooManyMines { .. }
                | Self::LayoutMismatch { .. }
                | Self::UnknownTier(_)
        )
    }

    /// Errors raised by a player action that referenced a cell outside the board.
    pub const fn is_invalid_operation(&self) -> bool {
        matches!(self, Self::InvalidIndex(_) | Self::InvalidCoords)
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
