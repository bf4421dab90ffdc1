use alloc::vec;
use alloc::vec::Vec;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    pub const fn outcome(self) -> Option<GameOutcome> {
        match self {
            Self::NotStarted | Self::InProgress => None,
            Self::Won => Some(GameOutcome::Won),
            Self::Lost => Some(GameOutcome::Lost),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Won,
    Lost,
}

/// Per-playthrough counters, replaced wholesale by a new game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    moves: u32,
    flagged_count: CellCount,
    elapsed_secs: u32,
    is_first_move: bool,
    state: GameState,
}

impl GameSession {
    pub const fn new() -> Self {
        Self {
            moves: 0,
            flagged_count: 0,
            elapsed_secs: 0,
            is_first_move: true,
            state: GameState::NotStarted,
        }
    }

    pub const fn moves(&self) -> u32 {
        self.moves
    }

    pub const fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    pub const fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub const fn is_first_move(&self) -> bool {
        self.is_first_move
    }

    pub const fn state(&self) -> GameState {
        self.state
    }

    pub const fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub const fn outcome(&self) -> Option<GameOutcome> {
        self.state.outcome()
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Final numbers of one game, handed to the stats recorder.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub outcome: GameOutcome,
    pub moves: u32,
    pub elapsed_secs: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The first cell was opened.
    Started,
    /// The game reached `Won` or `Lost`, queued once per game.
    Finished(GameSummary),
}

/// Drives reveal and flag actions against a [`Board`].
#[derive(Clone, Debug)]
pub struct GameEngine {
    board: Board,
    session: GameSession,
    rng: SmallRng,
    triggered_mine: Option<CellIndex>,
    relocation: Option<(CellIndex, CellIndex)>,
    events: Vec<GameEvent>,
}

impl GameEngine {
    /// New game with randomly placed mines, fully determined by `seed`.
    pub fn new(config: BoardConfig, seed: u64) -> Result<Self> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let generator = RandomMineGenerator::new(rng.random());
        Self::build(config, generator, rng)
    }

    /// New game whose mines come from `generator`, `seed` only drives first-click relocation.
    pub fn with_generator(
        config: BoardConfig,
        generator: impl MineGenerator,
        seed: u64,
    ) -> Result<Self> {
        Self::build(config, generator, SmallRng::seed_from_u64(seed))
    }

    fn build(config: BoardConfig, generator: impl MineGenerator, rng: SmallRng) -> Result<Self> {
        let mut board = Board::configure(config)?;
        board.place_mines(generator, None)?;
        Ok(Self {
            board,
            session: GameSession::new(),
            rng,
            triggered_mine: None,
            relocation: None,
            events: Vec::new(),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn state(&self) -> GameState {
        self.session.state
    }

    pub fn is_finished(&self) -> bool {
        self.session.is_finished()
    }

    pub fn moves(&self) -> u32 {
        self.session.moves
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.session.elapsed_secs
    }

    pub fn flagged_count(&self) -> CellCount {
        self.session.flagged_count
    }

    /// How many mines have not been flagged yet, negative when over-flagged.
    pub fn mines_left(&self) -> i32 {
        i32::from(self.board.mine_count()) - i32::from(self.session.flagged_count)
    }

    pub fn cell_view(&self, index: CellIndex) -> Result<CellView> {
        Ok(self.board.cell(index)?.view())
    }

    /// The mine that ended the game, if it was lost.
    pub fn triggered_mine(&self) -> Option<CellIndex> {
        self.triggered_mine
    }

    /// `(from, to)` of the mine moved away from the first opened cell, if any.
    pub fn relocation(&self) -> Option<(CellIndex, CellIndex)> {
        self.relocation
    }

    /// Drains queued lifecycle events in the order they happened.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        core::mem::take(&mut self.events)
    }

    /// Advances the clock by one second while the game is in progress.
    pub fn tick(&mut self) -> bool {
        if matches!(self.session.state, GameState::InProgress) {
            self.session.elapsed_secs = self.session.elapsed_secs.saturating_add(1);
            true
        } else {
            false
        }
    }

    pub fn open_cell(&mut self, index: CellIndex) -> Result<RevealOutcome> {
        self.board.validate_index(index)?;

        if self.session.is_finished() {
            return Ok(RevealOutcome::NoChange);
        }

        let cell = self.board.cell(index)?;
        if cell.is_opened() || cell.is_flagged() {
            return Ok(RevealOutcome::NoChange);
        }

        if self.session.state.is_initial() {
            self.start(index)?;
        }

        self.session.moves += 1;

        if self.board.cell(index)?.has_mine() {
            self.board.cell_mut(index).open();
            self.triggered_mine = Some(index);
            self.end_game(GameOutcome::Lost);
            return Ok(RevealOutcome::HitMine);
        }

        self.flood_open(index);

        if self.board.hidden_safe_count() == 0 {
            self.end_game(GameOutcome::Won);
            Ok(RevealOutcome::Won)
        } else {
            Ok(RevealOutcome::Revealed)
        }
    }

    pub fn toggle_flag(&mut self, index: CellIndex) -> Result<MarkOutcome> {
        self.board.validate_index(index)?;

        if self.session.is_finished() || self.board.cell(index)?.is_opened() {
            return Ok(MarkOutcome::NoChange);
        }

        if self.board.cell_mut(index).toggle_flag() {
            self.session.flagged_count += 1;
        } else {
            self.session.flagged_count = self.session.flagged_count.saturating_sub(1);
        }
        self.session.moves += 1;

        Ok(MarkOutcome::Changed)
    }

    /// First open: starts the clock, moves a mine away from `index` and fixes adjacency.
    fn start(&mut self, index: CellIndex) -> Result<()> {
        if let Some(target) = self.board.relocate_mine(index, index, &mut self.rng)? {
            self.relocation = Some((index, target));
        }
        self.board.recompute_adjacency();

        self.session.state = GameState::InProgress;
        self.session.is_first_move = false;
        self.events.push(GameEvent::Started);
        log::debug!("Game started at cell {}", index);
        Ok(())
    }

    /// Opens `index` and spreads through connected zero cells, clearing flags on the way.
    fn flood_open(&mut self, index: CellIndex) {
        let mut pending = vec![index];

        while let Some(visit) = pending.pop() {
            let cell = self.board.cell_mut(visit);
            if cell.is_opened() {
                continue;
            }

            if cell.open() {
                self.session.flagged_count = self.session.flagged_count.saturating_sub(1);
            }
            let adjacent_mines = cell.adjacent_mines();
            log::trace!("Opened cell {}, adjacent mines: {}", visit, adjacent_mines);

            if adjacent_mines == 0 {
                pending.extend(self.board.iter_neighbor_indices(visit));
            }
        }
    }

    fn end_game(&mut self, outcome: GameOutcome) {
        if self.session.is_finished() {
            return;
        }

        self.session.state = match outcome {
            GameOutcome::Won => GameState::Won,
            GameOutcome::Lost => GameState::Lost,
        };
        self.board.open_all();
        self.session.flagged_count = 0;

        let summary = GameSummary {
            outcome,
            moves: self.session.moves,
            elapsed_secs: self.session.elapsed_secs,
        };
        log::debug!("Game ended: {:?}", summary);
        self.events.push(GameEvent::Finished(summary));
    }
}
