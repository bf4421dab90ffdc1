use crate::*;

/// One player's game: current settings, the live engine, and stats kept in `S`.
///
/// Engine events are forwarded to the [`StatsRecorder`] after every action, so
/// `played` is counted on the first open and the rest when the game ends.
/// Boards dealt from a caller-chosen generator are never recorded.
#[derive(Clone, Debug)]
pub struct Minesweeper<S> {
    settings: Settings,
    engine: GameEngine,
    recorder: StatsRecorder<S>,
    last_record: Option<RecordOutcome>,
    tracked: bool,
}

impl<S: KeyValueStore> Minesweeper<S> {
    /// Reads settings from `store` and deals a board for them.
    pub fn load(mut store: S, seed: u64) -> Result<Self> {
        let settings = Settings::load(&mut store)?;
        let engine = GameEngine::new(settings.difficulty.config, seed)?;
        Ok(Self {
            settings,
            engine,
            recorder: StatsRecorder::new(store),
            last_record: None,
            tracked: true,
        })
    }

    pub fn difficulty(&self) -> Difficulty {
        self.settings.difficulty
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn recorder(&self) -> &StatsRecorder<S> {
        &self.recorder
    }

    pub fn stats(&self, tier: Tier) -> DifficultyStats {
        self.recorder.load(tier)
    }

    /// Whether the current game feeds the stats of its tier.
    pub fn is_tracked(&self) -> bool {
        self.tracked && self.settings.difficulty.tier.is_tracked()
    }

    /// Record outcome of the last finished game, until a new game is dealt.
    pub fn last_record(&self) -> Option<RecordOutcome> {
        self.last_record
    }

    pub fn new_game(&mut self, seed: u64) -> Result<()> {
        let engine = GameEngine::new(self.settings.difficulty.config, seed)?;
        self.replace_engine(engine, true);
        Ok(())
    }

    /// Deals a board with mines chosen by `generator`, e.g. a preset layout.
    ///
    /// Such games are for debugging and leave the stats alone.
    pub fn new_game_with(&mut self, generator: impl MineGenerator, seed: u64) -> Result<()> {
        let engine = GameEngine::with_generator(self.settings.difficulty.config, generator, seed)?;
        self.replace_engine(engine, false);
        Ok(())
    }

    /// Switches difficulty, persists it, and deals a new board.
    pub fn set_difficulty(&mut self, difficulty: Difficulty, seed: u64) -> Result<()> {
        let engine = GameEngine::new(difficulty.config, seed)?;
        let settings = Settings::new(difficulty);
        settings.save(self.recorder.store_mut())?;
        self.settings = settings;
        self.replace_engine(engine, true);
        Ok(())
    }

    pub fn open_cell(&mut self, index: CellIndex) -> Result<RevealOutcome> {
        let outcome = self.engine.open_cell(index)?;
        self.dispatch_events()?;
        Ok(outcome)
    }

    pub fn toggle_flag(&mut self, index: CellIndex) -> Result<MarkOutcome> {
        let outcome = self.engine.toggle_flag(index)?;
        self.dispatch_events()?;
        Ok(outcome)
    }

    pub fn tick(&mut self) -> bool {
        self.engine.tick()
    }

    pub fn into_store(self) -> S {
        self.recorder.into_store()
    }

    fn replace_engine(&mut self, engine: GameEngine, tracked: bool) {
        log::debug!("New {} game, tracked: {}", self.settings.difficulty.tier, tracked);
        self.engine = engine;
        self.tracked = tracked;
        self.last_record = None;
    }

    /// Every queued event reaches the recorder, the first store error is returned afterwards.
    fn dispatch_events(&mut self) -> Result<()> {
        let events = self.engine.take_events();
        if !self.tracked {
            return Ok(());
        }

        let tier = self.settings.difficulty.tier;
        let mut first_error = None;
        for event in events {
            match self.recorder.handle(tier, &event) {
                Ok(Some(record)) => self.last_record = Some(record),
                Ok(None) => {}
                Err(err) => {
                    log::warn!("Failed to record {:?}: {}", event, err);
                    first_error.get_or_insert(err);
                }
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}
