use alloc::format;
use alloc::string::String;
use serde::{Deserialize, Serialize};

use crate::*;

/// Aggregate results for one tier.
///
/// Bests are `None` until the first win. A stored `0` reads as unset, so a
/// 0-second win never becomes a best time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DifficultyStats {
    pub played: u32,
    pub won: u32,
    pub best_moves: Option<u32>,
    pub best_time_secs: Option<u32>,
    pub total_moves: u64,
    pub total_time_secs: u64,
    pub win_percentage: Option<f64>,
}

impl DifficultyStats {
    /// `won / played`, unset while nothing was played.
    pub fn compute_win_percentage(&self) -> Option<f64> {
        (self.played > 0).then(|| f64::from(self.won) / f64::from(self.played))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum StatField {
    Played,
    Won,
    BestMoves,
    BestTime,
    TotalMoves,
    TotalTime,
    WinPercentage,
}

impl StatField {
    const fn suffix(self) -> &'static str {
        match self {
            Self::Played => "Played",
            Self::Won => "Won",
            Self::BestMoves => "BestMoves",
            Self::BestTime => "BestTime",
            Self::TotalMoves => "TotalMoves",
            Self::TotalTime => "TotalTime",
            Self::WinPercentage => "WinPercentage",
        }
    }

    fn key(self, tier: Tier) -> String {
        format!("{}{}", tier.as_str(), self.suffix())
    }
}

/// Whether a finished game set a personal record, for the UI to celebrate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordOutcome {
    pub new_best_moves: bool,
    pub new_best_time: bool,
}

impl RecordOutcome {
    pub const fn is_new_best(self) -> bool {
        self.new_best_moves || self.new_best_time
    }
}

/// Keeps per-tier [`DifficultyStats`] in a [`KeyValueStore`].
///
/// Untracked tiers (custom boards) are ignored.
#[derive(Clone, Debug, Default)]
pub struct StatsRecorder<S> {
    store: S,
}

impl<S: KeyValueStore> StatsRecorder<S> {
    pub const NEW_BEST_MOVES_KEY: &'static str = "newBestMoves";
    pub const NEW_BEST_TIME_KEY: &'static str = "newBestTime";

    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn load(&self, tier: Tier) -> DifficultyStats {
        let read_best = |field: StatField| {
            self.store
                .get::<u32>(&field.key(tier))
                .filter(|&best| best > 0)
        };

        DifficultyStats {
            played: self.store.get(&StatField::Played.key(tier)).unwrap_or(0),
            won: self.store.get(&StatField::Won.key(tier)).unwrap_or(0),
            best_moves: read_best(StatField::BestMoves),
            best_time_secs: read_best(StatField::BestTime),
            total_moves: self.store.get(&StatField::TotalMoves.key(tier)).unwrap_or(0),
            total_time_secs: self.store.get(&StatField::TotalTime.key(tier)).unwrap_or(0),
            win_percentage: self.store.get(&StatField::WinPercentage.key(tier)),
        }
    }

    /// Feeds one engine event, returns the record outcome for a finished game.
    pub fn handle(&mut self, tier: Tier, event: &GameEvent) -> Result<Option<RecordOutcome>> {
        match event {
            GameEvent::Started => {
                self.record_start(tier)?;
                Ok(None)
            }
            GameEvent::Finished(summary) => self.record_finish(tier, summary).map(Some),
        }
    }

    /// Counts a game as played, done when its first cell is opened.
    pub fn record_start(&mut self, tier: Tier) -> Result<()> {
        if !tier.is_tracked() {
            return Ok(());
        }

        let played = self.load(tier).played.saturating_add(1);
        log::debug!("{} played: {}", tier, played);
        self.store.set(&StatField::Played.key(tier), &played)
    }

    pub fn record_finish(&mut self, tier: Tier, summary: &GameSummary) -> Result<RecordOutcome> {
        let mut outcome = RecordOutcome::default();
        if !tier.is_tracked() {
            return Ok(outcome);
        }

        let mut stats = self.load(tier);
        if summary.outcome == GameOutcome::Won {
            stats.won = stats.won.saturating_add(1);

            if improves(stats.best_moves, summary.moves) {
                stats.best_moves = Some(summary.moves);
                outcome.new_best_moves = true;
            }
            if improves(stats.best_time_secs, summary.elapsed_secs) {
                stats.best_time_secs = Some(summary.elapsed_secs);
                outcome.new_best_time = true;
            }
        }
        stats.total_moves = stats.total_moves.saturating_add(summary.moves.into());
        stats.total_time_secs = stats
            .total_time_secs
            .saturating_add(summary.elapsed_secs.into());
        stats.win_percentage = stats.compute_win_percentage();

        self.save(tier, &stats)?;
        if outcome.new_best_moves {
            self.store.set(Self::NEW_BEST_MOVES_KEY, &true)?;
        }
        if outcome.new_best_time {
            self.store.set(Self::NEW_BEST_TIME_KEY, &true)?;
        }
        log::debug!("{} stats after game: {:?}", tier, stats);

        Ok(outcome)
    }

    fn save(&mut self, tier: Tier, stats: &DifficultyStats) -> Result<()> {
        use StatField::*;

        self.store.set(&Played.key(tier), &stats.played)?;
        self.store.set(&Won.key(tier), &stats.won)?;
        if let Some(best) = stats.best_moves {
            self.store.set(&BestMoves.key(tier), &best)?;
        }
        if let Some(best) = stats.best_time_secs {
            self.store.set(&BestTime.key(tier), &best)?;
        }
        self.store.set(&TotalMoves.key(tier), &stats.total_moves)?;
        self.store.set(&TotalTime.key(tier), &stats.total_time_secs)?;
        if let Some(percentage) = stats.win_percentage {
            self.store.set(&WinPercentage.key(tier), &percentage)?;
        }
        Ok(())
    }
}

/// Zero is the unset marker in the store and can't be recorded as a best.
fn improves(best: Option<u32>, value: u32) -> bool {
    value > 0 && best.is_none_or(|best| value < best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn won(moves: u32, elapsed_secs: u32) -> GameSummary {
        GameSummary {
            outcome: GameOutcome::Won,
            moves,
            elapsed_secs,
        }
    }

    fn lost(moves: u32, elapsed_secs: u32) -> GameSummary {
        GameSummary {
            outcome: GameOutcome::Lost,
            moves,
            elapsed_secs,
        }
    }

    #[test]
    fn keys_follow_tier_prefix() {
        assert_eq!(StatField::BestTime.key(Tier::Beginner), "beginnerBestTime");
        assert_eq!(
            StatField::WinPercentage.key(Tier::Intermediate),
            "intermediateWinPercentage"
        );
    }

    #[test]
    fn first_win_sets_bests_and_percentage() {
        let mut recorder = StatsRecorder::new(MemoryStore::new());

        recorder.record_start(Tier::Beginner).unwrap();
        let outcome = recorder.record_finish(Tier::Beginner, &won(30, 45)).unwrap();

        assert!(outcome.new_best_moves && outcome.new_best_time);
        let stats = recorder.load(Tier::Beginner);
        assert_eq!(stats.played, 1);
        assert_eq!(stats.won, 1);
        assert_eq!(stats.best_moves, Some(30));
        assert_eq!(stats.best_time_secs, Some(45));
        assert_eq!(stats.win_percentage, Some(1.0));
        assert_eq!(recorder.store().get::<bool>("newBestMoves"), Some(true));
    }

    #[test]
    fn only_strictly_better_wins_replace_bests() {
        let mut recorder = StatsRecorder::new(MemoryStore::new());
        recorder.record_start(Tier::Expert).unwrap();
        recorder.record_finish(Tier::Expert, &won(100, 300)).unwrap();

        recorder.record_start(Tier::Expert).unwrap();
        let outcome = recorder.record_finish(Tier::Expert, &won(100, 250)).unwrap();

        assert!(!outcome.new_best_moves);
        assert!(outcome.new_best_time);
        let stats = recorder.load(Tier::Expert);
        assert_eq!(stats.best_moves, Some(100));
        assert_eq!(stats.best_time_secs, Some(250));
        assert_eq!(stats.total_moves, 200);
        assert_eq!(stats.total_time_secs, 550);
    }

    #[test]
    fn losses_count_towards_totals_but_not_bests() {
        let mut recorder = StatsRecorder::new(MemoryStore::new());
        recorder.record_start(Tier::Intermediate).unwrap();
        recorder.record_finish(Tier::Intermediate, &won(50, 90)).unwrap();

        recorder.record_start(Tier::Intermediate).unwrap();
        let outcome = recorder
            .record_finish(Tier::Intermediate, &lost(3, 4))
            .unwrap();

        assert!(!outcome.is_new_best());
        let stats = recorder.load(Tier::Intermediate);
        assert_eq!((stats.played, stats.won), (2, 1));
        assert_eq!(stats.best_moves, Some(50));
        assert_eq!(stats.total_moves, 53);
        assert_eq!(stats.win_percentage, Some(0.5));
    }

    #[test]
    fn stored_zero_best_reads_as_unset() {
        let mut store = MemoryStore::new();
        store.set("beginnerBestMoves", &0).unwrap();
        let mut recorder = StatsRecorder::new(store);

        assert_eq!(recorder.load(Tier::Beginner).best_moves, None);
        let outcome = recorder.record_finish(Tier::Beginner, &won(12, 8)).unwrap();
        assert!(outcome.new_best_moves);
    }

    #[test]
    fn zero_second_win_is_not_a_best_time() {
        let mut recorder = StatsRecorder::new(MemoryStore::new());
        recorder.record_start(Tier::Beginner).unwrap();

        let outcome = recorder.record_finish(Tier::Beginner, &won(1, 0)).unwrap();

        assert!(outcome.new_best_moves);
        assert!(!outcome.new_best_time);
        let stats = recorder.load(Tier::Beginner);
        assert_eq!(stats.best_moves, Some(1));
        assert_eq!(stats.best_time_secs, None);
        assert_eq!(recorder.store().get::<bool>("newBestTime"), None);
    }

    #[test]
    fn custom_tier_is_not_recorded() {
        let mut recorder = StatsRecorder::new(MemoryStore::new());

        recorder.record_start(Tier::Custom).unwrap();
        recorder.record_finish(Tier::Custom, &won(1, 1)).unwrap();

        assert!(recorder.store().is_empty());
    }

    #[test]
    fn percentage_stays_unset_without_plays() {
        assert_eq!(DifficultyStats::default().compute_win_percentage(), None);
    }
}
