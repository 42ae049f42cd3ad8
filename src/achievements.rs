//! Achievements & lifetime statistics, driven by the events emitted by the
//! game simulation
use crate::consts;
use crate::game::{Effect, FoodKind, GameEvent};
use crate::store::{load_json, save_json, LoadError, SaveError};
use enum_map::Enum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

#[derive(
    Clone, Copy, Debug, Deserialize, Enum, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum Achievement {
    FirstGame,
    Centurion,
    SpeedDemon,
    Collector,
    Untouchable,
}

impl Achievement {
    pub(crate) fn title(self) -> &'static str {
        match self {
            Achievement::FirstGame => "First Game",
            Achievement::Centurion => "Centurion",
            Achievement::SpeedDemon => "Speed Demon",
            Achievement::Collector => "Collector",
            Achievement::Untouchable => "Untouchable",
        }
    }

    pub(crate) fn description(self) -> &'static str {
        match self {
            Achievement::FirstGame => "Finish a game",
            Achievement::Centurion => "Score 100 points in one game",
            Achievement::SpeedDemon => "Eat 5 speed foods in a row",
            Achievement::Collector => "Eat normal, speed, slow & double food",
            Achievement::Untouchable => "Become invulnerable",
        }
    }
}

impl fmt::Display for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.title())
    }
}

/// Food kinds that must all be eaten for [`Achievement::Collector`]
const COLLECTIBLES: [FoodKind; 4] = [
    FoodKind::Normal,
    FoodKind::Speed,
    FoodKind::Slow,
    FoodKind::Double,
];

/// Lifetime statistics
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct Stats {
    pub(crate) games_played: u32,
    pub(crate) foods_eaten: u32,
    pub(crate) best_level: u32,
}

/// Everything about achievements that is saved between sessions
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct Progress {
    unlocked: BTreeSet<Achievement>,
    eaten_kinds: BTreeSet<FoodKind>,
    stats: Stats,
}

impl Progress {
    const WHAT: &'static str = "achievements";

    pub(crate) fn load(path: Option<&Path>) -> Result<Progress, LoadError> {
        let path = path.ok_or_else(|| LoadError::no_path(Self::WHAT))?;
        load_json(path, Self::WHAT)
    }

    pub(crate) fn save(&self, path: Option<&Path>) -> Result<(), SaveError> {
        let path = path.ok_or_else(|| SaveError::no_path(Self::WHAT))?;
        save_json(path, Self::WHAT, self)
    }
}

/// Watches game events and unlocks achievements
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Tracker {
    progress: Progress,

    /// Number of speed foods eaten in a row during the current game
    speed_streak: u32,
}

impl Tracker {
    pub(crate) fn new(progress: Progress) -> Tracker {
        Tracker {
            progress,
            speed_streak: 0,
        }
    }

    pub(crate) fn progress(&self) -> &Progress {
        &self.progress
    }

    pub(crate) fn stats(&self) -> Stats {
        self.progress.stats
    }

    pub(crate) fn is_unlocked(&self, achievement: Achievement) -> bool {
        self.progress.unlocked.contains(&achievement)
    }

    /// Update statistics for `event` and return the achievements it unlocked
    pub(crate) fn observe(&mut self, event: GameEvent) -> Vec<Achievement> {
        let mut unlocked = Vec::new();
        match event {
            GameEvent::FoodEaten(kind) => {
                let stats = &mut self.progress.stats;
                stats.foods_eaten = stats.foods_eaten.saturating_add(1);
                self.progress.eaten_kinds.insert(kind);
                if kind == FoodKind::Speed {
                    self.speed_streak = self.speed_streak.saturating_add(1);
                } else {
                    self.speed_streak = 0;
                }
                if self.speed_streak >= consts::SPEED_DEMON_STREAK {
                    self.unlock(Achievement::SpeedDemon, &mut unlocked);
                }
                if COLLECTIBLES
                    .iter()
                    .all(|k| self.progress.eaten_kinds.contains(k))
                {
                    self.unlock(Achievement::Collector, &mut unlocked);
                }
            }
            GameEvent::BonusEaten => {
                let stats = &mut self.progress.stats;
                stats.foods_eaten = stats.foods_eaten.saturating_add(1);
            }
            GameEvent::EffectActivated(Effect::Invulnerable) => {
                self.unlock(Achievement::Untouchable, &mut unlocked);
            }
            GameEvent::EffectActivated(_) => (),
            GameEvent::LevelReached(level) => {
                let stats = &mut self.progress.stats;
                stats.best_level = stats.best_level.max(level);
            }
            GameEvent::GameEnded { final_score } => {
                let stats = &mut self.progress.stats;
                stats.games_played = stats.games_played.saturating_add(1);
                stats.best_level = stats.best_level.max(1);
                self.speed_streak = 0;
                self.unlock(Achievement::FirstGame, &mut unlocked);
                if final_score >= consts::CENTURION_SCORE {
                    self.unlock(Achievement::Centurion, &mut unlocked);
                }
            }
        }
        unlocked
    }

    fn unlock(&mut self, achievement: Achievement, unlocked: &mut Vec<Achievement>) {
        if self.progress.unlocked.insert(achievement) {
            log::info!(
                "Achievement unlocked: {achievement} ({})",
                achievement.description()
            );
            unlocked.push(achievement);
        }
    }
}
