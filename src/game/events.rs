use super::effects::Effect;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of normal food.  Every kind but `Normal` switches on an effect
/// when eaten.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum FoodKind {
    Normal,
    Speed,
    Slow,
    Double,
    Shield,
}

impl FoodKind {
    /// All kinds together with their relative spawn weights
    pub(crate) const WEIGHTED: [(FoodKind, u32); 5] = [
        (FoodKind::Normal, 70),
        (FoodKind::Speed, 10),
        (FoodKind::Slow, 10),
        (FoodKind::Double, 10),
        (FoodKind::Shield, 5),
    ];

    /// The effect activated by eating this kind of food
    pub(crate) fn effect(self) -> Option<Effect> {
        match self {
            FoodKind::Normal => None,
            FoodKind::Speed => Some(Effect::Speed),
            FoodKind::Slow => Some(Effect::Slow),
            FoodKind::Double => Some(Effect::DoubleScore),
            FoodKind::Shield => Some(Effect::Invulnerable),
        }
    }
}

impl fmt::Display for FoodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FoodKind::Normal => "normal",
            FoodKind::Speed => "speed",
            FoodKind::Slow => "slow",
            FoodKind::Double => "double",
            FoodKind::Shield => "shield",
        };
        f.pad(name)
    }
}

/// Something that happened during a tick that outside observers (e.g.,
/// achievement tracking) may want to know about
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum GameEvent {
    FoodEaten(FoodKind),
    BonusEaten,
    EffectActivated(Effect),
    LevelReached(u32),
    GameEnded { final_score: u32 },
}
