use crate::consts;
use enum_dispatch::enum_dispatch;
use enum_map::Enum;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Gameplay options chosen on the main menu
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct Options {
    pub(crate) difficulty: Difficulty,
    pub(crate) wraparound: bool,
    pub(crate) power_ups: bool,
}

impl Options {
    pub(crate) fn get(&self, key: OptKey) -> OptValue {
        match key {
            OptKey::Difficulty => self.difficulty.into(),
            OptKey::Wraparound => self.wraparound.into(),
            OptKey::PowerUps => self.power_ups.into(),
        }
    }

    pub(crate) fn set(&mut self, key: OptKey, value: OptValue) {
        match key {
            OptKey::Difficulty => {
                self.difficulty = value
                    .try_into()
                    .expect("Options::set(Difficulty, value) called with non-Difficulty value");
            }
            OptKey::Wraparound => {
                self.wraparound = value
                    .try_into()
                    .expect("Options::set(Wraparound, value) called with non-Bool value");
            }
            OptKey::PowerUps => {
                self.power_ups = value
                    .try_into()
                    .expect("Options::set(PowerUps, value) called with non-Bool value");
            }
        }
    }

    /// The key under which the high score for games played with these
    /// options is stored, e.g., `"medium/wrap/power-ups"`
    pub(crate) fn score_key(&self) -> String {
        format!(
            "{}/{}/{}",
            self.difficulty.as_key(),
            if self.wraparound { "wrap" } else { "walls" },
            if self.power_ups { "power-ups" } else { "classic" },
        )
    }
}

impl Default for Options {
    fn default() -> Options {
        Options {
            difficulty: Difficulty::default(),
            wraparound: true,
            power_ups: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub(crate) enum OptKey {
    Difficulty,
    Wraparound,
    PowerUps,
}

impl OptKey {
    pub(crate) const DISPLAY_WIDTH: u16 = 10;

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            OptKey::Difficulty => "Difficulty",
            OptKey::Wraparound => "Wraparound",
            OptKey::PowerUps => "Power-Ups",
        }
    }
}

impl fmt::Display for OptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[enum_dispatch]
pub(crate) trait Adjustable {
    fn increase(&mut self);
    fn decrease(&mut self);
    fn toggle(&mut self);
    fn can_increase(&self) -> bool;
    fn can_decrease(&self) -> bool;
}

#[enum_dispatch(Adjustable)] // This also gives us From and TryInto
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum OptValue {
    Bool(bool),
    Difficulty,
}

impl OptValue {
    pub(crate) const DISPLAY_WIDTH: u16 = 10;
}

// This is needed for EnumMap to be convenient to construct.
impl Default for OptValue {
    fn default() -> OptValue {
        OptValue::Bool(false)
    }
}

impl fmt::Display for OptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            OptValue::Bool(false) => write!(f, "   [ ]    "),
            OptValue::Bool(true) => write!(f, "   [✓]    "),
            OptValue::Difficulty(d) => {
                write!(
                    f,
                    "{left} {d:^6} {right}",
                    left = if d.can_decrease() { '◀' } else { '◁' },
                    right = if d.can_increase() { '▶' } else { '▷' }
                )
            }
        }
    }
}

impl Adjustable for bool {
    fn increase(&mut self) {
        *self = true;
    }

    fn decrease(&mut self) {
        *self = false;
    }

    fn toggle(&mut self) {
        *self = !*self;
    }

    fn can_increase(&self) -> bool {
        !*self
    }

    fn can_decrease(&self) -> bool {
        *self
    }
}

/// How fast the snake moves at the first level
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub(crate) const MINIMUM: Difficulty = Difficulty::Easy;
    pub(crate) const MAXIMUM: Difficulty = Difficulty::Hard;

    /// Time between ticks at level 1 with no effects active
    pub(crate) fn base_interval(self) -> Duration {
        match self {
            Difficulty::Easy => consts::EASY_TICK_PERIOD,
            Difficulty::Medium => consts::MEDIUM_TICK_PERIOD,
            Difficulty::Hard => consts::HARD_TICK_PERIOD,
        }
    }

    fn as_key(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.pad(name)
    }
}

impl Adjustable for Difficulty {
    fn increase(&mut self) {
        match self {
            Difficulty::Easy => *self = Difficulty::Medium,
            Difficulty::Medium => *self = Difficulty::Hard,
            Difficulty::Hard => (),
        }
    }

    fn decrease(&mut self) {
        match self {
            Difficulty::Easy => (),
            Difficulty::Medium => *self = Difficulty::Easy,
            Difficulty::Hard => *self = Difficulty::Medium,
        }
    }

    fn toggle(&mut self) {}

    fn can_increase(&self) -> bool {
        *self != Self::MAXIMUM
    }

    fn can_decrease(&self) -> bool {
        *self != Self::MINIMUM
    }
}
