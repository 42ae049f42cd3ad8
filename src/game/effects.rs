use enum_map::{Enum, EnumMap};
use std::fmt;
use std::time::Duration;

/// A timed modifier activated by eating special food
#[derive(Clone, Copy, Debug, Enum, Eq, Hash, PartialEq)]
pub(crate) enum Effect {
    /// The snake moves faster
    Speed,

    /// The snake moves slower
    Slow,

    /// Normal food is worth more
    DoubleScore,

    /// Collisions do not end the game
    Invulnerable,
}

impl Effect {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Effect::Speed => "Speed",
            Effect::Slow => "Slow",
            Effect::DoubleScore => "Double",
            Effect::Invulnerable => "Shield",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// An absolute deadline that can be frozen while the game is paused.
///
/// While frozen, the deadline remembers how much time was left and is
/// re-anchored to the time of unfreezing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Countdown {
    deadline: Duration,
    frozen: Option<Duration>,
}

impl Countdown {
    pub(crate) fn starting(now: Duration, length: Duration) -> Countdown {
        Countdown {
            deadline: now.saturating_add(length),
            frozen: None,
        }
    }

    /// Has the deadline passed?  A countdown is still running at the exact
    /// moment of its deadline, and a frozen countdown never expires.
    pub(crate) fn expired(&self, now: Duration) -> bool {
        self.frozen.is_none() && self.deadline < now
    }

    pub(crate) fn remaining(&self, now: Duration) -> Duration {
        self.frozen
            .unwrap_or_else(|| self.deadline.saturating_sub(now))
    }

    pub(crate) fn freeze(&mut self, now: Duration) {
        if self.frozen.is_none() {
            self.frozen = Some(self.deadline.saturating_sub(now));
        }
    }

    pub(crate) fn thaw(&mut self, now: Duration) {
        if let Some(left) = self.frozen.take() {
            self.deadline = now.saturating_add(left);
        }
    }
}

/// The timers for every [`Effect`].  An effect is active exactly when it has
/// a countdown.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct EffectClock {
    timers: EnumMap<Effect, Option<Countdown>>,
}

impl EffectClock {
    pub(crate) fn new() -> EffectClock {
        EffectClock::default()
    }

    /// Switch `effect` on until `now + duration`.  Activating an effect that
    /// is already active restarts its timer rather than extending it.
    pub(crate) fn activate(&mut self, effect: Effect, duration: Duration, now: Duration) {
        self.timers[effect] = Some(Countdown::starting(now, duration));
    }

    /// Switch off every effect whose time is up
    pub(crate) fn update(&mut self, now: Duration) {
        for timer in self.timers.values_mut() {
            if timer.is_some_and(|c| c.expired(now)) {
                *timer = None;
            }
        }
    }

    pub(crate) fn pause(&mut self, now: Duration) {
        for timer in self.timers.values_mut().flatten() {
            timer.freeze(now);
        }
    }

    pub(crate) fn resume(&mut self, now: Duration) {
        for timer in self.timers.values_mut().flatten() {
            timer.thaw(now);
        }
    }

    pub(crate) fn is_active(&self, effect: Effect) -> bool {
        self.timers[effect].is_some()
    }

    /// How long `effect` will stay active, if it is active at all
    pub(crate) fn remaining(&self, effect: Effect, now: Duration) -> Option<Duration> {
        self.timers[effect].map(|c| c.remaining(now))
    }

    pub(crate) fn clear(&mut self) {
        self.timers = EnumMap::default();
    }
}
