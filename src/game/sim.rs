use super::board::{Board, WallPolicy};
use super::direction::Direction;
use super::effects::{Countdown, Effect, EffectClock};
use super::events::{FoodKind, GameEvent};
use super::levels::{generate_obstacles, LevelConfig};
use super::placer::{place_free, PlacementExhausted};
use super::snake::Snake;
use crate::config::Rules;
use crate::options::{Difficulty, Options};
use enum_map::EnumMap;
use rand::Rng;
use ratatui::layout::Position;
use std::collections::HashSet;
use std::time::Duration;

/// The game simulation: snake, food, obstacles, score, level, and timed
/// effects, advanced one cell per [`Simulation::tick()`].
///
/// All timestamps passed in are measured from an arbitrary fixed epoch
/// chosen by the caller.
#[derive(Clone, Debug)]
pub(crate) struct Simulation<R = rand::rngs::ThreadRng> {
    rng: R,
    rules: Rules,
    board: Board,
    power_ups: bool,
    difficulty: Difficulty,
    phase: Phase,
    snake: Snake,
    food: Option<Food>,
    bonus: Option<BonusFood>,
    obstacles: HashSet<Position>,
    effects: EffectClock,
    score: u32,
    high_score: u32,
    level: &'static LevelConfig,
    /// Tick interval for the current difficulty & level, before effects
    interval: Duration,
    events: Vec<GameEvent>,
}

impl<R: Rng> Simulation<R> {
    /// Create an idle simulation.  Call [`Simulation::reset()`] to start
    /// playing.
    pub(crate) fn new(rules: Rules, options: Options, rng: R) -> Simulation<R> {
        let walls = if options.wraparound {
            WallPolicy::Wrap
        } else {
            WallPolicy::Solid
        };
        let board = Board::new(rules.board_size, walls);
        let level = LevelConfig::first();
        Simulation {
            rng,
            rules,
            board,
            power_ups: options.power_ups,
            difficulty: options.difficulty,
            phase: Phase::Idle,
            snake: Snake::centered(board),
            food: None,
            bonus: None,
            obstacles: HashSet::new(),
            effects: EffectClock::new(),
            score: 0,
            high_score: 0,
            level,
            interval: level.scale_interval(options.difficulty.base_interval()),
            events: Vec::new(),
        }
    }

    /// Start a new game at the given difficulty, discarding any game in
    /// progress.  The high score is kept.
    pub(crate) fn reset(&mut self, difficulty: Difficulty) -> Result<(), PlacementExhausted> {
        self.difficulty = difficulty;
        self.snake = Snake::centered(self.board);
        self.food = None;
        self.bonus = None;
        self.obstacles.clear();
        self.effects.clear();
        self.score = 0;
        self.level = LevelConfig::first();
        self.phase = Phase::Running;
        if let Err(e) = self.set_up_board() {
            log::error!("Could not set up new game: {e}");
            self.end_game();
            return Err(e);
        }
        log::info!(
            "New game: difficulty {}, board {}x{}, {:?} walls",
            self.difficulty,
            self.board.size(),
            self.board.size(),
            self.board.walls(),
        );
        Ok(())
    }

    fn set_up_board(&mut self) -> Result<(), PlacementExhausted> {
        self.load_level()?;
        self.food = Some(self.spawn_food()?);
        Ok(())
    }

    /// Advance the game by one step.  Does nothing unless the game is
    /// running.
    ///
    /// If there is no room left on the board for something that needs to be
    /// placed, the game ends and `PlacementExhausted` is returned.
    pub(crate) fn tick(&mut self, now: Duration) -> Result<TickOutcome, PlacementExhausted> {
        if self.phase != Phase::Running {
            return Ok(TickOutcome::default());
        }
        let r = self.step(now);
        if let Err(ref e) = r {
            log::error!("Game aborted: {e}");
            self.end_game();
        }
        r
    }

    fn step(&mut self, now: Duration) -> Result<TickOutcome, PlacementExhausted> {
        let mut outcome = TickOutcome::default();
        let direction = self.snake.commit_turn();
        let invulnerable = self.effects.is_active(Effect::Invulnerable);
        let head = self.snake.head();
        let new_head = match direction.advance(head, self.board) {
            Some(pos) => pos,
            None if invulnerable => direction.advance_wrapping(head, self.board),
            None => {
                self.crash(format!("into the wall going {direction:?} from {head:?}"));
                outcome.collided = true;
                return Ok(outcome);
            }
        };
        debug_assert!(
            self.board.is_inside(new_head),
            "snake left the board at {new_head:?}"
        );
        if self.snake.bites(new_head) || self.obstacles.contains(&new_head) {
            if !invulnerable {
                self.crash(format!("into {new_head:?}"));
                outcome.collided = true;
                return Ok(outcome);
            }
            if self.obstacles.remove(&new_head) {
                log::debug!("Shielded snake smashed obstacle at {new_head:?}");
            }
        }

        let ate_food = self.food.is_some_and(|f| f.pos == new_head);
        let ate_bonus = !ate_food && self.bonus.is_some_and(|b| b.pos == new_head);
        self.snake.advance(new_head, ate_food || ate_bonus);
        if ate_food {
            self.eat_food(now)?;
            outcome.ate = Some(Eaten::Normal);
        } else if ate_bonus {
            self.eat_bonus();
            outcome.ate = Some(Eaten::Bonus);
        }

        self.effects.update(now);
        if self.bonus.is_some_and(|b| b.countdown.expired(now)) {
            log::debug!("Bonus food expired");
            self.bonus = None;
        }

        outcome.leveled_up = self.check_level_up()?;
        Ok(outcome)
    }

    fn eat_food(&mut self, now: Duration) -> Result<(), PlacementExhausted> {
        let Some(food) = self.food.take() else {
            return Ok(());
        };
        let multiplier = if self.effects.is_active(Effect::DoubleScore) {
            self.rules.double_multiplier
        } else {
            1
        };
        self.add_points(self.rules.food_points.saturating_mul(multiplier));
        self.events.push(GameEvent::FoodEaten(food.kind));
        if let Some(effect) = food.kind.effect() {
            self.effects.activate(effect, self.rules.effect_duration, now);
            self.events.push(GameEvent::EffectActivated(effect));
        }
        self.food = Some(self.spawn_food()?);
        if self.bonus.is_none() && self.rng.random_ratio(self.rules.bonus_chance_percent, 100) {
            self.bonus = Some(self.spawn_bonus(now)?);
        }
        Ok(())
    }

    fn eat_bonus(&mut self) {
        self.bonus = None;
        self.add_points(self.rules.bonus_points);
        self.events.push(GameEvent::BonusEaten);
    }

    fn add_points(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        if self.score > self.high_score {
            self.high_score = self.score;
        }
    }

    fn check_level_up(&mut self) -> Result<bool, PlacementExhausted> {
        let mut leveled_up = false;
        while self.level.is_complete(self.score) {
            let Some(next) = self.level.next() else {
                break;
            };
            self.level = next;
            leveled_up = true;
        }
        if leveled_up {
            log::info!("Reached level {} with {} points", self.level.level, self.score);
            self.load_level()?;
            self.events.push(GameEvent::LevelReached(self.level.level));
        }
        Ok(leveled_up)
    }

    /// Apply the current level's speed and lay out its obstacles
    fn load_level(&mut self) -> Result<(), PlacementExhausted> {
        self.interval = self
            .level
            .scale_interval(self.difficulty.base_interval());
        self.obstacles.clear();
        let snake = self.snake_cells();
        let items = self.item_cells();
        self.obstacles = generate_obstacles(
            &mut self.rng,
            self.board,
            self.level.obstacle_count,
            self.snake.head(),
            self.snake.direction,
            &[&snake, &items],
        )?;
        Ok(())
    }

    fn spawn_food(&mut self) -> Result<Food, PlacementExhausted> {
        let snake = self.snake_cells();
        let items = self.item_cells();
        let pos = place_free(&mut self.rng, self.board, &[&snake, &self.obstacles, &items])?;
        let kind = if self.power_ups {
            random_food_kind(&mut self.rng)
        } else {
            FoodKind::Normal
        };
        Ok(Food { pos, kind })
    }

    fn spawn_bonus(&mut self, now: Duration) -> Result<BonusFood, PlacementExhausted> {
        let snake = self.snake_cells();
        let items = self.item_cells();
        let pos = place_free(&mut self.rng, self.board, &[&snake, &self.obstacles, &items])?;
        log::debug!("Bonus food appeared at {pos:?}");
        Ok(BonusFood {
            pos,
            countdown: Countdown::starting(now, self.level.bonus_food_duration),
        })
    }
}

impl<R> Simulation<R> {
    /// Set the best score to beat, e.g., as loaded from disk
    pub(crate) fn with_high_score(mut self, high_score: u32) -> Self {
        self.high_score = high_score;
        self
    }

    /// Request a turn for the next tick.  Ignored unless the game is running
    /// or if `direction` would reverse the snake onto itself.  If several
    /// turns are requested before a tick, the last acceptable one wins.
    pub(crate) fn set_direction(&mut self, direction: Direction) {
        if self.phase == Phase::Running {
            let _ = self.snake.turn(direction);
        }
    }

    pub(crate) fn pause(&mut self, now: Duration) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
            self.effects.pause(now);
            if let Some(ref mut bonus) = self.bonus {
                bonus.countdown.freeze(now);
            }
        }
    }

    pub(crate) fn resume(&mut self, now: Duration) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Running;
            self.effects.resume(now);
            if let Some(ref mut bonus) = self.bonus {
                bonus.countdown.thaw(now);
            }
        }
    }

    pub(crate) fn toggle_pause(&mut self, now: Duration) {
        match self.phase {
            Phase::Running => self.pause(now),
            Phase::Paused => self.resume(now),
            Phase::Idle | Phase::GameOver => (),
        }
    }

    /// How long to wait between ticks at the current level with the current
    /// effects
    pub(crate) fn tick_interval(&self) -> Duration {
        let mut interval = self.interval;
        if self.effects.is_active(Effect::Speed) {
            interval = interval * self.rules.speed_effect_percent / 100;
        }
        if self.effects.is_active(Effect::Slow) {
            interval = interval * self.rules.slow_effect_percent / 100;
        }
        interval
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    /// Remove & return the events that have occurred since the last call
    pub(crate) fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Return a read-only copy of the game state for display
    pub(crate) fn snapshot(&self, now: Duration) -> GameSnapshot {
        GameSnapshot {
            board: self.board,
            snake: self.snake.body.iter().copied().collect(),
            direction: self.snake.direction,
            food: self.food,
            bonus: self.bonus.map(|b| BonusSnapshot {
                pos: b.pos,
                remaining: b.countdown.remaining(now),
            }),
            obstacles: self.obstacles.clone(),
            effects: EnumMap::from_fn(|effect| self.effects.remaining(effect, now)),
            score: self.score,
            high_score: self.high_score,
            level: self.level.level,
            phase: self.phase,
        }
    }

    fn crash(&mut self, what: String) {
        log::info!("Snake crashed {what}");
        self.end_game();
    }

    fn end_game(&mut self) {
        self.phase = Phase::GameOver;
        self.events.push(GameEvent::GameEnded {
            final_score: self.score,
        });
        log::info!(
            "Game over: score {}, level {}, length {}",
            self.score,
            self.level.level,
            self.snake.len()
        );
    }

    fn snake_cells(&self) -> HashSet<Position> {
        self.snake.body.iter().copied().collect()
    }

    /// The cells holding food & bonus food
    fn item_cells(&self) -> HashSet<Position> {
        self.food
            .map(|f| f.pos)
            .into_iter()
            .chain(self.bonus.map(|b| b.pos))
            .collect()
    }
}

fn random_food_kind<R: Rng + ?Sized>(rng: &mut R) -> FoodKind {
    let total = FoodKind::WEIGHTED.iter().map(|&(_, w)| w).sum::<u32>();
    let mut pick = rng.random_range(0..total);
    for (kind, weight) in FoodKind::WEIGHTED {
        if pick < weight {
            return kind;
        }
        pick -= weight;
    }
    FoodKind::Normal
}

/// The states of a [`Simulation`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Phase {
    /// Created but not yet started
    Idle,
    Running,
    Paused,
    /// The snake has crashed (or the board filled up).  Only a reset leaves
    /// this state.
    GameOver,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Food {
    pub(crate) pos: Position,
    pub(crate) kind: FoodKind,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct BonusFood {
    pos: Position,
    countdown: Countdown,
}

/// What kind of food, if any, was eaten on a tick
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Eaten {
    Normal,
    Bonus,
}

/// The result of a single [`Simulation::tick()`]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct TickOutcome {
    pub(crate) ate: Option<Eaten>,
    pub(crate) leveled_up: bool,
    pub(crate) collided: bool,
}

/// A copy of everything needed to draw the game
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct GameSnapshot {
    pub(crate) board: Board,
    /// The snake's cells, head first
    pub(crate) snake: Vec<Position>,
    pub(crate) direction: Direction,
    pub(crate) food: Option<Food>,
    pub(crate) bonus: Option<BonusSnapshot>,
    pub(crate) obstacles: HashSet<Position>,
    /// The time left on each active effect
    pub(crate) effects: EnumMap<Effect, Option<Duration>>,
    pub(crate) score: u32,
    pub(crate) high_score: u32,
    pub(crate) level: u32,
    pub(crate) phase: Phase,
}

impl GameSnapshot {
    pub(crate) fn head(&self) -> Option<Position> {
        self.snake.first().copied()
    }

    pub(crate) fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct BonusSnapshot {
    pub(crate) pos: Position,
    pub(crate) remaining: Duration,
}
