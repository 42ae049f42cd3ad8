mod board;
mod direction;
mod effects;
mod events;
mod levels;
mod paused;
mod placer;
mod sim;
mod snake;
pub(crate) use self::effects::Effect;
pub(crate) use self::events::{FoodKind, GameEvent};
use self::board::WallPolicy;
use self::direction::Direction;
use self::paused::{PauseOpt, Paused};
use self::sim::{GameSnapshot, Phase, Simulation};
use crate::achievements::Achievement;
use crate::app::{Globals, Screen};
use crate::command::Command;
use crate::consts;
use crate::menu::MainMenu;
use crate::util::{center_rect, get_display_area, EnumExt};
use crate::warning::{Warning, WarningOutcome};
use crossterm::event::{poll, read, Event};
use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Margin, Position, Rect, Size},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Widget},
    Frame,
};
use std::num::NonZeroU32;
use std::time::{Duration, Instant};

/// The game screen
#[derive(Clone, Debug)]
pub(crate) struct Game<R = rand::rngs::ThreadRng> {
    sim: Simulation<R>,
    globals: Globals,

    /// The pause menu, present while the game is paused
    paused: Option<Paused>,

    /// An error pop-up to show on top of everything else
    warning: Option<Warning>,

    /// Simulation timestamps are measured from this instant
    epoch: Instant,

    /// When the simulation was last advanced
    last_step: Instant,

    /// Did the game end with the snake running into something?
    crashed: bool,

    /// Did the game that just ended set a new high score?
    new_high_score: bool,

    /// Achievements unlocked during this game
    unlocked: Vec<Achievement>,
}

impl Game<rand::rngs::ThreadRng> {
    pub(crate) fn new(globals: Globals) -> Self {
        Game::new_with_rng(globals, rand::rng())
    }
}

impl<R: Rng> Game<R> {
    pub(crate) fn new_with_rng(globals: Globals, rng: R) -> Game<R> {
        let options = globals.options;
        let best = globals.high_scores.get(options).map_or(0, NonZeroU32::get);
        let sim = Simulation::new(globals.config.rules.clone(), options, rng).with_high_score(best);
        let now = Instant::now();
        let mut game = Game {
            sim,
            globals,
            paused: None,
            warning: None,
            epoch: now,
            last_step: now,
            crashed: false,
            new_high_score: false,
            unlocked: Vec::new(),
        };
        if let Err(e) = game.sim.reset(options.difficulty) {
            game.warning = Some(Warning::from(e));
        }
        game.process_events();
        game
    }

    pub(crate) fn process_input(&mut self) -> std::io::Result<Option<Screen>> {
        if self.warning.is_none() && self.sim.phase() == Phase::Running {
            let when = self.last_step + self.sim.tick_interval();
            let wait = when.saturating_duration_since(Instant::now());
            if wait.is_zero() || !poll(wait)? {
                self.advance();
                return Ok(None);
            }
        }
        Ok(self.handle_event(read()?))
    }

    fn advance(&mut self) {
        let now = Instant::now();
        self.last_step = now;
        match self.sim.tick(now.duration_since(self.epoch)) {
            Ok(outcome) => self.crashed = outcome.collided,
            Err(e) => log::warn!("Game ended early: {e}"),
        }
        self.process_events();
    }
}

impl<R> Game<R> {
    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    /// Time since the start of this game screen
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn handle_event(&mut self, event: Event) -> Option<Screen> {
        if let Some(ref mut warning) = self.warning {
            match warning.handle_command(Command::from_key_event(event.as_key_press_event()?)?)? {
                WarningOutcome::Dismissed => self.warning = None,
                WarningOutcome::Quit => return Some(self.quit()),
            }
            return None;
        }
        if let Some(ref mut paused) = self.paused {
            match paused.handle_event(event)? {
                PauseOpt::Resume => self.toggle_pause(),
                PauseOpt::Restart => return Some(self.restart()),
                PauseOpt::MainMenu => return Some(self.main_menu()),
                PauseOpt::Quit => return Some(self.quit()),
            }
            return None;
        }
        match self.sim.phase() {
            Phase::Running => {
                if event == Event::FocusLost {
                    self.pause();
                } else {
                    match Command::from_key_event(event.as_key_press_event()?)? {
                        Command::Quit => return Some(self.quit()),
                        Command::Up => self.sim.set_direction(Direction::Up),
                        Command::Left => self.sim.set_direction(Direction::Left),
                        Command::Down => self.sim.set_direction(Direction::Down),
                        Command::Right => self.sim.set_direction(Direction::Right),
                        Command::Esc | Command::Space | Command::P => self.toggle_pause(),
                        _ => (),
                    }
                }
            }
            Phase::Paused | Phase::Idle | Phase::GameOver => {
                match Command::from_key_event(event.as_key_press_event()?)? {
                    Command::R => return Some(self.restart()),
                    Command::M => return Some(self.main_menu()),
                    Command::Quit | Command::Q => return Some(self.quit()),
                    _ => (),
                }
            }
        }
        None
    }

    fn pause(&mut self) {
        self.sim.pause(self.now());
        self.paused = Some(Paused::new());
    }

    /// Pause a running game or resume a paused one, showing or hiding the
    /// pause menu to match
    fn toggle_pause(&mut self) {
        self.sim.toggle_pause(self.now());
        if self.sim.phase() == Phase::Paused {
            self.paused = Some(Paused::new());
        } else {
            self.paused = None;
            self.last_step = Instant::now();
        }
    }

    fn restart(&mut self) -> Screen {
        self.abandon();
        Screen::Game(Box::new(Game::new(self.globals.clone())))
    }

    fn main_menu(&mut self) -> Screen {
        self.abandon();
        Screen::Main(MainMenu::new(self.globals.clone()))
    }

    fn quit(&mut self) -> Screen {
        self.abandon();
        Screen::Quit
    }

    /// Keep the score of a game that is left before it ended
    fn abandon(&mut self) {
        if self.sim.phase() != Phase::GameOver {
            self.record_high_score();
        }
    }

    /// Feed the simulation's events to the achievement tracker and, once the
    /// game has ended, save everything to disk
    fn process_events(&mut self) {
        for event in self.sim.drain_events() {
            self.unlocked.extend(self.globals.achievements.observe(event));
            if matches!(event, GameEvent::GameEnded { .. }) {
                self.end_session();
            }
        }
    }

    fn end_session(&mut self) {
        self.new_high_score = self.record_high_score();
        let path = self.globals.config.achievements_file();
        if let Err(e) = self.globals.achievements.progress().save(path.as_deref()) {
            if self.globals.config.files.save_data {
                log::warn!("{e}");
                self.warning = Some(Warning::from(e));
            }
        }
    }

    /// If the current score beats the stored high score, store it & save the
    /// high scores file.  Returns `true` if there was a new high score.
    fn record_high_score(&mut self) -> bool {
        let options = self.globals.options;
        if !self.globals.high_scores.record(options, self.sim.score()) {
            return false;
        }
        log::info!("New high score for {}: {}", options.score_key(), self.sim.score());
        let path = self.globals.config.high_scores_file();
        if let Err(e) = self.globals.high_scores.save(path.as_deref()) {
            if self.globals.config.files.save_data {
                log::warn!("{e}");
                self.warning = Some(Warning::from(e));
            }
        }
        true
    }
}

impl<R> Widget for &Game<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snapshot = self.sim.snapshot(self.now());
        let display = get_display_area(area);
        GameView {
            snapshot: &snapshot,
            crashed: self.crashed,
            new_high_score: self.new_high_score,
            unlocked: &self.unlocked,
        }
        .render(display, buf);
        if let Some(paused) = self.paused {
            let pause_area = center_rect(
                display,
                Size {
                    width: Paused::WIDTH,
                    height: Paused::HEIGHT,
                },
            );
            paused.render(pause_area, buf);
        }
        if let Some(ref warning) = self.warning {
            warning.render(display, buf);
        }
    }
}

/// Everything on the game screen apart from pop-ups
#[derive(Clone, Copy, Debug)]
struct GameView<'a> {
    snapshot: &'a GameSnapshot,
    crashed: bool,
    new_high_score: bool,
    unlocked: &'a [Achievement],
}

impl GameView<'_> {
    /// Width of the status panel to the right of the board
    const PANEL_WIDTH: u16 = 18;

    /// Gap between the board and the status panel
    const PANEL_GUTTER: u16 = 2;

    fn render_board(&self, block_area: Rect, buf: &mut Buffer) {
        let snap = self.snapshot;
        if snap.board.walls() == WallPolicy::Wrap {
            DottedBorder.render(block_area, buf);
        } else {
            Block::bordered().render(block_area, buf);
        }

        let mut level = Canvas {
            area: block_area.inner(Margin::new(1, 1)),
            buf,
        };
        for &pos in &snap.obstacles {
            level.draw_cell(pos, consts::OBSTACLE_SYMBOL, consts::OBSTACLE_STYLE);
        }
        if let Some(food) = snap.food {
            let (symbol, style) = food_glyph(food.kind);
            level.draw_cell(food.pos, symbol, style);
        }
        if let Some(bonus) = snap.bonus {
            level.draw_cell(bonus.pos, consts::BONUS_SYMBOL, consts::BONUS_STYLE);
        }
        let snake_style = if snap.effects[Effect::Invulnerable].is_some() {
            consts::SHIELDED_SNAKE_STYLE
        } else {
            consts::SNAKE_STYLE
        };
        for &pos in snap.snake.iter().skip(1) {
            level.draw_cell(pos, consts::SNAKE_BODY_SYMBOL, snake_style);
        }
        // Draw the head last so that, if it's a collision, we overwrite
        // whatever it's colliding with
        if let Some(head) = snap.head() {
            if self.crashed {
                level.draw_cell(head, consts::COLLISION_SYMBOL, consts::COLLISION_STYLE);
            } else {
                level.draw_cell(head, head_symbol(snap.direction), snake_style);
            }
        }
    }

    fn status_lines(&self) -> Text<'static> {
        let snap = self.snapshot;
        let mut text = Text::default();
        text.push_line(Line::styled(" STATUS ", consts::PANEL_HEADING_STYLE));
        text.push_line(format!("Score:  {:>6}", snap.score));
        text.push_line(format!("Best:   {:>6}", snap.high_score));
        text.push_line(format!("Level:  {:>6}", snap.level));
        text.push_line(format!("Length: {:>6}", snap.snake.len()));
        text.push_line("");
        text.push_line(Line::styled(" EFFECTS ", consts::PANEL_HEADING_STYLE));
        let mut any = false;
        for effect in Effect::iter() {
            if let Some(left) = snap.effects[effect] {
                text.push_line(format!("{effect:<8}{:>5}s", whole_seconds(left)));
                any = true;
            }
        }
        if !any {
            text.push_line("(none)");
        }
        if let Some(bonus) = snap.bonus {
            text.push_line("");
            text.push_line(Line::from_iter([
                Span::styled(consts::BONUS_SYMBOL, consts::BONUS_STYLE),
                Span::raw(format!(" Bonus{:>5}s", whole_seconds(bonus.remaining))),
            ]));
        }
        text
    }

    fn render_messages(&self, msg1_area: Rect, msg2_area: Rect, buf: &mut Buffer) {
        if !self.snapshot.game_over() {
            return;
        }
        let mut msg1 = String::from(" — GAME OVER —");
        if self.new_high_score {
            msg1.push_str(" New high score!");
        }
        if !self.unlocked.is_empty() {
            let names = self
                .unlocked
                .iter()
                .copied()
                .map(Achievement::title)
                .collect::<Vec<_>>()
                .join(", ");
            msg1.push_str(" Unlocked: ");
            msg1.push_str(&names);
        }
        Span::from(msg1).render(msg1_area, buf);
        Line::from_iter([
            Span::raw(" Choose One: Restart ("),
            Span::styled("r", consts::KEY_STYLE),
            Span::raw(") — Main Menu ("),
            Span::styled("m", consts::KEY_STYLE),
            Span::raw(") — Quit ("),
            Span::styled("q", consts::KEY_STYLE),
            Span::raw(")"),
        ])
        .render(msg2_area, buf);
    }
}

impl Widget for GameView<'_> {
    // `area` is the display area, not the whole buffer
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [main_area, msg1_area, msg2_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);
        let size = self.snapshot.board.size();
        let block_size = Size {
            width: size
                .saturating_mul(consts::CELL_WIDTH)
                .saturating_add(2),
            height: size.saturating_add(2),
        };
        let [block_area, panel_area] = Layout::horizontal([block_size.width, Self::PANEL_WIDTH])
            .flex(Flex::Center)
            .spacing(Self::PANEL_GUTTER)
            .areas(main_area);
        let block_area = center_rect(block_area, block_size);
        let panel_area = Rect {
            y: block_area.y,
            height: block_area.height,
            ..panel_area
        };
        self.render_board(block_area, buf);
        self.status_lines().render(panel_area, buf);
        self.render_messages(msg1_area, msg2_area, buf);
    }
}

fn head_symbol(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => consts::SNAKE_HEAD_NORTH_SYMBOL,
        Direction::Down => consts::SNAKE_HEAD_SOUTH_SYMBOL,
        Direction::Left => consts::SNAKE_HEAD_WEST_SYMBOL,
        Direction::Right => consts::SNAKE_HEAD_EAST_SYMBOL,
    }
}

fn food_glyph(kind: FoodKind) -> (&'static str, Style) {
    match kind {
        FoodKind::Normal => (consts::FOOD_SYMBOL, consts::FOOD_STYLE),
        FoodKind::Speed => (consts::SPEED_FOOD_SYMBOL, consts::POWER_FOOD_STYLE),
        FoodKind::Slow => (consts::SLOW_FOOD_SYMBOL, consts::POWER_FOOD_STYLE),
        FoodKind::Double => (consts::DOUBLE_FOOD_SYMBOL, consts::POWER_FOOD_STYLE),
        FoodKind::Shield => (consts::SHIELD_FOOD_SYMBOL, consts::POWER_FOOD_STYLE),
    }
}

/// Round a duration up to whole seconds for display
fn whole_seconds(d: Duration) -> u128 {
    d.as_millis().div_ceil(1000)
}

#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    fn draw_char(&mut self, pos: Position, symbol: char) {
        let Some(x) = self.area.x.checked_add(pos.x) else {
            return;
        };
        let Some(y) = self.area.y.checked_add(pos.y) else {
            return;
        };
        if let Some(cell) = self.buf.cell_mut((x, y)) {
            cell.set_char(symbol);
        }
    }

    /// Draw a board cell, which takes up [`consts::CELL_WIDTH`] terminal
    /// columns
    fn draw_cell(&mut self, pos: Position, symbol: &str, style: Style) {
        let Some(x) = pos
            .x
            .checked_mul(consts::CELL_WIDTH)
            .and_then(|x| self.area.x.checked_add(x))
        else {
            return;
        };
        let Some(y) = self.area.y.checked_add(pos.y) else {
            return;
        };
        for (x, ch) in (x..).zip(symbol.chars()) {
            if let Some(cell) = self.buf.cell_mut((x, y)) {
                cell.set_char(ch);
                cell.set_style(Style::reset().patch(style));
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct DottedBorder;

impl Widget for DottedBorder {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let size = area.as_size();
        let max_x = size.width.saturating_sub(1);
        let max_y = size.height.saturating_sub(1);
        let mut canvas = Canvas { area, buf };
        canvas.draw_char(Position::ORIGIN, '·');
        canvas.draw_char(Position::new(max_x, 0), '·');
        canvas.draw_char(Position::new(max_x, max_y), '·');
        canvas.draw_char(Position::new(0, max_y), '·');
        for x in 1..max_x {
            canvas.draw_char(Position::new(x, 0), '⋯');
            canvas.draw_char(Position::new(x, max_y), '⋯');
        }
        for y in 1..max_y {
            canvas.draw_char(Position::new(0, y), '⋮');
            canvas.draw_char(Position::new(max_x, y), '⋮');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::options::Options;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn new_game(options: Options) -> Game<ChaCha12Rng> {
        let mut config = Config::default();
        config.files.save_data = false;
        config.rules.board_size = 10;
        let mut globals = Globals::new(config);
        globals.options = options;
        Game::new_with_rng(globals, ChaCha12Rng::seed_from_u64(0x0123456789ABCDEF))
    }

    fn press(game: &mut Game<ChaCha12Rng>, code: KeyCode) -> Option<Screen> {
        game.handle_event(Event::Key(code.into()))
    }

    fn screen_rows(game: &Game<ChaCha12Rng>) -> Vec<String> {
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        game.render(area, &mut buffer);
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .filter_map(|x| buffer.cell((x, y)))
                    .map(|cell| cell.symbol())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn pause_and_resume() {
        let mut game = new_game(Options::default());
        assert_eq!(game.sim.phase(), Phase::Running);
        assert!(press(&mut game, KeyCode::Esc).is_none());
        assert!(game.paused.is_some());
        assert_eq!(game.sim.phase(), Phase::Paused);
        assert!(screen_rows(&game).iter().any(|row| row.contains(" PAUSED ")));
        assert!(press(&mut game, KeyCode::Char(' ')).is_none());
        assert!(game.paused.is_none());
        assert_eq!(game.sim.phase(), Phase::Running);
    }

    #[test]
    fn losing_focus_pauses() {
        let mut game = new_game(Options::default());
        assert!(game.handle_event(Event::FocusLost).is_none());
        assert_eq!(game.sim.phase(), Phase::Paused);
        assert!(matches!(
            press(&mut game, KeyCode::Char('m')),
            Some(Screen::Main(_))
        ));
    }

    #[test]
    fn steer() {
        let mut game = new_game(Options::default());
        let before = game.sim.snapshot(game.now());
        assert_eq!(before.head(), Some(Position::new(5, 5)));
        assert!(press(&mut game, KeyCode::Up).is_none());
        game.advance();
        let after = game.sim.snapshot(game.now());
        assert_eq!(after.direction, Direction::Up);
        assert_eq!(after.head(), Some(Position::new(5, 4)));
    }

    #[test]
    fn ctrl_c_quits() {
        let mut game = new_game(Options::default());
        let ev = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(matches!(game.handle_event(ev), Some(Screen::Quit)));
    }

    #[test]
    fn draw_running() {
        let game = new_game(Options::default());
        let rows = screen_rows(&game);
        assert!(rows.iter().any(|row| row.contains("⚬⚬⚬⚬=<")));
        assert!(rows.iter().any(|row| row.contains("Score:       0")));
        assert!(rows.iter().any(|row| row.contains("Level:       1")));
        assert!(rows.iter().any(|row| row.contains("(none)")));
        assert!(rows.iter().any(|row| row.contains('⋮')));
        assert!(!rows.iter().any(|row| row.contains("GAME OVER")));
    }

    #[test]
    fn crash_into_wall() {
        let mut game = new_game(Options {
            wraparound: false,
            power_ups: false,
            ..Options::default()
        });
        for _ in 0..100 {
            if game.sim.phase() == Phase::GameOver {
                break;
            }
            game.advance();
        }
        assert_eq!(game.sim.phase(), Phase::GameOver);
        assert!(game.crashed);
        assert_eq!(game.unlocked, [Achievement::FirstGame]);
        assert!(game.warning.is_none());
        let rows = screen_rows(&game);
        assert!(rows.iter().any(|row| row.contains("××")));
        assert!(rows[22].starts_with(" — GAME OVER —"));
        assert!(rows[22].contains("Unlocked: First Game"));
        assert!(rows[23].starts_with(" Choose One: Restart (r)"));
        assert!(press(&mut game, KeyCode::Up).is_none());
        assert!(matches!(
            press(&mut game, KeyCode::Char('r')),
            Some(Screen::Game(_))
        ));
    }
}
