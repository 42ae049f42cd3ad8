mod widgets;
use self::widgets::{render_help, AchievementList, Instructions, Legend, Title};
use crate::app::{Globals, Screen};
use crate::command::Command;
use crate::consts;
use crate::game::Game;
use crate::options::{Adjustable, OptKey, OptValue, Options};
use crate::util::{get_display_area, EnumExt};
use crate::warning::{Warning, WarningOutcome};
use crossterm::event::{read, Event};
use enum_map::{Enum, EnumMap};
use ratatui::{
    buffer::Buffer,
    layout::{Flex, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{
        block::{Block, Padding},
        Widget,
    },
    Frame,
};
use std::num::NonZeroU32;

/// The main menu, from which games are started
#[derive(Clone, Debug)]
pub(crate) struct MainMenu {
    globals: Globals,
    selection: Selection,
    options: OptionsMenu,
    warning: Option<Warning>,
}

impl MainMenu {
    pub(crate) fn new(globals: Globals) -> Self {
        MainMenu {
            selection: Selection::default(),
            options: OptionsMenu::new(globals.options),
            globals,
            warning: None,
        }
    }

    /// Show an error pop-up over the menu
    pub(crate) fn show_warning(&mut self, warning: Warning) {
        self.warning = Some(warning);
    }

    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    pub(crate) fn process_input(&mut self) -> std::io::Result<Option<Screen>> {
        Ok(self.handle_event(read()?))
    }

    fn handle_event(&mut self, event: Event) -> Option<Screen> {
        let cmd = Command::from_key_event(event.as_key_press_event()?)?;
        if let Some(ref mut warning) = self.warning {
            match warning.handle_command(cmd)? {
                WarningOutcome::Dismissed => self.warning = None,
                WarningOutcome::Quit => return Some(Screen::Quit),
            }
            return None;
        }
        match (self.selection, cmd) {
            (_, Command::Quit) => return Some(Screen::Quit),
            (_, Command::Home) => self.select(Selection::PlayButton, None),
            (_, Command::End) => self.select(Selection::QuitButton, None),
            (Selection::PlayButton, Command::Enter) | (_, Command::P) => return Some(self.play()),
            (Selection::PlayButton, Command::Prev) => self.select(Selection::QuitButton, None),
            (Selection::PlayButton, Command::Down | Command::Next) => {
                self.select(Selection::Options, Some(OptKey::min()));
            }
            (Selection::Options, Command::Up | Command::Prev) => {
                if let Some(sel) = self.options.move_up() {
                    self.select(sel, None);
                }
            }
            (Selection::Options, Command::Down | Command::Next) => {
                if let Some(sel) = self.options.move_down() {
                    self.select(sel, None);
                }
            }
            (Selection::Options, Command::Left) => self.options.adjust(Adjustable::decrease),
            (Selection::Options, Command::Right) => self.options.adjust(Adjustable::increase),
            (Selection::Options, Command::Space | Command::Enter) => {
                self.options.adjust(Adjustable::toggle);
            }
            (Selection::QuitButton, Command::Enter) | (_, Command::Q) => return Some(Screen::Quit),
            (Selection::QuitButton, Command::Next) => self.select(Selection::PlayButton, None),
            (Selection::QuitButton, Command::Up | Command::Prev) => {
                self.select(Selection::Options, Some(OptKey::max()));
            }
            _ => (),
        }
        None
    }

    fn play(&self) -> Screen {
        let mut globals = self.globals.clone();
        globals.options = self.options.to_options();
        log::debug!("Starting game with options {}", globals.options.score_key());
        Screen::Game(Box::new(Game::new(globals)))
    }

    fn select(&mut self, selection: Selection, option: Option<OptKey>) {
        self.selection = selection;
        if selection == Selection::Options {
            self.options.selection = option;
        }
    }

    fn button(&self, label: &'static str, key: &'static str, selection: Selection) -> Line<'static> {
        let style = if self.selection == selection {
            consts::MENU_SELECTION_STYLE
        } else {
            Style::new()
        };
        Line::from_iter([
            Span::styled("[", style),
            Span::styled(label, style),
            Span::styled(" (", style),
            Span::styled(key, consts::KEY_STYLE.patch(style)),
            Span::styled(")]", style),
        ])
        .centered()
    }

    /// The high score for the currently-chosen options along with lifetime
    /// statistics
    fn stats_line(&self) -> Line<'static> {
        let best = self
            .globals
            .high_scores
            .get(self.options.to_options())
            .map_or(0, NonZeroU32::get);
        let stats = self.globals.achievements.stats();
        Line::from(format!(
            "Best score: {best}   Games played: {}   Food eaten: {}   Best level: {}",
            stats.games_played, stats.foods_eaten, stats.best_level
        ))
        .centered()
    }
}

impl Widget for &MainMenu {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let help_height = Instructions::HEIGHT
            .max(Legend::HEIGHT)
            .max(AchievementList::HEIGHT);
        let [title_area, help_area, play_area, options_area, stats_area, quit_area] =
            Layout::vertical([
                Title::HEIGHT,
                help_height,
                1,
                OptionsMenu::HEIGHT,
                1,
                1,
            ])
            .flex(Flex::Start)
            .spacing(1)
            .areas(display);

        let [title_area] = Layout::horizontal([Title::WIDTH])
            .flex(Flex::Center)
            .areas(title_area);
        Title.render(title_area, buf);
        render_help(&self.globals.achievements, help_area, buf);
        self.button("Play", "p", Selection::PlayButton)
            .render(play_area, buf);
        let [options_area] = Layout::horizontal([OptionsMenu::WIDTH])
            .flex(Flex::Center)
            .areas(options_area);
        (&self.options).render(options_area, buf);
        self.stats_line().render(stats_area, buf);
        self.button("Quit", "q", Selection::QuitButton)
            .render(quit_area, buf);

        if let Some(ref warning) = self.warning {
            warning.render(display, buf);
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum Selection {
    #[default]
    PlayButton,
    Options,
    QuitButton,
}

/// The box of adjustable gameplay options
#[derive(Clone, Debug, Eq, PartialEq)]
struct OptionsMenu {
    /// The highlighted option, if the main menu's selection is inside this
    /// box
    selection: Option<OptKey>,
    settings: EnumMap<OptKey, OptValue>,
}

impl OptionsMenu {
    #[allow(clippy::cast_possible_truncation)]
    const HEIGHT: u16 = (OptKey::LENGTH as u16) + 2;
    const HORIZONTAL_PADDING: u16 = 1;
    const POINTER_WIDTH: u16 = 2;
    const LABEL_VALUE_GUTTER: u16 = 2;
    const WIDTH: u16 = 2 + 2 * Self::HORIZONTAL_PADDING
        + Self::POINTER_WIDTH
        + OptKey::DISPLAY_WIDTH
        + Self::LABEL_VALUE_GUTTER
        + OptValue::DISPLAY_WIDTH;

    fn new(options: Options) -> Self {
        OptionsMenu {
            selection: None,
            settings: EnumMap::from_fn(|key| options.get(key)),
        }
    }

    fn to_options(&self) -> Options {
        let mut opts = Options::default();
        for (key, &value) in &self.settings {
            opts.set(key, value);
        }
        opts
    }

    /// Move the highlight up.  Returns the main menu item to select instead
    /// if the highlight leaves the box.
    fn move_up(&mut self) -> Option<Selection> {
        self.selection = self.selection?.prev();
        self.selection.is_none().then_some(Selection::PlayButton)
    }

    /// Move the highlight down.  Returns the main menu item to select instead
    /// if the highlight leaves the box.
    fn move_down(&mut self) -> Option<Selection> {
        self.selection = self.selection?.next();
        self.selection.is_none().then_some(Selection::QuitButton)
    }

    fn adjust(&mut self, f: fn(&mut OptValue)) {
        if let Some(sel) = self.selection {
            f(&mut self.settings[sel]);
        }
    }
}

impl Widget for &OptionsMenu {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" Options: ")
            .padding(Padding::horizontal(OptionsMenu::HORIZONTAL_PADDING));
        let menu_area = block.inner(area);
        block.render(area, buf);
        for ((key, value), row) in self.settings.iter().zip(menu_area.rows()) {
            let selected = Some(key) == self.selection;
            let style = if selected {
                consts::MENU_SELECTION_STYLE
            } else {
                Style::new()
            };
            let s = format!(
                "{pointer:pwidth$}{key:lwidth$}{space:gutter$}{value}",
                pointer = if selected { "»" } else { "" },
                pwidth = usize::from(OptionsMenu::POINTER_WIDTH),
                lwidth = usize::from(OptKey::DISPLAY_WIDTH),
                space = "",
                gutter = usize::from(OptionsMenu::LABEL_VALUE_GUTTER),
            );
            Span::styled(s, style).render(row, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::game::GameEvent;
    use crate::options::Difficulty;
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;
    use ratatui::style::Modifier;

    fn globals() -> Globals {
        let mut config = Config::default();
        config.files.save_data = false;
        Globals::new(config)
    }

    fn press(menu: &mut MainMenu, code: KeyCode) -> Option<Screen> {
        menu.handle_event(Event::Key(code.into()))
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .filter_map(|x| buf.cell((x, y)))
            .map(|cell| cell.symbol())
            .collect()
    }

    fn render(menu: &MainMenu) -> Buffer {
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        menu.render(area, &mut buffer);
        buffer
    }

    #[test]
    fn draw_initial() {
        let buffer = render(&MainMenu::new(globals()));
        assert!(row_text(&buffer, 0).contains("P O W E R   S N A K E"));
        assert_eq!(
            row_text(&buffer, 4),
            format!(
                "{:10}{:22}{:4}{:17}{:4}{:13}{:10}",
                "", "Move the snake with:", "", "() Food", "", "Achievements:", ""
            )
        );
        assert_eq!(row_text(&buffer, 11), format!("{:^80}", "[Play (p)]"));
        let options = (13..18)
            .map(|y| row_text(&buffer, y)[26..].trim_end().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(
            options,
            [
                "┌ Options: ────────────────┐",
                "│   Difficulty  ◀ Medium ▶ │",
                "│   Wraparound     [✓]     │",
                "│   Power-Ups      [✓]     │",
                "└──────────────────────────┘",
            ]
        );
        assert_eq!(
            row_text(&buffer, 19),
            format!(
                "{:^80}",
                "Best score: 0   Games played: 0   Food eaten: 0   Best level: 0"
            )
        );
        assert_eq!(row_text(&buffer, 21), format!("{:^80}", "[Quit (q)]"));
        assert!(buffer[(36, 11)].modifier.contains(Modifier::UNDERLINED));
        assert!(!buffer[(36, 21)].modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn stats_follow_chosen_options() {
        let mut globals = globals();
        let hard = Options {
            difficulty: Difficulty::Hard,
            ..Options::default()
        };
        globals.high_scores.record(hard, 120);
        globals
            .achievements
            .observe(GameEvent::GameEnded { final_score: 120 });
        let mut menu = MainMenu::new(globals);
        assert!(menu.stats_line().to_string().starts_with("Best score: 0 "));
        assert!(press(&mut menu, KeyCode::Down).is_none());
        assert!(press(&mut menu, KeyCode::Right).is_none());
        assert_eq!(menu.options.to_options(), hard);
        assert_eq!(
            menu.stats_line().to_string(),
            "Best score: 120   Games played: 1   Food eaten: 0   Best level: 1"
        );
    }

    #[test]
    fn adjust_options() {
        let mut menu = MainMenu::new(globals());
        assert!(press(&mut menu, KeyCode::Down).is_none());
        assert_eq!(menu.selection, Selection::Options);
        assert_eq!(menu.options.selection, Some(OptKey::Difficulty));
        assert!(press(&mut menu, KeyCode::Left).is_none());
        assert!(press(&mut menu, KeyCode::Left).is_none());
        assert!(press(&mut menu, KeyCode::Down).is_none());
        assert!(press(&mut menu, KeyCode::Char(' ')).is_none());
        assert!(press(&mut menu, KeyCode::Down).is_none());
        assert!(press(&mut menu, KeyCode::Left).is_none());
        assert_eq!(
            menu.options.to_options(),
            Options {
                difficulty: Difficulty::Easy,
                wraparound: false,
                power_ups: false,
            }
        );
        let buffer = render(&menu);
        assert_eq!(
            row_text(&buffer, 16)[26..].trim_end(),
            "│ » Power-Ups      [ ]     │"
        );
        assert!(press(&mut menu, KeyCode::Down).is_none());
        assert_eq!(menu.selection, Selection::QuitButton);
        assert_eq!(menu.options.selection, None);
    }

    #[test]
    fn play_and_quit() {
        let mut menu = MainMenu::new(globals());
        assert!(matches!(
            press(&mut menu, KeyCode::Enter),
            Some(Screen::Game(_))
        ));
        assert!(matches!(
            press(&mut menu, KeyCode::Char('q')),
            Some(Screen::Quit)
        ));
        assert!(press(&mut menu, KeyCode::End).is_none());
        assert!(matches!(
            press(&mut menu, KeyCode::Enter),
            Some(Screen::Quit)
        ));
    }

    #[test]
    fn warning_takes_input_first() {
        let mut menu = MainMenu::new(globals());
        menu.show_warning(Warning::from(std::io::Error::other("disk full")));
        let buffer = render(&menu);
        assert!((0..24).any(|y| row_text(&buffer, y).contains(" WARNING ")));
        assert!(press(&mut menu, KeyCode::Char('p')).is_none());
        assert!(press(&mut menu, KeyCode::Enter).is_none());
        assert!(menu.warning.is_none());
        assert!(matches!(
            press(&mut menu, KeyCode::Char('p')),
            Some(Screen::Game(_))
        ));
    }

    /// Tabbing past the end of the options box and around again lands on the
    /// first option
    #[test]
    fn tab_wraparound() {
        let mut menu = MainMenu::new(globals());
        assert_eq!(menu.options.selection, None);
        for _ in OptKey::iter() {
            assert!(press(&mut menu, KeyCode::Tab).is_none());
        }
        assert_eq!(menu.options.selection, Some(OptKey::max()));
        assert!(press(&mut menu, KeyCode::Tab).is_none());
        assert_eq!(menu.options.selection, None);
        assert!(press(&mut menu, KeyCode::Tab).is_none());
        assert!(press(&mut menu, KeyCode::Tab).is_none());
        assert_eq!(menu.options.selection, Some(OptKey::min()));
    }

    #[test]
    fn options_roundtrip() {
        let opts = Options {
            difficulty: Difficulty::Hard,
            wraparound: false,
            power_ups: true,
        };
        assert_eq!(OptionsMenu::new(opts).to_options(), opts);
    }
}
