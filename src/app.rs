use crate::achievements::{Progress, Tracker};
use crate::config::Config;
use crate::game::Game;
use crate::highscores::HighScores;
use crate::menu::MainMenu;
use crate::options::Options;
use crate::warning::Warning;
use ratatui::{backend::Backend, Terminal};
use std::io;

#[derive(Clone, Debug)]
pub(crate) struct App {
    screen: Screen,
}

impl App {
    /// Start on the main menu, showing `warning` (if any) on top of it
    pub(crate) fn new(globals: Globals, warning: Option<Warning>) -> App {
        let mut menu = MainMenu::new(globals);
        if let Some(w) = warning {
            menu.show_warning(w);
        }
        App {
            screen: Screen::Main(menu),
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.process_input()?;
        }
        log::info!("Exiting");
        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        match self.screen {
            Screen::Main(ref menu) => {
                terminal.draw(|frame| menu.draw(frame))?;
            }
            Screen::Game(ref game) => {
                terminal.draw(|frame| game.draw(frame))?;
            }
            Screen::Quit => (),
        }
        Ok(())
    }

    fn process_input(&mut self) -> io::Result<()> {
        let next = match self.screen {
            Screen::Main(ref mut menu) => menu.process_input()?,
            Screen::Game(ref mut game) => game.process_input()?,
            Screen::Quit => None,
        };
        if let Some(screen) = next {
            self.screen = screen;
        }
        Ok(())
    }

    fn quitting(&self) -> bool {
        matches!(self.screen, Screen::Quit)
    }
}

/// The screen currently being shown
#[derive(Clone, Debug)]
pub(crate) enum Screen {
    Main(MainMenu),
    Game(Box<Game>),
    Quit,
}

/// State that is carried from screen to screen
#[derive(Clone, Debug)]
pub(crate) struct Globals {
    pub(crate) config: Config,

    /// The options most recently chosen on the main menu
    pub(crate) options: Options,

    pub(crate) high_scores: HighScores,
    pub(crate) achievements: Tracker,
}

impl Globals {
    /// Create a `Globals` with no saved data
    pub(crate) fn new(config: Config) -> Globals {
        Globals {
            options: config.options,
            config,
            high_scores: HighScores::default(),
            achievements: Tracker::default(),
        }
    }

    /// Create a `Globals` and load the high scores & achievements into it.
    ///
    /// Failures to load are logged and do not stop the program; a `Warning`
    /// for the first such failure is returned for showing to the user.
    /// Nothing is reported when saving data is disabled.
    pub(crate) fn load(config: Config) -> (Globals, Option<Warning>) {
        let mut globals = Globals::new(config);
        let mut warning = None;
        match HighScores::load(globals.config.high_scores_file().as_deref()) {
            Ok(scores) => globals.high_scores = scores,
            Err(e) => report_load_error(&globals.config, e, &mut warning),
        }
        match Progress::load(globals.config.achievements_file().as_deref()) {
            Ok(progress) => globals.achievements = Tracker::new(progress),
            Err(e) => report_load_error(&globals.config, e, &mut warning),
        }
        (globals, warning)
    }
}

fn report_load_error<E: std::error::Error>(config: &Config, e: E, warning: &mut Option<Warning>) {
    if !config.files.save_data {
        return;
    }
    log::warn!("{e}");
    if warning.is_none() {
        *warning = Some(Warning::from(e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::Achievement;
    use std::num::NonZeroU32;
    use tempfile::tempdir;

    fn config_in(dir: &std::path::Path) -> Config {
        let src = format!(
            concat!(
                "[files]\n",
                "high-scores-file = {:?}\n",
                "achievements-file = {:?}\n",
            ),
            dir.join("scores.json"),
            dir.join("achievements.json"),
        );
        toml::from_str(&src).unwrap()
    }

    #[test]
    fn load_missing_files() {
        let tmp = tempdir().unwrap();
        let (globals, warning) = Globals::load(config_in(tmp.path()));
        assert!(warning.is_none());
        assert_eq!(globals.high_scores, HighScores::default());
        assert_eq!(globals.achievements, Tracker::default());
        assert_eq!(globals.options, Options::default());
    }

    #[test]
    fn load_saved_data() {
        let tmp = tempdir().unwrap();
        fs_err::write(
            tmp.path().join("scores.json"),
            "{\"medium/wrap/power-ups\": 70}\n",
        )
        .unwrap();
        fs_err::write(
            tmp.path().join("achievements.json"),
            "{\"unlocked\": [\"first-game\"], \"stats\": {\"games-played\": 2}}\n",
        )
        .unwrap();
        let (globals, warning) = Globals::load(config_in(tmp.path()));
        assert!(warning.is_none());
        assert_eq!(
            globals.high_scores.get(Options::default()),
            NonZeroU32::new(70)
        );
        assert!(globals.achievements.is_unlocked(Achievement::FirstGame));
        assert_eq!(globals.achievements.stats().games_played, 2);
    }

    #[test]
    fn load_corrupt_data() {
        let tmp = tempdir().unwrap();
        fs_err::write(tmp.path().join("scores.json"), "not json\n").unwrap();
        let (globals, warning) = Globals::load(config_in(tmp.path()));
        assert!(warning.is_some());
        assert_eq!(globals.high_scores, HighScores::default());
    }

    #[test]
    fn saving_disabled_is_quiet() {
        let mut config = Config::default();
        config.files.save_data = false;
        let (_, warning) = Globals::load(config);
        assert!(warning.is_none());
    }
}
