use crate::consts;
use crate::options::Options;
use log::LevelFilter;
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Name of the directory under the local config & data directories in which
/// the program's files live
const APP_DIR: &str = "powersnake";

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
pub(crate) struct Config {
    /// Options preselected on the main menu
    #[serde(default)]
    pub(crate) options: Options,

    /// Settings about data files
    #[serde(default)]
    pub(crate) files: FileConfig,

    /// Tuning for the game itself
    #[serde(default)]
    pub(crate) rules: Rules,

    #[serde(default)]
    pub(crate) logging: LoggingConfig,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join(APP_DIR).join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if the file's contents
    /// could not be deserialized.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        toml::from_str(&content).map_err(Into::into)
    }

    /// Return the path at which high scores should be stored, or `None` if
    /// saving data is disabled or no path could be determined
    pub(crate) fn high_scores_file(&self) -> Option<Cow<'_, Path>> {
        self.files
            .data_file(self.files.high_scores_file.as_deref(), "highscores.json")
    }

    /// Return the path at which achievements & statistics should be stored,
    /// or `None` if saving data is disabled or no path could be determined
    pub(crate) fn achievements_file(&self) -> Option<Cow<'_, Path>> {
        self.files
            .data_file(self.files.achievements_file.as_deref(), "achievements.json")
    }

    /// Return the path to write the log to, or `None` if no path could be
    /// determined
    pub(crate) fn log_file(&self) -> Option<Cow<'_, Path>> {
        self.logging
            .file
            .as_deref()
            .map(Cow::from)
            .or_else(|| data_dir().map(|p| Cow::from(p.join("powersnake.log"))))
    }
}

/// The directory in which data files are stored by default
fn data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join(APP_DIR))
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(try_from = "RawFileConfig")]
pub(crate) struct FileConfig {
    /// Path at which high scores should be stored
    high_scores_file: Option<PathBuf>,

    /// Path at which achievement progress & statistics should be stored
    achievements_file: Option<PathBuf>,

    /// Whether to load & save high scores and achievements at all
    pub(crate) save_data: bool,
}

impl FileConfig {
    fn data_file<'a>(&self, configured: Option<&'a Path>, default_name: &str) -> Option<Cow<'a, Path>> {
        if !self.save_data {
            return None;
        }
        configured
            .map(Cow::from)
            .or_else(|| data_dir().map(|p| Cow::from(p.join(default_name))))
    }
}

impl Default for FileConfig {
    fn default() -> FileConfig {
        FileConfig {
            high_scores_file: None,
            achievements_file: None,
            save_data: true,
        }
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
struct RawFileConfig {
    high_scores_file: Option<String>,
    achievements_file: Option<String>,
    save_data: bool,
}

impl Default for RawFileConfig {
    fn default() -> RawFileConfig {
        RawFileConfig {
            high_scores_file: None,
            achievements_file: None,
            save_data: true,
        }
    }
}

impl TryFrom<RawFileConfig> for FileConfig {
    type Error = FileConfigError;

    fn try_from(value: RawFileConfig) -> Result<FileConfig, FileConfigError> {
        Ok(FileConfig {
            high_scores_file: value.high_scores_file.map(nonempty_path).transpose()?,
            achievements_file: value.achievements_file.map(nonempty_path).transpose()?,
            save_data: value.save_data,
        })
    }
}

fn nonempty_path(s: String) -> Result<PathBuf, FileConfigError> {
    if s.is_empty() {
        Err(FileConfigError::EmptyPath)
    } else {
        Ok(PathBuf::from(s))
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum FileConfigError {
    #[error("file paths cannot be empty")]
    EmptyPath,
}

/// Adjustable game rules
#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(try_from = "RawRules")]
pub(crate) struct Rules {
    /// Side length of the square board
    pub(crate) board_size: u16,

    /// Points for eating normal food, before any multiplier
    pub(crate) food_points: u32,

    /// Points for eating bonus food
    pub(crate) bonus_points: u32,

    /// Factor by which food points are multiplied while double-score is
    /// active
    pub(crate) double_multiplier: u32,

    /// How long an effect lasts once activated
    pub(crate) effect_duration: Duration,

    /// Chance, in percent, of bonus food appearing whenever normal food is
    /// eaten
    pub(crate) bonus_chance_percent: u32,

    /// Tick interval, as a percentage of normal, while the speed effect is
    /// active
    pub(crate) speed_effect_percent: u32,

    /// Tick interval, as a percentage of normal, while the slow effect is
    /// active
    pub(crate) slow_effect_percent: u32,
}

impl Default for Rules {
    fn default() -> Rules {
        Rules {
            board_size: consts::MAX_BOARD_SIZE,
            food_points: 10,
            bonus_points: 50,
            double_multiplier: 2,
            effect_duration: Duration::from_secs(10),
            bonus_chance_percent: 25,
            speed_effect_percent: 70,
            slow_effect_percent: 150,
        }
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
struct RawRules {
    board_size: u16,
    food_points: u32,
    bonus_points: u32,
    double_multiplier: u32,
    effect_duration_ms: u64,
    bonus_chance_percent: u32,
    speed_effect_percent: u32,
    slow_effect_percent: u32,
}

impl Default for RawRules {
    fn default() -> RawRules {
        let rules = Rules::default();
        RawRules {
            board_size: rules.board_size,
            food_points: rules.food_points,
            bonus_points: rules.bonus_points,
            double_multiplier: rules.double_multiplier,
            effect_duration_ms: u64::try_from(rules.effect_duration.as_millis()).unwrap_or(u64::MAX),
            bonus_chance_percent: rules.bonus_chance_percent,
            speed_effect_percent: rules.speed_effect_percent,
            slow_effect_percent: rules.slow_effect_percent,
        }
    }
}

impl TryFrom<RawRules> for Rules {
    type Error = RulesError;

    fn try_from(value: RawRules) -> Result<Rules, RulesError> {
        if !(consts::MIN_BOARD_SIZE..=consts::MAX_BOARD_SIZE).contains(&value.board_size) {
            return Err(RulesError::BoardSize(value.board_size));
        }
        if value.double_multiplier == 0 {
            return Err(RulesError::ZeroMultiplier);
        }
        if value.bonus_chance_percent > 100 {
            return Err(RulesError::BonusChance(value.bonus_chance_percent));
        }
        if value.speed_effect_percent == 0 || value.slow_effect_percent == 0 {
            return Err(RulesError::ZeroSpeed);
        }
        Ok(Rules {
            board_size: value.board_size,
            food_points: value.food_points,
            bonus_points: value.bonus_points,
            double_multiplier: value.double_multiplier,
            effect_duration: Duration::from_millis(value.effect_duration_ms),
            bonus_chance_percent: value.bonus_chance_percent,
            speed_effect_percent: value.speed_effect_percent,
            slow_effect_percent: value.slow_effect_percent,
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum RulesError {
    #[error(
        "board-size must be between {min} and {max}, not {0}",
        min = consts::MIN_BOARD_SIZE,
        max = consts::MAX_BOARD_SIZE
    )]
    BoardSize(u16),
    #[error("double-multiplier cannot be zero")]
    ZeroMultiplier,
    #[error("bonus-chance-percent cannot be more than 100, not {0}")]
    BonusChance(u32),
    #[error("effect speed percentages cannot be zero")]
    ZeroSpeed,
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct LoggingConfig {
    /// Only log messages at this level or more severe
    pub(crate) level: LevelFilter,

    /// Where to write the log.  Defaults to `powersnake.log` in the local
    /// data directory.
    pub(crate) file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> LoggingConfig {
        LoggingConfig {
            level: LevelFilter::Info,
            file: None,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Difficulty;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn empty_config() {
        let cfg = toml::from_str::<Config>("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.rules.board_size, 20);
        assert_eq!(cfg.logging.level, LevelFilter::Info);
        assert!(cfg.files.save_data);
    }

    #[test]
    fn full_config() {
        let src = concat!(
            "[options]\n",
            "difficulty = \"hard\"\n",
            "wraparound = false\n",
            "power-ups = false\n",
            "\n",
            "[files]\n",
            "high-scores-file = \"/tmp/scores.json\"\n",
            "achievements-file = \"/tmp/achievements.json\"\n",
            "save-data = true\n",
            "\n",
            "[rules]\n",
            "board-size = 15\n",
            "food-points = 5\n",
            "bonus-points = 100\n",
            "double-multiplier = 3\n",
            "effect-duration-ms = 7500\n",
            "bonus-chance-percent = 50\n",
            "speed-effect-percent = 60\n",
            "slow-effect-percent = 200\n",
            "\n",
            "[logging]\n",
            "level = \"debug\"\n",
            "file = \"/tmp/powersnake.log\"\n",
        );
        let cfg = toml::from_str::<Config>(src).unwrap();
        assert_eq!(
            cfg.options,
            Options {
                difficulty: Difficulty::Hard,
                wraparound: false,
                power_ups: false,
            }
        );
        assert_eq!(
            cfg.rules,
            Rules {
                board_size: 15,
                food_points: 5,
                bonus_points: 100,
                double_multiplier: 3,
                effect_duration: Duration::from_millis(7500),
                bonus_chance_percent: 50,
                speed_effect_percent: 60,
                slow_effect_percent: 200,
            }
        );
        assert_eq!(
            cfg.high_scores_file().as_deref(),
            Some(Path::new("/tmp/scores.json"))
        );
        assert_eq!(
            cfg.achievements_file().as_deref(),
            Some(Path::new("/tmp/achievements.json"))
        );
        assert_eq!(cfg.logging.level, LevelFilter::Debug);
        assert_eq!(
            cfg.log_file().as_deref(),
            Some(Path::new("/tmp/powersnake.log"))
        );
    }

    #[test]
    fn partial_rules() {
        let cfg = toml::from_str::<Config>("[rules]\nboard-size = 12\n").unwrap();
        assert_eq!(
            cfg.rules,
            Rules {
                board_size: 12,
                ..Rules::default()
            }
        );
    }

    #[test]
    fn no_saving() {
        let cfg = toml::from_str::<Config>(
            "[files]\nsave-data = false\nhigh-scores-file = \"scores.json\"\n",
        )
        .unwrap();
        assert_eq!(cfg.high_scores_file(), None);
        assert_eq!(cfg.achievements_file(), None);
    }

    #[test]
    fn board_too_big() {
        let e = toml::from_str::<Config>("[rules]\nboard-size = 40\n").unwrap_err();
        assert!(e
            .to_string()
            .contains("board-size must be between 10 and 20, not 40"));
    }

    #[test]
    fn bonus_chance_too_big() {
        let r = toml::from_str::<Config>("[rules]\nbonus-chance-percent = 101\n");
        assert!(r.is_err());
    }

    #[test]
    fn empty_path() {
        let r = toml::from_str::<Config>("[files]\nhigh-scores-file = \"\"\n");
        assert!(r.is_err());
    }

    #[test]
    fn rules_error_message() {
        assert_eq!(
            RulesError::BoardSize(4).to_string(),
            "board-size must be between 10 and 20, not 4"
        );
    }

    #[test]
    fn load_missing() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        assert_eq!(Config::load(&path, true).unwrap(), Config::default());
        assert!(matches!(
            Config::load(&path, false),
            Err(ConfigError::Read(_))
        ));
    }

    #[test]
    fn load_invalid() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        fs_err::write(&path, "[rules]\ndouble-multiplier = 0\n").unwrap();
        assert!(matches!(
            Config::load(&path, true),
            Err(ConfigError::Parse(_))
        ));
    }
}
