mod achievements;
mod app;
mod command;
mod config;
mod consts;
mod game;
mod highscores;
mod logging;
mod menu;
mod options;
mod store;
mod util;
mod warning;
use crate::app::{App, Globals};
use crate::config::Config;
use crate::warning::Warning;
use anyhow::Context;
use lexopt::{Arg, Parser};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// How the program was invoked
#[derive(Clone, Debug, Eq, PartialEq)]
enum Arguments {
    Run { config: Option<PathBuf> },
    Help,
    Version,
}

impl Arguments {
    fn from_parser(mut parser: Parser) -> Result<Arguments, lexopt::Error> {
        let mut config = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('c') | Arg::Long("config") => {
                    config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('h') | Arg::Long("help") => return Ok(Arguments::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Arguments::Version),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Arguments::Run { config })
    }
}

fn main() -> ExitCode {
    match Arguments::from_parser(Parser::from_env()) {
        Ok(Arguments::Run { config }) => run(config.as_deref()),
        Ok(Arguments::Help) => {
            println!("Usage: powersnake [-c|--config <FILE>]");
            println!();
            println!("Snake with levels, obstacles & timed power-ups");
            println!();
            println!("Options:");
            println!("  -c, --config <FILE>  Read configuration from the given file");
            println!("  -h, --help           Show this help message and exit");
            println!("  -V, --version        Show the program version and exit");
            ExitCode::SUCCESS
        }
        Ok(Arguments::Version) => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("powersnake: {e}");
            ExitCode::from(2)
        }
    }
}

fn run(config_path: Option<&Path>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("powersnake: {e:?}");
            return ExitCode::from(2);
        }
    };
    let log_warning = logging::init(&config).err().map(Warning::from);
    if let Some(path) = config_path {
        log::info!("Configuration read from {}", path.display());
    }
    let (globals, load_warning) = Globals::load(config);
    let terminal = ratatui::init();
    let r = App::new(globals, log_warning.or(load_warning)).run(terminal);
    ratatui::restore();
    io_exit(r)
}

/// Load the configuration from `path` or, if that is `None`, from the default
/// location, which need not exist
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = path {
        return Config::load(path, false)
            .with_context(|| format!("failed to load configuration from {}", path.display()));
    }
    match Config::default_path() {
        Ok(path) => Config::load(&path, true)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        Err(_) => Ok(Config::default()),
    }
}

fn io_exit(r: io::Result<()>) -> ExitCode {
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.kind() == ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Terminal I/O failed: {e}");
            eprintln!("{e}");
            ExitCode::from(2)
        }
    }
}
