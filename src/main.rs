#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::fs::File;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{ArgAction, Parser};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use studyboard::api::HttpStudyApi;
use studyboard::config::{self, Config};
use studyboard::session::{AccessPolicy, ConfiguredSession};
use studyboard::tui::App;
use studyboard::tui::action::Action;
use studyboard::upload::HttpObjectStorage;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Verbosity of the log file (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (defaults to $XDG_CONFIG_HOME/studyboard/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Start on the open-study form
    Create,
    /// Start on the edit form for an existing study
    Edit {
        /// Study ID
        id: String,
    },
}

impl Command {
    fn into_action(self) -> Action {
        match self {
            Self::Create => Action::OpenCreate,
            Self::Edit { id } => Action::OpenEdit(id),
        }
    }
}

/// Logs go to a file because the terminal belongs to the UI.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn setup_logging(verbosity: u8, path: &Path) -> io::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

    let file = File::options().create(true).append(true).open(path)?;
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_thread_names(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
    Ok(())
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, &config::data_dir()?.join("studyboard.log"))?;

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let config = Config::load(&config_path)?.with_env();
    tracing::info!(path = %config_path.display(), api = %config.api.base_url, "starting");

    let mut app = App::new(
        HttpStudyApi::new(config.api.base_url.clone()),
        HttpObjectStorage::new(config.storage.clone()),
        ConfiguredSession::new(config.session.clone()),
        AccessPolicy::new(&config.access),
    );
    let initial = cli.command.map_or(Action::None, Command::into_action);

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = app.run(&mut terminal, initial);

    let restore_result = restore_terminal();
    match result {
        Err(e) => Err(e.into()),
        Ok(()) => restore_result.map_err(Into::into),
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn restore_terminal() -> Result<(), io::Error> {
    let raw_result = disable_raw_mode();
    let screen_result = execute!(stdout(), LeaveAlternateScreen);
    raw_result.and(screen_result)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_starts_on_listing() {
        let cli = Cli::try_parse_from(["studyboard"]).unwrap();
        assert_eq!(cli.command.map_or(Action::None, Command::into_action), Action::None);
    }

    #[test]
    fn edit_subcommand_opens_edit() {
        let cli = Cli::try_parse_from(["studyboard", "-vv", "edit", "42"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(
            cli.command.map(Command::into_action),
            Some(Action::OpenEdit("42".into()))
        );
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["studyboard", "create", "--config", "/tmp/c.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert_eq!(
            cli.command.map(Command::into_action),
            Some(Action::OpenCreate)
        );
    }
}
