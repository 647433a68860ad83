use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Write},
    path::PathBuf,
};

use typefall::{
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    router::{Flow, Router, Services},
    runtime::{CrosstermEventSource, FixedTicker, FrameTimer, GameEvent, Runner},
    settings::{snap_duration, Language, Mode, SessionContext},
    storage::{ResultStore, ResultsDb, UnavailableStore},
    ui,
    words::WordProvider,
};

/// arcade typing trainer: type the falling words before they hit the floor
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Words fall down the terminal. Type each one and press enter before it reaches the floor. Results are kept in a local leaderboard."
)]
pub struct Cli {
    /// language of the falling words
    #[clap(short = 'l', long, value_enum)]
    language: Option<Language>,

    /// difficulty tier, 1 (calm) to 3 (fast)
    #[clap(short = 'd', long, value_parser = clap::value_parser!(u8).range(1..=3))]
    difficulty: Option<u8>,

    /// play a timed game of this many seconds (60 to 600, in steps of 30)
    #[clap(short = 't', long)]
    timed: Option<u32>,

    /// nickname to fill in on the start screen
    #[clap(short = 'n', long)]
    nickname: Option<String>,

    /// directory with custom `{lang}_{tier}.txt` word lists
    #[clap(long)]
    words_dir: Option<PathBuf>,

    /// results database file
    #[clap(long)]
    db: Option<PathBuf>,

    /// never ring the terminal bell
    #[clap(long)]
    mute: bool,
}

impl Cli {
    /// Nickname and settings for this run: the saved config with flags on top
    fn session_context(&self, config: &Config) -> SessionContext {
        let mut settings = config.settings();
        if let Some(language) = self.language {
            settings.language = language;
        }
        if let Some(tier) = self.difficulty {
            settings.set_difficulty(tier);
        }
        if let Some(secs) = self.timed {
            settings.mode = Mode::Timed;
            settings.duration_secs = snap_duration(secs);
        }
        SessionContext {
            nickname: self
                .nickname
                .clone()
                .unwrap_or_else(|| config.nickname.clone()),
            settings,
        }
    }

    fn words_dir(&self, config: &Config) -> Option<PathBuf> {
        self.words_dir.clone().or_else(|| config.words_dir.clone())
    }

    fn sound(&self, config: &Config) -> bool {
        config.sound && !self.mute
    }
}

fn open_store(path: Option<PathBuf>) -> Box<dyn ResultStore> {
    let opened = match &path {
        Some(path) => ResultsDb::open(path),
        None => ResultsDb::open_default(),
    };
    match opened {
        Ok(db) => Box::new(db),
        Err(e) => {
            log::warn!("results database unavailable: {e}");
            Box::new(UnavailableStore::new(e.to_string()))
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    logging::init();

    let config_store = FileConfigStore::new();
    let config = config_store.load();
    let ctx = cli.session_context(&config);
    let services = Services {
        words: Box::new(WordProvider::new(cli.words_dir(&config))),
        store: open_store(cli.db.clone().or_else(|| config.db_path.clone())),
        config_store: Box::new(config_store),
        config: config.clone(),
    };
    let mut router = Router::new(ctx, services).with_sound(cli.sound(&config));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // restore the terminal before reporting any loop error
    let result = start_tui(&mut terminal, &mut router);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend + Write>(
    terminal: &mut Terminal<B>,
    router: &mut Router,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let mut frame_timer = FrameTimer::new();

    terminal.draw(|f| ui::render(router, f))?;

    loop {
        match runner.step() {
            GameEvent::Key(key) => {
                if router.handle_key(key) == Flow::Quit {
                    break;
                }
            }
            GameEvent::Resize | GameEvent::Tick => {}
        }

        // steady key input must not starve the simulation
        router.tick(frame_timer.delta());

        if router.take_bell() {
            let backend = terminal.backend_mut();
            backend.write_all(b"\x07")?;
            Write::flush(backend)?;
        }

        terminal.draw(|f| ui::render(router, f))?;
    }

    log::info!("shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use typefall::settings::Settings;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["typefall"]);

        assert_eq!(cli.language, None);
        assert_eq!(cli.difficulty, None);
        assert_eq!(cli.timed, None);
        assert_eq!(cli.nickname, None);
        assert!(!cli.mute);

        let ctx = cli.session_context(&Config::default());
        assert_eq!(ctx.settings, Settings::default());
        assert_eq!(ctx.nickname, "");
    }

    #[test]
    fn test_cli_language() {
        let cli = Cli::parse_from(["typefall", "-l", "en"]);
        assert_eq!(cli.language, Some(Language::En));

        let cli = Cli::parse_from(["typefall", "--language", "ru"]);
        assert_eq!(cli.language, Some(Language::Ru));

        assert!(Cli::try_parse_from(["typefall", "--language", "de"]).is_err());
    }

    #[test]
    fn test_cli_difficulty_range() {
        let cli = Cli::parse_from(["typefall", "-d", "3"]);
        assert_eq!(cli.difficulty, Some(3));

        assert!(Cli::try_parse_from(["typefall", "--difficulty", "0"]).is_err());
        assert!(Cli::try_parse_from(["typefall", "--difficulty", "4"]).is_err());
    }

    #[test]
    fn test_cli_timed_selects_timed_mode() {
        let cli = Cli::parse_from(["typefall", "--timed", "100"]);
        let ctx = cli.session_context(&Config::default());
        assert_eq!(ctx.settings.mode, Mode::Timed);
        assert_eq!(ctx.settings.duration_secs, 90);

        let cli = Cli::parse_from(["typefall", "-t", "5000"]);
        assert_eq!(cli.session_context(&Config::default()).settings.duration_secs, 600);
    }

    #[test]
    fn test_cli_overrides_saved_config() {
        let config = Config {
            nickname: "neo".into(),
            language: Language::En,
            difficulty: 2,
            sound: true,
            words_dir: Some(PathBuf::from("/saved/words")),
            ..Config::default()
        };

        let cli = Cli::parse_from(["typefall"]);
        let ctx = cli.session_context(&config);
        assert_eq!(ctx.nickname, "neo");
        assert_eq!(ctx.settings.language, Language::En);
        assert_eq!(ctx.settings.difficulty, 2);
        assert_eq!(cli.words_dir(&config), Some(PathBuf::from("/saved/words")));
        assert!(cli.sound(&config));

        let cli = Cli::parse_from([
            "typefall",
            "-n",
            "trinity",
            "-l",
            "ru",
            "-d",
            "1",
            "--words-dir",
            "/tmp/words",
            "--mute",
        ]);
        let ctx = cli.session_context(&config);
        assert_eq!(ctx.nickname, "trinity");
        assert_eq!(ctx.settings.language, Language::Ru);
        assert_eq!(ctx.settings.difficulty, 1);
        assert_eq!(cli.words_dir(&config), Some(PathBuf::from("/tmp/words")));
        assert!(!cli.sound(&config));
    }

    #[test]
    fn test_open_store_falls_back_when_path_is_unusable() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let store = open_store(Some(blocker.join("results.db")));
        assert!(store.top_results(10).is_err());

        let store = open_store(Some(dir.path().join("results.db")));
        assert!(store.top_results(10).unwrap().is_empty());
    }
}
