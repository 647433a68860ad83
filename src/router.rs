use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::clock::{Clock, SystemClock};
use crate::config::{Config, ConfigStore};
use crate::effects::{Effects, EffectsSink, SoundCue};
use crate::game::{Collaborators, GameSession, SessionOutcome};
use crate::input::TextInput;
use crate::runtime::MAX_TICK_SECS;
use crate::scoring::ResultSummary;
use crate::settings::{validate_nickname, SessionContext, NICKNAME_MAX_LEN};
use crate::storage::{ResultRow, ResultStore};
use crate::words::WordCatalog;

/// Number of rows shown on the leaderboard
pub const LEADERBOARD_SIZE: usize = 10;

/// What the event loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ScreenKind {
    Start,
    Menu,
    Settings,
    Play,
    Results,
    Leaderboard,
}

/// The active screen and the state only that screen owns
#[derive(Debug)]
pub enum Screen {
    Start {
        input: TextInput,
        error: Option<String>,
    },
    Menu,
    Settings,
    Play {
        session: GameSession,
        input: TextInput,
    },
    Results {
        summary: ResultSummary,
        persist_error: Option<String>,
    },
    Leaderboard {
        rows: Result<Vec<ResultRow>, String>,
    },
}

impl Screen {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::Start { .. } => ScreenKind::Start,
            Screen::Menu => ScreenKind::Menu,
            Screen::Settings => ScreenKind::Settings,
            Screen::Play { .. } => ScreenKind::Play,
            Screen::Results { .. } => ScreenKind::Results,
            Screen::Leaderboard { .. } => ScreenKind::Leaderboard,
        }
    }
}

/// Long-lived services handed to the router at startup
pub struct Services {
    pub words: Box<dyn WordCatalog>,
    pub store: Box<dyn ResultStore>,
    pub config_store: Box<dyn ConfigStore>,
    /// Preferences as stored on disk; updated and written back on change
    pub config: Config,
}

type ClockSource = Box<dyn Fn() -> Box<dyn Clock>>;

/// Screen state machine. Owns the session context and every collaborator,
/// and hands them to the game session while one is running.
pub struct Router {
    ctx: SessionContext,
    screen: Screen,
    words: Box<dyn WordCatalog>,
    effects: Effects,
    store: Box<dyn ResultStore>,
    config_store: Box<dyn ConfigStore>,
    config: Config,
    clock_source: ClockSource,
}

impl Router {
    pub fn new(ctx: SessionContext, services: Services) -> Self {
        let input = TextInput::with_text(&ctx.nickname, NICKNAME_MAX_LEN);
        Self {
            ctx,
            screen: Screen::Start { input, error: None },
            words: services.words,
            effects: Effects::new(services.config.sound),
            store: services.store,
            config_store: services.config_store,
            config: services.config,
            clock_source: Box::new(|| Box::new(SystemClock)),
        }
    }

    /// Use a different time source for game sessions started from now on
    pub fn with_clock<F>(mut self, source: F) -> Self
    where
        F: Fn() -> Box<dyn Clock> + 'static,
    {
        self.clock_source = Box::new(source);
        self
    }

    pub fn with_sound(mut self, enabled: bool) -> Self {
        self.effects.set_sound_enabled(enabled);
        self
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn kind(&self) -> ScreenKind {
        self.screen.kind()
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether a sound cue asked for the terminal bell since the last call
    pub fn take_bell(&mut self) -> bool {
        self.effects.take_bell()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        match self.kind() {
            ScreenKind::Start => self.on_start_key(key),
            ScreenKind::Menu => self.on_menu_key(key),
            ScreenKind::Settings => {
                self.on_settings_key(key);
                Flow::Continue
            }
            ScreenKind::Play => {
                self.on_play_key(key);
                Flow::Continue
            }
            ScreenKind::Results => {
                match key.code {
                    KeyCode::Enter | KeyCode::Esc => self.go(Screen::Menu),
                    KeyCode::Char('3') => self.open_leaderboard(),
                    _ => {}
                }
                Flow::Continue
            }
            ScreenKind::Leaderboard => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                    self.go(Screen::Menu);
                }
                Flow::Continue
            }
        }
    }

    /// Advance the running game, if any, by `dt` seconds
    pub fn tick(&mut self, dt: f64) {
        let dt = dt.clamp(0.0, MAX_TICK_SECS);

        let outcome = match &mut self.screen {
            Screen::Play { session, .. } => {
                let mut deps = Collaborators {
                    words: self.words.as_mut(),
                    effects: &mut self.effects,
                    store: self.store.as_mut(),
                };
                session.tick(dt, &mut deps)
            }
            _ => {
                self.effects.update(dt);
                None
            }
        };

        if let Some(outcome) = outcome {
            self.show_results(outcome);
        }
    }

    fn on_start_key(&mut self, key: KeyEvent) -> Flow {
        let Screen::Start { input, error } = &mut self.screen else {
            return Flow::Continue;
        };

        match key.code {
            KeyCode::Esc => return Flow::Quit,
            KeyCode::Backspace => input.backspace(),
            KeyCode::Char(c) => {
                input.push(c);
            }
            KeyCode::Enter => match validate_nickname(input.as_str()) {
                Ok(nickname) => {
                    self.ctx.nickname = nickname;
                    self.config.nickname = self.ctx.nickname.clone();
                    self.save_config();
                    self.go(Screen::Menu);
                }
                Err(e) => *error = Some(e.to_string()),
            },
            _ => {}
        }
        Flow::Continue
    }

    fn on_menu_key(&mut self, key: KeyEvent) -> Flow {
        match key.code {
            KeyCode::Char('1') => {
                self.effects.play(SoundCue::Click);
                self.go(Screen::Settings);
            }
            KeyCode::Char('2') => {
                self.effects.play(SoundCue::Click);
                self.start_game();
            }
            KeyCode::Char('3') => {
                self.effects.play(SoundCue::Click);
                self.open_leaderboard();
            }
            KeyCode::Esc => return Flow::Quit,
            _ => {}
        }
        Flow::Continue
    }

    fn on_settings_key(&mut self, key: KeyEvent) {
        let settings = &mut self.ctx.settings;
        match key.code {
            KeyCode::Char('l') | KeyCode::Char('L') => settings.toggle_language(),
            KeyCode::Char(c @ '1'..='3') => settings.set_difficulty(c as u8 - b'0'),
            KeyCode::Char('m') | KeyCode::Char('M') => settings.toggle_mode(),
            KeyCode::Char('+') | KeyCode::Char('=') => settings.increase_duration(),
            KeyCode::Char('-') => settings.decrease_duration(),
            KeyCode::Enter | KeyCode::Esc => {
                self.config.update_from(&self.ctx);
                self.save_config();
                self.go(Screen::Menu);
                return;
            }
            _ => return,
        }
        self.effects.play(SoundCue::Click);
    }

    fn on_play_key(&mut self, key: KeyEvent) {
        let Screen::Play { session, input } = &mut self.screen else {
            return;
        };
        let mut deps = Collaborators {
            words: self.words.as_mut(),
            effects: &mut self.effects,
            store: self.store.as_mut(),
        };

        let outcome = match key.code {
            KeyCode::Esc => session.request_quit(&mut deps),
            KeyCode::Enter => {
                session.submit_typed_word(input.as_str(), &mut deps);
                input.clear();
                None
            }
            KeyCode::Backspace => {
                input.backspace();
                None
            }
            KeyCode::Char(c) => {
                input.push(c);
                None
            }
            _ => None,
        };

        if let Some(outcome) = outcome {
            self.show_results(outcome);
        }
    }

    fn start_game(&mut self) {
        self.effects.reset();
        let session = GameSession::new(
            &self.ctx.nickname,
            &self.ctx.settings,
            (self.clock_source)(),
            StdRng::from_entropy(),
        );
        self.go(Screen::Play {
            session,
            input: TextInput::default(),
        });
    }

    fn show_results(&mut self, outcome: SessionOutcome) {
        self.go(Screen::Results {
            summary: outcome.summary,
            persist_error: outcome.persist_error,
        });
    }

    fn open_leaderboard(&mut self) {
        let rows = self.store.top_results(LEADERBOARD_SIZE).map_err(|e| {
            log::warn!("cannot load leaderboard: {e}");
            e.to_string()
        });
        self.go(Screen::Leaderboard { rows });
    }

    fn go(&mut self, next: Screen) {
        log::debug!("screen {} -> {}", self.kind(), next.kind());
        self.screen = next;
    }

    fn save_config(&mut self) {
        if let Err(e) = self.config_store.save(&self.config) {
            log::warn!("cannot save config: {e}");
        }
    }
}
