use rand::rngs::StdRng;
use rand::Rng;
use std::time::Instant;

use crate::clock::Clock;
use crate::difficulty::{DifficultyTable, TierParams};
use crate::effects::{ColorTag, EffectsSink, SoundCue};
use crate::scoring::{ResultSummary, ScoringState};
use crate::settings::Settings;
use crate::storage::ResultStore;
use crate::words::WordCatalog;

// Logical playfield. y grows downward, the top edge is 0.
pub const FIELD_WIDTH: f64 = 1000.0;
pub const FIELD_HEIGHT: f64 = 700.0;
pub const FLOOR_Y: f64 = 680.0;
pub const SPAWN_Y: f64 = -40.0;
pub const SPAWN_MARGIN: f64 = 90.0;
/// Where wrong-input bursts appear: just above the input box
pub const INPUT_ANCHOR: (f64, f64) = (FIELD_WIDTH / 2.0, 630.0);

pub const MAX_LIVE_WORDS: usize = 12;

const SHAKE_SECS: f64 = 0.18;
const HIT_BURST: usize = 20;
const FLOOR_BURST: usize = 18;
const WRONG_BURST: usize = 10;

/// A live word on the playfield
#[derive(Debug, Clone, PartialEq)]
pub struct FallingWord {
    /// Spawn sequence number, unique within a session
    pub id: u64,
    pub text: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Ended,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Session over, or nothing but whitespace was typed
    Ignored,
    Hit { text: String, points: u32 },
    Miss,
}

/// Produced exactly once, when the session ends
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    pub summary: ResultSummary,
    /// Set when the result could not be written to the store
    pub persist_error: Option<String>,
}

/// Services the engine calls out to while it runs
pub struct Collaborators<'a> {
    pub words: &'a mut dyn WordCatalog,
    pub effects: &'a mut dyn EffectsSink,
    pub store: &'a mut dyn ResultStore,
}

/// One play-through: falling words, scoring and the end-of-session record
pub struct GameSession {
    nickname: String,
    settings: Settings,
    params: TierParams,
    words: Vec<FallingWord>,
    next_id: u64,
    spawn_timer: f64,
    scoring: ScoringState,
    state: SessionState,
    clock: Box<dyn Clock>,
    started_at: Instant,
    rng: StdRng,
    summary: Option<ResultSummary>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("nickname", &self.nickname)
            .field("settings", &self.settings)
            .field("state", &self.state)
            .field("scoring", &self.scoring)
            .field("words", &self.words)
            .finish_non_exhaustive()
    }
}

impl GameSession {
    pub fn new(nickname: &str, settings: &Settings, clock: Box<dyn Clock>, rng: StdRng) -> Self {
        let started_at = clock.now();
        log::info!(
            "session started: player={nickname} lang={} tier={} mode={}",
            settings.language,
            settings.difficulty,
            settings.mode
        );
        Self {
            nickname: nickname.to_string(),
            settings: settings.clone(),
            params: DifficultyTable::lookup(settings.difficulty),
            words: Vec::new(),
            next_id: 0,
            spawn_timer: 0.0,
            scoring: ScoringState::default(),
            state: SessionState::Running,
            clock,
            started_at,
            rng,
            summary: None,
        }
    }

    /// Advance the simulation by `dt` seconds. Returns the outcome if the
    /// session ran out of time during this tick.
    pub fn tick(&mut self, dt: f64, deps: &mut Collaborators<'_>) -> Option<SessionOutcome> {
        if self.is_ended() {
            return None;
        }
        let dt = dt.max(0.0);

        deps.effects.update(dt);

        if self.time_left() == Some(0) {
            return self.finish(deps);
        }

        self.spawn_timer += dt;
        if self.spawn_timer >= self.params.spawn_interval_secs {
            self.spawn_timer = 0.0;
            self.spawn(deps.words);
        }

        let speed = self.params.fall_speed;
        let scoring = &mut self.scoring;
        let effects = &mut *deps.effects;
        self.words.retain_mut(|w| {
            w.y += speed * dt;
            if w.y < FLOOR_Y {
                return true;
            }
            scoring.record_mistake();
            effects.burst(w.x, w.y, ColorTag::Bad, FLOOR_BURST);
            effects.shake(SHAKE_SECS);
            effects.play(SoundCue::Miss);
            false
        });

        None
    }

    fn spawn(&mut self, catalog: &mut dyn WordCatalog) {
        if self.words.len() >= MAX_LIVE_WORDS {
            return;
        }
        let text = catalog.get_word(self.settings.language, self.settings.difficulty);
        let x = self
            .rng
            .gen_range(SPAWN_MARGIN..=FIELD_WIDTH - SPAWN_MARGIN);
        self.words.push(FallingWord {
            id: self.next_id,
            text,
            x,
            y: SPAWN_Y,
        });
        self.next_id += 1;
    }

    /// Resolve a submitted word against the live words. The earliest spawned
    /// word with exactly this (trimmed) text is removed.
    pub fn submit_typed_word(&mut self, text: &str, deps: &mut Collaborators<'_>) -> SubmitOutcome {
        if self.is_ended() {
            return SubmitOutcome::Ignored;
        }
        let typed = text.trim();
        if typed.is_empty() {
            return SubmitOutcome::Ignored;
        }

        match self.words.iter().position(|w| w.text == typed) {
            Some(idx) => {
                let word = self.words.remove(idx);
                let points = self.params.score_per_word;
                self.scoring.record_hit(points);
                deps.effects.burst(word.x, word.y, ColorTag::Good, HIT_BURST);
                deps.effects.play(SoundCue::Correct);
                SubmitOutcome::Hit {
                    text: word.text,
                    points,
                }
            }
            None => {
                self.scoring.record_mistake();
                let (x, y) = INPUT_ANCHOR;
                deps.effects.burst(x, y, ColorTag::Bad, WRONG_BURST);
                deps.effects.shake(SHAKE_SECS);
                deps.effects.play(SoundCue::Wrong);
                SubmitOutcome::Miss
            }
        }
    }

    /// Player asked to stop; ends the session in any mode
    pub fn request_quit(&mut self, deps: &mut Collaborators<'_>) -> Option<SessionOutcome> {
        self.finish(deps)
    }

    /// End the session, compute the summary and persist it. Only the first
    /// call does anything. A failed write is reported in the outcome but
    /// does not keep the session alive.
    pub fn finish(&mut self, deps: &mut Collaborators<'_>) -> Option<SessionOutcome> {
        if self.is_ended() {
            return None;
        }
        self.state = SessionState::Ended;
        self.words.clear();

        let summary = ResultSummary::compute(&self.scoring, self.elapsed_secs());
        log::info!(
            "session finished: player={} score={} correct={} mistakes={} wpm={:.1} acc={:.3} secs={}",
            self.nickname,
            summary.score,
            summary.correct,
            summary.mistakes,
            summary.wpm,
            summary.accuracy,
            summary.seconds_played
        );

        let persist_error = match deps.store.save_result(
            &self.nickname,
            summary.score,
            summary.wpm,
            summary.accuracy,
        ) {
            Ok(()) => None,
            Err(e) => {
                log::warn!("result for {} was not saved: {e}", self.nickname);
                Some(e.to_string())
            }
        };

        self.summary = Some(summary.clone());
        Some(SessionOutcome {
            summary,
            persist_error,
        })
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.clock
            .now()
            .saturating_duration_since(self.started_at)
            .as_secs_f64()
    }

    /// Whole seconds left in a timed session, None in endless mode
    pub fn time_left(&self) -> Option<u64> {
        let limit = self.settings.time_limit()? as u64;
        let played = self.elapsed_secs().floor() as u64;
        Some(limit.saturating_sub(played))
    }

    pub fn words(&self) -> &[FallingWord] {
        &self.words
    }

    pub fn scoring(&self) -> &ScoringState {
        &self.scoring
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_ended(&self) -> bool {
        self.state == SessionState::Ended
    }

    pub fn summary(&self) -> Option<&ResultSummary> {
        self.summary.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn params(&self) -> TierParams {
        self.params
    }
}
