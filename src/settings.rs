use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::difficulty::{DifficultyTable, MAX_TIER, MIN_TIER};

pub const NICKNAME_MIN_LEN: usize = 3;
pub const NICKNAME_MAX_LEN: usize = 16;

pub const MIN_DURATION_SECS: u32 = 60;
pub const MAX_DURATION_SECS: u32 = 600;
pub const DURATION_STEP_SECS: u32 = 30;

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[strum(to_string = "RU")]
    Ru,
    #[strum(to_string = "EN")]
    En,
}

impl Language {
    /// Short code used in word list file names
    pub fn code(&self) -> &'static str {
        match self {
            Language::Ru => "ru",
            Language::En => "en",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Language::Ru => Language::En,
            Language::En => Language::Ru,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[strum(to_string = "endless")]
    Endless,
    #[strum(to_string = "timed")]
    Timed,
}

/// Player-tunable game settings, edited on the settings screen
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub language: Language,
    pub difficulty: u8,
    pub mode: Mode,
    pub duration_secs: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Language::Ru,
            difficulty: MIN_TIER,
            mode: Mode::Endless,
            duration_secs: MIN_DURATION_SECS,
        }
    }
}

impl Settings {
    pub fn toggle_language(&mut self) {
        self.language = self.language.toggled();
    }

    /// Tiers outside 1..=3 are ignored
    pub fn set_difficulty(&mut self, tier: u8) {
        if (MIN_TIER..=MAX_TIER).contains(&tier) {
            self.difficulty = tier;
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            Mode::Endless => Mode::Timed,
            Mode::Timed => Mode::Endless,
        };
    }

    pub fn increase_duration(&mut self) {
        self.duration_secs = (self.duration_secs + DURATION_STEP_SECS).min(MAX_DURATION_SECS);
    }

    pub fn decrease_duration(&mut self) {
        self.duration_secs = self
            .duration_secs
            .saturating_sub(DURATION_STEP_SECS)
            .max(MIN_DURATION_SECS);
    }

    pub fn is_timed(&self) -> bool {
        self.mode == Mode::Timed
    }

    /// Session length in seconds when playing a timed game
    pub fn time_limit(&self) -> Option<u32> {
        self.is_timed().then_some(self.duration_secs)
    }

    /// Repair values that came from an outside source (config file, CLI)
    pub fn normalized(mut self) -> Self {
        self.difficulty = DifficultyTable::clamp_tier(self.difficulty);
        self.duration_secs = snap_duration(self.duration_secs);
        self
    }
}

/// Clamp to [60, 600] and snap down onto the 30 second grid
pub fn snap_duration(secs: u32) -> u32 {
    let clamped = secs.clamp(MIN_DURATION_SECS, MAX_DURATION_SECS);
    MIN_DURATION_SECS + (clamped - MIN_DURATION_SECS) / DURATION_STEP_SECS * DURATION_STEP_SECS
}

#[derive(Debug, Clone, PartialEq)]
pub enum NicknameError {
    TooShort { min: usize },
    TooLong { max: usize },
}

impl fmt::Display for NicknameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NicknameError::TooShort { min } => write!(f, "nickname too short (min {min})"),
            NicknameError::TooLong { max } => write!(f, "nickname too long (max {max})"),
        }
    }
}

impl std::error::Error for NicknameError {}

/// Trim and length-check a nickname. Lengths count characters, not bytes.
pub fn validate_nickname(raw: &str) -> Result<String, NicknameError> {
    let nick = raw.trim();
    let len = nick.chars().count();
    if len < NICKNAME_MIN_LEN {
        return Err(NicknameError::TooShort {
            min: NICKNAME_MIN_LEN,
        });
    }
    if len > NICKNAME_MAX_LEN {
        return Err(NicknameError::TooLong {
            max: NICKNAME_MAX_LEN,
        });
    }
    Ok(nick.to_string())
}

/// State shared by all screens for the lifetime of the window
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionContext {
    pub nickname: String,
    pub settings: Settings,
}
