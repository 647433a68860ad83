use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::settings::{Language, Mode, SessionContext, Settings};

/// Persisted preferences, restored at the next launch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub nickname: String,
    pub language: Language,
    pub difficulty: u8,
    pub mode: Mode,
    pub duration_secs: u32,
    pub sound: bool,
    pub words_dir: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            nickname: String::new(),
            language: settings.language,
            difficulty: settings.difficulty,
            mode: settings.mode,
            duration_secs: settings.duration_secs,
            sound: true,
            words_dir: None,
            db_path: None,
        }
    }
}

impl Config {
    /// Game settings from this config, with out-of-range values repaired
    pub fn settings(&self) -> Settings {
        Settings {
            language: self.language,
            difficulty: self.difficulty,
            mode: self.mode,
            duration_secs: self.duration_secs,
        }
        .normalized()
    }

    /// Copy the current nickname and settings in, keeping everything else
    pub fn update_from(&mut self, ctx: &SessionContext) {
        self.nickname = ctx.nickname.clone();
        self.language = ctx.settings.language;
        self.difficulty = ctx.settings.difficulty;
        self.mode = ctx.settings.mode;
        self.duration_secs = ctx.settings.duration_secs;
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("typefall_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("ignoring unreadable config {}: {e}", self.path.display());
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
    }
}

/// Config store that keeps everything in memory
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    cfg: std::cell::RefCell<Config>,
}

impl MemoryConfigStore {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg: std::cell::RefCell::new(cfg),
        }
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Config {
        self.cfg.borrow().clone()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        *self.cfg.borrow_mut() = cfg.clone();
        Ok(())
    }
}
