use env_logger::{Builder, Env, Target};
use std::fs::{self, File, OpenOptions};
use std::path::Path;

use crate::app_dirs::AppDirs;

/// Route `log` output to the state dir log file. The terminal belongs to the
/// TUI, so when the file cannot be opened logging is simply left off.
pub fn init() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Ok(file) = open_log_file(&path) {
        let _ = builder(file).try_init();
    }
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn builder(file: File) -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.target(Target::Pipe(Box::new(file)));
    builder
}
