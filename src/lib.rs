// Library surface for headless/integration tests and reuse.
// The binary in main.rs only wires the terminal to the router.
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod difficulty;
pub mod effects;
pub mod game;
pub mod input;
pub mod logging;
pub mod router;
pub mod runtime;
pub mod scoring;
pub mod settings;
pub mod storage;
pub mod ui;
pub mod words;
