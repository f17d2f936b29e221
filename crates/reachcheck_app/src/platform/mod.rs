//! Terminal front end: wires the core state machine to the engine.
mod app;
pub mod cli;
mod config;
mod effects;
mod logging;
mod ui;

pub use app::{run_app, EXIT_CONFIG_ERROR};
