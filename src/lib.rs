pub mod browser;
pub mod cli;
pub mod engine;
pub mod error;
pub mod fmt;
pub mod loader;
pub mod logging;
pub mod models;
pub mod reports;
pub mod settings;
pub mod tui;
pub mod views;
