//! Configuration management for quadrant.
//!
//! This module handles loading and saving configuration from `~/.quadrant/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{BoardSettings, Config, GestureSettings, SyncSettings};
