//! Command-line interface for quadrant.

pub mod args;
pub mod commands;
