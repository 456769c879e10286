//! Command implementations for quadrant.
//!
//! This module contains the implementation of all CLI commands.

mod completions;
mod queue;
mod tasks;

pub use completions::completions;
pub use queue::{format_drain_report, queue};
pub use tasks::{add, tasks};
