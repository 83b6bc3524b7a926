//! Centralized command system.
//!
//! This module is the single source of truth for the prefixed commands the
//! shell understands. Help text and usage lines are generated from it.
//!
//! # Architecture
//!
//! - `types`: command-line splitting and help categories
//! - `command`: the built-in command set
//! - `registry`: static help table
//! - `render`: help and usage text

mod command;
mod registry;
mod render;
mod types;

pub use command::Command;
pub use registry::{HelpEntry, HelpRegistry};
pub use render::{command_summary, help_line, help_text, usage};
pub use types::{CommandCategory, CommandLine};
