//! Built-in shell commands.

use super::types::CommandCategory;

/// Commands understood after the command prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Show help for all commands or one command
    Help,
    /// Add buffers
    Badd,
    /// Close buffers
    Bdel,
    /// Close buffers and delete their files
    Bdestroy,
    /// Edit buffers in the external editor
    Bed,
    /// Drop all buffers and start over
    Binit,
    /// List buffers
    Bls,
    /// Execute buffers in the session scope
    Brun,
    /// Print a buffer's content
    Bcat,
}

impl Command {
    /// All commands, in help order.
    pub fn all() -> &'static [Command] {
        &[
            Self::Help,
            Self::Badd,
            Self::Bdel,
            Self::Bdestroy,
            Self::Bed,
            Self::Binit,
            Self::Bls,
            Self::Brun,
            Self::Bcat,
        ]
    }

    /// Command name (without the prefix).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Badd => "badd",
            Self::Bdel => "bdel",
            Self::Bdestroy => "bdestroy",
            Self::Bed => "bed",
            Self::Binit => "binit",
            Self::Bls => "bls",
            Self::Brun => "brun",
            Self::Bcat => "bcat",
        }
    }

    pub fn lookup(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.name() == name)
    }

    pub fn category(&self) -> CommandCategory {
        match self {
            Self::Badd | Self::Bdel | Self::Bdestroy | Self::Bed | Self::Binit | Self::Bls => {
                CommandCategory::Buffers
            }
            Self::Brun | Self::Bcat => CommandCategory::Execution,
            Self::Help => CommandCategory::Other,
        }
    }

    /// Minimum and maximum argument counts (`None` = unbounded).
    pub fn arity(&self) -> (usize, Option<usize>) {
        match self {
            Self::Help => (0, Some(1)),
            Self::Badd => (0, None),
            Self::Bdel | Self::Bdestroy | Self::Bed | Self::Brun => (1, None),
            Self::Binit => (0, Some(1)),
            Self::Bls => (0, Some(0)),
            Self::Bcat => (1, Some(1)),
        }
    }

    pub fn accepts(&self, count: usize) -> bool {
        let (min, max) = self.arity();
        count >= min && max.is_none_or(|max| count <= max)
    }
}
