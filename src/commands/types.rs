//! Command system types.

/// Category for grouping commands in help display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandCategory {
    Buffers,
    Execution,
    Other,
}

impl CommandCategory {
    /// Display name for help section headers.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Buffers => "BUFFERS",
            Self::Execution => "EXECUTION",
            Self::Other => "OTHER",
        }
    }

    /// Order for help display (lower = first).
    pub fn order(&self) -> u8 {
        match self {
            Self::Buffers => 0,
            Self::Execution => 1,
            Self::Other => 2,
        }
    }
}

/// A command line split into its command name and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub name: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Split `line` if it starts with `prefix`; `None` means ordinary source.
    ///
    /// Leading whitespace before the prefix is ignored. A bare prefix gives
    /// an empty command name.
    pub fn parse(line: &str, prefix: char) -> Option<Self> {
        let rest = line.trim_start().strip_prefix(prefix)?;
        let mut tokens = rest.split_whitespace().map(str::to_string);
        let name = tokens.next().unwrap_or_default();
        Some(Self {
            name,
            args: tokens.collect(),
        })
    }
}
