//! Help table for the built-in commands.

use super::command::Command;

/// One row of the help table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpEntry {
    pub command: Command,
    pub signature: &'static str,
    pub description: &'static str,
}

impl HelpEntry {
    pub fn name(&self) -> &'static str {
        self.command.name()
    }
}

const ENTRIES: &[HelpEntry] = &[
    HelpEntry {
        command: Command::Help,
        signature: "[COMMAND]",
        description: "Show help for every command, or for COMMAND",
    },
    HelpEntry {
        command: Command::Badd,
        signature: "[PATH...]",
        description: "Open each PATH as a buffer; with no PATH, create a new hidden temp buffer in the working directory",
    },
    HelpEntry {
        command: Command::Bdel,
        signature: "<NUM...>",
        description: "Close buffers, keeping their files; later buffers are renumbered",
    },
    HelpEntry {
        command: Command::Bdestroy,
        signature: "<NUM...>",
        description: "Close buffers and delete their files from disk",
    },
    HelpEntry {
        command: Command::Bed,
        signature: "<NUM...>",
        description: "Open buffers in the external editor and wait for it to exit",
    },
    HelpEntry {
        command: Command::Binit,
        signature: "[PATH]",
        description: "Close all buffers and start a fresh list, optionally opening PATH",
    },
    HelpEntry {
        command: Command::Bls,
        signature: "",
        description: "List buffers with their numbers",
    },
    HelpEntry {
        command: Command::Brun,
        signature: "<NUM...>",
        description: "Execute buffers in order in the session scope",
    },
    HelpEntry {
        command: Command::Bcat,
        signature: "<NUM>",
        description: "Print the current content of a buffer",
    },
];

/// Static registry of command help.
#[derive(Debug, Clone, Copy, Default)]
pub struct HelpRegistry;

impl HelpRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Every entry, in table order.
    pub fn entries(&self) -> &'static [HelpEntry] {
        ENTRIES
    }

    /// Entry for `name`, with or without a leading `prefix`.
    pub fn get(&self, name: &str, prefix: char) -> Option<&'static HelpEntry> {
        let name = name.strip_prefix(prefix).unwrap_or(name);
        ENTRIES.iter().find(|e| e.name() == name)
    }

    pub fn entry_for(&self, command: Command) -> &'static HelpEntry {
        ENTRIES
            .iter()
            .find(|e| e.command == command)
            .unwrap_or(&ENTRIES[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_command_has_exactly_one_entry() {
        for command in Command::all() {
            let count = ENTRIES.iter().filter(|e| e.command == *command).count();
            assert_eq!(count, 1, "{:?}", command);
        }
        assert_eq!(ENTRIES.len(), Command::all().len());
    }

    #[test]
    fn table_order_matches_command_order() {
        let names: Vec<_> = HelpRegistry::new().entries().iter().map(|e| e.name()).collect();
        let expected: Vec<_> = Command::all().iter().map(|c| c.name()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn get_accepts_prefixed_name() {
        let registry = HelpRegistry::new();
        assert_eq!(registry.get("bls", '%').unwrap().command, Command::Bls);
        assert_eq!(registry.get("%bls", '%').unwrap().command, Command::Bls);
        assert!(registry.get("nope", '%').is_none());
    }
}
