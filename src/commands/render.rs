//! Help text rendering utilities.

use std::collections::HashMap;

use super::registry::{HelpEntry, HelpRegistry};
use super::types::CommandCategory;

/// Width of the `%name SIGNATURE` column.
const USAGE_WIDTH: usize = 22;

/// Invocation form of an entry, e.g. `%bdel <NUM...>`.
pub fn usage(entry: &HelpEntry, prefix: char) -> String {
    if entry.signature.is_empty() {
        format!("{}{}", prefix, entry.name())
    } else {
        format!("{}{} {}", prefix, entry.name(), entry.signature)
    }
}

/// One help line for a single entry.
pub fn help_line(entry: &HelpEntry, prefix: char) -> String {
    format!(
        "  {:width$} {}",
        usage(entry, prefix),
        entry.description,
        width = USAGE_WIDTH
    )
}

/// Full help, grouped by category.
pub fn help_text(registry: &HelpRegistry, prefix: char) -> String {
    // Group by category
    let mut by_category: HashMap<CommandCategory, Vec<&HelpEntry>> = HashMap::new();
    for entry in registry.entries() {
        by_category
            .entry(entry.command.category())
            .or_default()
            .push(entry);
    }

    let mut categories: Vec<_> = by_category.keys().copied().collect();
    categories.sort_by_key(|c| c.order());

    let mut lines = Vec::new();
    for category in categories {
        if let Some(entries) = by_category.get(&category) {
            lines.push(category.display_name().to_string());
            for entry in entries {
                lines.push(help_line(entry, prefix));
            }
            lines.push(String::new());
        }
    }
    lines.pop();

    lines.join("\n")
}

/// One-line list of commands shown at startup.
pub fn command_summary(registry: &HelpRegistry, prefix: char) -> String {
    let names: Vec<String> = registry
        .entries()
        .iter()
        .map(|e| format!("{}{}", prefix, e.name()))
        .collect();
    format!("Commands: {}", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;

    #[test]
    fn usage_includes_signature() {
        let registry = HelpRegistry::new();
        assert_eq!(usage(registry.entry_for(Command::Bdel), '%'), "%bdel <NUM...>");
        assert_eq!(usage(registry.entry_for(Command::Bls), '%'), "%bls");
    }

    #[test]
    fn help_text_groups_by_category() {
        let text = help_text(&HelpRegistry::new(), '%');
        let buffers = text.find("BUFFERS").unwrap();
        let execution = text.find("EXECUTION").unwrap();
        let other = text.find("OTHER").unwrap();
        assert!(buffers < execution && execution < other);
        assert!(text.contains("%brun <NUM...>"));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn summary_lists_every_command() {
        let summary = command_summary(&HelpRegistry::new(), '!');
        assert!(summary.starts_with("Commands: !help, !badd"));
        assert!(summary.ends_with("!bcat"));
    }
}
