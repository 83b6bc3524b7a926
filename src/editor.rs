//! External editor integration.
//!
//! The editor runs as a blocking child process. There is no timeout: the
//! session waits for as long as the editor stays open.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use crate::config::EditorConfig;

/// Editors that understand `-c "set backupcopy=yes"`.
const VI_FAMILY: &[&str] = &["vi", "vim", "nvim", "gvim", "mvim"];

/// Editor used when nothing else is configured.
pub const FALLBACK_EDITOR: &str = "vim";

/// Error types for editor invocations
#[derive(Debug)]
pub enum EditorError {
    Spawn { program: String, source: std::io::Error },
    Failed { program: String, status: ExitStatus },
}

impl std::fmt::Display for EditorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditorError::Spawn { program, source } => {
                write!(f, "Could not start editor '{}': {}", program, source)
            }
            EditorError::Failed { program, status } => {
                write!(f, "Editor '{}' exited with {}", program, status)
            }
        }
    }
}

impl std::error::Error for EditorError {}

/// Something that can open a set of files for editing and wait until done.
pub trait Editor {
    fn edit(&self, paths: &[PathBuf]) -> Result<(), EditorError>;
}

/// An editor launched as a child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalEditor {
    program: String,
    args: Vec<String>,
}

impl ExternalEditor {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Pick the editor program and its flags.
    ///
    /// Program: `cli`, then `config.program`, then `$VISUAL`, then `$EDITOR`,
    /// then [`FALLBACK_EDITOR`]. Configured args replace the default flags.
    pub fn resolve(cli: Option<&str>, config: &EditorConfig) -> Self {
        let program = cli
            .map(str::to_string)
            .or_else(|| config.program.clone())
            .or_else(|| env_editor("VISUAL"))
            .or_else(|| env_editor("EDITOR"))
            .unwrap_or_else(|| FALLBACK_EDITOR.to_string());

        let args = if config.args.is_empty() {
            default_args(&program)
        } else {
            config.args.clone()
        };

        Self::new(program, args)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Editor for ExternalEditor {
    fn edit(&self, paths: &[PathBuf]) -> Result<(), EditorError> {
        tracing::info!(program = %self.program, files = paths.len(), "running editor");

        let status = Command::new(&self.program)
            .args(&self.args)
            .args(paths)
            .status()
            .map_err(|source| EditorError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(EditorError::Failed {
                program: self.program.clone(),
                status,
            });
        }

        Ok(())
    }
}

fn env_editor(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

/// Flags that make the editor write files in place instead of renaming a
/// new file over them, so open handles keep pointing at the saved file.
pub fn default_args(program: &str) -> Vec<String> {
    let name = Path::new(program)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    if VI_FAMILY.contains(&name.as_str()) {
        vec!["-c".to_string(), "set backupcopy=yes".to_string()]
    } else {
        tracing::debug!(program, "no in-place save flag known for editor");
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vi_family_gets_backupcopy_flag() {
        for program in ["vim", "/usr/bin/nvim", "vi"] {
            assert_eq!(
                default_args(program),
                vec!["-c".to_string(), "set backupcopy=yes".to_string()]
            );
        }
    }

    #[test]
    fn unknown_editor_gets_no_flags() {
        assert!(default_args("nano").is_empty());
    }

    #[test]
    fn cli_choice_wins_over_config() {
        let config = EditorConfig {
            program: Some("emacs".to_string()),
            args: Vec::new(),
        };

        let editor = ExternalEditor::resolve(Some("nvim"), &config);
        assert_eq!(editor.program(), "nvim");
        assert_eq!(editor.args(), ["-c", "set backupcopy=yes"]);
    }

    #[test]
    fn configured_args_replace_defaults() {
        let config = EditorConfig {
            program: Some("vim".to_string()),
            args: vec!["-u".to_string(), "NONE".to_string()],
        };

        let editor = ExternalEditor::resolve(None, &config);
        assert_eq!(editor.program(), "vim");
        assert_eq!(editor.args(), ["-u", "NONE"]);
    }

    #[cfg(unix)]
    #[test]
    fn reports_non_zero_exit() {
        let editor = ExternalEditor::new("false", Vec::new());
        let err = editor.edit(&[PathBuf::from("/dev/null")]).unwrap_err();
        assert!(matches!(err, EditorError::Failed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn successful_exit_is_ok() {
        let editor = ExternalEditor::new("true", Vec::new());
        assert!(editor.edit(&[PathBuf::from("/dev/null")]).is_ok());
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let editor = ExternalEditor::new("bufshell-no-such-editor", Vec::new());
        let err = editor.edit(&[PathBuf::from("x")]).unwrap_err();
        assert!(matches!(err, EditorError::Spawn { .. }));
    }
}
