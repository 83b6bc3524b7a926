use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_PREFIX: char = '%';
pub const DEFAULT_PROMPT: &str = "bufshell";
pub const DEFAULT_HISTORY_SIZE: usize = 1000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Editor program; falls back to $VISUAL / $EDITOR when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    /// Extra flags placed before the file list; replaces the built-in flags
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(default = "default_history_size")]
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
            max_entries: DEFAULT_HISTORY_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_prefix")]
    pub command_prefix: char,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command_prefix: DEFAULT_PREFIX,
            editor: EditorConfig::default(),
            history: HistoryConfig::default(),
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_prefix() -> char {
    DEFAULT_PREFIX
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

fn default_history_size() -> usize {
    DEFAULT_HISTORY_SIZE
}

#[derive(Debug)]
pub enum ConfigError {
    NotFound(PathBuf),
    InvalidJson(String),
    InvalidPrefix(char),
    IoError(std::io::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(path) => write!(f, "Config file not found: {}", path.display()),
            ConfigError::InvalidJson(msg) => write!(f, "Invalid JSON in config: {}", msg),
            ConfigError::InvalidPrefix(c) => {
                write!(f, "Command prefix {:?} must be a visible, non-alphanumeric character", c)
            }
            ConfigError::IoError(e) => write!(f, "IO error reading config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".config").join("bufshell.json"))
}

/// Default location of the line history file.
pub fn default_history_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("bufshell").join("history"))
}

/// Load the config from its default location.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path()
        .ok_or_else(|| ConfigError::NotFound(PathBuf::from("~/.config/bufshell.json")))?;
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    let config: Config =
        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidJson(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Reject prefixes that would collide with ordinary source lines.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_prefix(self.command_prefix)
    }

    pub fn history_path(&self) -> Option<PathBuf> {
        self.history.path.clone().or_else(default_history_path)
    }
}

pub fn validate_prefix(prefix: char) -> Result<(), ConfigError> {
    if prefix.is_alphanumeric() || prefix.is_whitespace() || prefix.is_control() || prefix == '_' {
        return Err(ConfigError::InvalidPrefix(prefix));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::Workspace;

    #[test]
    fn empty_object_uses_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.command_prefix, '%');
        assert!(config.history.enabled);
        assert_eq!(config.history.max_entries, 1000);
    }

    #[test]
    fn deserialize_full_config() {
        let json = r#"{
            "command_prefix": "!",
            "prompt": "scratch",
            "editor": { "program": "nvim", "args": ["-u", "NONE"] },
            "history": { "enabled": false, "path": "/tmp/hist", "max_entries": 50 }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.command_prefix, '!');
        assert_eq!(config.prompt, "scratch");
        assert_eq!(config.editor.program.as_deref(), Some("nvim"));
        assert_eq!(config.editor.args, vec!["-u", "NONE"]);
        assert!(!config.history.enabled);
        assert_eq!(config.history_path(), Some(PathBuf::from("/tmp/hist")));
        assert_eq!(config.history.max_entries, 50);
    }

    #[test]
    fn rejects_alphanumeric_prefix() {
        assert!(matches!(validate_prefix('b'), Err(ConfigError::InvalidPrefix('b'))));
        assert!(matches!(validate_prefix(' '), Err(ConfigError::InvalidPrefix(' '))));
        assert!(validate_prefix('%').is_ok());
        assert!(validate_prefix(':').is_ok());
    }

    #[test]
    fn load_reports_missing_file() {
        let ws = Workspace::new();
        let err = load_config_from(&ws.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn load_reports_bad_json() {
        let ws = Workspace::new();
        let path = ws.write("bad.json", "{ not json");
        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidJson(_)));
    }

    #[test]
    fn load_validates_prefix() {
        let ws = Workspace::new();
        let path = ws.write("prefix.json", r#"{ "command_prefix": "x" }"#);
        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPrefix('x')));
    }
}
