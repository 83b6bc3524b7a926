//! Routing of prompt lines to buffer commands or the evaluator.
//!
//! Every line from the prompt goes through [`CommandDispatcher::intercept`]
//! first. Lines starting with the command prefix are handled here and never
//! reach the evaluator; anything else is handed back untouched.

use std::path::{Path, PathBuf};

use crate::buffers::{AddOutcome, BufferError, BufferManager};
use crate::commands::{Command, CommandLine, HelpRegistry, command_summary, help_line, help_text, usage};
use crate::editor::Editor;
use crate::eval::{Evaluator, Origin, Scope};

/// How a message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
    /// A traceback from user code.
    Trace,
}

/// A user-facing message produced by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    fn info(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, text)
    }

    fn success(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, text)
    }

    fn error(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, text)
    }
}

/// What the host should do with an intercepted line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intercept {
    /// Not a command; evaluate the line as source.
    PassThrough(String),
    /// A command consumed the line. Show the notices and evaluate nothing.
    Handled(Vec<Notice>),
}

impl Intercept {
    /// The line to evaluate: the typed line for pass-through, empty otherwise.
    pub fn into_line(self) -> String {
        match self {
            Intercept::PassThrough(line) => line,
            Intercept::Handled(_) => String::new(),
        }
    }

    pub fn notices(&self) -> &[Notice] {
        match self {
            Intercept::PassThrough(_) => &[],
            Intercept::Handled(notices) => notices,
        }
    }
}

/// Error types for command dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    InvalidCommand(String),
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::InvalidCommand(name) => write!(f, "Invalid command: {}", name),
        }
    }
}

impl std::error::Error for DispatchError {}

/// Intercepts prompt lines and runs buffer commands.
pub struct CommandDispatcher {
    prefix: char,
    buffers: BufferManager,
    editor: Box<dyn Editor>,
    help: HelpRegistry,
}

impl CommandDispatcher {
    pub fn new(prefix: char, buffers: BufferManager, editor: Box<dyn Editor>) -> Self {
        Self {
            prefix,
            buffers,
            editor,
            help: HelpRegistry::new(),
        }
    }

    pub fn buffers(&self) -> &BufferManager {
        &self.buffers
    }

    pub fn buffers_mut(&mut self) -> &mut BufferManager {
        &mut self.buffers
    }

    /// Startup hint listing every command.
    pub fn summary(&self) -> String {
        command_summary(&self.help, self.prefix)
    }

    /// Handle `line` if it is a command, otherwise hand it back.
    ///
    /// `evaluator` and `scope` are the host's; buffers executed by `brun`
    /// run against them exactly like typed lines. Failures never escape:
    /// they come back as notices.
    pub fn intercept(
        &mut self,
        line: &str,
        evaluator: &mut dyn Evaluator,
        scope: &mut Scope,
    ) -> Intercept {
        let Some(cmd) = CommandLine::parse(line, self.prefix) else {
            return Intercept::PassThrough(line.to_string());
        };

        if cmd.name.is_empty() {
            return Intercept::Handled(vec![Notice::info(self.summary())]);
        }

        let Some(command) = Command::lookup(&cmd.name) else {
            let err = DispatchError::InvalidCommand(cmd.name.clone());
            tracing::debug!(command = %cmd.name, "unknown command");
            return Intercept::Handled(vec![Notice::error(format!(
                "{}. Type {}help for a list of commands.",
                err, self.prefix
            ))]);
        };

        if !command.accepts(cmd.args.len()) {
            let entry = self.help.entry_for(command);
            return Intercept::Handled(vec![Notice::error(format!(
                "Usage: {}",
                usage(entry, self.prefix)
            ))]);
        }

        tracing::debug!(command = command.name(), args = ?cmd.args, "dispatching command");

        let args = &cmd.args;
        let notices = match command {
            Command::Help => self.help(args),
            Command::Badd => self.add(args),
            Command::Bdel => self.remove(args, false),
            Command::Bdestroy => self.remove(args, true),
            Command::Bed => self.edit(args),
            Command::Binit => self.init(args),
            Command::Bls => self.list(),
            Command::Brun => self.run(args, evaluator, scope),
            Command::Bcat => self.cat(args),
        };

        Intercept::Handled(notices)
    }

    fn help(&self, args: &[String]) -> Vec<Notice> {
        match args.first() {
            None => vec![Notice::info(help_text(&self.help, self.prefix))],
            Some(name) => match self.help.get(name, self.prefix) {
                Some(entry) => vec![Notice::info(help_line(entry, self.prefix))],
                None => vec![Notice::error(format!("No help available for '{}'", name))],
            },
        }
    }

    fn add(&mut self, args: &[String]) -> Vec<Notice> {
        if args.is_empty() {
            return vec![self.add_one(None)];
        }
        args.iter()
            .map(|arg| {
                let path = expand_home(arg);
                self.add_one(Some(&path))
            })
            .collect()
    }

    fn add_one(&mut self, path: Option<&Path>) -> Notice {
        match self.buffers.add(path) {
            Ok(AddOutcome::Added(number)) => Notice::success(format!(
                "Added buffer {}: {}",
                number,
                self.display_path(number)
            )),
            Ok(AddOutcome::AlreadyOpen(number)) => Notice::info(format!(
                "{} is already open as buffer {}",
                self.display_path(number),
                number
            )),
            Err(e) => {
                tracing::warn!(error = %e, "could not add buffer");
                Notice::error(e.to_string())
            }
        }
    }

    /// Close (or destroy) each listed buffer.
    ///
    /// All numbers refer to the listing as it was when the command was
    /// typed, so removal runs from the highest number down. Notices come
    /// back in ascending order.
    fn remove(&mut self, args: &[String], destroy: bool) -> Vec<Notice> {
        let (mut numbers, mut notices) = parse_numbers(args);
        numbers.sort_unstable();
        numbers.dedup();

        let mut removed = Vec::with_capacity(numbers.len());
        for number in numbers.into_iter().rev() {
            let result = if destroy {
                self.buffers.destroy(number)
            } else {
                self.buffers.remove(number)
            };
            removed.push(match result {
                Ok(path) if destroy => {
                    Notice::success(format!("Deleted buffer {}: {}", number, path.display()))
                }
                Ok(path) => Notice::success(format!("Closed buffer {}: {}", number, path.display())),
                Err(e @ BufferError::Destroy { .. }) => Notice::new(
                    NoticeLevel::Warning,
                    format!("Closed buffer {}, but: {}", number, e),
                ),
                Err(e) => Notice::error(e.to_string()),
            });
        }

        removed.reverse();
        notices.extend(removed);
        notices
    }

    fn edit(&self, args: &[String]) -> Vec<Notice> {
        let (numbers, mut notices) = parse_numbers(args);
        if numbers.is_empty() {
            return notices;
        }

        let outcome = self.buffers.edit(&numbers, self.editor.as_ref());
        notices.extend(outcome.rejected.iter().map(|e| Notice::error(e.to_string())));
        if let Some(Err(e)) = outcome.editor {
            tracing::warn!(error = %e, "editor failed");
            notices.push(Notice::error(e.to_string()));
        }
        notices
    }

    fn init(&mut self, args: &[String]) -> Vec<Notice> {
        self.buffers.reset();
        let mut notices = vec![Notice::info("Buffer list cleared")];
        if let Some(arg) = args.first() {
            let path = expand_home(arg);
            notices.push(self.add_one(Some(&path)));
        }
        notices
    }

    fn list(&self) -> Vec<Notice> {
        if self.buffers.is_empty() {
            return vec![Notice::info("No buffers")];
        }

        let lines: Vec<String> = self
            .buffers
            .list()
            .into_iter()
            .map(|(number, path)| format!("{}: {}", number, path.display()))
            .collect();
        vec![Notice::info(lines.join("\n"))]
    }

    fn run(&self, args: &[String], evaluator: &mut dyn Evaluator, scope: &mut Scope) -> Vec<Notice> {
        let (numbers, mut notices) = parse_numbers(args);
        notices.extend(self.run_buffers(&numbers, evaluator, scope));
        notices
    }

    /// Execute buffers in the given order against the shared scope.
    ///
    /// Each buffer is read from disk at the moment it runs. An error in one
    /// buffer is reported as a traceback and the next buffer still runs.
    pub fn run_buffers(
        &self,
        numbers: &[usize],
        evaluator: &mut dyn Evaluator,
        scope: &mut Scope,
    ) -> Vec<Notice> {
        let mut notices = Vec::new();

        for &number in numbers {
            let (path, source) = match self.buffers.read(number) {
                Ok(read) => read,
                Err(e) => {
                    notices.push(Notice::error(e.to_string()));
                    continue;
                }
            };

            tracing::debug!(number, path = %path.display(), "running buffer");
            let origin = Origin::File(path);
            if let Err(e) = evaluator.eval(&source, &origin, scope) {
                tracing::info!(number, error = %e.report(), "buffer raised an error");
                notices.push(Notice::new(NoticeLevel::Trace, e.trimmed().report()));
            }
        }

        notices
    }

    fn cat(&self, args: &[String]) -> Vec<Notice> {
        let (numbers, mut notices) = parse_numbers(args);
        for number in numbers {
            match self.buffers.read(number) {
                Ok((_, content)) if content.is_empty() => notices.push(Notice::info("(empty)")),
                Ok((_, content)) => notices.push(Notice::info(content.trim_end().to_string())),
                Err(e) => notices.push(Notice::error(e.to_string())),
            }
        }
        notices
    }

    fn display_path(&self, number: usize) -> String {
        self.buffers
            .path_of(number)
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }
}

/// Parse buffer numbers, reporting malformed ones.
fn parse_numbers(args: &[String]) -> (Vec<usize>, Vec<Notice>) {
    let mut numbers = Vec::new();
    let mut notices = Vec::new();
    for arg in args {
        match arg.parse::<usize>() {
            Ok(number) => numbers.push(number),
            Err(_) => notices.push(Notice::error(
                BufferError::InvalidNumber(arg.clone()).to_string(),
            )),
        }
    }
    (numbers, notices)
}

/// Expand a leading `~/` to the home directory.
fn expand_home(arg: &str) -> PathBuf {
    match arg.strip_prefix("~/") {
        Some(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => PathBuf::from(arg),
        },
        None => PathBuf::from(arg),
    }
}
