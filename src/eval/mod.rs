//! The evaluator behind the prompt.
//!
//! Everything typed at the prompt and every executed buffer runs against one
//! shared [`Scope`]. The dispatcher only talks to the [`Evaluator`] trait;
//! [`LuaEvaluator`] is the bundled implementation, backed by an embedded Lua
//! state whose globals table is the scope.

mod lua;

pub use lua::{DEFAULT_MEMORY_LIMIT, LuaEvaluator, Scope};

use std::fmt;
use std::path::PathBuf;

/// Where a piece of source text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Interactive,
    File(PathBuf),
}

impl Origin {
    /// Chunk name as Lua expects it: `@path` for files, `=stdin` otherwise.
    pub fn chunk_name(&self) -> String {
        match self {
            Origin::Interactive => "=stdin".to_string(),
            Origin::File(path) => format!("@{}", path.display()),
        }
    }
}

/// Error category, named the way it is shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Runtime,
    Memory,
}

impl ErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::Syntax => "SyntaxError",
            ErrorKind::Runtime => "RuntimeError",
            ErrorKind::Memory => "MemoryError",
        }
    }
}

const TRACEBACK_HEADER: &str = "stack traceback:";

/// One line of a stack traceback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub text: String,
}

impl Frame {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Frames for native functions: the runtime's builtins and the shell's
    /// own entry points.
    pub fn is_internal(&self) -> bool {
        self.text.starts_with("[C]")
    }
}

/// Stack frames, innermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Traceback {
    frames: Vec<Frame>,
}

impl Traceback {
    /// Parse the frame lines that follow a `stack traceback:` header.
    pub fn parse(lines: &str) -> Self {
        let frames = lines
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && *line != TRACEBACK_HEADER)
            .map(Frame::new)
            .collect();
        Self { frames }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Copy with every internal frame dropped.
    pub fn without_internal(&self) -> Traceback {
        Traceback {
            frames: self
                .frames
                .iter()
                .filter(|f| !f.is_internal())
                .cloned()
                .collect(),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::from(TRACEBACK_HEADER);
        for frame in &self.frames {
            out.push_str("\n\t");
            out.push_str(&frame.text);
        }
        out
    }
}

/// Split a runtime message into the error text and its traceback, if any.
pub(crate) fn split_traceback(text: &str) -> (String, Traceback) {
    match text.split_once(TRACEBACK_HEADER) {
        Some((message, frames)) => (message.trim_end().to_string(), Traceback::parse(frames)),
        None => (text.trim_end().to_string(), Traceback::default()),
    }
}

/// A failure raised while evaluating user code.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalError {
    pub kind: ErrorKind,
    pub message: String,
    pub traceback: Traceback,
}

impl EvalError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            traceback: Traceback::default(),
        }
    }

    /// The same error with internal frames removed.
    pub fn trimmed(&self) -> EvalError {
        EvalError {
            kind: self.kind,
            message: self.message.clone(),
            traceback: self.traceback.without_internal(),
        }
    }

    /// Error line followed by the traceback.
    pub fn report(&self) -> String {
        if self.traceback.is_empty() {
            return self.to_string();
        }
        format!("{}\n{}", self, self.traceback.render())
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind.name())
        } else {
            write!(f, "{}: {}", self.kind.name(), self.message)
        }
    }
}

impl std::error::Error for EvalError {}

/// Evaluates source text against a shared scope.
pub trait Evaluator {
    /// Run `source` as one unit. Interactive input that is an expression
    /// returns its rendered value.
    fn eval(&mut self, source: &str, origin: &Origin, scope: &mut Scope)
    -> Result<Option<String>, EvalError>;
}
