use mlua::{FromLua, IntoLua, Lua, MultiValue, Value};

use super::{ErrorKind, EvalError, Evaluator, Origin, split_traceback};

/// Allocation cap applied to the session's Lua state.
pub const DEFAULT_MEMORY_LIMIT: usize = 256 * 1024 * 1024;

/// The session's bindings: the globals table of one Lua state.
pub struct Scope {
    lua: Lua,
}

impl Scope {
    pub fn new() -> Self {
        Self { lua: Lua::new() }
    }

    pub fn lua(&self) -> &Lua {
        &self.lua
    }

    /// The global `name`, if it is bound and converts to `V`.
    pub fn get<V: FromLua>(&self, name: &str) -> Option<V> {
        self.lua.globals().get::<Option<V>>(name).ok().flatten()
    }

    pub fn set(&mut self, name: &str, value: impl IntoLua) -> Result<(), EvalError> {
        Ok(self.lua.globals().set(name, value)?)
    }

    pub fn remove(&mut self, name: &str) -> Result<(), EvalError> {
        Ok(self.lua.globals().set(name, Value::Nil)?)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lua.globals().contains_key(name).unwrap_or(false)
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs source text as Lua chunks.
///
/// Buffers run as whole chunks, so a syntax error anywhere means nothing in
/// the buffer runs. Interactive lines are tried as an expression first, the
/// way the stock Lua prompt does it.
#[derive(Debug, Clone)]
pub struct LuaEvaluator {
    memory_limit: Option<usize>,
}

impl LuaEvaluator {
    pub fn new() -> Self {
        Self {
            memory_limit: Some(DEFAULT_MEMORY_LIMIT),
        }
    }

    pub fn with_memory_limit(memory_limit: Option<usize>) -> Self {
        Self { memory_limit }
    }
}

impl Default for LuaEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for LuaEvaluator {
    fn eval(
        &mut self,
        source: &str,
        origin: &Origin,
        scope: &mut Scope,
    ) -> Result<Option<String>, EvalError> {
        let lua = scope.lua();
        if let Some(limit) = self.memory_limit {
            lua.set_memory_limit(limit)?;
        }

        let chunk = lua.load(source).set_name(origin.chunk_name());
        match origin {
            Origin::Interactive => render(chunk.eval::<MultiValue>()?),
            Origin::File(_) => {
                chunk.exec()?;
                Ok(None)
            }
        }
    }
}

/// Tab-separated results, or `None` when there is nothing worth echoing.
fn render(values: MultiValue) -> Result<Option<String>, EvalError> {
    let values: Vec<Value> = values.into_iter().collect();
    if values.iter().all(Value::is_nil) {
        return Ok(None);
    }
    let parts = values
        .iter()
        .map(Value::to_string)
        .collect::<mlua::Result<Vec<_>>>()?;
    Ok(Some(parts.join("\t")))
}

impl From<mlua::Error> for EvalError {
    fn from(err: mlua::Error) -> Self {
        match err {
            mlua::Error::SyntaxError { message, .. } => EvalError::new(ErrorKind::Syntax, message),
            mlua::Error::RuntimeError(text) => {
                let (message, traceback) = split_traceback(&text);
                EvalError {
                    kind: ErrorKind::Runtime,
                    message,
                    traceback,
                }
            }
            mlua::Error::MemoryError(message) => EvalError::new(ErrorKind::Memory, message),
            mlua::Error::CallbackError { traceback, cause } => {
                let mut inner = EvalError::from(cause.as_ref().clone());
                if inner.traceback.is_empty() {
                    inner.traceback = split_traceback(&traceback).1;
                }
                inner
            }
            other => EvalError::new(ErrorKind::Runtime, other.to_string()),
        }
    }
}
