pub mod buffers;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod editor;
pub mod eval;
pub mod history;
pub mod logging;

#[cfg(test)]
pub mod test_helpers;
