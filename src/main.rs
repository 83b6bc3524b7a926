use bufshell::buffers::{AddOutcome, BufferManager};
use bufshell::config::{self, Config, ConfigError};
use bufshell::dispatch::{CommandDispatcher, Notice, NoticeLevel};
use bufshell::editor::ExternalEditor;
use bufshell::eval::{Evaluator, LuaEvaluator, Origin, Scope};
use bufshell::{history, logging};
use clap::Parser;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use reedline::{DefaultPrompt, DefaultPromptSegment, Reedline, Signal};
use std::io;
use std::path::PathBuf;

/// Interactive shell with file-backed scratch buffers.
#[derive(Parser, Debug)]
#[command(name = "bufshell", version, about)]
struct Args {
    /// Config file (default: ~/.config/bufshell.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Editor program used by the bed command
    #[arg(long)]
    editor: Option<String>,

    /// Character that marks a command line
    #[arg(long)]
    prefix: Option<char>,

    /// Do not read or write the history file
    #[arg(long)]
    no_history: bool,

    /// Execute FILES once after opening them
    #[arg(long)]
    run: bool,

    /// Files to open as buffers at startup
    files: Vec<PathBuf>,
}

fn main() {
    let args = Args::parse();
    logging::init();

    let config = load_config(args.config.as_deref());

    let prefix = args.prefix.unwrap_or(config.command_prefix);
    if let Err(e) = config::validate_prefix(prefix) {
        print_colored_message(&format!("{}\n", e), Color::Red);
        std::process::exit(2);
    }

    let editor = ExternalEditor::resolve(args.editor.as_deref(), &config.editor);
    tracing::info!(program = editor.program(), ?prefix, "starting session");

    let mut dispatcher = CommandDispatcher::new(prefix, BufferManager::new(), Box::new(editor));
    let mut evaluator = LuaEvaluator::new();
    let mut scope = Scope::new();

    let opened = open_startup_files(&mut dispatcher, &args.files);
    if args.run && !opened.is_empty() {
        let notices = dispatcher.run_buffers(&opened, &mut evaluator, &mut scope);
        print_notices(&notices);
    }

    print_colored_message(&format!("{}\n", dispatcher.summary()), Color::DarkMagenta);

    let mut rl = Reedline::create();
    if !args.no_history && config.history.enabled {
        if let Some(path) = config.history_path() {
            match history::file_history(&path, config.history.max_entries) {
                Ok(h) => rl = rl.with_history(Box::new(h)),
                Err(e) => {
                    tracing::warn!(error = %e, "history disabled");
                    print_colored_message(&format!("Warning: {}\n", e), Color::DarkYellow);
                }
            }
        }
    }

    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic(config.prompt.clone()),
        DefaultPromptSegment::Empty,
    );

    loop {
        let input = match rl.read_line(&prompt) {
            Ok(Signal::Success(input)) => input,
            Ok(Signal::CtrlC) => continue,
            Ok(Signal::CtrlD) => break,
            Err(e) => {
                tracing::error!(error = %e, "could not read input");
                break;
            }
        };

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        let intercepted = dispatcher.intercept(line, &mut evaluator, &mut scope);
        print_notices(intercepted.notices());

        let source = intercepted.into_line();
        if source.is_empty() {
            continue;
        }

        match evaluator.eval(&source, &Origin::Interactive, &mut scope) {
            Ok(Some(rendered)) => println!("{}", rendered),
            Ok(None) => {}
            Err(e) => print_colored_message(&format!("{}\n", e.trimmed().report()), Color::Red),
        }
    }

    tracing::info!(buffers = dispatcher.buffers().len(), "session ended");
}

fn load_config(path: Option<&std::path::Path>) -> Config {
    let loaded = match path {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    };

    match loaded {
        Ok(cfg) => cfg,
        Err(ConfigError::NotFound(path)) if path_is_default(&path) => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Config::default()
        }
        Err(e) => {
            print_colored_message(
                &format!("Warning: {}\nUsing default settings.\n", e),
                Color::DarkYellow,
            );
            Config::default()
        }
    }
}

fn path_is_default(path: &std::path::Path) -> bool {
    config::config_path().is_none_or(|default| default == path)
}

fn open_startup_files(dispatcher: &mut CommandDispatcher, files: &[PathBuf]) -> Vec<usize> {
    let mut opened = Vec::new();
    for file in files {
        match dispatcher.buffers_mut().add(Some(file)) {
            Ok(AddOutcome::Added(number)) | Ok(AddOutcome::AlreadyOpen(number)) => {
                if !opened.contains(&number) {
                    opened.push(number);
                }
            }
            Err(e) => print_colored_message(&format!("{}\n", e), Color::Red),
        }
    }
    if !opened.is_empty() {
        let listing: Vec<String> = dispatcher
            .buffers()
            .list()
            .into_iter()
            .map(|(number, path)| format!("{}: {}", number, path.display()))
            .collect();
        print_colored_message(&format!("{}\n", listing.join("\n")), Color::Green);
    }
    opened
}

fn print_notices(notices: &[Notice]) {
    for notice in notices {
        let color = match notice.level {
            NoticeLevel::Info => Color::Reset,
            NoticeLevel::Success => Color::Green,
            NoticeLevel::Warning => Color::DarkYellow,
            NoticeLevel::Error | NoticeLevel::Trace => Color::Red,
        };
        print_colored_message(&format!("{}\n", notice.text), color);
    }
}

fn print_colored_message(message: &str, color: Color) {
    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        SetForegroundColor(color),
        Print(message),
        ResetColor
    );
}
