// Copyright (c) 2025 Dmitry Kalashnikov
// Dual Licensed: Open-Source (see LICENSE) / Commercial (proprietary use)
// Commercial use requires a Commercial License. See LICENSE file.

use std::cell::RefCell;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use log::LevelFilter;
use rustyline::config::EditMode;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config, Editor};

use stackshell::builtin_commands::{CoreDispatcher, VERSION};
use stackshell::{
    ColorChoice, ConsoleHost, DispatcherShell, ShellCompletion, ShellConfig, ShellHost,
};

const DEFAULT_CONTEXTS: &[&str] = &["module", "session", "workspace"];

mod options {
    pub const PROMPT: &str = "prompt";
    pub const COLOR: &str = "color";
    pub const NO_HISTORY: &str = "no-history";
    pub const HISTORY_FILE: &str = "history-file";
    pub const COMMAND: &str = "command";
    pub const VERBOSE: &str = "verbose";
}

fn stackshell_app() -> Command {
    Command::new("stackshell")
        .version(VERSION)
        .about("Interactive shell driven by a stack of command dispatchers")
        .arg(
            Arg::new(options::PROMPT)
                .long(options::PROMPT)
                .value_name("TEXT")
                .help("Text shown before the prompt character"),
        )
        .arg(
            Arg::new(options::COLOR)
                .long(options::COLOR)
                .value_name("WHEN")
                .value_parser(["auto", "always", "never"])
                .default_value("auto")
                .help("When to use colored output"),
        )
        .arg(
            Arg::new(options::NO_HISTORY)
                .long(options::NO_HISTORY)
                .action(ArgAction::SetTrue)
                .help("Do not load or save command history"),
        )
        .arg(
            Arg::new(options::HISTORY_FILE)
                .long(options::HISTORY_FILE)
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .conflicts_with(options::NO_HISTORY)
                .help("Where to keep command history"),
        )
        .arg(
            Arg::new(options::COMMAND)
                .short('c')
                .long(options::COMMAND)
                .value_name("LINE")
                .action(ArgAction::Append)
                .help("Run LINE instead of starting interactively (repeatable)"),
        )
        .arg(
            Arg::new(options::VERBOSE)
                .short('v')
                .long(options::VERBOSE)
                .action(ArgAction::SetTrue)
                .help("Log dispatch decisions to stderr"),
        )
}

fn config_from_matches(matches: &ArgMatches) -> ShellConfig {
    let mut config = ShellConfig::default();
    if let Some(prompt) = matches.get_one::<String>(options::PROMPT) {
        config.prompt.clone_from(prompt);
    }
    if let Some(color) = matches.get_one::<String>(options::COLOR) {
        config.color = color.parse().unwrap_or(ColorChoice::Auto);
    }
    if matches.get_flag(options::NO_HISTORY) {
        config.history_file = None;
    } else if let Some(file) = matches.get_one::<PathBuf>(options::HISTORY_FILE) {
        config.history_file = Some(file.clone());
    }
    config
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

/// Handler panics are already reported through the host, so keep the
/// default hook's backtrace out of the terminal.
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| log::debug!("{info}")));
}

fn print_banner(host: &dyn ShellHost) {
    host.print_line(&format!("Stackshell {VERSION}"));
    host.print_line("Type 'help' for usage, 'exit' to quit");
    host.print_line("Use Tab for command completion\n");
}

/// Run each `-c` line in order. Fails if any line named an unknown command.
fn run_lines<'a>(shell: &mut DispatcherShell, lines: impl Iterator<Item = &'a String>) -> ExitCode {
    let mut status = ExitCode::SUCCESS;
    for line in lines {
        if !shell.run_single(line) && !line.trim().is_empty() {
            status = ExitCode::FAILURE;
        }
        if shell.stack().is_empty() {
            break;
        }
    }
    status
}

fn run_interactive(
    shell: DispatcherShell,
    host: &ConsoleHost,
    config: &ShellConfig,
) -> rustyline::Result<()> {
    let shell = Rc::new(RefCell::new(shell));

    let rl_config = Config::builder()
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .max_history_size(config.history_size)?
        .build();
    let mut rl: Editor<ShellCompletion, DefaultHistory> = Editor::with_config(rl_config)?;
    rl.set_helper(Some(ShellCompletion::new(Rc::clone(&shell))));

    if let Some(path) = &config.history_file {
        if let Err(e) = rl.load_history(path) {
            log::debug!("no history loaded from {}: {e}", path.display());
        }
    }

    print_banner(host);

    let result = loop {
        if shell.borrow().stack().is_empty() {
            break Ok(());
        }
        match rl.readline(&host.prompt()) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }
                shell.borrow_mut().run_single(&line);
            }
            Err(ReadlineError::Interrupted) => {}
            Err(ReadlineError::Eof) => break Ok(()),
            Err(e) => break Err(e),
        }
    };

    if let Some(path) = &config.history_file {
        if let Err(e) = rl.save_history(path) {
            log::warn!("could not save history to {}: {e}", path.display());
        }
    }

    result
}

fn main() -> ExitCode {
    let matches = stackshell_app().get_matches();
    init_logging(matches.get_flag(options::VERBOSE));
    install_panic_hook();

    let config = config_from_matches(&matches);
    let host = Rc::new(ConsoleHost::new(config.full_prompt(), config.color.enabled()));
    let mut shell = DispatcherShell::new(host.clone());

    let core_config = config.clone();
    shell.push(move |handle| {
        CoreDispatcher::new(handle, core_config).with_contexts(DEFAULT_CONTEXTS.iter().copied())
    });

    if let Some(lines) = matches.get_many::<String>(options::COMMAND) {
        return run_lines(&mut shell, lines);
    }

    match run_interactive(shell, &host, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            host.print_error(&format!("Error reading input: {e}"));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_definition() {
        stackshell_app().debug_assert();
    }

    #[test]
    fn test_config_from_flags() {
        let matches = stackshell_app().get_matches_from([
            "stackshell",
            "--prompt",
            "msf",
            "--color",
            "never",
            "--no-history",
        ]);
        let config = config_from_matches(&matches);
        assert_eq!(config.full_prompt(), "msf> ");
        assert_eq!(config.color, ColorChoice::Never);
        assert!(config.history_file.is_none());
    }

    #[test]
    fn test_panic_hook_keeps_unwinding() {
        install_panic_hook();
        let result = std::panic::catch_unwind(|| panic!("quiet"));
        let _ = std::panic::take_hook();
        assert!(result.is_err());
    }

    #[test]
    fn test_history_file_flag() {
        let matches =
            stackshell_app().get_matches_from(["stackshell", "--history-file", "/tmp/h"]);
        let config = config_from_matches(&matches);
        assert_eq!(config.history_file, Some(PathBuf::from("/tmp/h")));
    }
}
