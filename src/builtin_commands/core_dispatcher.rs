// Copyright (c) 2025 Dmitry Kalashnikov
// Dual Licensed: Open-Source (see LICENSE) / Commercial (proprietary use)
// Commercial use requires a Commercial License. See LICENSE file.

use std::path::PathBuf;

use serde_json::json;

use super::context_dispatcher::ContextDispatcher;
use super::{cd, exit, help};
use crate::config::ShellConfig;
use crate::dispatcher::{CommandDispatcher, CommandTable, ShellHandle, TableDispatcher};
use crate::error::{CommandError, CommandResult};
use crate::stack::DispatcherStack;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
const HELP_WIDTH: usize = 100;

/// The bottom-of-stack dispatcher every shell starts with.
pub struct CoreDispatcher {
    shell: ShellHandle,
    config: ShellConfig,
    contexts: Vec<String>,
    previous_dir: Option<PathBuf>,
    table: CommandTable<Self>,
}

impl CoreDispatcher {
    pub fn new(shell: ShellHandle, config: ShellConfig) -> Self {
        Self {
            shell,
            config,
            contexts: Vec::new(),
            previous_dir: None,
            table: CommandTable::new()
                .command("help", "Help menu", Self::cmd_help)
                .command("exit", "Exit the shell", Self::cmd_exit)
                .command("quit", "Exit the shell", Self::cmd_exit)
                .command("version", "Show the version", Self::cmd_version)
                .command("cd", "Change the current working directory", Self::cmd_cd)
                .command("stack", "List the active dispatchers (-o for JSON)", Self::cmd_stack)
                .command("use", "Enter a named context", Self::cmd_use),
        }
    }

    /// Context names offered by tab completion.
    #[must_use]
    pub fn with_contexts<I, S>(mut self, contexts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contexts = contexts.into_iter().map(Into::into).collect();
        self
    }

    fn cmd_help(&mut self, stack: &mut DispatcherStack, _args: &[String]) -> CommandResult {
        let tables = stack.help_tables(Some(&*self as &dyn CommandDispatcher));
        let width = textwrap::termwidth().min(HELP_WIDTH);
        self.shell
            .print_line(&help::render(&tables, width, self.shell.supports_color()));
        Ok(())
    }

    fn cmd_exit(&mut self, stack: &mut DispatcherStack, _args: &[String]) -> CommandResult {
        let popped = exit::execute(stack);
        log::debug!("exit popped {popped} dispatchers");
        Ok(())
    }

    fn cmd_version(&mut self, _stack: &mut DispatcherStack, _args: &[String]) -> CommandResult {
        self.shell.print_line(&format!("stackshell {VERSION}"));
        Ok(())
    }

    fn cmd_cd(&mut self, _stack: &mut DispatcherStack, args: &[String]) -> CommandResult {
        let dir = cd::execute(args, &mut self.previous_dir)?;
        self.shell.print_status(&format!("Working directory is {}", dir.display()));
        Ok(())
    }

    fn cmd_stack(&mut self, stack: &mut DispatcherStack, args: &[String]) -> CommandResult {
        let object_output = match args {
            [] => false,
            [flag] if flag == "-o" || flag == "--obj" => true,
            [other, ..] => return Err(CommandError::UnexpectedArgument(other.clone())),
        };

        let names = stack.names(Some(&*self as &dyn CommandDispatcher));
        if object_output {
            let value = json!({ "depth": names.len(), "dispatchers": names });
            self.shell.print_line(&serde_json::to_string_pretty(&value)?);
        } else {
            for (depth, name) in names.iter().enumerate() {
                self.shell.print_line(&format!("{depth:>3}  {name}"));
            }
        }
        Ok(())
    }

    fn cmd_use(&mut self, stack: &mut DispatcherStack, args: &[String]) -> CommandResult {
        let name = match args {
            [] => return Err(CommandError::MissingArgument("context")),
            [name] => name.clone(),
            [_, extra, ..] => return Err(CommandError::UnexpectedArgument(extra.clone())),
        };
        let config = self.config.clone();
        stack.push(move |shell| ContextDispatcher::new(shell, name, &config));
        Ok(())
    }
}

impl TableDispatcher for CoreDispatcher {
    fn dispatcher_name(&self) -> &str {
        "Core"
    }

    fn command_table(&self) -> &CommandTable<Self> {
        &self.table
    }

    fn completion_items(&self) -> Vec<String> {
        self.contexts.clone()
    }
}
