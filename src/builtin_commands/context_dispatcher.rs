// Copyright (c) 2025 Dmitry Kalashnikov
// Dual Licensed: Open-Source (see LICENSE) / Commercial (proprietary use)
// Commercial use requires a Commercial License. See LICENSE file.

use std::collections::BTreeMap;

use crate::config::ShellConfig;
use crate::dispatcher::{CommandTable, ShellHandle, TableDispatcher};
use crate::error::{CommandError, CommandResult};
use crate::stack::DispatcherStack;

/// A named sub-context holding its own options. Pushed by `use <name>` and
/// popped again by its own `back` command.
pub struct ContextDispatcher {
    shell: ShellHandle,
    name: String,
    outer_prompt: String,
    options: BTreeMap<String, String>,
    table: CommandTable<Self>,
}

impl ContextDispatcher {
    pub fn new(shell: ShellHandle, name: impl Into<String>, config: &ShellConfig) -> Self {
        let name = name.into();
        let outer_prompt = shell.prompt();
        shell.update_prompt(&config.context_prompt(&name));

        Self {
            shell,
            name,
            outer_prompt,
            options: BTreeMap::new(),
            table: CommandTable::new()
                .command("back", "Leave the current context", Self::cmd_back)
                .command("info", "Describe the current context", Self::cmd_info)
                .command("set", "Set an option, or show one", Self::cmd_set)
                .command("unset", "Clear an option", Self::cmd_unset)
                .command("show", "List the options that are set", Self::cmd_show),
        }
    }

    fn cmd_back(&mut self, stack: &mut DispatcherStack, _args: &[String]) -> CommandResult {
        stack.pop();
        self.shell.update_prompt(&self.outer_prompt);
        Ok(())
    }

    fn cmd_info(&mut self, _stack: &mut DispatcherStack, _args: &[String]) -> CommandResult {
        self.shell.print_line(&format!("Context: {}", self.name));
        self.shell
            .print_line(&format!("Options: {} set", self.options.len()));
        Ok(())
    }

    fn cmd_set(&mut self, stack: &mut DispatcherStack, args: &[String]) -> CommandResult {
        match args {
            [] => self.cmd_show(stack, args),
            [key] => {
                let value = self
                    .options
                    .get(key)
                    .ok_or_else(|| CommandError::failed(format!("{key} is not set")))?;
                self.shell.print_line(&format!("{key} => {value}"));
                Ok(())
            }
            [key, value @ ..] => {
                let value = value.join(" ");
                self.shell.print_line(&format!("{key} => {value}"));
                self.options.insert(key.clone(), value);
                Ok(())
            }
        }
    }

    fn cmd_unset(&mut self, _stack: &mut DispatcherStack, args: &[String]) -> CommandResult {
        let key = match args {
            [] => return Err(CommandError::MissingArgument("option")),
            [key] => key,
            [_, extra, ..] => return Err(CommandError::UnexpectedArgument(extra.clone())),
        };
        if self.options.remove(key).is_none() {
            return Err(CommandError::failed(format!("{key} is not set")));
        }
        self.shell.print_line(&format!("Unsetting {key}..."));
        Ok(())
    }

    fn cmd_show(&mut self, _stack: &mut DispatcherStack, _args: &[String]) -> CommandResult {
        if self.options.is_empty() {
            self.shell.print_status("No options set.");
            return Ok(());
        }
        let width = self.options.keys().map(String::len).max().unwrap_or(0);
        for (key, value) in &self.options {
            self.shell.print_line(&format!("  {key:<width$}  {value}"));
        }
        Ok(())
    }
}

impl TableDispatcher for ContextDispatcher {
    fn dispatcher_name(&self) -> &str {
        &self.name
    }

    fn command_table(&self) -> &CommandTable<Self> {
        &self.table
    }

    fn completion_items(&self) -> Vec<String> {
        self.options.keys().cloned().collect()
    }
}
