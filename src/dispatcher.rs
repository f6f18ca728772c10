// Copyright (c) 2025 Dmitry Kalashnikov
// Dual Licensed: Open-Source (see LICENSE) / Commercial (proprietary use)
// Commercial use requires a Commercial License. See LICENSE file.

//! Command dispatchers and their command tables.
//!
//! A dispatcher is a unit that answers for a set of named commands. The
//! engine only sees the object-safe [`CommandDispatcher`] contract; concrete
//! dispatchers normally implement [`TableDispatcher`] instead and get the
//! contract for free from an explicit [`CommandTable`] that maps each command
//! name to a handler function.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::error::{CommandError, CommandResult};
use crate::host::ShellHost;
use crate::stack::DispatcherStack;

/// Shared, mutably borrowable dispatcher as held by the stack.
pub type DispatcherRef = Rc<RefCell<dyn CommandDispatcher>>;

/// Handler for one command: receives its dispatcher, the live stack (so it
/// may push or pop contexts) and the arguments following the command name.
pub type Handler<D> = fn(&mut D, &mut DispatcherStack, &[String]) -> CommandResult;

pub trait CommandDispatcher {
    /// Name shown in help listings and stack dumps.
    fn name(&self) -> &str;

    /// Declared commands as `(name, description)` in declaration order.
    fn commands(&self) -> Vec<(&str, &str)>;

    /// Extra completion candidates offered alongside the command names.
    fn tab_complete_items(&self) -> Vec<String> {
        Vec::new()
    }

    /// Exact-match check; no prefix or fuzzy matching.
    fn handles(&self, command: &str) -> bool;

    fn invoke(
        &mut self,
        stack: &mut DispatcherStack,
        command: &str,
        args: &[String],
    ) -> CommandResult;
}

/// Weak back-reference from a dispatcher to the host that owns its stack.
///
/// Every method forwards verbatim and silently does nothing once the host
/// has been dropped.
#[derive(Clone)]
pub struct ShellHandle {
    host: Weak<dyn ShellHost>,
}

impl ShellHandle {
    pub fn new(host: &Rc<dyn ShellHost>) -> Self {
        Self {
            host: Rc::downgrade(host),
        }
    }

    /// A handle bound to no host at all.
    pub fn detached() -> Self {
        let host: Weak<dyn ShellHost> = Weak::<crate::host::CaptureHost>::new();
        Self { host }
    }

    pub fn is_attached(&self) -> bool {
        self.host.strong_count() > 0
    }

    fn with_host(&self, f: impl FnOnce(&dyn ShellHost)) {
        if let Some(host) = self.host.upgrade() {
            f(host.as_ref());
        }
    }

    pub fn print_error(&self, msg: &str) {
        self.with_host(|host| host.print_error(msg));
    }

    pub fn print_status(&self, msg: &str) {
        self.with_host(|host| host.print_status(msg));
    }

    pub fn print_line(&self, msg: &str) {
        self.with_host(|host| host.print_line(msg));
    }

    pub fn print(&self, msg: &str) {
        self.with_host(|host| host.print(msg));
    }

    pub fn update_prompt(&self, prompt: &str) {
        self.with_host(|host| host.update_prompt(prompt));
    }

    pub fn prompt(&self) -> String {
        self.host
            .upgrade()
            .map(|host| host.prompt())
            .unwrap_or_default()
    }

    pub fn supports_color(&self) -> bool {
        self.host
            .upgrade()
            .is_some_and(|host| host.supports_color())
    }
}

pub struct Command<D> {
    pub name: &'static str,
    pub description: &'static str,
    handler: Handler<D>,
}

/// Ordered mapping from command name to handler, built when the dispatcher
/// is constructed.
pub struct CommandTable<D> {
    commands: Vec<Command<D>>,
    index: HashMap<&'static str, usize>,
}

impl<D> Default for CommandTable<D> {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<D> CommandTable<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`CommandTable::insert`].
    pub fn command(
        mut self,
        name: &'static str,
        description: &'static str,
        handler: Handler<D>,
    ) -> Self {
        self.insert(name, description, handler);
        self
    }

    /// Declare a command. Re-declaring a name replaces it in place and keeps
    /// its original position.
    pub fn insert(&mut self, name: &'static str, description: &'static str, handler: Handler<D>) {
        let command = Command {
            name,
            description,
            handler,
        };
        match self.index.get(name) {
            Some(&slot) => self.commands[slot] = command,
            None => {
                self.index.insert(name, self.commands.len());
                self.commands.push(command);
            }
        }
    }

    pub fn handler(&self, name: &str) -> Option<Handler<D>> {
        self.index.get(name).map(|&slot| self.commands[slot].handler)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command<D>> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Dispatcher backed by a [`CommandTable`].
pub trait TableDispatcher: Sized {
    fn dispatcher_name(&self) -> &str;

    fn command_table(&self) -> &CommandTable<Self>;

    fn completion_items(&self) -> Vec<String> {
        Vec::new()
    }
}

impl<T: TableDispatcher> CommandDispatcher for T {
    fn name(&self) -> &str {
        self.dispatcher_name()
    }

    fn commands(&self) -> Vec<(&str, &str)> {
        self.command_table()
            .iter()
            .map(|cmd| (cmd.name, cmd.description))
            .collect()
    }

    fn tab_complete_items(&self) -> Vec<String> {
        self.completion_items()
    }

    fn handles(&self, command: &str) -> bool {
        self.command_table().contains(command)
    }

    fn invoke(
        &mut self,
        stack: &mut DispatcherStack,
        command: &str,
        args: &[String],
    ) -> CommandResult {
        // Copy the fn pointer out so the table borrow ends before the call.
        let handler = self.command_table().handler(command).ok_or_else(|| {
            CommandError::failed(format!("{} has no command {command}", self.name()))
        })?;
        handler(self, stack, args)
    }
}
