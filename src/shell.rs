// Copyright (c) 2025 Dmitry Kalashnikov
// Dual Licensed: Open-Source (see LICENSE) / Commercial (proprietary use)
// Commercial use requires a Commercial License. See LICENSE file.

//! Dispatch engine and completion aggregator.
//!
//! [`DispatcherShell::run_single`] resolves one line against the stack:
//! the first (topmost) dispatcher that declares the command handles it, and
//! nothing below it is consulted. Every handler call runs inside its own
//! failure boundary, so nothing a handler does can escape `run_single`.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use crate::dispatcher::{CommandDispatcher, DispatcherRef, ShellHandle};
use crate::error::CommandError;
use crate::host::ShellHost;
use crate::parsing::parse_line;
use crate::stack::{DispatcherStack, HelpTable};

pub type LineParser = Box<dyn Fn(&str) -> Vec<String>>;

/// Called with the host, the unresolved command name and the raw line.
pub type UnknownCommandHook = Box<dyn FnMut(&dyn ShellHost, &str, &str)>;

pub struct DispatcherShell {
    stack: DispatcherStack,
    parser: LineParser,
    unknown_command: UnknownCommandHook,
}

pub fn default_unknown_command(host: &dyn ShellHost, command: &str, _line: &str) {
    host.print_error(&format!("Unknown command: {command}."));
}

impl DispatcherShell {
    pub fn new(host: Rc<dyn ShellHost>) -> Self {
        Self {
            stack: DispatcherStack::new(host),
            parser: Box::new(parse_line),
            unknown_command: Box::new(default_unknown_command),
        }
    }

    /// Replace the tokenizer. The first word is the command name.
    #[must_use]
    pub fn with_parser(mut self, parser: impl Fn(&str) -> Vec<String> + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    pub fn set_unknown_command_hook(
        &mut self,
        hook: impl FnMut(&dyn ShellHost, &str, &str) + 'static,
    ) {
        self.unknown_command = Box::new(hook);
    }

    pub fn host(&self) -> &Rc<dyn ShellHost> {
        self.stack.host()
    }

    pub fn handle(&self) -> ShellHandle {
        self.stack.handle()
    }

    pub fn stack(&self) -> &DispatcherStack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut DispatcherStack {
        &mut self.stack
    }

    pub fn push<D, F>(&mut self, factory: F)
    where
        D: CommandDispatcher + 'static,
        F: FnOnce(ShellHandle) -> D,
    {
        self.stack.push(factory);
    }

    pub fn try_push<D, E, F>(&mut self, factory: F) -> Result<(), E>
    where
        D: CommandDispatcher + 'static,
        F: FnOnce(ShellHandle) -> Result<D, E>,
    {
        self.stack.try_push(factory)
    }

    pub fn pop(&mut self) -> Option<DispatcherRef> {
        self.stack.pop()
    }

    /// Run one line of input. Returns whether any dispatcher claimed the
    /// command, including claims whose handler then failed.
    pub fn run_single(&mut self, line: &str) -> bool {
        let host = Rc::clone(self.stack.host());
        if host.supports_color() {
            host.reset_color();
        }

        let mut arguments = (self.parser)(line);
        log::trace!("parsed {line:?} into {arguments:?}");
        if arguments.is_empty() {
            return false;
        }
        let command = arguments.remove(0);

        let entries = self.stack.len();
        let mut found = false;
        let mut index = 0;

        while let Some(dispatcher) = self.stack.get(index).map(Rc::clone) {
            let claimed = dispatcher
                .try_borrow()
                .is_ok_and(|d| d.handles(&command));

            if claimed {
                found = true;
                self.invoke(&dispatcher, &command, &arguments);
            }

            // A handler may have entered or left a context; the walk position
            // is stale from here on.
            if self.stack.len() != entries {
                log::debug!(
                    "dispatcher stack changed during {command} ({entries} -> {})",
                    self.stack.len()
                );
                break;
            }
            if found {
                break;
            }
            index += 1;
        }

        if !found {
            log::debug!("no dispatcher declares {command}");
            (self.unknown_command)(host.as_ref(), &command, line);
        }

        found
    }

    fn invoke(&mut self, dispatcher: &DispatcherRef, command: &str, args: &[String]) {
        let stack = &mut self.stack;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut dispatcher = dispatcher
                .try_borrow_mut()
                .map_err(|_| CommandError::failed("dispatcher is already running"))?;
            log::debug!("dispatching {command} to {}", dispatcher.name());
            dispatcher.invoke(stack, command, args)
        }));

        let failure = match outcome {
            Ok(Ok(())) => return,
            Ok(Err(err)) => err.to_string(),
            Err(payload) => panic_message(payload.as_ref()),
        };
        log::warn!("command {command} failed: {failure}");
        self.stack
            .host()
            .print_error(&format!("Error while running command {command}: {failure}"));
    }

    /// Every command name and custom completion item on the whole stack that
    /// starts with `prefix`, in stack order. Duplicates are kept.
    pub fn tab_complete(&self, prefix: &str) -> Vec<String> {
        let mut items = Vec::new();
        self.stack.for_each_entry(None, |dispatcher| {
            items.extend(dispatcher.commands().into_iter().map(|(name, _)| name.to_string()));
            items.extend(dispatcher.tab_complete_items());
        });
        items.retain(|item| item.starts_with(prefix));
        log::debug!("{} completions for {prefix:?}", items.len());
        items
    }

    pub fn help_tables(&self) -> Vec<HelpTable> {
        self.stack.help_tables(None)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "handler panicked".to_string()
    }
}
