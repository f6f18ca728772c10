// Copyright (c) 2025 Dmitry Kalashnikov
// Dual Licensed: Open-Source (see LICENSE) / Commercial (proprietary use)
// Commercial use requires a Commercial License. See LICENSE file.

//! The stack of active dispatchers.
//!
//! Index 0 is the most recently pushed entry and has the highest priority.
//! Entries are only ever added or removed at the front.

use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

use crate::dispatcher::{CommandDispatcher, DispatcherRef, ShellHandle};
use crate::host::ShellHost;

pub struct DispatcherStack {
    entries: VecDeque<DispatcherRef>,
    host: Rc<dyn ShellHost>,
}

/// One row of a help listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpRow {
    pub command: String,
    pub description: String,
    /// A dispatcher higher in the stack declares the same command.
    pub shadowed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpTable {
    pub dispatcher: String,
    pub rows: Vec<HelpRow>,
}

impl DispatcherStack {
    pub fn new(host: Rc<dyn ShellHost>) -> Self {
        Self {
            entries: VecDeque::new(),
            host,
        }
    }

    pub fn host(&self) -> &Rc<dyn ShellHost> {
        &self.host
    }

    /// A fresh weak back-reference to this stack's host.
    pub fn handle(&self) -> ShellHandle {
        ShellHandle::new(&self.host)
    }

    /// Construct a dispatcher bound to the host and make it the top entry.
    pub fn push<D, F>(&mut self, factory: F)
    where
        D: CommandDispatcher + 'static,
        F: FnOnce(ShellHandle) -> D,
    {
        let dispatcher = factory(self.handle());
        self.push_front(Rc::new(RefCell::new(dispatcher)));
    }

    /// Like [`DispatcherStack::push`] for factories that can fail. On error
    /// the stack is left untouched and the factory's error is returned.
    pub fn try_push<D, E, F>(&mut self, factory: F) -> Result<(), E>
    where
        D: CommandDispatcher + 'static,
        F: FnOnce(ShellHandle) -> Result<D, E>,
    {
        let dispatcher = factory(self.handle())?;
        self.push_front(Rc::new(RefCell::new(dispatcher)));
        Ok(())
    }

    fn push_front(&mut self, dispatcher: DispatcherRef) {
        if let Ok(d) = dispatcher.try_borrow() {
            log::debug!("push dispatcher {} (depth {})", d.name(), self.entries.len() + 1);
        }
        self.entries.push_front(dispatcher);
    }

    /// Remove and return the top entry, or `None` when the stack is empty.
    pub fn pop(&mut self) -> Option<DispatcherRef> {
        let popped = self.entries.pop_front();
        match &popped {
            Some(dispatcher) => {
                // The entry may be the dispatcher running right now.
                let name = dispatcher
                    .try_borrow()
                    .map(|d| d.name().to_string())
                    .unwrap_or_else(|_| "<running>".to_string());
                log::debug!("pop dispatcher {name} (depth {})", self.entries.len());
            }
            None => log::debug!("pop on empty dispatcher stack"),
        }
        popped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DispatcherRef> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DispatcherRef> {
        self.entries.iter()
    }

    /// Visit every entry top-first.
    ///
    /// A dispatcher whose handler is executing is mutably borrowed and cannot
    /// be borrowed again; pass it as `running` so it can be visited anyway.
    /// Busy entries are skipped when `running` is `None`.
    pub fn for_each_entry(
        &self,
        running: Option<&dyn CommandDispatcher>,
        mut f: impl FnMut(&dyn CommandDispatcher),
    ) {
        for entry in &self.entries {
            match entry.try_borrow() {
                Ok(dispatcher) => f(&*dispatcher),
                Err(_) => {
                    if let Some(running) = running {
                        f(running);
                    }
                }
            }
        }
    }

    /// Dispatcher names, top of stack first.
    pub fn names(&self, running: Option<&dyn CommandDispatcher>) -> Vec<String> {
        let mut names = Vec::with_capacity(self.entries.len());
        self.for_each_entry(running, |d| names.push(d.name().to_string()));
        names
    }

    /// One table per entry, top first, with shadowed commands flagged.
    pub fn help_tables(&self, running: Option<&dyn CommandDispatcher>) -> Vec<HelpTable> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut tables = Vec::with_capacity(self.entries.len());
        self.for_each_entry(running, |d| {
            let rows = d
                .commands()
                .into_iter()
                .map(|(command, description)| HelpRow {
                    command: command.to_string(),
                    description: description.to_string(),
                    shadowed: seen.contains(command),
                })
                .collect::<Vec<_>>();
            seen.extend(rows.iter().map(|row| row.command.clone()));
            tables.push(HelpTable {
                dispatcher: d.name().to_string(),
                rows,
            });
        });
        tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::{CommandTable, TableDispatcher};
    use crate::error::CommandResult;
    use crate::host::CaptureHost;
    use pretty_assertions::assert_eq;

    struct Named {
        name: &'static str,
        table: CommandTable<Self>,
    }

    impl Named {
        fn new(name: &'static str, commands: &[&'static str]) -> Self {
            let mut table = CommandTable::new();
            for command in commands {
                table.insert(*command, "does a thing", Self::noop);
            }
            Self { name, table }
        }

        fn noop(&mut self, _stack: &mut DispatcherStack, _args: &[String]) -> CommandResult {
            Ok(())
        }
    }

    impl TableDispatcher for Named {
        fn dispatcher_name(&self) -> &str {
            self.name
        }

        fn command_table(&self) -> &CommandTable<Self> {
            &self.table
        }
    }

    fn stack() -> DispatcherStack {
        DispatcherStack::new(Rc::new(CaptureHost::new()))
    }

    #[test]
    fn test_push_front_pop_front() {
        let mut stack = stack();
        stack.push(|_| Named::new("outer", &[]));
        stack.push(|_| Named::new("inner", &[]));
        assert_eq!(stack.names(None), vec!["inner", "outer"]);

        let top = stack.pop().unwrap();
        assert_eq!(top.borrow().name(), "inner");
        assert_eq!(stack.len(), 1);
        assert!(stack.pop().is_some());
        assert!(stack.pop().is_none());
        assert!(stack.is_empty());
    }

    #[test]
    fn test_factory_receives_attached_handle() {
        let mut stack = stack();
        let mut attached = false;
        stack.push(|shell| {
            attached = shell.is_attached();
            Named::new("core", &[])
        });
        assert!(attached);
    }

    #[test]
    fn test_failed_factory_leaves_stack_unchanged() {
        let mut stack = stack();
        stack.push(|_| Named::new("core", &[]));
        let result: Result<(), String> =
            stack.try_push(|_| Err::<Named, _>("cannot build".to_string()));
        assert_eq!(result, Err("cannot build".to_string()));
        assert_eq!(stack.names(None), vec!["core"]);
    }

    #[test]
    fn test_help_tables_flag_shadowed_commands() {
        let mut stack = stack();
        stack.push(|_| Named::new("core", &["help", "back"]));
        stack.push(|_| Named::new("module", &["back", "set"]));

        let tables = stack.help_tables(None);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].dispatcher, "module");
        assert!(tables[0].rows.iter().all(|row| !row.shadowed));
        assert_eq!(tables[1].dispatcher, "core");
        let shadowed: Vec<_> = tables[1]
            .rows
            .iter()
            .map(|row| (row.command.as_str(), row.shadowed))
            .collect();
        assert_eq!(shadowed, vec![("help", false), ("back", true)]);
    }

    #[test]
    fn test_busy_entry_described_by_running() {
        let mut stack = stack();
        stack.push(|_| Named::new("core", &["help"]));
        let entry = Rc::clone(stack.get(0).unwrap());
        let _busy = entry.borrow_mut();
        let stand_in = Named::new("stand-in", &[]);

        assert!(stack.names(None).is_empty());
        assert_eq!(stack.names(Some(&stand_in as &dyn CommandDispatcher)), vec!["stand-in"]);
    }
}
