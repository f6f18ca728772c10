// Copyright (c) 2025 Dmitry Kalashnikov
// Dual Licensed: Open-Source (see LICENSE) / Commercial (proprietary use)
// Commercial use requires a Commercial License. See LICENSE file.

// Stackshell - interactive shell core built around a stack of dispatchers
//
// This crate provides:
// - Command dispatchers with explicit name -> handler tables
// - A dispatcher stack where inner contexts shadow outer ones
// - A dispatch engine that isolates every handler failure
// - Tab completion aggregated over the whole stack

pub mod builtin_commands;
pub mod completion;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod host;
pub mod parsing;
pub mod shell;
pub mod stack;
pub mod theme;

pub use completion::ShellCompletion;
pub use config::{ColorChoice, ShellConfig};
pub use dispatcher::{
    CommandDispatcher, CommandTable, DispatcherRef, Handler, ShellHandle, TableDispatcher,
};
pub use error::{CommandError, CommandResult};
pub use host::{CaptureHost, ConsoleHost, HostEvent, ShellHost};
pub use parsing::parse_line;
pub use shell::DispatcherShell;
pub use stack::{DispatcherStack, HelpRow, HelpTable};
