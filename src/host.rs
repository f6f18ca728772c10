// Copyright (c) 2025 Dmitry Kalashnikov
// Dual Licensed: Open-Source (see LICENSE) / Commercial (proprietary use)
// Commercial use requires a Commercial License. See LICENSE file.

//! Output sinks the dispatch core writes through.
//!
//! A [`ShellHost`] owns the terminal (or whatever stands in for it). The core
//! only ever talks to it through `&self`, so hosts keep their mutable state
//! (current prompt, captured output) behind interior mutability.

use std::cell::RefCell;
use std::io::Write;

use crate::theme::Theme;

pub trait ShellHost {
    fn print_error(&self, msg: &str);
    fn print_status(&self, msg: &str);
    fn print_line(&self, msg: &str);
    fn print(&self, msg: &str);

    /// Replace the prompt shown before the next line is read.
    fn update_prompt(&self, prompt: &str);

    fn prompt(&self) -> String;

    fn supports_color(&self) -> bool {
        false
    }

    fn reset_color(&self) {}
}

/// Host writing to the process's stdout and stderr.
pub struct ConsoleHost {
    prompt: RefCell<String>,
    color: bool,
    theme: Theme,
}

impl ConsoleHost {
    pub fn new(prompt: impl Into<String>, color: bool) -> Self {
        Self {
            prompt: RefCell::new(prompt.into()),
            color,
            theme: Theme::default(),
        }
    }
}

impl ShellHost for ConsoleHost {
    fn print_error(&self, msg: &str) {
        eprintln!("{}", self.theme.error(msg, self.color));
    }

    fn print_status(&self, msg: &str) {
        println!("{}", self.theme.status(msg, self.color));
    }

    fn print_line(&self, msg: &str) {
        println!("{msg}");
    }

    fn print(&self, msg: &str) {
        let mut stdout = std::io::stdout().lock();
        // Nothing sensible to do if the terminal went away.
        let _ = stdout.write_all(msg.as_bytes());
        let _ = stdout.flush();
    }

    fn update_prompt(&self, prompt: &str) {
        log::debug!("prompt changed to {prompt:?}");
        prompt.clone_into(&mut self.prompt.borrow_mut());
    }

    fn prompt(&self) -> String {
        self.prompt.borrow().clone()
    }

    fn supports_color(&self) -> bool {
        self.color
    }

    fn reset_color(&self) {
        self.print(Theme::reset());
    }
}

/// One thing a [`CaptureHost`] was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Error(String),
    Status(String),
    Line(String),
    Print(String),
    Prompt(String),
    ResetColor,
}

/// Host that records everything in memory instead of writing it out.
#[derive(Debug, Default)]
pub struct CaptureHost {
    events: RefCell<Vec<HostEvent>>,
    prompt: RefCell<String>,
    color: bool,
}

impl CaptureHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A capture host that claims colour support, so `reset_color` calls
    /// show up in the event log.
    pub fn with_color() -> Self {
        Self {
            color: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.borrow().clone()
    }

    pub fn take_events(&self) -> Vec<HostEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn errors(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                HostEvent::Error(msg) => Some(msg.clone()),
                _ => None,
            })
            .collect()
    }

    /// Concatenated text of every `print_line` and `print` call.
    pub fn output(&self) -> String {
        let mut out = String::new();
        for event in self.events.borrow().iter() {
            match event {
                HostEvent::Line(msg) => {
                    out.push_str(msg);
                    out.push('\n');
                }
                HostEvent::Print(msg) => out.push_str(msg),
                _ => {}
            }
        }
        out
    }

    fn record(&self, event: HostEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl ShellHost for CaptureHost {
    fn print_error(&self, msg: &str) {
        self.record(HostEvent::Error(msg.to_string()));
    }

    fn print_status(&self, msg: &str) {
        self.record(HostEvent::Status(msg.to_string()));
    }

    fn print_line(&self, msg: &str) {
        self.record(HostEvent::Line(msg.to_string()));
    }

    fn print(&self, msg: &str) {
        self.record(HostEvent::Print(msg.to_string()));
    }

    fn update_prompt(&self, prompt: &str) {
        prompt.clone_into(&mut self.prompt.borrow_mut());
        self.record(HostEvent::Prompt(prompt.to_string()));
    }

    fn prompt(&self) -> String {
        self.prompt.borrow().clone()
    }

    fn supports_color(&self) -> bool {
        self.color
    }

    fn reset_color(&self) {
        self.record(HostEvent::ResetColor);
    }
}
