// Copyright (c) 2025 Dmitry Kalashnikov
// Dual Licensed: Open-Source (see LICENSE) / Commercial (proprietary use)
// Commercial use requires a Commercial License. See LICENSE file.

// Tab completion and hints for the line editor, fed by the dispatcher stack
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

use crate::shell::DispatcherShell;

pub struct ShellCompletion {
    shell: Rc<RefCell<DispatcherShell>>,
}

impl ShellCompletion {
    pub fn new(shell: Rc<RefCell<DispatcherShell>>) -> Self {
        Self { shell }
    }

    /// Unique candidates for `prefix`, keeping first-seen order.
    pub fn candidates(&self, prefix: &str) -> Vec<String> {
        let Ok(shell) = self.shell.try_borrow() else {
            return Vec::new();
        };
        let mut matches = shell.tab_complete(prefix);
        let mut seen = std::collections::HashSet::new();
        matches.retain(|item| seen.insert(item.clone()));
        matches
    }
}

/// Byte offset where the word under the cursor begins.
fn word_start(line: &str) -> usize {
    line.char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(i, c)| i + c.len_utf8())
}

impl Helper for ShellCompletion {}

impl Completer for ShellCompletion {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        let start = word_start(line);
        let prefix = &line[start..];

        let matches = self
            .candidates(prefix)
            .into_iter()
            .map(|item| Pair {
                display: item.clone(),
                replacement: item,
            })
            .collect();

        Ok((start, matches))
    }
}

impl Hinter for ShellCompletion {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }

        // Only hint at the command word.
        let start = word_start(line);
        if start != 0 {
            return None;
        }

        let prefix = &line[start..];
        if prefix.len() < 2 {
            return None;
        }

        self.candidates(prefix)
            .into_iter()
            .find(|cmd| cmd.len() > prefix.len())
            .map(|cmd| cmd[prefix.len()..].to_string())
    }
}

impl Highlighter for ShellCompletion {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        false
    }
}

impl Validator for ShellCompletion {}
