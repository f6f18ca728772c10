// Copyright (c) 2025 Dmitry Kalashnikov
// Dual Licensed: Open-Source (see LICENSE) / Commercial (proprietary use)
// Commercial use requires a Commercial License. See LICENSE file.

use std::path::{Path, PathBuf};

use crate::error::CommandError;

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(home) = home_dir() {
        if path == "~" {
            return home;
        } else if let Some(rest) = path.strip_prefix("~/") {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Change the working directory. `previous` holds the directory `cd -`
/// returns to and is updated on success. Returns the new directory.
pub fn execute(args: &[String], previous: &mut Option<PathBuf>) -> Result<PathBuf, CommandError> {
    let target = match args {
        [] => home_dir().unwrap_or_else(|| PathBuf::from(".")),
        [dash] if dash == "-" => previous
            .clone()
            .ok_or_else(|| CommandError::failed("cd: no previous directory"))?,
        [path] => expand_tilde(path),
        [_, extra, ..] => return Err(CommandError::UnexpectedArgument(extra.clone())),
    };

    let current = std::env::current_dir().ok();
    change_dir(&target)?;
    *previous = current;

    Ok(std::env::current_dir()?)
}

fn change_dir(path: &Path) -> Result<(), CommandError> {
    std::env::set_current_dir(path)
        .map_err(|e| CommandError::failed(format!("cd: {}: {e}", path.display())))
}
