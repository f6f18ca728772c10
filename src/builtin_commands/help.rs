// Copyright (c) 2025 Dmitry Kalashnikov
// Dual Licensed: Open-Source (see LICENSE) / Commercial (proprietary use)
// Commercial use requires a Commercial License. See LICENSE file.

use crate::stack::HelpTable;
use crate::theme::DEFAULT_THEME;

const INDENT: &str = "    ";
const SHADOWED_MARK: &str = " (shadowed)";
const MIN_DESCRIPTION_WIDTH: usize = 20;

/// Render help tables as text, wrapping descriptions to `width` columns.
pub fn render(tables: &[HelpTable], width: usize, color: bool) -> String {
    let mut out = String::new();

    for table in tables {
        let heading = format!("{} Commands", table.dispatcher);
        out.push('\n');
        out.push_str(&DEFAULT_THEME.heading(&heading, color));
        out.push('\n');
        out.push_str(&"=".repeat(heading.len()));
        out.push_str("\n\n");

        if table.rows.is_empty() {
            out.push_str(INDENT);
            out.push_str("(no commands)\n");
            continue;
        }

        let name_width = table
            .rows
            .iter()
            .map(|row| row.command.len())
            .max()
            .unwrap_or(0)
            .max("Command".len());
        out.push_str(&format!("{INDENT}{:<name_width$}  Description\n", "Command"));
        out.push_str(&format!("{INDENT}{:<name_width$}  -----------\n", "-------"));

        let lead = INDENT.len() + name_width + 2;
        let description_width = width.saturating_sub(lead).max(MIN_DESCRIPTION_WIDTH);
        let continuation = " ".repeat(lead);

        for row in &table.rows {
            let mut description = row.description.clone();
            if row.shadowed {
                description.push_str(SHADOWED_MARK);
            }
            let lines = textwrap::wrap(&description, description_width);
            let mut lines = lines.iter();
            let first = lines.next().map(|l| l.to_string()).unwrap_or_default();
            out.push_str(&format!("{INDENT}{:<name_width$}  {first}", row.command));
            out.push('\n');
            for line in lines {
                out.push_str(&continuation);
                out.push_str(line);
                out.push('\n');
            }
        }
    }

    out
}
