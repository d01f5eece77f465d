use crate::cli::theme::CliTheme;
use crate::store::TasksByDate;
use chrono::NaiveDate;
use crossterm::style::{Color, Stylize};
use std::io::IsTerminal;

pub fn print_tasks(groups: &TasksByDate, date: NaiveDate, theme: &CliTheme) {
    let use_color = theme.enabled && std::io::stdout().is_terminal();
    print!("{}", render_tasks(groups, date, theme, use_color));
}

/// One `YYYY-MM-DD, Weekday` header per day, then `  <glyph> <description> (<id>)`.
pub fn render_tasks(
    groups: &TasksByDate,
    date: NaiveDate,
    theme: &CliTheme,
    use_color: bool,
) -> String {
    if groups.values().all(Vec::is_empty) {
        return format!("No tasks for {}.\n", date.format("%Y-%m-%d"));
    }

    let mut out = String::new();
    for (day, tasks) in groups {
        let header = day.format("%Y-%m-%d, %A").to_string();
        out.push_str(&colorize(&header, theme.header, use_color));
        out.push('\n');
        for task in tasks {
            let glyph_color = if task.done { theme.done } else { theme.pending };
            out.push_str(&format!(
                "  {} {} {}\n",
                colorize(task.status_glyph(), glyph_color, use_color),
                task.description,
                colorize(&format!("({})", task.id), theme.id, use_color)
            ));
        }
    }
    out
}

fn colorize(text: &str, color: Color, enabled: bool) -> String {
    if enabled {
        format!("{}", text.with(color))
    } else {
        text.to_string()
    }
}
