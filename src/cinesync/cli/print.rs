use cinesync::api::{CmdMessage, MessageLevel};
use cinesync::config::SyncConfig;
use cinesync::error::Result;
use cinesync::report::{Outcome, ReportEntry, RunReport, Severity};
use colored::{ColoredString, Colorize};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const MAX_LABEL_WIDTH: usize = 48;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

/// Messages on stderr, so `--json` output stays parseable.
pub(super) fn eprint_messages(messages: &[CmdMessage]) {
    for message in messages {
        eprintln!("{}", message.content);
    }
}

pub(super) fn print_report(report: &RunReport) {
    let label_width = report
        .entries
        .iter()
        .map(|e| e.label().width())
        .max()
        .unwrap_or(0)
        .min(MAX_LABEL_WIDTH);

    for entry in &report.entries {
        let label = truncate_to_width(&entry.label(), label_width);
        let padding = label_width.saturating_sub(label.width());
        println!(
            "{} {}  {}{}{}",
            colored_outcome(entry, &entry.outcome.symbol().to_string()),
            colored_outcome(entry, &format!("{:<9}", entry.outcome)),
            label,
            " ".repeat(padding),
            colored_note(entry)
        );
    }

    if !report.entries.is_empty() {
        println!();
    }
    println!("{}", report.summary().bold());
}

pub(super) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(super) fn print_config(config: &SyncConfig) -> Result<()> {
    print_json(config)
}

fn colored_outcome(entry: &ReportEntry, text: &str) -> ColoredString {
    match entry.outcome {
        Outcome::Created => text.green(),
        Outcome::Updated => text.cyan(),
        Outcome::Unchanged => text.dimmed(),
        Outcome::Skipped => match entry.skip_reason().map(|r| r.severity) {
            Some(Severity::Warning) => text.yellow(),
            _ => text.red(),
        },
    }
}

fn colored_note(entry: &ReportEntry) -> ColoredString {
    let note = entry.note();
    match entry.outcome {
        Outcome::Skipped => colored_outcome(entry, &note),
        _ => note.dimmed(),
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}
