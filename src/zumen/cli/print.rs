use chrono::{DateTime, Utc};
use colored::Colorize;
use console::Term;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use zumen::api::{
    BatchTotals, CmdMessage, DrawingAudit, DrawingMigration, DrawingSummary, MessageLevel,
};
use zumen::schema::ValidationReport;

const FALLBACK_LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const STEPS_WIDTH: usize = 9;

pub(crate) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(crate) fn print_totals(totals: &BatchTotals) {
    println!(
        "{}",
        format!(
            "Processed: {}  Skipped: {}  Failed: {}",
            totals.processed, totals.skipped, totals.failed
        )
        .dimmed()
    );
}

/// Itemized residual step folders per audited drawing.
pub(crate) fn print_residual_folders(audits: &[DrawingAudit]) {
    let any = audits.iter().any(|a| !a.residual_step_folders.is_empty());
    if !any {
        return;
    }
    println!("Residual step folders:");
    for audit in audits {
        for folder in &audit.residual_step_folders {
            println!("  {}/{}", audit.id, folder.dimmed());
        }
    }
}

/// Folder-level migration detail, shown with --verbose.
pub(crate) fn print_migration_details(migrations: &[DrawingMigration]) {
    for migration in migrations {
        for folder in &migration.outcome.created_folders {
            println!("  {} created {}", migration.id, folder.green());
        }
        for folder in &migration.outcome.removed_folders {
            println!("  {} removed {}", migration.id, folder.dimmed());
        }
    }
}

pub(crate) fn print_report(report: &ValidationReport) {
    if !report.errors.is_empty() {
        println!("Errors:");
        for error in &report.errors {
            println!("  - {}", error.red());
        }
    }
    if !report.warnings.is_empty() {
        println!("Warnings:");
        for warning in &report.warnings {
            println!("  - {}", warning.yellow());
        }
    }
    if !report.summary.is_empty() {
        println!("Summary:");
        for (key, value) in &report.summary {
            println!("  {}: {}", key, summary_value(value));
        }
    }
}

fn summary_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(summary_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

pub(crate) fn print_drawings(drawings: &[DrawingSummary]) {
    if drawings.is_empty() {
        println!("No drawings found.");
        return;
    }

    let line_width = Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(FALLBACK_LINE_WIDTH);

    for drawing in drawings {
        let machines = drawing
            .machine_types
            .iter()
            .map(|m| m.key())
            .collect::<Vec<_>>()
            .join(",");
        let mut label = drawing.id.to_string();
        if !drawing.title.is_empty() {
            label.push(' ');
            label.push_str(&drawing.title);
        }
        if !machines.is_empty() {
            label.push_str(&format!(" [{}]", machines));
        }

        let available = line_width.saturating_sub(TIME_WIDTH + STEPS_WIDTH + 4);
        let label = pad_to_width(&truncate_to_width(&label, available), available);
        let steps = format!("{:>width$}", drawing.step_count, width = STEPS_WIDTH - 6);
        let time_ago = drawing
            .updated_at
            .map(format_time_ago)
            .unwrap_or_else(|| format!("{:>width$}", "-", width = TIME_WIDTH));

        println!(
            "{}  {} step(s)  {}",
            label,
            steps.bold(),
            time_ago.dimmed().italic()
        );
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
