use owo_colors::OwoColorize;

use crate::fs_ops::format_bytes;
use crate::relocate::{ItemStatus, RunReport};

/// Small wrapper around stdout/stderr printing to provide consistent, colored
/// user-facing messages. Colors are enabled only when output is a TTY.
fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

pub fn print_info(msg: &str) {
    if is_tty() {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {}", msg);
    }
}

pub fn print_warn(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {}", msg);
    }
}

pub fn print_error(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

pub fn print_success(msg: &str) {
    if is_tty() {
        println!("{} {}", "ok:".green().bold(), msg);
    } else {
        println!("ok: {}", msg);
    }
}

/// Print a plain user-facing line (no prefix). Use this for primary outputs
/// such as the run summary, which users may script against.
pub fn print_user(msg: &str) {
    println!("{}", msg);
}

/// Plain-text summary lines for a finished run. Kept free of color codes so
/// tests and scripts can match on them.
pub fn summary_lines(report: &RunReport, title: &str) -> Vec<String> {
    let mut lines = vec![format!("== {title} ==")];
    for o in report.outcomes() {
        let mut line = format!("  {:<11} {}", o.status.label(), o.item.name);
        if let ItemStatus::Failed(reason) = &o.status {
            line.push_str(&format!(": {reason}"));
        } else if let Some(dest) = &o.dest
            && o.status != ItemStatus::NotFound
        {
            line.push_str(&format!(" -> {}", dest.display()));
        }
        lines.push(line);
    }

    let mut counts = format!(
        "moved: {}  copied: {}  already present: {}  not found: {}  failed: {}",
        report.moved_count(),
        report.copied_count(),
        report.already_present_count(),
        report.not_found_count(),
        report.failed_count()
    );
    if report.would_move_count() + report.would_copy_count() > 0 {
        counts.push_str(&format!(
            "  would move: {}  would copy: {}",
            report.would_move_count(),
            report.would_copy_count()
        ));
    }
    lines.push(counts);
    lines.push(format!(
        "total size: {} ({} bytes); already present: {} ({} bytes)",
        format_bytes(report.total_bytes),
        report.total_bytes,
        format_bytes(report.present_bytes),
        report.present_bytes
    ));

    let ambiguous: Vec<_> = report.ambiguous().collect();
    if !ambiguous.is_empty() {
        lines.push("ambiguous matches (first path in sorted order was used):".to_string());
        for o in ambiguous {
            let src = o
                .item
                .source_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            lines.push(format!("  {} ({} candidates) {}", o.item.name, o.item.candidates, src));
        }
    }
    if report.interrupted {
        lines.push("interrupted: remaining items were not processed".to_string());
    }
    lines
}

/// Print the run summary to stdout.
pub fn print_summary(report: &RunReport, title: &str) {
    let tty = is_tty();
    for (i, line) in summary_lines(report, title).into_iter().enumerate() {
        if tty && i == 0 {
            println!("{}", line.bold());
        } else if tty && line.trim_start().starts_with("FAILED") {
            println!("{}", line.red());
        } else {
            print_user(&line);
        }
    }
}
