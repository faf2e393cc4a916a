use crate::history::{HistoryKind, HistoryRecord};
use colored::*;

pub fn print_header(text: &str) {
    println!("\n{}", text.bright_cyan().bold());
    println!("{}", "=".repeat(text.chars().count()).bright_cyan());
}

pub fn print_success(text: &str) {
    println!("{}", text.green());
}

pub fn print_warning(text: &str) {
    eprintln!("{}", text.yellow());
}

pub fn print_info(text: &str) {
    println!("{}", text.blue());
}

/// One block per record, oldest first.
pub fn print_records(records: &[HistoryRecord]) {
    for record in records {
        println!("{}", record_heading(record).yellow().bold());
        println!("  {} {}", "source:".dimmed(), record.source_text);
        println!("  {} {}", "result:".dimmed(), record.result);
        println!("  {} {}", "id:".dimmed(), record.id.dimmed());
    }
}

fn record_heading(record: &HistoryRecord) -> String {
    let time = record.timestamp.format("%H:%M:%S");
    match record.kind {
        HistoryKind::Translate => {
            format!("[{}] {} -> {}", time, record.from_lang, record.to_lang)
        }
        HistoryKind::Explain => format!("[{}] template {}", time, record.template_id),
    }
}
