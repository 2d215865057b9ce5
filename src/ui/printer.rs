// Terminal output for report pages

use colored::*;
use unicode_width::UnicodeWidthStr;

use super::report::{Report, ReportPage};

const MIN_RULE_WIDTH: usize = 40;

fn rule_width(page: &ReportPage) -> usize {
    let header = header_text(page);
    page.body
        .lines()
        .map(UnicodeWidthStr::width)
        .chain(std::iter::once(header.width()))
        .max()
        .unwrap_or(0)
        .clamp(MIN_RULE_WIDTH, 80)
}

fn header_text(page: &ReportPage) -> String {
    match page.marker {
        Some(marker) => format!("{} ({})", page.title, marker),
        None => page.title.clone(),
    }
}

fn style_line(line: &str) -> ColoredString {
    if line.starts_with("[CRIT]") || line.contains("[HIGH]") {
        line.red()
    } else if line.starts_with("[WARN]") || line.contains("[MED]") {
        line.yellow()
    } else if line.starts_with("[ OK ]") {
        line.green()
    } else if line.starts_with("Truncated:") {
        line.dimmed()
    } else {
        line.normal()
    }
}

pub fn print_page(page: &ReportPage) {
    let width = rule_width(page);
    println!("\n{}", header_text(page).bold().bright_cyan());
    println!("{}", "=".repeat(width));
    for line in page.body.lines() {
        println!("{}", style_line(line));
    }
}

pub fn print_report(report: &Report) {
    for page in &report.pages {
        print_page(page);
    }
    println!();
}

pub fn success(message: &str) {
    println!("{}", message.green());
}

pub fn warn(message: &str) {
    println!("{}", message.yellow());
}

pub fn error(message: &str) {
    eprintln!("{}", message.red().bold());
}

pub fn dimmed(message: &str) {
    println!("{}", message.dimmed());
}
