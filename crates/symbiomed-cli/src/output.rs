use colored::Colorize;
use serde::Serialize;
use symbiomed_core::SearchResult;
use tabled::builder::Builder;
use tabled::settings::Style;

pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => print_error(&format!("Failed to render JSON: {e}")),
    }
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_heading(msg: &str) {
    println!("{}", msg.bold());
}

pub fn print_field(label: &str, value: &str) {
    println!("{}: {}", label.cyan(), value);
}

/// Error panel with an optional retry hint
pub fn print_error_panel(msg: &str, retry: Option<&str>) {
    print_error(msg);
    if let Some(cmd) = retry {
        eprintln!("  {} {}", "Retry:".yellow(), cmd);
    }
}

/// One card per result, system name in the system's color
pub fn print_result_cards(results: &[SearchResult]) {
    for result in results {
        let tag = match (&result.system_name, &result.color) {
            (Some(name), Some(color)) => format!(" [{}]", name.as_str().color(color.as_str())),
            (Some(name), None) => format!(" [{name}]"),
            _ => String::new(),
        };
        println!("{}{}", result.code.bold(), tag);
        if !result.display.is_empty() {
            println!("  {}", result.display);
        }
    }
}

pub fn print_result_table(results: &[SearchResult]) {
    let mut builder = Builder::default();
    builder.push_record(["Code", "Display", "System"]);
    for result in results {
        builder.push_record([
            result.code.as_str(),
            result.display.as_str(),
            result.system_name.as_deref().unwrap_or("-"),
        ]);
    }
    let table = builder.build().with(Style::rounded()).to_string();
    println!("{table}");
}
