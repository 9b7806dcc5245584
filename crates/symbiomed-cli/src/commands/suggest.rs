use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use symbiomed_client::{SuggestionService, Suggestions, TerminologyClient};
use symbiomed_core::{RequestState, SearchScope, SuggestionPolicy};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::OutputFormat;
use crate::output::{print_error, print_json, print_result_cards};

/// How long to wait for the last lookup after stdin closes
const SETTLE_TIMEOUT: Duration = Duration::from_secs(60);

pub async fn suggest(
    client: &TerminologyClient,
    scope: SearchScope,
    debounce_ms: u64,
    format: OutputFormat,
) -> Result<()> {
    let policy = SuggestionPolicy {
        quiet_period: Duration::from_millis(debounce_ms),
        ..Default::default()
    };
    let (mut service, mut rx) = SuggestionService::new(client.clone(), scope, policy);
    let mut settle_rx = service.subscribe();

    let printer = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let current = rx.borrow_and_update().clone();
            render(&current, format);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last = String::new();
    while let Some(line) = lines.next_line().await.context("Failed to read from stdin")? {
        service.input(&line);
        last = line.trim().to_string();
    }

    if policy.accepts(&last) {
        let settled = tokio::time::timeout(
            SETTLE_TIMEOUT,
            settle_rx.wait_for(|s| {
                s.query == last && matches!(s.state, RequestState::Success(_) | RequestState::Failed(_))
            }),
        )
        .await;
        if settled.is_err() {
            print_error("Timed out waiting for suggestions");
        }
    }

    drop(service);
    let _ = printer.await;
    Ok(())
}

fn render(suggestions: &Suggestions, format: OutputFormat) {
    match &suggestions.state {
        RequestState::Idle => {}
        RequestState::Loading => {
            if format != OutputFormat::Json {
                println!("{}", format!("Searching \"{}\"...", suggestions.query).dimmed());
            }
        }
        RequestState::Success(results) => match format {
            OutputFormat::Json => print_json(results),
            _ => {
                println!("{} {}", "Suggestions for".cyan(), suggestions.query.bold());
                if results.is_empty() {
                    println!("  {}", "No suggestions".dimmed());
                } else {
                    print_result_cards(results);
                }
            }
        },
        RequestState::Failed(msg) => print_error(msg),
    }
}
