use anyhow::Result;
use colored::Colorize;
use symbiomed_client::TerminologyClient;
use symbiomed_core::{SearchScope, results_heading};

use crate::cli::OutputFormat;
use crate::output::{print_heading, print_json, print_result_cards, print_result_table};

pub async fn search(
    client: &TerminologyClient,
    term: &str,
    scope: SearchScope,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    if term.trim().is_empty() {
        anyhow::bail!("Search term must not be empty");
    }

    let results = client.search(scope, term, limit).await?;

    match format {
        OutputFormat::Json => print_json(&results),
        OutputFormat::Table | OutputFormat::Text => {
            print_heading(&results_heading(results.len()));
            if results.is_empty() {
                println!(
                    "{}",
                    format!("No {scope} codes matched \"{}\"", term.trim()).dimmed()
                );
            } else if format == OutputFormat::Table {
                print_result_table(&results);
            } else {
                print_result_cards(&results);
            }
        }
    }
    Ok(())
}
