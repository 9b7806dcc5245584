use anyhow::Result;
use serde_json::Value;
use symbiomed_client::TerminologyClient;

use crate::cli::OutputFormat;
use crate::commands::read_input;
use crate::output::{print_field, print_json, print_success};

pub async fn get(client: &TerminologyClient, format: OutputFormat) -> Result<()> {
    let bundle = client.get_bundle().await?;
    if format == OutputFormat::Json {
        print_json(&bundle);
        return Ok(());
    }

    let entries = bundle
        .get("entry")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    print_field(
        "Bundle",
        bundle.get("type").and_then(Value::as_str).unwrap_or("unknown"),
    );
    print_field("Entries", &entries.len().to_string());
    for entry in entries {
        let resource = entry.get("resource").unwrap_or(entry);
        let rt = resource
            .get("resourceType")
            .and_then(Value::as_str)
            .unwrap_or("?");
        let id = resource.get("id").and_then(Value::as_str).unwrap_or("-");
        println!("  {rt}/{id}");
    }
    Ok(())
}

pub async fn upload(client: &TerminologyClient, file: &Option<String>, format: OutputFormat) -> Result<()> {
    let raw = read_input(file)?;
    let response = client.upload_bundle(&raw).await?;
    match format {
        OutputFormat::Json => print_json(&response),
        _ => print_success("Bundle uploaded"),
    }
    Ok(())
}
