use anyhow::Result;
use colored::Colorize;
use symbiomed_client::TerminologyClient;
use symbiomed_core::translate::mappings_heading;
use symbiomed_core::{TranslateOutcome, TranslateRequest, ValidateCodeRequest};

use crate::cli::{LookupArgs, OutputFormat, TranslateArgs, ValidateCodeArgs};
use crate::output::{print_field, print_heading, print_json};

pub async fn lookup(client: &TerminologyClient, args: &LookupArgs, format: OutputFormat) -> Result<()> {
    let result = client.lookup(&args.system, &args.code).await?;

    if format == OutputFormat::Json {
        print_json(&result);
        return Ok(());
    }

    print_heading(&format!("{} ({})", args.code, args.system));
    if result.is_empty() {
        println!("{}", "No details returned for this code".dimmed());
        return Ok(());
    }
    for (label, value) in [
        ("Name", &result.name),
        ("Version", &result.version),
        ("Display", &result.display),
        ("Definition", &result.definition),
    ] {
        if let Some(value) = value {
            print_field(label, value);
        }
    }
    for d in &result.designations {
        match &d.language {
            Some(lang) => print_field(&format!("Designation ({lang})"), &d.value),
            None => print_field("Designation", &d.value),
        }
    }
    for p in &result.properties {
        let value = match p.value.as_str() {
            Some(s) => s.to_string(),
            None => p.value.to_string(),
        };
        print_field(&format!("Property {}", p.code), &value);
    }
    Ok(())
}

pub async fn translate(
    client: &TerminologyClient,
    args: &TranslateArgs,
    format: OutputFormat,
) -> Result<()> {
    let request = TranslateRequest {
        url: args.url.clone(),
        system: args.source.clone(),
        target: args.target.clone(),
        code: args.code.clone(),
    };
    let outcome = client.translate(&request).await?;

    if format == OutputFormat::Json {
        print_json(&outcome);
        return Ok(());
    }

    print_heading(&mappings_heading(outcome.match_count()));
    match &outcome {
        TranslateOutcome::CustomMapping { entries, .. } => {
            for m in entries {
                println!(
                    "  {} {} [{}] {}",
                    m.code.bold(),
                    m.display,
                    m.equivalence_label(),
                    m.confidence_percent().dimmed()
                );
            }
        }
        TranslateOutcome::FhirParametersMapping { matches } => {
            for m in matches {
                println!(
                    "  {} {} [{}] {}",
                    m.code.as_deref().unwrap_or("-").bold(),
                    m.display.as_deref().unwrap_or(""),
                    m.equivalence_label(),
                    m.system.as_deref().unwrap_or("").dimmed()
                );
            }
        }
        TranslateOutcome::Empty => println!("{}", "No mapping".dimmed()),
    }
    Ok(())
}

pub async fn validate_code(
    client: &TerminologyClient,
    args: &ValidateCodeArgs,
    format: OutputFormat,
) -> Result<()> {
    let request = ValidateCodeRequest {
        url: args.url.clone(),
        system: args.system.clone(),
        code: args.code.clone(),
    };
    let result = if args.post {
        client.validate_code_post(&request).await?
    } else {
        client.validate_code_get(&request).await?
    };

    if format == OutputFormat::Json {
        print_json(&result);
        return Ok(());
    }

    if result.result {
        println!("{} {} is valid in {}", "✓".green(), args.code.bold(), args.url);
    } else {
        println!("{} {} is not valid in {}", "✗".red(), args.code.bold(), args.url);
    }
    if let Some(display) = &result.display {
        print_field("Display", display);
    }
    if let Some(message) = &result.message {
        print_field("Message", message);
    }
    Ok(())
}
