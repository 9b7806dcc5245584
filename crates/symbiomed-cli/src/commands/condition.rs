use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::Value;
use symbiomed_client::TerminologyClient;
use symbiomed_core::condition::parse_onset_date;
use symbiomed_core::{DualCodeRequest, ProblemListEntry};

use crate::cli::{ConditionCreateArgs, DualCodeArgs, OutputFormat};
use crate::commands::read_input;
use crate::output::{print_field, print_json, print_success};

pub async fn create(
    client: &TerminologyClient,
    args: &ConditionCreateArgs,
    format: OutputFormat,
) -> Result<()> {
    let entry = match &args.file {
        Some(_) => {
            let raw = read_input(&args.file)?;
            serde_json::from_str::<ProblemListEntry>(&raw).context("Invalid problem-list entry")?
        }
        None => entry_from_args(args)?,
    };

    let created = client.ingest_problem_list(&entry).await?;

    if format == OutputFormat::Json {
        print_json(&created);
        return Ok(());
    }

    match created.get("id").and_then(Value::as_str) {
        Some(id) => print_success(&format!("Condition created: Condition/{id}")),
        None => print_success("Condition created"),
    }
    print_field("AYUSH", &format!("{} ({})", entry.ayush_code, entry.ayush_system));
    if let Some(icd) = &entry.icd_code {
        let display = entry.icd_display.as_deref().unwrap_or("");
        print_field("ICD-11 TM2", format!("{icd} {display}").trim_end());
    }
    print_field("Clinical status", entry.clinical_status.as_str());
    print_field("Verification", entry.verification_status.as_str());
    print_field("Encounter", entry.encounter_class.label());
    print_field("Onset", &entry.onset_date.to_string());
    Ok(())
}

fn entry_from_args(args: &ConditionCreateArgs) -> Result<ProblemListEntry> {
    let code = args
        .code
        .as_deref()
        .context("--code is required unless --file is given")?;

    let mut entry = ProblemListEntry::new(code).with_system(&args.system);
    entry.icd_code = args.icd_code.clone();
    entry.icd_display = args.icd_display.clone();
    entry.icd_system = args.icd_system.clone().or_else(|| {
        args.icd_code
            .as_ref()
            .map(|_| symbiomed_core::translate::DEFAULT_TARGET_SYSTEM.to_string())
    });
    entry.clinical_status = args.clinical_status;
    entry.verification_status = args.verification_status;
    entry.encounter_class = args.encounter_class;
    if let Some(date) = &args.onset_date {
        entry.onset_date = parse_onset_date(date)?;
    }
    entry.validate()?;
    Ok(entry)
}

pub async fn validate(client: &TerminologyClient, args: &DualCodeArgs, format: OutputFormat) -> Result<()> {
    let mut request = DualCodeRequest::new(&args.code, &args.system);
    if let Some(tm2) = &args.tm2_code {
        request = request.with_tm2_code(tm2);
    }

    let verdict = client.validate_dual_code(&request).await?;

    if format == OutputFormat::Json {
        print_json(&verdict.raw);
        return Ok(());
    }

    if verdict.valid {
        println!("{} {}", "✓".green(), verdict.label().green());
    } else {
        println!("{} {}", "✗".red(), verdict.label().red());
    }
    if let Some(message) = verdict.raw.get("message").and_then(Value::as_str) {
        print_field("Message", message);
    }
    Ok(())
}
