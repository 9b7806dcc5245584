use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::{Value, json};
use symbiomed_client::TerminologyClient;
use symbiomed_core::translate::mappings_heading;
use symbiomed_core::{
    LookupResult, MappingView, ProblemListEntry, TerminologySystem, TranslateOutcome,
    TranslateRequest,
};

use crate::cli::{MappingArgs, OutputFormat};
use crate::output::{print_error_panel, print_field, print_heading, print_json, print_success};

const TRANSLATE_ERROR_HINT: &str = "The ConceptMap $translate endpoint returned an error. The server may be starting up or experiencing issues.";

pub async fn mapping(client: &TerminologyClient, args: &MappingArgs, format: OutputFormat) -> Result<()> {
    let (system, system_url) = TerminologySystem::resolve_param(args.system.as_deref());

    let details = client
        .lookup(&system_url, &args.code)
        .await
        .context("Lookup failed")?;
    let view = client.translate_view(&TranslateRequest::tm2(&args.code)).await;

    if let Some(index) = args.select {
        let entry = select_mapping(&view, index, &args.code, &system_url)?;
        print_success(&format!(
            "Selected mapping {index} for dual coding; pass this to `symbiomed condition create --file`"
        ));
        print_json(&entry);
        return Ok(());
    }

    if format == OutputFormat::Json {
        print_json(&json!({
            "code": args.code,
            "system": system_url,
            "lookup": details,
            "mapping": view_json(&view),
        }));
        return Ok(());
    }

    print_details(&args.code, system, &system_url, &details);
    println!();
    print_mapping(&view, &args.code, args.system.as_deref());
    Ok(())
}

fn print_details(code: &str, system: TerminologySystem, system_url: &str, details: &LookupResult) {
    print_heading(&format!("NAMASTE Code Details ({system})"));
    print_field("Code", code);
    if let Some(display) = &details.display {
        print_field("Display", display);
    }
    if let Some(definition) = &details.definition {
        print_field("Definition", definition);
    }
    print_field("System", system_url);
}

fn print_mapping(view: &MappingView, code: &str, system: Option<&str>) {
    print_heading("TM2 Mapping (ICD-11)");

    let retry = match system {
        Some(s) => format!("symbiomed mapping {code} --system {s}"),
        None => format!("symbiomed mapping {code}"),
    };

    match view {
        MappingView::Loading => println!("{}", "Loading...".dimmed()),
        MappingView::Mapped(outcome) => {
            println!("{}", mappings_heading(outcome.match_count()).green());
            print_outcome(outcome);
        }
        MappingView::NoMatch { message } => {
            println!("{}", message.yellow());
            println!(
                "  This NAMASTE code exists but doesn't have an ICD-11 TM2 mapping in the system yet."
            );
            println!("  {} {}", "Retry:".yellow(), retry);
        }
        MappingView::Error { status, message } => {
            let msg = match status {
                Some(s) => format!("{TRANSLATE_ERROR_HINT} (HTTP {s})"),
                None => format!("{TRANSLATE_ERROR_HINT} ({message})"),
            };
            print_error_panel(&msg, Some(&retry));
        }
    }
}

fn print_outcome(outcome: &TranslateOutcome) {
    match outcome {
        TranslateOutcome::CustomMapping { entries, .. } => {
            for (i, m) in entries.iter().enumerate() {
                println!(
                    "{:>2}. [{}] {} {}  {}",
                    i + 1,
                    m.equivalence_label().cyan(),
                    m.code.bold(),
                    m.display,
                    format!("Confidence: {}", m.confidence_percent()).dimmed()
                );
                if let Some(definition) = &m.definition {
                    println!("    {definition}");
                }
                if let Some(comment) = &m.comment {
                    println!("    {}", comment.italic());
                }
            }
        }
        TranslateOutcome::FhirParametersMapping { matches } => {
            for (i, m) in matches.iter().enumerate() {
                println!("{:>2}. [{}]", i + 1, m.equivalence_label().cyan());
                if let Some(code) = &m.code {
                    println!("    Code: {}", code.bold());
                }
                if let Some(display) = &m.display {
                    println!("    Display: {display}");
                }
                if let Some(system) = &m.system {
                    println!("    System: {system}");
                }
            }
        }
        TranslateOutcome::Empty => {}
    }
}

fn view_json(view: &MappingView) -> Value {
    match view {
        MappingView::Loading => json!({"status": "loading"}),
        MappingView::Mapped(outcome) => json!({"status": "mapped", "outcome": outcome}),
        MappingView::NoMatch { message } => json!({"status": "noMatch", "message": message}),
        MappingView::Error { status, message } => {
            json!({"status": "error", "httpStatus": status, "message": message})
        }
    }
}

/// Problem-list entry prefilled with the `index`-th (1-based) mapping
fn select_mapping(
    view: &MappingView,
    index: usize,
    code: &str,
    system_url: &str,
) -> Result<ProblemListEntry> {
    let MappingView::Mapped(outcome) = view else {
        anyhow::bail!("No mapping available to select for {code}");
    };
    let entry = ProblemListEntry::new(code).with_system(system_url);
    let position = index.checked_sub(1).context("Mapping index starts at 1")?;

    let selected = match outcome {
        TranslateOutcome::CustomMapping { entries, .. } => {
            entries.get(position).map(|m| entry.with_mapping(m))
        }
        TranslateOutcome::FhirParametersMapping { matches } => {
            matches.get(position).map(|m| entry.with_fhir_match(m))
        }
        TranslateOutcome::Empty => None,
    };

    selected.with_context(|| {
        format!(
            "Mapping {index} does not exist; {} available",
            outcome.match_count()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use symbiomed_core::{FhirMatch, MappingEntry};

    fn custom_view() -> MappingView {
        MappingView::Mapped(TranslateOutcome::CustomMapping {
            result_count: 2,
            entries: vec![
                MappingEntry {
                    code: "SK00".into(),
                    display: "Vata pattern".into(),
                    confidence: 0.9,
                    ..Default::default()
                },
                MappingEntry {
                    code: "SK01".into(),
                    confidence: 0.4,
                    ..Default::default()
                },
            ],
        })
    }

    #[test]
    fn test_select_custom_mapping() {
        let entry = select_mapping(&custom_view(), 2, "AA", "urn:sys").unwrap();
        assert_eq!(entry.icd_code.as_deref(), Some("SK01"));
        assert_eq!(entry.ayush_system, "urn:sys");
    }

    #[test]
    fn test_select_fhir_match() {
        let view = MappingView::Mapped(TranslateOutcome::FhirParametersMapping {
            matches: vec![FhirMatch {
                code: Some("SK02".into()),
                ..Default::default()
            }],
        });
        let entry = select_mapping(&view, 1, "AA", "urn:sys").unwrap();
        assert_eq!(entry.icd_code.as_deref(), Some("SK02"));
    }

    #[test]
    fn test_select_out_of_range() {
        assert!(select_mapping(&custom_view(), 0, "AA", "urn:sys").is_err());
        assert!(select_mapping(&custom_view(), 3, "AA", "urn:sys").is_err());
        let no_match = MappingView::NoMatch {
            message: "none".into(),
        };
        assert!(select_mapping(&no_match, 1, "AA", "urn:sys").is_err());
    }

    #[test]
    fn test_view_json_tags() {
        assert_eq!(view_json(&custom_view())["status"], "mapped");
        assert_eq!(
            view_json(&MappingView::from_error("boom"))["status"],
            "error"
        );
    }
}
