use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::system::TerminologySystem;

/// One concept returned by a `ValueSet/$expand` search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub code: String,
    #[serde(default)]
    pub display: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl SearchResult {
    pub fn new(code: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            display: display.into(),
            ..Default::default()
        }
    }

    /// Annotate the result with the system it was fetched from.
    ///
    /// URL, name and color always describe that same system, whatever
    /// `system` the server reported.
    pub fn tagged(mut self, system: TerminologySystem) -> Self {
        self.system = Some(system.code_system_url());
        self.system_name = Some(system.name().to_string());
        self.color = Some(system.color().to_string());
        self
    }

    /// System the result belongs to, guessed from its URL when untagged
    pub fn terminology_system(&self) -> TerminologySystem {
        self.system
            .as_deref()
            .map(TerminologySystem::from_url)
            .unwrap_or_default()
    }
}

/// Pull `expansion.contains` out of a `$expand` response.
///
/// A body without an expansion is an empty result, not an error.
pub fn decode_expansion(body: &Value) -> Vec<SearchResult> {
    let Some(contains) = body
        .get("expansion")
        .and_then(|e| e.get("contains"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    contains
        .iter()
        .filter_map(|entry| match serde_json::from_value::<SearchResult>(entry.clone()) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::debug!(error = %e, "skipping malformed expansion entry");
                None
            }
        })
        .collect()
}

/// Heading shown above a result list
pub fn results_heading(count: usize) -> String {
    match count {
        0 => "No Results Found".to_string(),
        1 => "Found 1 Result".to_string(),
        n => format!("Found {n} Results"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_vata_example() {
        let body = json!({
            "expansion": {
                "contains": [{
                    "code": "AY001",
                    "display": "Vata Dosha",
                    "system": "http://sih.gov.in/fhir/CodeSystem/namaste-ayurveda"
                }]
            }
        });
        let results = decode_expansion(&body);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].code, "AY001");
        assert_eq!(results[0].display, "Vata Dosha");
        assert_eq!(results_heading(results.len()), "Found 1 Result");
    }

    #[test]
    fn test_missing_expansion_is_empty() {
        assert!(decode_expansion(&json!({})).is_empty());
        assert!(decode_expansion(&json!({"expansion": {}})).is_empty());
        assert!(decode_expansion(&json!({"expansion": {"contains": null}})).is_empty());
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let body = json!({
            "expansion": {"contains": [{"display": "no code"}, {"code": "AY002"}]}
        });
        let results = decode_expansion(&body);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].code, "AY002");
        assert_eq!(results[0].display, "");
    }

    #[test]
    fn test_headings() {
        assert_eq!(results_heading(0), "No Results Found");
        assert_eq!(results_heading(7), "Found 7 Results");
    }

    #[test]
    fn test_tagging_follows_originating_system() {
        let result = SearchResult {
            system: Some("http://sih.gov.in/fhir/CodeSystem/namaste-ayurveda".into()),
            ..SearchResult::new("S1", "Vali")
        }
        .tagged(TerminologySystem::Siddha);
        assert_eq!(
            result.system.as_deref(),
            Some("http://sih.gov.in/fhir/CodeSystem/namaste-siddha")
        );
        assert_eq!(result.terminology_system(), TerminologySystem::Siddha);
        assert_eq!(result.system_name.as_deref(), Some("Siddha"));
        assert_eq!(result.color.as_deref(), Some("yellow"));

        let untagged = SearchResult::new("U1", "Balgham").tagged(TerminologySystem::Unani);
        assert_eq!(untagged.terminology_system(), TerminologySystem::Unani);
    }
}
