//! Normalization of `ConceptMap/$translate` responses.
//!
//! The terminology server answers `$translate` in one of two shapes: a
//! custom envelope `{ resultCount, result: [...] }` or a standard FHIR
//! `Parameters` resource with `match` entries. Both are decoded into
//! [`TranslateOutcome`] so the mapping screen can match on it exhaustively.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::parameters::{ParameterComponent, Parameters};

pub const DEFAULT_CONCEPT_MAP: &str = "urn:conceptmap:NAMASTE_TO_ICD11_TM2_MAPPING";
pub const DEFAULT_SOURCE_SYSTEM: &str = "urn:namaste";
pub const DEFAULT_TARGET_SYSTEM: &str = "http://id.who.int/icd/entity";

pub const NO_MATCH_MESSAGE: &str = "No ICD-11 TM2 mapping exists for this code yet";

/// Query for `ConceptMap/$translate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslateRequest {
    pub url: String,
    pub system: String,
    pub target: String,
    pub code: String,
}

impl TranslateRequest {
    /// NAMASTE to ICD-11 TM2 translation of `code`
    pub fn tm2(code: impl Into<String>) -> Self {
        Self {
            url: DEFAULT_CONCEPT_MAP.to_string(),
            system: DEFAULT_SOURCE_SYSTEM.to_string(),
            target: DEFAULT_TARGET_SYSTEM.to_string(),
            code: code.into(),
        }
    }

    pub fn query_pairs(&self) -> [(&'static str, &str); 4] {
        [
            ("url", self.url.as_str()),
            ("system", self.system.as_str()),
            ("target", self.target.as_str()),
            ("code", self.code.as_str()),
        ]
    }
}

/// Entry of the custom `{ resultCount, result }` envelope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingEntry {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub display: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equivalence: Option<String>,
    /// Fraction in `0.0..=1.0`
    #[serde(default)]
    pub confidence: f64,
}

impl MappingEntry {
    /// Confidence as a percentage with one decimal, e.g. `87.5%`
    pub fn confidence_percent(&self) -> String {
        format!("{:.1}%", self.confidence * 100.0)
    }

    pub fn equivalence_label(&self) -> &str {
        self.equivalence.as_deref().unwrap_or("EQUIVALENT")
    }
}

/// A `match` entry of a FHIR `Parameters` translate response.
///
/// Each field is optional on its own; servers are not required to send the
/// whole triplet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FhirMatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equivalence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

impl FhirMatch {
    fn from_component(component: &ParameterComponent) -> Self {
        let mut m = FhirMatch {
            equivalence: component.part_str("equivalence").map(str::to_string),
            ..Default::default()
        };

        if let Some(concept) = component.part("concept") {
            m.code = concept.part_str("code").map(str::to_string);
            m.display = concept.part_str("display").map(str::to_string);
            m.system = concept.part_str("system").map(str::to_string);

            // R4 servers send the concept as a valueCoding instead of parts
            if let Some(coding) = concept.value_coding() {
                let field = |key: &str| coding.get(key).and_then(Value::as_str).map(str::to_string);
                m.code = m.code.or_else(|| field("code"));
                m.display = m.display.or_else(|| field("display"));
                m.system = m.system.or_else(|| field("system"));
            }
        }
        m
    }

    pub fn equivalence_label(&self) -> &str {
        self.equivalence.as_deref().unwrap_or("equivalent")
    }
}

/// Normalized `$translate` result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TranslateOutcome {
    /// Custom envelope with at least one entry
    CustomMapping {
        result_count: usize,
        entries: Vec<MappingEntry>,
    },
    /// FHIR `Parameters` with at least one `match`
    FhirParametersMapping { matches: Vec<FhirMatch> },
    /// Well-formed response without any mapping
    Empty,
}

impl TranslateOutcome {
    /// Classify a successful (2xx) response body.
    ///
    /// The custom envelope is checked first; a body carrying both shapes is
    /// therefore treated as custom.
    pub fn from_json(body: &Value) -> Self {
        if let Some(outcome) = Self::custom(body) {
            return outcome;
        }

        if let Some(params) = Parameters::from_json(body) {
            let matches: Vec<FhirMatch> = params
                .find_all("match")
                .map(FhirMatch::from_component)
                .collect();
            if !matches.is_empty() {
                return Self::FhirParametersMapping { matches };
            }
        }

        Self::Empty
    }

    fn custom(body: &Value) -> Option<Self> {
        let result_count = body.get("resultCount").and_then(Value::as_u64)? as usize;
        let result = body.get("result").and_then(Value::as_array)?;
        if result_count == 0 || result.is_empty() {
            return None;
        }

        let entries: Vec<MappingEntry> = result
            .iter()
            .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
            .take(result_count)
            .collect();
        if entries.is_empty() {
            return None;
        }

        Some(Self::CustomMapping {
            result_count,
            entries,
        })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn match_count(&self) -> usize {
        match self {
            Self::CustomMapping { entries, .. } => entries.len(),
            Self::FhirParametersMapping { matches } => matches.len(),
            Self::Empty => 0,
        }
    }
}

/// Heading shown above a list of mappings
pub fn mappings_heading(count: usize) -> String {
    if count == 1 {
        "Found 1 ICD-11 TM2 Mapping".to_string()
    } else {
        format!("Found {count} ICD-11 TM2 Mappings")
    }
}

/// What the mapping screen displays for a translate request
#[derive(Debug, Clone, PartialEq)]
pub enum MappingView {
    Loading,
    Mapped(TranslateOutcome),
    NoMatch { message: String },
    Error { status: Option<u16>, message: String },
}

impl MappingView {
    /// Build the view from an HTTP status and its decoded body.
    ///
    /// Non-2xx is always an error; a 2xx body that is missing, unreadable, or
    /// holds no mapping is always "no match".
    pub fn from_response(status: u16, body: Option<&Value>) -> Self {
        if !(200..300).contains(&status) {
            return Self::Error {
                status: Some(status),
                message: format!("API returned status {status}"),
            };
        }

        match body.map(TranslateOutcome::from_json) {
            Some(outcome) if !outcome.is_empty() => Self::Mapped(outcome),
            _ => Self::NoMatch {
                message: NO_MATCH_MESSAGE.to_string(),
            },
        }
    }

    pub fn from_error(message: impl Into<String>) -> Self {
        Self::Error {
            status: None,
            message: message.into(),
        }
    }

    /// Error and no-match views offer a retry
    pub fn can_retry(&self) -> bool {
        matches!(self, Self::NoMatch { .. } | Self::Error { .. })
    }
}
