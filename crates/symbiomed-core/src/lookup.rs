use serde::Serialize;
use serde_json::Value;

use crate::parameters::Parameters;

/// Designation (alternate display) of a looked-up concept
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Designation {
    pub language: Option<String>,
    pub value: String,
}

/// Property reported by `$lookup`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConceptProperty {
    pub code: String,
    pub value: Value,
}

/// Decoded `CodeSystem/$lookup` response
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LookupResult {
    pub name: Option<String>,
    pub version: Option<String>,
    pub display: Option<String>,
    pub definition: Option<String>,
    pub designations: Vec<Designation>,
    pub properties: Vec<ConceptProperty>,
}

impl LookupResult {
    pub fn from_json(body: &Value) -> Self {
        let Some(params) = Parameters::from_json(body) else {
            return Self::default();
        };

        let owned = |name: &str| params.str_value(name).map(str::to_string);

        let designations = params
            .find_all("designation")
            .filter_map(|d| {
                Some(Designation {
                    language: d.part_str("language").map(str::to_string),
                    value: d.part_str("value")?.to_string(),
                })
            })
            .collect();

        let properties = params
            .find_all("property")
            .filter_map(|p| {
                let code = p.part_str("code")?.to_string();
                let value = p.part("value").and_then(|v| {
                    v.values
                        .iter()
                        .find(|(k, _)| k.starts_with("value"))
                        .map(|(_, v)| v.clone())
                })?;
                Some(ConceptProperty { code, value })
            })
            .collect();

        Self {
            name: owned("name"),
            version: owned("version"),
            display: owned("display"),
            definition: owned("definition"),
            designations,
            properties,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.display.is_none() && self.definition.is_none() && self.name.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_display_and_definition() {
        let body = json!({
            "resourceType": "Parameters",
            "parameter": [
                {"name": "name", "valueString": "NAMASTE Ayurveda"},
                {"name": "display", "valueString": "Vata Dosha"},
                {"name": "definition", "valueString": "Air and space principle"},
                {"name": "designation", "part": [
                    {"name": "language", "valueCode": "hi"},
                    {"name": "value", "valueString": "वात दोष"}
                ]},
                {"name": "property", "part": [
                    {"name": "code", "valueCode": "category"},
                    {"name": "value", "valueString": "dosha"}
                ]}
            ]
        });

        let result = LookupResult::from_json(&body);
        assert_eq!(result.name.as_deref(), Some("NAMASTE Ayurveda"));
        assert_eq!(result.display.as_deref(), Some("Vata Dosha"));
        assert_eq!(result.definition.as_deref(), Some("Air and space principle"));
        assert_eq!(result.designations.len(), 1);
        assert_eq!(result.designations[0].language.as_deref(), Some("hi"));
        assert_eq!(result.properties[0].code, "category");
        assert_eq!(result.properties[0].value, json!("dosha"));
        assert!(!result.is_empty());
    }

    #[test]
    fn test_lookup_non_parameters_body() {
        let result = LookupResult::from_json(&json!({"error": "not found"}));
        assert!(result.is_empty());
    }
}
