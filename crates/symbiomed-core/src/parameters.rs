//! Minimal model of the FHIR `Parameters` resource.
//!
//! Terminology operations (`$lookup`, `$translate`, `$validate-code`) answer
//! with a `Parameters` resource whose entries carry exactly one `value[x]`
//! or a nested `part` list. Only the value types those operations use are
//! given typed accessors; every other key is kept verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `value[x]` keys that carry a string-like primitive, in lookup order
const STRING_VALUE_KEYS: &[&str] = &[
    "valueString",
    "valueCode",
    "valueUri",
    "valueCanonical",
    "valueUrl",
    "valueId",
    "valueMarkdown",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameters {
    #[serde(default = "default_resource_type")]
    pub resource_type: String,
    #[serde(default)]
    pub parameter: Vec<ParameterComponent>,
}

fn default_resource_type() -> String {
    "Parameters".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterComponent {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub part: Vec<ParameterComponent>,
    /// `value[x]` and any other keys on the entry
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

impl Parameters {
    /// Decode a JSON body as `Parameters` if it has a `parameter` array.
    ///
    /// Returns `None` for anything else, including a malformed `parameter`
    /// list; callers treat that as "no data" rather than an error.
    pub fn from_json(value: &Value) -> Option<Self> {
        value.get("parameter")?.as_array()?;
        serde_json::from_value(value.clone()).ok()
    }

    pub fn find(&self, name: &str) -> Option<&ParameterComponent> {
        self.parameter.iter().find(|p| p.name == name)
    }

    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ParameterComponent> {
        self.parameter.iter().filter(move |p| p.name == name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// String value of the first parameter called `name`
    pub fn str_value(&self, name: &str) -> Option<&str> {
        self.find(name).and_then(|p| p.value_str())
    }
}

impl ParameterComponent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn with_part(mut self, part: ParameterComponent) -> Self {
        self.part.push(part);
        self
    }

    pub fn value_str(&self) -> Option<&str> {
        STRING_VALUE_KEYS
            .iter()
            .find_map(|key| self.values.get(*key).and_then(Value::as_str))
    }

    pub fn value_bool(&self) -> Option<bool> {
        self.values.get("valueBoolean").and_then(Value::as_bool)
    }

    pub fn value_coding(&self) -> Option<&Map<String, Value>> {
        self.values.get("valueCoding").and_then(Value::as_object)
    }

    pub fn part(&self, name: &str) -> Option<&ParameterComponent> {
        self.part.iter().find(|p| p.name == name)
    }

    pub fn part_str(&self, name: &str) -> Option<&str> {
        self.part(name).and_then(|p| p.value_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_requires_parameter_array() {
        assert!(Parameters::from_json(&json!({"resultCount": 0})).is_none());
        assert!(Parameters::from_json(&json!({"parameter": "oops"})).is_none());

        let params = Parameters::from_json(&json!({
            "resourceType": "Parameters",
            "parameter": [{"name": "display", "valueString": "Vata Dosha"}]
        }))
        .unwrap();
        assert_eq!(params.str_value("display"), Some("Vata Dosha"));
    }

    #[test]
    fn test_value_lookup_order() {
        let part = ParameterComponent::new("code")
            .with_value("valueCode", "AY001")
            .with_value("valueUri", "http://example.org");
        assert_eq!(part.value_str(), Some("AY001"));

        let flag = ParameterComponent::new("result").with_value("valueBoolean", true);
        assert_eq!(flag.value_bool(), Some(true));
        assert_eq!(flag.value_str(), None);
    }

    #[test]
    fn test_nested_parts() {
        let params = Parameters::from_json(&json!({
            "parameter": [{
                "name": "match",
                "part": [
                    {"name": "equivalence", "valueCode": "equivalent"},
                    {"name": "concept", "part": [{"name": "code", "valueCode": "TM2-1"}]}
                ]
            }]
        }))
        .unwrap();

        let m = params.find("match").unwrap();
        assert_eq!(m.part_str("equivalence"), Some("equivalent"));
        assert_eq!(m.part("concept").unwrap().part_str("code"), Some("TM2-1"));
        assert_eq!(params.find_all("match").count(), 1);
    }

    #[test]
    fn test_missing_resource_type_defaults() {
        let params = Parameters::from_json(&json!({"parameter": []})).unwrap();
        assert_eq!(params.resource_type, "Parameters");
        assert!(!params.has("match"));
    }
}
