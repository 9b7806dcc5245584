use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, Result};
use crate::parameters::Parameters;
use crate::system::TerminologySystem;

/// Input of `ValueSet/$validate-code`, sent as query params or a JSON body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateCodeRequest {
    pub url: String,
    pub system: String,
    pub code: String,
}

impl ValidateCodeRequest {
    pub fn new(system: TerminologySystem, code: impl Into<String>) -> Self {
        Self {
            url: system.value_set_url(),
            system: system.code_system_url(),
            code: code.into(),
        }
    }

    pub fn query_pairs(&self) -> [(&'static str, &str); 3] {
        [
            ("url", self.url.as_str()),
            ("system", self.system.as_str()),
            ("code", self.code.as_str()),
        ]
    }
}

impl Default for ValidateCodeRequest {
    fn default() -> Self {
        Self::new(TerminologySystem::Ayurveda, "")
    }
}

/// Decoded `$validate-code` answer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidateCodeResult {
    pub result: bool,
    pub message: Option<String>,
    pub display: Option<String>,
}

impl ValidateCodeResult {
    /// Accepts either a `Parameters` resource or a plain `{ result, message }`
    /// object. A body with no readable verdict is reported as invalid.
    pub fn from_json(body: &Value) -> Self {
        if let Some(params) = Parameters::from_json(body) {
            return Self {
                result: params
                    .find("result")
                    .and_then(|p| p.value_bool())
                    .unwrap_or(false),
                message: params.str_value("message").map(str::to_string),
                display: params.str_value("display").map(str::to_string),
            };
        }

        let text = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            result: body.get("result").and_then(Value::as_bool).unwrap_or(false),
            message: text("message"),
            display: text("display"),
        }
    }
}

/// Payload of `POST /fhir/validate/dual-code`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DualCodeRequest {
    pub ayush_code: String,
    pub ayush_system: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tm2_code: Option<String>,
}

impl DualCodeRequest {
    pub fn new(ayush_code: impl Into<String>, ayush_system: impl Into<String>) -> Self {
        Self {
            ayush_code: ayush_code.into(),
            ayush_system: ayush_system.into(),
            tm2_code: None,
        }
    }

    pub fn with_tm2_code(mut self, tm2_code: impl Into<String>) -> Self {
        self.tm2_code = Some(tm2_code.into());
        self
    }

    /// Dual-code validation needs an AYUSH code to check
    pub fn validate(&self) -> Result<()> {
        if self.ayush_code.trim().is_empty() {
            return Err(CoreError::invalid_input("AYUSH code is required"));
        }
        if self.ayush_system.trim().is_empty() {
            return Err(CoreError::invalid_input("AYUSH system is required"));
        }
        Ok(())
    }
}

/// Dual-code validation verdict together with the raw server answer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DualCodeValidation {
    pub valid: bool,
    pub raw: Value,
}

impl DualCodeValidation {
    /// The server reports validity as either `isValid` or `ok`
    pub fn from_json(body: Value) -> Self {
        let valid = ["isValid", "ok"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_bool))
            .unwrap_or(false);
        Self { valid, raw: body }
    }

    pub fn label(&self) -> &'static str {
        if self.valid {
            "Valid dual coding"
        } else {
            "Invalid dual coding"
        }
    }
}
