//! Problem-list entry form used to create a FHIR Condition.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::error::{CoreError, Result};
use crate::system::TerminologySystem;
use crate::translate::{DEFAULT_TARGET_SYSTEM, FhirMatch, MappingEntry};
use crate::validation::DualCodeRequest;

time::serde::format_description!(onset_date_format, Date, "[year]-[month]-[day]");

const DATE_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    time::macros::format_description!("[year]-[month]-[day]");

/// Condition.clinicalStatus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClinicalStatus {
    #[default]
    Active,
    Recurrence,
    Relapse,
    Inactive,
    Remission,
    Resolved,
}

impl ClinicalStatus {
    pub const ALL: [ClinicalStatus; 6] = [
        Self::Active,
        Self::Recurrence,
        Self::Relapse,
        Self::Inactive,
        Self::Remission,
        Self::Resolved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Recurrence => "recurrence",
            Self::Relapse => "relapse",
            Self::Inactive => "inactive",
            Self::Remission => "remission",
            Self::Resolved => "resolved",
        }
    }
}

/// Condition.verificationStatus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerificationStatus {
    #[default]
    Confirmed,
    Unconfirmed,
    Provisional,
    Differential,
    Refuted,
    EnteredInError,
}

impl VerificationStatus {
    pub const ALL: [VerificationStatus; 6] = [
        Self::Confirmed,
        Self::Unconfirmed,
        Self::Provisional,
        Self::Differential,
        Self::Refuted,
        Self::EnteredInError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Unconfirmed => "unconfirmed",
            Self::Provisional => "provisional",
            Self::Differential => "differential",
            Self::Refuted => "refuted",
            Self::EnteredInError => "entered-in-error",
        }
    }
}

/// v3 ActCode encounter class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EncounterClass {
    #[default]
    Amb,
    Emer,
    Imp,
    Hh,
    Vr,
}

impl EncounterClass {
    pub const ALL: [EncounterClass; 5] = [Self::Amb, Self::Emer, Self::Imp, Self::Hh, Self::Vr];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amb => "AMB",
            Self::Emer => "EMER",
            Self::Imp => "IMP",
            Self::Hh => "HH",
            Self::Vr => "VR",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Amb => "Ambulatory",
            Self::Emer => "Emergency",
            Self::Imp => "Inpatient",
            Self::Hh => "Home Health",
            Self::Vr => "Virtual",
        }
    }
}

macro_rules! impl_code_parsing {
    ($($ty:ident),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self> {
                Self::ALL
                    .into_iter()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| {
                        CoreError::invalid_input(format!(
                            concat!("Unknown ", stringify!($ty), ": {}"),
                            s
                        ))
                    })
            }
        }
    )*};
}

impl_code_parsing!(ClinicalStatus, VerificationStatus, EncounterClass);

/// Body of `POST /fhir/ingest/problem-list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemListEntry {
    pub ayush_code: String,
    pub ayush_system: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icd_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icd_system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icd_display: Option<String>,
    pub clinical_status: ClinicalStatus,
    pub verification_status: VerificationStatus,
    pub encounter_class: EncounterClass,
    #[serde(with = "onset_date_format")]
    pub onset_date: Date,
}

impl ProblemListEntry {
    /// Entry for an Ayurveda code with today's date as onset
    pub fn new(ayush_code: impl Into<String>) -> Self {
        Self {
            ayush_code: ayush_code.into(),
            ayush_system: TerminologySystem::Ayurveda.code_system_url(),
            icd_code: None,
            icd_system: None,
            icd_display: None,
            clinical_status: ClinicalStatus::default(),
            verification_status: VerificationStatus::default(),
            encounter_class: EncounterClass::default(),
            onset_date: OffsetDateTime::now_utc().date(),
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.ayush_system = system.into();
        self
    }

    /// Prefill the ICD-11 fields from a selected custom-format mapping
    pub fn with_mapping(mut self, mapping: &MappingEntry) -> Self {
        self.icd_code = Some(mapping.code.clone());
        self.icd_display = Some(mapping.display.clone()).filter(|d| !d.is_empty());
        self.icd_system = Some(DEFAULT_TARGET_SYSTEM.to_string());
        self
    }

    /// Prefill the ICD-11 fields from a FHIR `match`
    pub fn with_fhir_match(mut self, m: &FhirMatch) -> Self {
        self.icd_code = m.code.clone();
        self.icd_display = m.display.clone();
        self.icd_system = m
            .system
            .clone()
            .or_else(|| m.code.as_ref().map(|_| DEFAULT_TARGET_SYSTEM.to_string()));
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.ayush_code.trim().is_empty() {
            return Err(CoreError::invalid_input("AYUSH code is required"));
        }
        if self.ayush_system.trim().is_empty() {
            return Err(CoreError::invalid_input("AYUSH system is required"));
        }
        if self.icd_code.is_none() && (self.icd_system.is_some() || self.icd_display.is_some()) {
            return Err(CoreError::invalid_input(
                "ICD system or display given without an ICD code",
            ));
        }
        Ok(())
    }

    pub fn dual_code_request(&self) -> DualCodeRequest {
        let req = DualCodeRequest::new(&self.ayush_code, &self.ayush_system);
        match &self.icd_code {
            Some(code) => req.with_tm2_code(code),
            None => req,
        }
    }
}

/// Parse a `YYYY-MM-DD` onset date
pub fn parse_onset_date(input: &str) -> Result<Date> {
    Date::parse(input.trim(), DATE_FORMAT).map_err(|_| CoreError::invalid_date(input))
}
