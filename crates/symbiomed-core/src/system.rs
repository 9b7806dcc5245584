use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

const CODE_SYSTEM_BASE: &str = "http://sih.gov.in/fhir/CodeSystem";
const VALUE_SET_BASE: &str = "http://sih.gov.in/fhir/ValueSet";

/// NAMASTE terminology systems served by the terminology API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminologySystem {
    #[default]
    Ayurveda,
    Siddha,
    Unani,
}

impl TerminologySystem {
    pub const ALL: [TerminologySystem; 3] = [Self::Ayurveda, Self::Siddha, Self::Unani];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ayurveda => "Ayurveda",
            Self::Siddha => "Siddha",
            Self::Unani => "Unani",
        }
    }

    fn slug(&self) -> &'static str {
        match self {
            Self::Ayurveda => "namaste-ayurveda",
            Self::Siddha => "namaste-siddha",
            Self::Unani => "namaste-unani",
        }
    }

    /// Canonical CodeSystem URL, used for `$lookup` and as the coding system
    pub fn code_system_url(&self) -> String {
        format!("{CODE_SYSTEM_BASE}/{}", self.slug())
    }

    /// ValueSet URL, used for `$expand` and `$validate-code`
    pub fn value_set_url(&self) -> String {
        format!("{VALUE_SET_BASE}/{}", self.slug())
    }

    /// Color used to tag search results from this system
    pub fn color(&self) -> &'static str {
        match self {
            Self::Ayurveda => "green",
            Self::Siddha => "yellow",
            Self::Unani => "magenta",
        }
    }

    /// Guess the system from a CodeSystem URL. Anything that is not
    /// recognisably Siddha or Unani is treated as Ayurveda.
    pub fn from_url(url: &str) -> Self {
        if url.contains("siddha") {
            Self::Siddha
        } else if url.contains("unani") {
            Self::Unani
        } else {
            Self::Ayurveda
        }
    }

    /// Resolve an optional system parameter, falling back to Ayurveda when it
    /// is missing or the literal string `undefined`.
    pub fn resolve_param(param: Option<&str>) -> (Self, String) {
        match param {
            Some(url) if !url.is_empty() && url != "undefined" => {
                (Self::from_url(url), url.to_string())
            }
            _ => (Self::Ayurveda, Self::Ayurveda.code_system_url()),
        }
    }
}

impl fmt::Display for TerminologySystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TerminologySystem {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ayurveda" => Ok(Self::Ayurveda),
            "siddha" => Ok(Self::Siddha),
            "unani" => Ok(Self::Unani),
            _ => Err(CoreError::unknown_system(s)),
        }
    }
}

/// Which systems a search should fan out to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    #[default]
    All,
    One(TerminologySystem),
}

impl SearchScope {
    pub fn systems(&self) -> Vec<TerminologySystem> {
        match self {
            Self::All => TerminologySystem::ALL.to_vec(),
            Self::One(system) => vec![*system],
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::One(system) => write!(f, "{system}"),
        }
    }
}

impl FromStr for SearchScope {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::One)
    }
}
