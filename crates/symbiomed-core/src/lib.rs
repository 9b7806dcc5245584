pub mod condition;
pub mod debounce;
pub mod error;
pub mod expansion;
pub mod lookup;
pub mod merge;
pub mod parameters;
pub mod state;
pub mod system;
pub mod translate;
pub mod validation;

pub use condition::{ClinicalStatus, EncounterClass, ProblemListEntry, VerificationStatus};
pub use debounce::{Debouncer, SuggestionPolicy};
pub use error::{CoreError, ErrorCategory, Result};
pub use expansion::{SearchResult, decode_expansion, results_heading};
pub use lookup::LookupResult;
pub use merge::merge_system_results;
pub use parameters::{ParameterComponent, Parameters};
pub use state::{RequestSlot, RequestState, RequestTicket};
pub use system::{SearchScope, TerminologySystem};
pub use translate::{FhirMatch, MappingEntry, MappingView, TranslateOutcome, TranslateRequest};
pub use validation::{DualCodeRequest, DualCodeValidation, ValidateCodeRequest, ValidateCodeResult};
