//! Async client for the SymbioMed FHIR terminology API.
//!
//! [`TerminologyClient`] wraps each endpoint the server exposes
//! (`$expand`, `$lookup`, `$translate`, `$validate-code`, bundles, problem
//! list ingestion, dual-code validation and health) and reduces responses
//! to the view-models from `symbiomed-core`.

pub mod client;
pub mod error;
pub mod suggest;

pub use client::{ClientConfig, DEFAULT_BASE_URL, TerminologyClient};
pub use error::{ClientError, Result};
pub use suggest::{SuggestionService, Suggestions};
