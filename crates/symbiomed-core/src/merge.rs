use std::fmt::Display;

use indexmap::IndexMap;

use crate::error::{CoreError, Result};
use crate::expansion::SearchResult;
use crate::system::TerminologySystem;

/// Result of querying one system during a multi-system search
pub type SystemOutcome<E> = (TerminologySystem, std::result::Result<Vec<SearchResult>, E>);

/// Merge per-system search results into one list.
///
/// Items are tagged with their originating system and deduplicated by code.
/// A later item replaces an earlier one with the same code but keeps the
/// earlier position. Failed systems are skipped; the merge only fails when
/// every system failed.
pub fn merge_system_results<E: Display>(
    outcomes: Vec<SystemOutcome<E>>,
    cap: usize,
) -> Result<Vec<SearchResult>> {
    let attempted = outcomes.len();
    let mut failed = 0;
    let mut by_code: IndexMap<String, SearchResult> = IndexMap::new();

    for (system, outcome) in outcomes {
        match outcome {
            Ok(results) => {
                tracing::debug!(system = %system, count = results.len(), "system search succeeded");
                for result in results {
                    let tagged = result.tagged(system);
                    by_code.insert(tagged.code.clone(), tagged);
                }
            }
            Err(e) => {
                failed += 1;
                // Partial failures stay out of sight at the default log level
                tracing::debug!(system = %system, error = %e, "system search failed");
            }
        }
    }

    if attempted > 0 && failed == attempted {
        return Err(CoreError::AllSystemsFailed { attempted });
    }

    Ok(by_code.into_values().take(cap).collect())
}
