// ZipDrop - core/selection.rs
//
// Selection filter: keeps candidates whose name ends with the accepted
// suffix, compared case-insensitively, preserving input order.

use crate::core::model::CandidateFile;
use crate::util::constants;
use crate::util::error::UploadError;

/// Suffix-based candidate filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionFilter {
    /// Suffix as configured, used for messages and file dialogs.
    suffix: String,
    /// Lowercased suffix used for matching.
    suffix_lower: String,
}

impl SelectionFilter {
    pub fn new(suffix: &str) -> Self {
        Self {
            suffix: suffix.to_string(),
            suffix_lower: suffix.to_lowercase(),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Suffix without the leading dot, for file-dialog extension filters.
    pub fn extension(&self) -> &str {
        self.suffix.trim_start_matches('.')
    }

    /// True if `name` ends with the accepted suffix, ignoring case.
    pub fn accepts(&self, name: &str) -> bool {
        name.to_lowercase().ends_with(&self.suffix_lower)
    }

    /// Order-preserving subsequence of `candidates` that this filter accepts.
    pub fn filter(&self, candidates: Vec<CandidateFile>) -> Vec<CandidateFile> {
        candidates
            .into_iter()
            .filter(|c| self.accepts(&c.name))
            .collect()
    }

    /// Like [`filter`](Self::filter), but an empty result is an error.
    ///
    /// Callers that are about to start a batch must go through this guard
    /// so an all-rejected selection is reported instead of ignored.
    pub fn select(&self, candidates: Vec<CandidateFile>) -> Result<Vec<CandidateFile>, UploadError> {
        let offered = candidates.len();
        let accepted = self.filter(candidates);
        if accepted.is_empty() {
            tracing::debug!(offered, suffix = %self.suffix, "No candidates matched the suffix");
            return Err(UploadError::EmptyBatch {
                suffix: self.suffix.clone(),
                rejected: offered,
            });
        }
        if accepted.len() < offered {
            tracing::debug!(
                offered,
                accepted = accepted.len(),
                "Dropped candidates with a non-matching suffix"
            );
        }
        Ok(accepted)
    }
}

impl Default for SelectionFilter {
    fn default() -> Self {
        Self::new(constants::DEFAULT_ACCEPTED_SUFFIX)
    }
}
