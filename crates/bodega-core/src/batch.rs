//! Per-item report for operations that issue several independent writes
//! (checkout, pay-in-full stock out). Nothing is rolled back; the caller
//! gets told exactly which items made it.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One item that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BatchFailure {
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome<T> {
    pub applied: Vec<T>,
    pub failed: Vec<BatchFailure>,
}

impl<T> BatchOutcome<T> {
    pub fn new() -> Self {
        BatchOutcome {
            applied: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Splits `(id, result)` pairs into applied values and failures.
    pub fn collect<I, E>(results: I) -> Self
    where
        I: IntoIterator<Item = (String, Result<T, E>)>,
        E: fmt::Display,
    {
        let mut outcome = BatchOutcome::new();
        for (id, result) in results {
            match result {
                Ok(value) => outcome.applied.push(value),
                Err(e) => outcome.failed.push(BatchFailure {
                    id,
                    reason: e.to_string(),
                }),
            }
        }
        outcome
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

}

impl<T> Default for BatchOutcome<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_splits_results() {
        let results = vec![
            ("1".to_string(), Ok(10)),
            ("2".to_string(), Err("store unreachable")),
            ("3".to_string(), Ok(30)),
        ];
        let outcome = BatchOutcome::collect(results);

        assert_eq!(outcome.applied, vec![10, 30]);
        assert_eq!(outcome.failed[0].id, "2");
        assert_eq!(outcome.failed[0].reason, "store unreachable");
        assert!(!outcome.is_complete());
    }

    #[test]
    fn test_empty_outcome_is_complete() {
        let outcome: BatchOutcome<u32> = BatchOutcome::default();
        assert!(outcome.is_complete());
        assert!(outcome.applied.is_empty());
    }
}
