//! Generation progress: which proposition numbers have been durably written
//! in the current or a prior run. The file exists purely so an interrupted
//! batch resumes from the last persisted state.

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::explanation::ExplanationMap;
use crate::DataError;

/// Proposition numbers the generation utility scans for missing explanations.
pub const GENERATION_RANGE: RangeInclusive<u32> = 1..=140;

/// Append-only log of completed keys plus the time of the last checkpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    pub completed: Vec<String>,
    /// RFC 3339 timestamp of the last save.
    pub timestamp: String,
}

impl Progress {
    /// Load progress from disk. An absent file means a fresh run.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|e| {
            DataError::Io(format!("failed to open {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            DataError::Parse(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), DataError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    DataError::Io(format!(
                        "failed to create {}: {}",
                        parent.display(),
                        e,
                    ))
                })?;
            }
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| DataError::Parse(format!("serialize error: {}", e)))?;
        fs::write(path, json).map_err(|e| {
            DataError::Io(format!("failed to write {}: {}", path.display(), e))
        })
    }

    /// True when no prior run has completed anything; a fresh run writes the
    /// backup file, a resumed run does not.
    pub fn is_fresh(&self) -> bool {
        self.completed.is_empty()
    }

    /// Record a durably written key and refresh the timestamp.
    pub fn mark(&mut self, number: &str) {
        if !self.completed.iter().any(|c| c == number) {
            self.completed.push(number.to_string());
        }
        self.touch();
    }

    /// Refresh the timestamp without adding a key (failed-key checkpoints).
    pub fn touch(&mut self) {
        self.timestamp = chrono::Utc::now().to_rfc3339();
    }
}

/// Numbers in [`GENERATION_RANGE`] with no explanation and no completion
/// record, in ascending numeric order.
pub fn missing_numbers(explanations: &ExplanationMap, completed: &[String]) -> Vec<String> {
    GENERATION_RANGE
        .map(|n| n.to_string())
        .filter(|n| !explanations.contains(n) && !completed.iter().any(|c| c == n))
        .collect()
}
