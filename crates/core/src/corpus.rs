//! The proposition corpus: an ordered list of numbered passages loaded
//! wholesale from `propositions.json`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::DataError;

/// One numbered passage of the source text, the corpus's atomic unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposition {
    /// Stable identifier, also the display order key ("1" through "140").
    pub number: String,
    /// The source passage.
    pub text: String,
    /// Section the passage belongs to.
    #[serde(default)]
    pub section: String,
}

/// The full proposition list, in file order.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    propositions: Vec<Proposition>,
}

impl Corpus {
    pub fn new(propositions: Vec<Proposition>) -> Self {
        Self { propositions }
    }

    /// Load the corpus from a JSON array file.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            DataError::Io(format!("failed to open {}: {}", path.display(), e))
        })?;
        let propositions: Vec<Proposition> =
            serde_json::from_str(&contents).map_err(|e| {
                DataError::Parse(format!(
                    "failed to parse {}: {}",
                    path.display(),
                    e,
                ))
            })?;
        Ok(Self { propositions })
    }

    pub fn len(&self) -> usize {
        self.propositions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.propositions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Proposition> {
        self.propositions.get(index)
    }

    pub fn propositions(&self) -> &[Proposition] {
        &self.propositions
    }

    /// Index of the proposition with the given number, if present.
    pub fn index_of(&self, number: &str) -> Option<usize> {
        self.propositions.iter().position(|p| p.number == number)
    }

    /// The propositions immediately before and after `index`.
    pub fn neighbors(
        &self,
        index: usize,
    ) -> (Option<&Proposition>, Option<&Proposition>) {
        let prev = if index > 0 {
            self.propositions.get(index - 1)
        } else {
            None
        };
        let next = self.propositions.get(index + 1);
        (prev, next)
    }
}
