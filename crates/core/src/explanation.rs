//! The explanation map: proposition number → generated gloss, persisted as a
//! JSON object in `explanations.json`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::DataError;

/// A brief and a comprehensive free-text gloss on a proposition.
/// `comprehensive` is markdown-formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub brief: String,
    pub comprehensive: String,
}

/// Number-keyed explanation mapping. No ordering guarantee in memory;
/// [`save`](ExplanationMap::save) writes keys in numeric order so rewrites
/// produce reviewable diffs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExplanationMap {
    entries: HashMap<String, Explanation>,
}

impl ExplanationMap {
    /// Load the map from a JSON object file. An absent file is an empty map;
    /// the generation utility starts from nothing on a brand-new corpus.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|e| {
            DataError::Io(format!("failed to open {}: {}", path.display(), e))
        })?;
        let entries: HashMap<String, Explanation> =
            serde_json::from_str(&contents).map_err(|e| {
                DataError::Parse(format!(
                    "failed to parse {}: {}",
                    path.display(),
                    e,
                ))
            })?;
        Ok(Self { entries })
    }

    /// Write the map as pretty-printed JSON, keys in numeric order
    /// (non-numeric keys sort after, lexicographically).
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

        let mut keys: Vec<&String> = self.entries.keys().collect();
        keys.sort_by(|a, b| match (a.parse::<u32>(), b.parse::<u32>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => a.cmp(b),
        });

        let mut object = serde_json::Map::new();
        for key in keys {
            let value = serde_json::to_value(&self.entries[key])
                .map_err(|e| DataError::Parse(format!("serialize error: {}", e)))?;
            object.insert(key.clone(), value);
        }

        let json = serde_json::to_string_pretty(&serde_json::Value::Object(object))
            .map_err(|e| DataError::Parse(format!("serialize error: {}", e)))?;
        fs::write(path, json).map_err(|e| {
            DataError::Io(format!("failed to write {}: {}", path.display(), e))
        })
    }

    pub fn get(&self, number: &str) -> Option<&Explanation> {
        self.entries.get(number)
    }

    pub fn contains(&self, number: &str) -> bool {
        self.entries.contains_key(number)
    }

    pub fn insert(&mut self, number: String, explanation: Explanation) {
        self.entries.insert(number, explanation);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
