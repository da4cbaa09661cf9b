// Reading session: the last viewed proposition, persisted across runs so a
// reopened reader (or a shared command line with --at) lands on the same
// passage. The deep-link counterpart of the original web app's query
// parameter.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Session {
    pub version: u32,
    /// Number of the proposition on screen when the reader last exited.
    pub last_number: Option<String>,
}

impl Session {
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lesart")
            .join("session.json")
    }

    pub fn load() -> Option<Self> {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Option<Self> {
        fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
    }

    pub fn save(&self) -> Result<(), String> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let session = Session {
            version: 1,
            last_number: Some("44".to_string()),
        };
        session.save_to(&path).unwrap();

        let loaded = Session::load_from(&path).unwrap();
        assert_eq!(loaded.last_number.as_deref(), Some("44"));
    }

    #[test]
    fn absent_or_malformed_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Session::load_from(&dir.path().join("missing.json")).is_none());

        let path = dir.path().join("bad.json");
        fs::write(&path, "{oops").unwrap();
        assert!(Session::load_from(&path).is_none());
    }
}
