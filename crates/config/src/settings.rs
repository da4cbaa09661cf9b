// Application settings
// Loaded from ~/.config/lesart/settings.json

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Seconds between consecutive model requests, tuned to the upstream rate
/// limit. Skipped after the last item of a batch.
pub const DEFAULT_REQUEST_DELAY_SECS: u64 = 12;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Model identifier sent with every generation request.
    pub model: String,

    /// Token budget per generation request.
    pub max_tokens: u32,

    /// Sampling temperature for generation requests.
    pub temperature: f32,

    /// Seconds to wait between consecutive generation requests.
    pub request_delay_secs: u64,

    /// Data directory holding propositions.json and friends.
    /// Overridden by the --data-dir flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 2000,
            temperature: 0.7,
            request_delay_secs: DEFAULT_REQUEST_DELAY_SECS,
            data_dir: None,
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lesart")
            .join("settings.json")
    }

    /// Load settings, falling back to defaults when the file is absent or
    /// malformed (a broken settings file should never make the tool unusable).
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &std::path::Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    eprintln!("warning: ignoring malformed {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("warning: cannot read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Effective data directory: flag > settings > ./data.
    pub fn resolve_data_dir(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.data_dir.clone())
            .unwrap_or_else(|| PathBuf::from("data"))
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_secs(self.request_delay_secs)
    }
}
