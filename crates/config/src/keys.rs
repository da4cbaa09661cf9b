// API key resolution
//
// The key is taken from the --api-key flag or the LESART_API_KEY environment
// variable, in that order. Keys are NEVER stored in settings.json.

use std::env;

/// Environment variable consulted when no --api-key flag is given.
pub const API_KEY_ENV: &str = "LESART_API_KEY";

/// Resolve the model API key: flag value > environment variable > error.
/// A missing key is fatal before any request is made.
pub fn resolve_api_key(flag: Option<String>) -> Result<String, String> {
    if let Some(key) = flag {
        let trimmed = key.trim().to_string();
        if trimmed.is_empty() {
            return Err(missing_key_message());
        }
        return Ok(trimmed);
    }

    if let Ok(key) = env::var(API_KEY_ENV) {
        let trimmed = key.trim().to_string();
        if !trimmed.is_empty() {
            return Ok(trimmed);
        }
    }

    Err(missing_key_message())
}

fn missing_key_message() -> String {
    format!("missing model API key (use --api-key or set {})", API_KEY_ENV)
}
