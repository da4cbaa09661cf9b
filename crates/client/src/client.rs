//! Blocking HTTP client for the text-generation API (Anthropic Messages
//! shape), with retry / backoff / error classification.
//!
//! One request per missing proposition. 429 and 5xx are retried with
//! exponential backoff (Retry-After honored for 429); auth and validation
//! failures are returned immediately. Every error is non-fatal to the batch:
//! the caller skips the key and moves on.

use std::thread;
use std::time::Duration;

use lesart_core::Explanation;

use crate::prompt;

const API_BASE: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const USER_AGENT: &str = concat!("lesart/", env!("CARGO_PKG_VERSION"));

/// Why a generation request failed. All variants are handled identically by
/// the batch loop (skip the key, checkpoint, continue); the distinction is
/// for operators reading the log.
#[derive(Debug)]
pub enum ClientError {
    /// Auth rejected by upstream (401/403).
    Auth(String),
    /// Request rejected by upstream (400).
    InvalidRequest(String),
    /// Rate limited after retries (429).
    RateLimited(String),
    /// Upstream error (other 4xx/5xx) or network failure after retries.
    Upstream(String),
    /// Reply did not contain the expected two-field JSON object.
    MalformedReply(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Auth(msg) => write!(f, "auth failed: {}", msg),
            ClientError::InvalidRequest(msg) => write!(f, "request rejected: {}", msg),
            ClientError::RateLimited(msg) => write!(f, "rate limited: {}", msg),
            ClientError::Upstream(msg) => write!(f, "upstream error: {}", msg),
            ClientError::MalformedReply(msg) => write!(f, "malformed reply: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

/// Sampling parameters sent with every request.
#[derive(Debug, Clone)]
pub struct ModelParams {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

pub struct ModelClient {
    http: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
    params: ModelParams,
}

impl ModelClient {
    pub fn new(api_key: String, params: ModelParams) -> Self {
        Self::with_base_url(api_key, params, API_BASE.to_string())
    }

    pub fn with_base_url(api_key: String, params: ModelParams, base_url: String) -> Self {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            api_key,
            base_url,
            params,
        }
    }

    /// Send `prompt` to the model and parse the reply as an [`Explanation`].
    pub fn generate(&self, prompt: &str) -> Result<Explanation, ClientError> {
        let body = serde_json::json!({
            "model": self.params.model,
            "max_tokens": self.params.max_tokens,
            "temperature": self.params.temperature,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let reply = self.request_with_retry(&body)?;

        let text = reply["content"][0]["text"].as_str().ok_or_else(|| {
            ClientError::MalformedReply("response has no text content block".to_string())
        })?;

        prompt::parse_reply(text).map_err(ClientError::MalformedReply)
    }

    /// POST the request with retry + exponential backoff, mapping HTTP
    /// status classes to [`ClientError`] variants.
    fn request_with_retry(
        &self,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, ClientError> {
        let url = format!("{}/v1/messages", self.base_url);
        let mut backoff_secs = 1u64;

        for attempt in 0..=MAX_RETRIES {
            let result = self
                .http
                .post(&url)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", API_VERSION)
                .json(body)
                .send();

            match result {
                Ok(resp) => {
                    let status = resp.status().as_u16();

                    // Auth errors: fail immediately
                    if status == 401 || status == 403 {
                        let body: serde_json::Value =
                            resp.json().unwrap_or(serde_json::Value::Null);
                        return Err(ClientError::Auth(format!(
                            "({}) {}",
                            status,
                            extract_error(&body, status),
                        )));
                    }

                    // Bad request: fail immediately
                    if status == 400 {
                        let body: serde_json::Value =
                            resp.json().unwrap_or(serde_json::Value::Null);
                        return Err(ClientError::InvalidRequest(format!(
                            "({}) {}",
                            status,
                            extract_error(&body, status),
                        )));
                    }

                    // Other 4xx (not 429): fail immediately
                    if status >= 400 && status < 500 && status != 429 {
                        let body: serde_json::Value =
                            resp.json().unwrap_or(serde_json::Value::Null);
                        return Err(ClientError::Upstream(format!(
                            "({}) {}",
                            status,
                            extract_error(&body, status),
                        )));
                    }

                    // Retryable: 429, 5xx
                    if status == 429 || status >= 500 {
                        if attempt == MAX_RETRIES {
                            let msg = format!(
                                "HTTP {} after {} attempts",
                                status, MAX_RETRIES,
                            );
                            return Err(if status == 429 {
                                ClientError::RateLimited(msg)
                            } else {
                                ClientError::Upstream(msg)
                            });
                        }

                        // Respect Retry-After header for 429
                        let wait = if status == 429 {
                            resp.headers()
                                .get("retry-after")
                                .and_then(|v| v.to_str().ok())
                                .and_then(|v| v.parse::<u64>().ok())
                                .unwrap_or(backoff_secs)
                        } else {
                            backoff_secs
                        };

                        eprintln!(
                            "warning: retry {}/{} in {}s (HTTP {})",
                            attempt + 1,
                            MAX_RETRIES,
                            wait,
                            status,
                        );
                        thread::sleep(Duration::from_secs(wait));
                        backoff_secs *= 2;
                        continue;
                    }

                    // Success: parse JSON
                    return resp.json().map_err(|e| {
                        ClientError::MalformedReply(format!(
                            "failed to parse response JSON: {}",
                            e,
                        ))
                    });
                }
                Err(e) => {
                    // Network/timeout errors: retry
                    if attempt == MAX_RETRIES {
                        return Err(ClientError::Upstream(format!(
                            "network failure after {} attempts: {}",
                            MAX_RETRIES, e,
                        )));
                    }

                    eprintln!(
                        "warning: retry {}/{} in {}s ({})",
                        attempt + 1,
                        MAX_RETRIES,
                        backoff_secs,
                        e,
                    );
                    thread::sleep(Duration::from_secs(backoff_secs));
                    backoff_secs *= 2;
                }
            }
        }

        unreachable!()
    }
}

fn extract_error(body: &serde_json::Value, status: u16) -> String {
    body["error"]["message"]
        .as_str()
        .unwrap_or(&format!("HTTP {}", status))
        .to_string()
}
