// Model API client: builds the per-proposition prompt, sends it to the
// text-generation API, and digs the two-field explanation out of the reply.

pub mod client;
pub mod prompt;

pub use client::{ClientError, ModelClient, ModelParams};
pub use prompt::{build_prompt, context_for, example_block, PromptContext};
