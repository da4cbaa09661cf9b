//! `lesart generate` — backfill missing explanations through the model API.
//!
//! The batch is strictly sequential: one request in flight, both data files
//! rewritten after every success, progress checkpointed after every failure.
//! A killed run resumes from the last durably written state.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use lesart_client::{prompt, ModelClient, ModelParams};
use lesart_config::{keys, Settings};
use lesart_core::{progress, Corpus, DataPaths, Explanation, ExplanationMap, Progress};

use crate::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateMode {
    /// Process at most N missing propositions.
    Test(usize),
    /// Process every missing proposition.
    All,
}

pub struct GenerateOptions {
    pub mode: GenerateMode,
    pub api_key: Option<String>,
    pub data_dir: Option<PathBuf>,
    /// Seconds between requests; None = settings value.
    pub delay_secs: Option<u64>,
    /// Model API base URL override, for tests.
    pub base_url: Option<String>,
    pub quiet: bool,
}

pub fn run(opts: GenerateOptions) -> Result<(), CliError> {
    let settings = Settings::load();

    // A missing credential is fatal before any request or file write.
    let api_key = keys::resolve_api_key(opts.api_key).map_err(CliError::missing_key)?;

    let data_dir = settings.resolve_data_dir(opts.data_dir);
    let paths = DataPaths::new(&data_dir);

    let corpus = Corpus::load(&paths.propositions).map_err(CliError::from_data)?;
    let mut explanations =
        ExplanationMap::load(&paths.explanations).map_err(CliError::from_data)?;
    let mut progress = Progress::load(&paths.progress).map_err(CliError::from_data)?;

    let missing = progress::missing_numbers(&explanations, &progress.completed);
    let batch: Vec<String> = match opts.mode {
        GenerateMode::Test(n) => missing.iter().take(n).cloned().collect(),
        GenerateMode::All => missing.clone(),
    };

    let stderr_tty = atty::is(atty::Stream::Stderr);
    let show_progress = !opts.quiet && stderr_tty;

    if !opts.quiet {
        eprintln!(
            "{} missing explanation(s), processing {}",
            missing.len(),
            batch.len(),
        );
    }
    if batch.is_empty() {
        return Ok(());
    }

    // Fresh runs snapshot the pre-run map; resumed runs keep the snapshot
    // from the run they continue.
    if progress.is_fresh() {
        explanations.save(&paths.backup).map_err(CliError::from_data)?;
    }

    let params = ModelParams {
        model: settings.model.clone(),
        max_tokens: settings.max_tokens,
        temperature: settings.temperature,
    };
    let client = match opts.base_url {
        Some(base) => ModelClient::with_base_url(api_key, params, base),
        None => ModelClient::new(api_key, params),
    };

    let delay = opts
        .delay_secs
        .map(Duration::from_secs)
        .unwrap_or_else(|| settings.request_delay());
    let total = batch.len();
    let mut generated = 0usize;
    let mut failed = 0usize;

    for (i, number) in batch.iter().enumerate() {
        if show_progress {
            eprintln!("[{}/{}] proposition {}", i + 1, total, number);
        }

        match generate_one(&client, number, &corpus, &explanations) {
            Ok(explanation) => {
                explanations.insert(number.clone(), explanation);
                progress.mark(number);
                generated += 1;
                // Checkpoint both files before the next request
                explanations
                    .save(&paths.explanations)
                    .map_err(CliError::from_data)?;
                progress.save(&paths.progress).map_err(CliError::from_data)?;
            }
            Err(msg) => {
                // Per-key failures never abort the batch and never mark the
                // key completed, so the next run recomputes it as missing.
                eprintln!("warning: proposition {}: {}", number, msg);
                failed += 1;
                progress.touch();
                progress.save(&paths.progress).map_err(CliError::from_data)?;
            }
        }

        // Pace requests; nothing to wait for after the last one
        if i + 1 < total && !delay.is_zero() {
            thread::sleep(delay);
        }
    }

    if !opts.quiet {
        let still_missing = progress::missing_numbers(&explanations, &progress.completed);
        eprintln!(
            "done: {} generated, {} failed, {} still missing",
            generated,
            failed,
            still_missing.len(),
        );
    }

    Ok(())
}

fn generate_one(
    client: &ModelClient,
    number: &str,
    corpus: &Corpus,
    explanations: &ExplanationMap,
) -> Result<Explanation, String> {
    let context = prompt::context_for(number, corpus, explanations)
        .ok_or_else(|| "not in the proposition list".to_string())?;
    let examples = prompt::example_block(explanations);
    let request = prompt::build_prompt(&context, &examples);
    client.generate(&request).map_err(|e| e.to_string())
}
