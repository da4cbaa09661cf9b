// lesart - terminal reader for the Philosophical Investigations with
// AI-generated explanations, plus the offline generation utility.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use lesart_cli::exit_codes::EXIT_SUCCESS;
use lesart_cli::generate::{self, GenerateMode, GenerateOptions};
use lesart_cli::tui;
use lesart_cli::CliError;

use lesart_config::{Session, Settings};
use lesart_core::{Corpus, DataPaths, ExplanationMap};

#[derive(Parser)]
#[command(name = "lesart")]
#[command(about = "Read the Philosophical Investigations with AI-generated explanations")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the reader
    #[command(after_help = "\
Examples:
  lesart read
  lesart read --at 44
  lesart read --plain --at 44 | less
  lesart read --data-dir ./data")]
    Read {
        /// Proposition number to open at (default: last position)
        #[arg(long, value_name = "NUMBER")]
        at: Option<String>,

        /// Print one proposition as plain text instead of the TUI
        #[arg(long)]
        plain: bool,

        /// Data directory holding propositions.json (default: settings, then ./data)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Generate missing explanations through the model API
    #[command(after_help = "\
Examples:
  lesart generate --test
  lesart generate --test 2
  lesart generate --all
  lesart generate --all --delay 5
  LESART_API_KEY=sk-... lesart generate --all")]
    Generate {
        /// Process at most N missing propositions
        #[arg(long, value_name = "N", num_args = 0..=1, default_missing_value = "5")]
        test: Option<usize>,

        /// Process every missing proposition
        #[arg(long, conflicts_with = "test")]
        all: bool,

        /// Model API key (default: LESART_API_KEY env)
        #[arg(long)]
        api_key: Option<String>,

        /// Data directory holding propositions.json (default: settings, then ./data)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Seconds between requests (default: settings, 12)
        #[arg(long)]
        delay: Option<u64>,

        /// Model API base URL override (testing against a mock server)
        #[arg(long, hide = true)]
        base_url: Option<String>,

        /// Suppress progress on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },
}

fn cmd_read(
    at: Option<String>,
    plain: bool,
    data_dir: Option<PathBuf>,
) -> Result<(), CliError> {
    let settings = Settings::load();
    let data_dir = settings.resolve_data_dir(data_dir);
    let paths = DataPaths::new(&data_dir);

    let corpus = Corpus::load(&paths.propositions).map_err(CliError::from_data)?;
    if corpus.is_empty() {
        return Err(CliError::parse(format!(
            "{}: no propositions",
            paths.propositions.display(),
        )));
    }
    let explanations =
        ExplanationMap::load(&paths.explanations).map_err(CliError::from_data)?;

    // --at > saved session > first proposition
    let start = match at {
        Some(number) => corpus.index_of(&number).ok_or_else(|| {
            CliError::args(format!("no proposition numbered \"{}\"", number))
        })?,
        None => Session::load()
            .and_then(|s| s.last_number)
            .and_then(|n| corpus.index_of(&n))
            .unwrap_or(0),
    };

    if plain {
        return tui::print_plain(&corpus, &explanations, start).map_err(CliError::io);
    }

    let last_number = tui::run(corpus, explanations, start).map_err(CliError::io)?;
    if let Some(number) = last_number {
        let session = Session {
            version: 1,
            last_number: Some(number),
        };
        // Losing the bookmark is not worth a non-zero exit
        if let Err(e) = session.save() {
            eprintln!("warning: cannot save session: {}", e);
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_generate(
    test: Option<usize>,
    all: bool,
    api_key: Option<String>,
    data_dir: Option<PathBuf>,
    delay: Option<u64>,
    base_url: Option<String>,
    quiet: bool,
) -> Result<(), CliError> {
    let mode = match (test, all) {
        (Some(n), false) => GenerateMode::Test(n),
        (None, true) => GenerateMode::All,
        // Neither flag: print usage, touch nothing, exit 0
        (None, false) => {
            eprintln!("Usage: lesart generate --test [N] | --all");
            eprintln!("       --test [N]  process at most N missing propositions (default 5)");
            eprintln!("       --all       process every missing proposition");
            return Ok(());
        }
        // clap rejects --test --all via conflicts_with
        (Some(_), true) => unreachable!(),
    };

    generate::run(GenerateOptions {
        mode,
        api_key,
        data_dir,
        delay_secs: delay,
        base_url,
        quiet,
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: lesart <command> [options]");
            eprintln!("       lesart --help for more information");
            Ok(())
        }
        Some(Commands::Read { at, plain, data_dir }) => cmd_read(at, plain, data_dir),
        Some(Commands::Generate {
            test,
            all,
            api_key,
            data_dir,
            delay,
            base_url,
            quiet,
        }) => cmd_generate(test, all, api_key, data_dir, delay, base_url, quiet),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}
