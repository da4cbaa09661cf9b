//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain    | Description                               |
//! |---------|-----------|-------------------------------------------|
//! | 0       | Universal | Success                                   |
//! | 2       | Universal | CLI usage error (bad args)                |
//! | 3-9     | Data      | Corpus/explanation/progress file codes    |
//! | 50-59   | Generate  | Model API credential codes                |
//!
//! Per-key generation failures (auth rejected, rate limited, upstream error,
//! malformed reply) are logged and skipped inside the batch; they never map
//! to an exit code.
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// I/O error - cannot read or write a data file.
pub const EXIT_IO: u8 = 3;

/// Parse error - malformed JSON in corpus, explanation map, or progress.
pub const EXIT_PARSE: u8 = 4;

/// No API key provided (neither --api-key nor LESART_API_KEY).
pub const EXIT_MISSING_KEY: u8 = 50;
