// Core data model: the proposition corpus, the explanation map, generation
// progress, and the reader state machine. No I/O beyond the JSON data files.

pub mod corpus;
pub mod explanation;
pub mod paths;
pub mod progress;
pub mod reader;

pub use corpus::{Corpus, Proposition};
pub use explanation::{Explanation, ExplanationMap};
pub use paths::DataPaths;
pub use progress::Progress;
pub use reader::ReaderState;

/// Error from loading or persisting one of the JSON data files.
///
/// I/O and parse failures map to distinct CLI exit codes, so the
/// distinction is kept here instead of collapsing to a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    /// Cannot read or write the file.
    Io(String),
    /// File contents are not the expected JSON shape.
    Parse(String),
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::Io(msg) => write!(f, "{}", msg),
            DataError::Parse(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for DataError {}
