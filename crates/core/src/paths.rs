//! File layout of a data directory. Both the reader and the generation
//! utility resolve the same four files from one root.

use std::path::{Path, PathBuf};

pub const PROPOSITIONS_FILE: &str = "propositions.json";
pub const EXPLANATIONS_FILE: &str = "explanations.json";
pub const BACKUP_FILE: &str = "explanations_backup.json";
pub const PROGRESS_FILE: &str = "progress.json";

#[derive(Debug, Clone)]
pub struct DataPaths {
    pub propositions: PathBuf,
    pub explanations: PathBuf,
    /// Pre-run copy of the explanation map, written once on fresh runs only.
    pub backup: PathBuf,
    pub progress: PathBuf,
}

impl DataPaths {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            propositions: data_dir.join(PROPOSITIONS_FILE),
            explanations: data_dir.join(EXPLANATIONS_FILE),
            backup: data_dir.join(BACKUP_FILE),
            progress: data_dir.join(PROGRESS_FILE),
        }
    }
}
