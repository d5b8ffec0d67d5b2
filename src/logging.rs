//! JSON line-delimited training logs.
//!
//! One serialized record per line, appended, so long runs can be tailed and
//! parsed incrementally.

use std::fmt::{self, Display};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// One logged training iteration.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TrainingRecord {
    pub iteration: u64,
    pub original_cost: f32,
    pub modified_cost: f32,
    /// Whether the perturbation was kept.
    pub applied: bool,
}

/// Append-only JSONL writer for training records.
#[derive(Debug, Clone)]
pub struct TrainingLog {
    path: PathBuf,
}

impl TrainingLog {
    /// Creates a logger appending to `path`. The file is created on the
    /// first append.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Appends one record as a single JSON line.
    pub fn append(&self, record: &TrainingRecord) -> Result<(), LogError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_string(record)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}

#[derive(Debug)]
pub enum LogError {
    Io(std::io::Error),
    Serialize(serde_json::Error),
}

impl Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogError::Io(err) => write!(f, "IO error: {}", err),
            LogError::Serialize(err) => write!(f, "Serialize error: {}", err),
        }
    }
}

impl std::error::Error for LogError {}

impl From<std::io::Error> for LogError {
    fn from(value: std::io::Error) -> Self {
        LogError::Io(value)
    }
}

impl From<serde_json::Error> for LogError {
    fn from(value: serde_json::Error) -> Self {
        LogError::Serialize(value)
    }
}
