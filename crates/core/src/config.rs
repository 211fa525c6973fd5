//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services, so
//! nothing below the binaries reads process-wide environment variables while handling a
//! command.

use crate::constants::{DEFAULT_DATA_DIR, PATIENTS_CSV_FILENAME, SYMPTOMS_CSV_FILENAME};
use crate::{PatientError, PatientResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoreConfig {
    data_dir: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The directory does not need to exist yet; it is created on first save.
    pub fn new(data_dir: PathBuf) -> PatientResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(PatientError::InvalidInput(
                "data directory cannot be empty".into(),
            ));
        }

        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn patients_csv(&self) -> PathBuf {
        self.data_dir.join(PATIENTS_CSV_FILENAME)
    }

    pub fn symptoms_csv(&self) -> PathBuf {
        self.data_dir.join(SYMPTOMS_CSV_FILENAME)
    }
}

/// Resolve the data directory from an explicit override and an optional environment value.
///
/// The override (for example a `--data-dir` flag) wins; an empty or whitespace-only
/// environment value is treated as unset. Falls back to [`DEFAULT_DATA_DIR`].
pub fn data_dir_from_env_value(
    override_dir: Option<PathBuf>,
    env_value: Option<String>,
) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir;
    }

    env_value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}
