//! CSV persistence for the patient registry.
//!
//! Two files live in the configured data directory:
//!
//! ```text
//! data/
//!   patients.csv    # id,name,age,gender
//!   symptoms.csv    # patient_id,symptoms  (symptoms separated by ';')
//! ```
//!
//! Patients without symptoms have no row in `symptoms.csv`. Both files are rewritten in full
//! on every save, so the registry in memory is always the source of truth.
//!
//! Loading is lenient about data that merely refers to nothing (symptom rows for unknown
//! patients, symptom tokens outside the vocabulary): such entries are logged and skipped.
//! Structurally broken rows are an error, because silently dropping a patient would lose data
//! on the next save.

use std::fs;
use std::path::{Path, PathBuf};

use medicheck_types::{Age, NonEmptyText};
use serde::{Deserialize, Serialize};

use crate::config::CoreConfig;
use crate::constants::{PATIENTS_CSV_HEADER, SYMPTOMS_CSV_HEADER, SYMPTOM_SEPARATOR};
use crate::patient::{Patient, PatientId};
use crate::registry::PatientRegistry;
use crate::symptom::Symptom;
use crate::{PatientError, PatientResult};

// ============================================================================
// Wire rows
// ============================================================================

#[derive(Debug, Deserialize)]
struct PatientRow {
    id: u32,
    name: NonEmptyText,
    age: Age,
    gender: NonEmptyText,
}

#[derive(Debug, Serialize)]
struct PatientRowRef<'a> {
    id: PatientId,
    name: &'a str,
    age: Age,
    gender: &'a str,
}

#[derive(Debug, Deserialize)]
struct SymptomRow {
    patient_id: u32,
    #[serde(default)]
    symptoms: String,
}

#[derive(Debug, Serialize)]
struct SymptomRowRef {
    patient_id: PatientId,
    symptoms: String,
}

// ============================================================================
// Store
// ============================================================================

/// Reads and writes the registry as a pair of CSV files.
#[derive(Clone, Debug)]
pub struct CsvStore {
    data_dir: PathBuf,
    patients_path: PathBuf,
    symptoms_path: PathBuf,
}

impl CsvStore {
    pub fn new(cfg: &CoreConfig) -> Self {
        Self {
            data_dir: cfg.data_dir().to_path_buf(),
            patients_path: cfg.patients_csv(),
            symptoms_path: cfg.symptoms_csv(),
        }
    }

    /// Loads the registry from disk.
    ///
    /// Missing files are treated as empty. The registry's identifier counter ends up one past
    /// the highest identifier found.
    ///
    /// # Errors
    ///
    /// Returns `PatientError` if:
    /// - a file exists but cannot be read ([`PatientError::CsvRead`]),
    /// - a row has the wrong number of columns or an invalid value
    ///   ([`PatientError::MalformedRecord`]),
    /// - a patient identifier appears twice ([`PatientError::DuplicatePatientId`]).
    pub fn load(&self) -> PatientResult<PatientRegistry> {
        let mut registry = PatientRegistry::new();

        for (line, row) in read_rows::<PatientRow>(&self.patients_path, &PATIENTS_CSV_HEADER)? {
            let id = PatientId::new(row.id).ok_or_else(|| PatientError::MalformedRecord {
                path: self.patients_path.clone(),
                line,
                reason: "patient ID must be positive".into(),
            })?;

            registry
                .insert_loaded(Patient::new(id, row.name, row.age, row.gender))
                .map_err(|_| PatientError::DuplicatePatientId {
                    id,
                    path: self.patients_path.clone(),
                })?;
        }

        for (line, row) in read_rows::<SymptomRow>(&self.symptoms_path, &SYMPTOMS_CSV_HEADER)? {
            let Some(patient) = PatientId::new(row.patient_id).and_then(|id| registry.get_mut(id))
            else {
                tracing::warn!(
                    "skipping symptoms for unknown patient {} ({}:{})",
                    row.patient_id,
                    self.symptoms_path.display(),
                    line
                );
                continue;
            };

            for token in row.symptoms.split(SYMPTOM_SEPARATOR) {
                if token.trim().is_empty() {
                    continue;
                }
                match token.parse::<Symptom>() {
                    Ok(symptom) => {
                        patient.add_symptom(symptom);
                    }
                    Err(e) => tracing::warn!(
                        "skipping symptom for patient {}: {} ({}:{})",
                        patient.id(),
                        e,
                        self.symptoms_path.display(),
                        line
                    ),
                }
            }
        }

        tracing::info!(
            patients = registry.len(),
            dir = %self.data_dir.display(),
            "loaded patient records"
        );

        Ok(registry)
    }

    /// Writes the whole registry back to disk, creating the data directory if needed.
    pub fn save(&self, registry: &PatientRegistry) -> PatientResult<()> {
        fs::create_dir_all(&self.data_dir).map_err(PatientError::StorageDirCreation)?;

        let patient_rows = registry.iter().map(|p| PatientRowRef {
            id: p.id(),
            name: p.name.as_str(),
            age: p.age,
            gender: p.gender.as_str(),
        });
        write_rows(&self.patients_path, &PATIENTS_CSV_HEADER, patient_rows)?;

        let separator = SYMPTOM_SEPARATOR.to_string();
        let symptom_rows = registry
            .iter()
            .filter(|p| !p.symptoms().is_empty())
            .map(|p| SymptomRowRef {
                patient_id: p.id(),
                symptoms: p
                    .symptoms()
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(&separator),
            });
        write_rows(&self.symptoms_path, &SYMPTOMS_CSV_HEADER, symptom_rows)?;

        tracing::debug!(patients = registry.len(), "saved patient records");
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Reads every data row of `path` together with its 1-based line number.
///
/// A first row equal to `header` is skipped; files written by hand without a header are
/// accepted too.
fn read_rows<T>(path: &Path, header: &[&str]) -> PatientResult<Vec<(u64, T)>>
where
    T: serde::de::DeserializeOwned,
{
    if !path.is_file() {
        return Ok(Vec::new());
    }

    let read_err = |source| PatientError::CsvRead {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(read_err)?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(read_err)?;
        let line = record.position().map_or(0, |p| p.line());

        if index == 0 && is_header(&record, header) {
            continue;
        }

        if record.len() != header.len() {
            return Err(PatientError::MalformedRecord {
                path: path.to_path_buf(),
                line,
                reason: format!(
                    "expected {} columns, found {}",
                    header.len(),
                    record.len()
                ),
            });
        }

        let row = record
            .deserialize::<T>(None)
            .map_err(|e| PatientError::MalformedRecord {
                path: path.to_path_buf(),
                line,
                reason: e.to_string(),
            })?;
        rows.push((line, row));
    }

    Ok(rows)
}

fn is_header(record: &csv::StringRecord, header: &[&str]) -> bool {
    record.len() == header.len()
        && record
            .iter()
            .zip(header)
            .all(|(field, expected)| field.eq_ignore_ascii_case(expected))
}

fn write_rows<I, T>(path: &Path, header: &[&str], rows: I) -> PatientResult<()>
where
    I: IntoIterator<Item = T>,
    T: Serialize,
{
    let write_err = |source| PatientError::CsvWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(write_err)?;

    writer.write_record(header).map_err(write_err)?;
    for row in rows {
        writer.serialize(row).map_err(write_err)?;
    }

    writer.flush().map_err(|source| PatientError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}
