use std::path::PathBuf;

use crate::patient::PatientId;

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid text: {0}")]
    InvalidText(#[from] medicheck_types::TextError),
    #[error("invalid age: {0}")]
    InvalidAge(#[from] medicheck_types::AgeError),
    #[error("unknown symptom: '{0}'")]
    UnknownSymptom(String),
    #[error("invalid symptom number: {0}")]
    InvalidSymptomNumber(usize),

    #[error("patient with ID {0} not found")]
    PatientNotFound(PatientId),
    #[error("no symptoms recorded for patient {0}")]
    NoSymptomsRecorded(PatientId),
    #[error("no patient IDs left to assign")]
    IdentifierSpaceExhausted,
    #[error("patient ID {id} appears more than once in {path}", path = path.display())]
    DuplicatePatientId { id: PatientId, path: PathBuf },

    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to read {path}: {source}", path = path.display())]
    CsvRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("failed to write {path}: {source}", path = path.display())]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("failed to flush {path}: {source}", path = path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid record in {path} (line {line}): {reason}", path = path.display())]
    MalformedRecord {
        path: PathBuf,
        line: u64,
        reason: String,
    },
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;
