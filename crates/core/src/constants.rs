//! Constants used throughout the MediCheck core crate.
//!
//! File names, CSV headers and user-facing fixed text live here so the storage layer and the
//! front-ends agree on them.

/// Default directory for patient data when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "MEDICHECK_DATA_DIR";

/// Filename for the patient table.
pub const PATIENTS_CSV_FILENAME: &str = "patients.csv";

/// Filename for the per-patient symptom table.
pub const SYMPTOMS_CSV_FILENAME: &str = "symptoms.csv";

/// Header row of `patients.csv`.
pub const PATIENTS_CSV_HEADER: [&str; 4] = ["id", "name", "age", "gender"];

/// Header row of `symptoms.csv`.
pub const SYMPTOMS_CSV_HEADER: [&str; 2] = ["patient_id", "symptoms"];

/// Separator between symptom tokens inside the `symptoms` column.
pub const SYMPTOM_SEPARATOR: char = ';';

/// Shown whenever candidate conditions are reported.
pub const DISCLAIMER: &str =
    "Note: This is for informational purposes only. Please consult a healthcare professional.";
