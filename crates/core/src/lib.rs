//! # MediCheck Core
//!
//! Core business logic for the MediCheck symptom advisory tool.
//!
//! This crate contains pure data operations:
//! - The rule-based diagnosis engine ([`predict`])
//! - Patient records and their recorded symptoms
//! - CSV persistence under the configured data directory
//!
//! **No UI concerns**: menus, prompts and argument parsing belong in the `medicheck-run`
//! console and the `medicheck` CLI.

pub mod config;
pub mod constants;
pub mod diagnosis;
pub mod error;
pub mod patient;
pub mod registry;
pub mod report;
pub mod service;
pub mod storage;
pub mod symptom;

pub use config::{data_dir_from_env_value, CoreConfig};
pub use diagnosis::{predict, predict_for, Condition};
pub use error::{PatientError, PatientResult};
pub use patient::{Patient, PatientId, PatientUpdate};
pub use registry::PatientRegistry;
pub use report::{
    render_conditions, render_patient_details, render_patient_summary, DiagnosisReport,
};
pub use service::{PatientService, SymptomsAdded};
pub use storage::CsvStore;
pub use symptom::Symptom;

pub use medicheck_types::{Age, AgeError, NonEmptyText, TextError};
