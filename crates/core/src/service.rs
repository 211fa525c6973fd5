//! Patient management backed by CSV storage.
//!
//! [`PatientService`] is the single entry point front-ends use. It keeps the registry in
//! memory and rewrites the CSV files after every successful mutation, so a crash never loses
//! more than the operation in flight.
//!
//! ## Pure Data Operations
//!
//! Nothing here prints or prompts. Rendering and user interaction belong in the binaries.

use medicheck_types::{Age, NonEmptyText};

use crate::config::CoreConfig;
use crate::diagnosis::predict_for;
use crate::error::{PatientError, PatientResult};
use crate::patient::{Patient, PatientId, PatientUpdate};
use crate::registry::PatientRegistry;
use crate::report::DiagnosisReport;
use crate::storage::CsvStore;
use crate::symptom::Symptom;

// ============================================================================
// RESULT TYPES
// ============================================================================

/// Outcome of [`PatientService::add_symptoms`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymptomsAdded {
    /// Symptoms that were newly recorded, in request order.
    pub added: Vec<Symptom>,
    /// Symptoms that the patient already had.
    pub already_present: Vec<Symptom>,
}

// ============================================================================
// PATIENT SERVICE
// ============================================================================

/// Service for patient records, their symptoms and diagnosis.
#[derive(Debug)]
pub struct PatientService {
    store: CsvStore,
    registry: PatientRegistry,
}

impl PatientService {
    /// Opens the service, loading any existing records from the configured data directory.
    ///
    /// # Arguments
    ///
    /// * `cfg` - Core configuration naming the data directory
    ///
    /// # Errors
    ///
    /// Returns `PatientError` if existing CSV files cannot be read or contain malformed rows.
    pub fn open(cfg: &CoreConfig) -> PatientResult<Self> {
        let store = CsvStore::new(cfg);
        let registry = store.load()?;
        Ok(Self { store, registry })
    }

    /// Registers a new patient and persists the registry.
    ///
    /// # Returns
    ///
    /// The identifier assigned to the new patient.
    ///
    /// # Errors
    ///
    /// Returns `PatientError` if no identifier is left or the CSV files cannot be written. On
    /// error the patient is not registered and the identifier stays free.
    pub fn register_patient(
        &mut self,
        name: NonEmptyText,
        age: Age,
        gender: NonEmptyText,
    ) -> PatientResult<PatientId> {
        let id = self.commit(|registry| Ok(registry.add(name, age, gender)?.id()))?;
        tracing::info!(patient = %id, "registered patient");
        Ok(id)
    }

    /// Patients in registration order.
    pub fn list_patients(&self) -> impl Iterator<Item = &Patient> {
        self.registry.iter()
    }

    pub fn patient_count(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn find_patient(&self, id: PatientId) -> PatientResult<&Patient> {
        self.registry.get(id).ok_or(PatientError::PatientNotFound(id))
    }

    /// Applies one or more field updates to a patient and persists them with a single save.
    ///
    /// # Errors
    ///
    /// Returns `PatientError` if:
    /// - no update is given ([`PatientError::InvalidInput`]),
    /// - the patient does not exist ([`PatientError::PatientNotFound`]),
    /// - the CSV files cannot be written, in which case none of the updates are kept.
    pub fn update_patient(
        &mut self,
        id: PatientId,
        updates: impl IntoIterator<Item = PatientUpdate>,
    ) -> PatientResult<()> {
        let updates: Vec<PatientUpdate> = updates.into_iter().collect();
        if updates.is_empty() {
            return Err(PatientError::InvalidInput(
                "no patient fields to update".into(),
            ));
        }

        let fields = updates.len();
        self.commit(|registry| {
            let patient = patient_in(registry, id)?;
            for update in updates {
                update.apply(patient);
            }
            Ok(())
        })?;
        tracing::info!(patient = %id, fields, "updated patient");
        Ok(())
    }

    /// Removes a patient and their symptoms, returning the removed record.
    ///
    /// The identifier is not handed out again.
    pub fn delete_patient(&mut self, id: PatientId) -> PatientResult<Patient> {
        let removed = self.commit(|registry| {
            registry
                .remove(id)
                .ok_or(PatientError::PatientNotFound(id))
        })?;
        tracing::info!(patient = %id, "deleted patient");
        Ok(removed)
    }

    /// Records symptoms against a patient, skipping ones already recorded.
    ///
    /// Storage is only rewritten when at least one symptom is new.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::PatientNotFound`] for an unknown identifier, or a storage error if
    /// the CSV files cannot be written. On error no symptom is recorded.
    pub fn add_symptoms(
        &mut self,
        id: PatientId,
        symptoms: &[Symptom],
    ) -> PatientResult<SymptomsAdded> {
        let mut recorded = self.find_patient(id)?.symptoms().to_vec();

        let mut outcome = SymptomsAdded::default();
        for &symptom in symptoms {
            if recorded.contains(&symptom) {
                outcome.already_present.push(symptom);
            } else {
                recorded.push(symptom);
                outcome.added.push(symptom);
            }
        }

        if !outcome.added.is_empty() {
            self.commit(|registry| {
                let patient = patient_in(registry, id)?;
                for &symptom in &outcome.added {
                    patient.add_symptom(symptom);
                }
                Ok(())
            })?;
            tracing::info!(patient = %id, added = outcome.added.len(), "recorded symptoms");
        }
        Ok(outcome)
    }

    pub fn clear_symptoms(&mut self, id: PatientId) -> PatientResult<()> {
        self.commit(|registry| {
            patient_in(registry, id)?.clear_symptoms();
            Ok(())
        })?;
        tracing::info!(patient = %id, "cleared symptoms");
        Ok(())
    }

    /// Runs the diagnosis engine over a patient's recorded symptoms.
    ///
    /// # Errors
    ///
    /// Returns `PatientError` if:
    /// - the patient does not exist ([`PatientError::PatientNotFound`]),
    /// - the patient has no recorded symptoms ([`PatientError::NoSymptomsRecorded`]).
    pub fn diagnose(&self, id: PatientId) -> PatientResult<DiagnosisReport> {
        let patient = self.find_patient(id)?;
        if patient.symptoms().is_empty() {
            return Err(PatientError::NoSymptomsRecorded(id));
        }

        let conditions = predict_for(patient.symptoms());
        tracing::debug!(patient = %id, conditions = conditions.len(), "diagnosed patient");
        Ok(DiagnosisReport::new(patient, conditions))
    }

    /// Applies `change` to a copy of the registry and keeps the copy only once it is saved.
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut PatientRegistry) -> PatientResult<T>,
    ) -> PatientResult<T> {
        let mut staged = self.registry.clone();
        let value = change(&mut staged)?;
        self.store.save(&staged)?;
        self.registry = staged;
        Ok(value)
    }
}

fn patient_in(registry: &mut PatientRegistry, id: PatientId) -> PatientResult<&mut Patient> {
    registry
        .get_mut(id)
        .ok_or(PatientError::PatientNotFound(id))
}
