//! In-memory patient registry.
//!
//! The registry owns both the patients and the counter that hands out their identifiers, so
//! identifiers are scoped to one registry rather than to the process.

use medicheck_types::{Age, NonEmptyText};

use crate::patient::{Patient, PatientId};
use crate::{PatientError, PatientResult};

#[derive(Clone, Debug)]
pub struct PatientRegistry {
    patients: Vec<Patient>,
    /// `None` once every identifier up to `u32::MAX` has been handed out.
    next_id: Option<PatientId>,
}

impl Default for PatientRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PatientRegistry {
    pub fn new() -> Self {
        Self {
            patients: Vec::new(),
            next_id: Some(PatientId::FIRST),
        }
    }

    /// Registers a new patient under the next free identifier.
    ///
    /// Identifiers only ever increase, so an identifier freed by [`remove`](Self::remove) is
    /// not handed out again.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::IdentifierSpaceExhausted`] once the highest identifier is taken.
    pub fn add(
        &mut self,
        name: NonEmptyText,
        age: Age,
        gender: NonEmptyText,
    ) -> PatientResult<&Patient> {
        let id = self.next_id.ok_or(PatientError::IdentifierSpaceExhausted)?;
        self.next_id = id.next();
        self.patients.push(Patient::new(id, name, age, gender));
        Ok(&self.patients[self.patients.len() - 1])
    }

    /// Inserts a patient read back from storage, keeping its identifier.
    ///
    /// The counter is moved past the inserted identifier.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::InvalidInput`] if the identifier is already registered.
    pub fn insert_loaded(&mut self, patient: Patient) -> PatientResult<()> {
        if self.get(patient.id()).is_some() {
            return Err(PatientError::InvalidInput(format!(
                "patient ID {} is already registered",
                patient.id()
            )));
        }
        if let Some(next) = self.next_id {
            if patient.id() >= next {
                self.next_id = patient.id().next();
            }
        }
        self.patients.push(patient);
        Ok(())
    }

    pub fn get(&self, id: PatientId) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id() == id)
    }

    pub fn get_mut(&mut self, id: PatientId) -> Option<&mut Patient> {
        self.patients.iter_mut().find(|p| p.id() == id)
    }

    pub fn remove(&mut self, id: PatientId) -> Option<Patient> {
        let index = self.patients.iter().position(|p| p.id() == id)?;
        Some(self.patients.remove(index))
    }

    /// Patients in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Patient> {
        self.patients.iter()
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    /// The identifier the next call to [`add`](Self::add) will use, if any is left.
    pub fn next_id(&self) -> Option<PatientId> {
        self.next_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> NonEmptyText {
        NonEmptyText::new(s).unwrap()
    }

    fn age(years: u32) -> Age {
        Age::new(years).unwrap()
    }

    #[test]
    fn identifiers_start_at_one_and_increase() {
        let mut registry = PatientRegistry::new();
        let first = registry.add(text("John Doe"), age(30), text("M")).unwrap().id();
        let second = registry.add(text("Jane Smith"), age(25), text("F")).unwrap().id();
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 2);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn removed_identifiers_are_not_reused() {
        let mut registry = PatientRegistry::new();
        registry.add(text("John Doe"), age(30), text("M")).unwrap();
        let jane = registry.add(text("Jane Smith"), age(25), text("F")).unwrap().id();

        let removed = registry.remove(jane).expect("Jane should be registered");
        assert_eq!(removed.name.as_str(), "Jane Smith");
        assert!(registry.get(jane).is_none());

        let bob = registry.add(text("Bob Johnson"), age(45), text("M")).unwrap().id();
        assert_eq!(bob.get(), 3);
    }

    #[test]
    fn remove_unknown_identifier_returns_none() {
        let mut registry = PatientRegistry::new();
        assert!(registry.remove(PatientId::new(999).unwrap()).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn insert_loaded_advances_counter_past_highest_id() {
        let mut registry = PatientRegistry::new();
        let seven = PatientId::new(7).unwrap();
        registry
            .insert_loaded(Patient::new(seven, text("Ann"), age(70), text("F")))
            .unwrap();
        registry
            .insert_loaded(Patient::new(
                PatientId::new(3).unwrap(),
                text("Ben"),
                age(12),
                text("M"),
            ))
            .unwrap();

        assert_eq!(registry.next_id(), PatientId::new(8));
        let err = registry
            .insert_loaded(Patient::new(seven, text("Dup"), age(1), text("F")))
            .expect_err("duplicate id should be rejected");
        assert!(matches!(err, PatientError::InvalidInput(_)));
    }

    #[test]
    fn iteration_follows_registration_order() {
        let mut registry = PatientRegistry::new();
        registry.add(text("B"), age(1), text("F")).unwrap();
        registry.add(text("A"), age(2), text("M")).unwrap();
        let names: Vec<&str> = registry.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
    }

    #[test]
    fn add_fails_once_the_highest_identifier_is_taken() {
        let mut registry = PatientRegistry::new();
        let last = PatientId::new(u32::MAX).unwrap();
        registry
            .insert_loaded(Patient::new(last, text("Ann"), age(70), text("F")))
            .unwrap();
        assert_eq!(registry.next_id(), None);

        let err = registry
            .add(text("Ben"), age(12), text("M"))
            .expect_err("no identifiers left");
        assert!(matches!(err, PatientError::IdentifierSpaceExhausted));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(last).unwrap().name.as_str(), "Ann");

        // Lower identifiers loaded afterwards must not revive the counter.
        registry
            .insert_loaded(Patient::new(
                PatientId::new(5).unwrap(),
                text("Cy"),
                age(40),
                text("M"),
            ))
            .unwrap();
        assert_eq!(registry.next_id(), None);
    }
}
