//! Patient domain types.

use std::fmt;
use std::str::FromStr;

use medicheck_types::{Age, NonEmptyText};
use serde::Serialize;

use crate::symptom::Symptom;
use crate::PatientError;

/// Identifier assigned to a patient by the registry. Always positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PatientId(u32);

impl PatientId {
    pub const FIRST: PatientId = PatientId(1);

    /// Wraps a raw identifier, rejecting zero.
    pub fn new(raw: u32) -> Option<Self> {
        (raw > 0).then_some(Self(raw))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// The identifier after this one, or `None` past `u32::MAX`.
    pub(crate) fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PatientId {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        trimmed
            .parse::<u32>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| {
                PatientError::InvalidInput(format!(
                    "patient ID must be a positive whole number, got '{trimmed}'"
                ))
            })
    }
}

/// A registered patient and the symptoms recorded for them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Patient {
    id: PatientId,
    pub name: NonEmptyText,
    pub age: Age,
    /// Free-form, e.g. `M`, `F` or `Other`.
    pub gender: NonEmptyText,
    symptoms: Vec<Symptom>,
}

impl Patient {
    pub(crate) fn new(id: PatientId, name: NonEmptyText, age: Age, gender: NonEmptyText) -> Self {
        Self {
            id,
            name,
            age,
            gender,
            symptoms: Vec::new(),
        }
    }

    pub fn id(&self) -> PatientId {
        self.id
    }

    /// Recorded symptoms, in the order they were first added.
    pub fn symptoms(&self) -> &[Symptom] {
        &self.symptoms
    }

    /// Records a symptom. Returns `false` if it was already recorded.
    pub fn add_symptom(&mut self, symptom: Symptom) -> bool {
        if self.symptoms.contains(&symptom) {
            return false;
        }
        self.symptoms.push(symptom);
        true
    }

    pub fn clear_symptoms(&mut self) {
        self.symptoms.clear();
    }

    /// Symptoms joined for display, e.g. `fever, cough`.
    pub fn symptom_summary(&self) -> String {
        self.symptoms
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A single-field change to an existing patient.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatientUpdate {
    Name(NonEmptyText),
    Age(Age),
    Gender(NonEmptyText),
}

impl PatientUpdate {
    pub(crate) fn apply(self, patient: &mut Patient) {
        match self {
            PatientUpdate::Name(name) => patient.name = name,
            PatientUpdate::Age(age) => patient.age = age,
            PatientUpdate::Gender(gender) => patient.gender = gender,
        }
    }
}
