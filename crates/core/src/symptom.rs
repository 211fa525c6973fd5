//! The fixed symptom vocabulary.
//!
//! Symptoms are recorded against patients as [`Symptom`] values, but the diagnosis engine works
//! on plain tokens (see [`Symptom::as_str`]) so that it can also be queried with free text.

use std::fmt;
use std::str::FromStr;

use crate::{PatientError, PatientResult};

/// One of the 18 symptoms a patient can be recorded with.
///
/// Variant order is the menu order shown to users; [`Symptom::ALL`] follows it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symptom {
    Fever,
    Cough,
    Headache,
    SoreThroat,
    RunnyNose,
    ShortnessOfBreath,
    Fatigue,
    MuscleAches,
    Nausea,
    Vomiting,
    Diarrhea,
    LossOfTaste,
    LossOfSmell,
    ChestPain,
    Dizziness,
    Rash,
    JointPain,
    Chills,
}

impl Symptom {
    /// Every known symptom, in menu order.
    pub const ALL: [Symptom; 18] = [
        Symptom::Fever,
        Symptom::Cough,
        Symptom::Headache,
        Symptom::SoreThroat,
        Symptom::RunnyNose,
        Symptom::ShortnessOfBreath,
        Symptom::Fatigue,
        Symptom::MuscleAches,
        Symptom::Nausea,
        Symptom::Vomiting,
        Symptom::Diarrhea,
        Symptom::LossOfTaste,
        Symptom::LossOfSmell,
        Symptom::ChestPain,
        Symptom::Dizziness,
        Symptom::Rash,
        Symptom::JointPain,
        Symptom::Chills,
    ];

    /// The canonical token for this symptom, as stored on disk and matched by the rules.
    pub const fn as_str(self) -> &'static str {
        match self {
            Symptom::Fever => "fever",
            Symptom::Cough => "cough",
            Symptom::Headache => "headache",
            Symptom::SoreThroat => "sore throat",
            Symptom::RunnyNose => "runny nose",
            Symptom::ShortnessOfBreath => "shortness of breath",
            Symptom::Fatigue => "fatigue",
            Symptom::MuscleAches => "muscle aches",
            Symptom::Nausea => "nausea",
            Symptom::Vomiting => "vomiting",
            Symptom::Diarrhea => "diarrhea",
            Symptom::LossOfTaste => "loss of taste",
            Symptom::LossOfSmell => "loss of smell",
            Symptom::ChestPain => "chest pain",
            Symptom::Dizziness => "dizziness",
            Symptom::Rash => "rash",
            Symptom::JointPain => "joint pain",
            Symptom::Chills => "chills",
        }
    }

    /// Map a 1-based menu number to a symptom.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::InvalidSymptomNumber`] for 0 or anything past the last entry.
    pub fn from_menu_number(number: usize) -> PatientResult<Self> {
        number
            .checked_sub(1)
            .and_then(|index| Self::ALL.get(index).copied())
            .ok_or(PatientError::InvalidSymptomNumber(number))
    }

    /// The 1-based menu number of this symptom.
    pub fn menu_number(self) -> usize {
        self as usize + 1
    }
}

impl fmt::Display for Symptom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Symptom {
    type Err = PatientError;

    /// Case-insensitive match against the canonical tokens, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|symptom| symptom.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| PatientError::UnknownSymptom(wanted.to_string()))
    }
}
