//! Rendering of diagnosis results for display.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::constants::DISCLAIMER;
use crate::diagnosis::Condition;
use crate::patient::{Patient, PatientId};
use crate::symptom::Symptom;

/// The outcome of running the diagnosis engine against one patient's recorded symptoms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagnosisReport {
    pub patient_id: PatientId,
    pub patient_name: String,
    pub symptoms: Vec<Symptom>,
    pub conditions: Vec<Condition>,
    pub generated_at: DateTime<Utc>,
}

impl DiagnosisReport {
    pub(crate) fn new(patient: &Patient, conditions: Vec<Condition>) -> Self {
        Self {
            patient_id: patient.id(),
            patient_name: patient.name.as_str().to_owned(),
            symptoms: patient.symptoms().to_vec(),
            conditions,
            generated_at: Utc::now(),
        }
    }

    /// The report as console text, header first and disclaimer last.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DiagnosisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n--- Diagnosis for {} ---", self.patient_name)?;
        if self.symptoms.is_empty() {
            writeln!(f, "No symptoms recorded.")?;
        } else {
            let joined: Vec<&str> = self.symptoms.iter().map(|s| s.as_str()).collect();
            writeln!(f, "Symptoms: {}", joined.join(", "))?;
        }
        f.write_str(&render_conditions(&self.conditions))
    }
}

/// Candidate conditions as a bulleted list followed by the disclaimer, or a single line when
/// nothing matched.
pub fn render_conditions(conditions: &[Condition]) -> String {
    if conditions.is_empty() {
        return "No matching conditions found based on current symptoms.\n".to_owned();
    }

    let mut out = String::from("\nPossible conditions:\n");
    for condition in conditions {
        out.push_str("- ");
        out.push_str(condition.label());
        out.push('\n');
    }
    out.push('\n');
    out.push_str(DISCLAIMER);
    out.push('\n');
    out
}

/// One-line listing entry, e.g. `ID: 1 | Name: John Doe | Age: 30 | Gender: M | Symptoms: 2`.
pub fn render_patient_summary(patient: &Patient) -> String {
    format!(
        "ID: {} | Name: {} | Age: {} | Gender: {} | Symptoms: {}",
        patient.id(),
        patient.name,
        patient.age,
        patient.gender,
        patient.symptoms().len()
    )
}

/// Full patient record block including recorded symptoms.
pub fn render_patient_details(patient: &Patient) -> String {
    let symptoms = if patient.symptoms().is_empty() {
        "No symptoms recorded.".to_owned()
    } else {
        format!("Symptoms: {}", patient.symptom_summary())
    };

    format!(
        "\n--- Patient Information ---\n\
         ID: {}\n\
         Name: {}\n\
         Age: {}\n\
         Gender: {}\n\
         {}\n\
         ---------------------------\n",
        patient.id(),
        patient.name,
        patient.age,
        patient.gender,
        symptoms
    )
}
