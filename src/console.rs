//! Menu-driven console front-end.
//!
//! The console reads one answer per line. It is generic over its input and output so the whole
//! menu tree can be driven from a script in tests. Running out of input ends the session the
//! same way choosing Exit does, minus the farewell.

use std::io::{self, BufRead, Write};

use medicheck_core::{
    render_patient_details, render_patient_summary, Age, NonEmptyText, PatientError, PatientId,
    PatientResult, PatientService, PatientUpdate, Symptom,
};

const BANNER: &str = "\
========================================
   Welcome to MediCheck Application
   Simple Medical Diagnosis System
========================================
";

const MAIN_MENU: &str = "
========== MediCheck - Main Menu ==========
1. Patient Management
2. Symptom Management
3. Disease Diagnosis
4. Exit
==========================================
Select an option: ";

const PATIENT_MENU: &str = "
--- Patient Management ---
1. Add New Patient
2. View All Patients
3. Edit Patient
4. Delete Patient
5. Back to Main Menu
Choice: ";

const SYMPTOM_MENU: &str = "
--- Symptom Management ---
1. Add Symptoms to Patient
2. View Patient Symptoms
3. Clear Patient Symptoms
4. View Available Symptoms
5. Back to Main Menu
Choice: ";

const EDIT_MENU: &str = "
What would you like to edit?
1. Name
2. Age
3. Gender
4. Cancel
Choice: ";

const INVALID_NUMBER: &str = "Invalid input. Please enter a number.";
const NO_PATIENTS: &str = "No patients available. Please add a patient first.";

/// Whether the session should carry on after a menu action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    EndOfInput,
}

pub struct Console<R, W> {
    service: PatientService,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(service: PatientService, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    /// Runs the main menu until the user exits or input ends.
    ///
    /// Mistakes such as unknown patient IDs are reported to the user and the menu carries on.
    /// Only I/O failures on the console itself end the session with an error.
    pub fn run(&mut self) -> io::Result<()> {
        self.write(BANNER)?;

        loop {
            self.write(MAIN_MENU)?;
            let Some(line) = self.read_line()? else {
                break;
            };

            let flow = match parse_number(&line) {
                None => self.say(INVALID_NUMBER).map(|()| Flow::Continue)?,
                Some(1) => self.patient_menu()?,
                Some(2) => self.symptom_menu()?,
                Some(3) => self.diagnose()?,
                Some(4) => {
                    self.write("\nThank you for using MediCheck!\nGoodbye!\n")?;
                    break;
                }
                Some(_) => self
                    .say("Invalid choice. Please select 1-4.")
                    .map(|()| Flow::Continue)?,
            };

            if flow == Flow::EndOfInput {
                break;
            }
        }

        self.output.flush()
    }

    // ------------------------------------------------------------------
    // Patient management
    // ------------------------------------------------------------------

    fn patient_menu(&mut self) -> io::Result<Flow> {
        loop {
            self.write(PATIENT_MENU)?;
            let Some(line) = self.read_line()? else {
                return Ok(Flow::EndOfInput);
            };

            let flow = match parse_number(&line) {
                None => self.say(INVALID_NUMBER).map(|()| Flow::Continue)?,
                Some(1) => self.add_patient()?,
                Some(2) => self.view_all_patients().map(|()| Flow::Continue)?,
                Some(3) => self.edit_patient()?,
                Some(4) => self.delete_patient()?,
                Some(5) => {
                    self.say("Returning to main menu...")?;
                    return Ok(Flow::Continue);
                }
                Some(_) => self
                    .say("Invalid choice. Please try again.")
                    .map(|()| Flow::Continue)?,
            };

            if flow == Flow::EndOfInput {
                return Ok(flow);
            }
        }
    }

    fn add_patient(&mut self) -> io::Result<Flow> {
        self.write("\n--- Add New Patient ---\n")?;
        let Some(name) = self.prompt("Enter patient name: ")? else {
            return Ok(Flow::EndOfInput);
        };
        let Some(age) = self.prompt("Enter age: ")? else {
            return Ok(Flow::EndOfInput);
        };
        let Some(gender) = self.prompt("Enter gender (M/F/Other): ")? else {
            return Ok(Flow::EndOfInput);
        };

        let name = match NonEmptyText::new(&name) {
            Ok(name) => name,
            Err(e) => return self.say(&format!("Invalid name: {e}")).map(|()| Flow::Continue),
        };
        let age = match age.parse::<Age>() {
            Ok(age) => age,
            Err(e) => return self.say(&format!("Invalid age: {e}")).map(|()| Flow::Continue),
        };
        let gender = match NonEmptyText::new(&gender) {
            Ok(gender) => gender,
            Err(e) => {
                return self
                    .say(&format!("Invalid gender: {e}"))
                    .map(|()| Flow::Continue);
            }
        };

        let display_name = name.to_string();
        match self.service.register_patient(name, age, gender) {
            Ok(id) => self.say(&format!(
                "Patient '{display_name}' added successfully with ID: {id}"
            ))?,
            Err(e) => self.report_error(e)?,
        }
        Ok(Flow::Continue)
    }

    fn view_all_patients(&mut self) -> io::Result<()> {
        if self.service.is_empty() {
            return self.say("\nNo patients found.");
        }

        let mut text = String::from("\n--- All Patients ---\n");
        for patient in self.service.list_patients() {
            text.push_str(&render_patient_summary(patient));
            text.push('\n');
        }
        text.push_str(&format!(
            "\nTotal patients: {}\n",
            self.service.patient_count()
        ));
        self.write(&text)
    }

    fn edit_patient(&mut self) -> io::Result<Flow> {
        if self.service.is_empty() {
            return self
                .say("No patients available for editing.")
                .map(|()| Flow::Continue);
        }

        let id = match self.prompt_patient_id("Enter patient ID to edit: ")? {
            Some(Ok(id)) => id,
            Some(Err(_)) => return self.say(INVALID_NUMBER).map(|()| Flow::Continue),
            None => return Ok(Flow::EndOfInput),
        };

        let details = match self.service.find_patient(id) {
            Ok(patient) => render_patient_details(patient),
            Err(e) => return self.report_error(e).map(|()| Flow::Continue),
        };
        self.write(&format!("\n--- Edit Patient (ID: {id}) ---\n{details}"))?;
        self.write(EDIT_MENU)?;

        let Some(choice) = self.read_line()? else {
            return Ok(Flow::EndOfInput);
        };

        let (field, answer) = match parse_number(&choice) {
            Some(1) => (
                "Name",
                self.prompt("Enter new name: ")?
                    .map(|v| parse_text(&v).map(PatientUpdate::Name)),
            ),
            Some(2) => (
                "Age",
                self.prompt("Enter new age: ")?.map(|v| {
                    v.parse::<Age>()
                        .map(PatientUpdate::Age)
                        .map_err(PatientError::from)
                }),
            ),
            Some(3) => (
                "Gender",
                self.prompt("Enter new gender: ")?
                    .map(|v| parse_text(&v).map(PatientUpdate::Gender)),
            ),
            Some(4) => return self.say("Edit cancelled.").map(|()| Flow::Continue),
            _ => return self.say("Invalid choice.").map(|()| Flow::Continue),
        };

        let Some(update) = answer else {
            return Ok(Flow::EndOfInput);
        };

        match update.and_then(|u| self.service.update_patient(id, [u])) {
            Ok(()) => self.say(&format!("{field} updated successfully."))?,
            Err(e) => self.report_error(e)?,
        }
        Ok(Flow::Continue)
    }

    fn delete_patient(&mut self) -> io::Result<Flow> {
        if self.service.is_empty() {
            return self
                .say("No patients available for deletion.")
                .map(|()| Flow::Continue);
        }

        let id = match self.prompt_patient_id("Enter patient ID to delete: ")? {
            Some(Ok(id)) => id,
            Some(Err(_)) => return self.say(INVALID_NUMBER).map(|()| Flow::Continue),
            None => return Ok(Flow::EndOfInput),
        };

        match self.service.delete_patient(id) {
            Ok(_) => self.say(&format!("Patient with ID {id} deleted successfully."))?,
            Err(e) => self.report_error(e)?,
        }
        Ok(Flow::Continue)
    }

    // ------------------------------------------------------------------
    // Symptom management
    // ------------------------------------------------------------------

    fn symptom_menu(&mut self) -> io::Result<Flow> {
        loop {
            self.write(SYMPTOM_MENU)?;
            let Some(line) = self.read_line()? else {
                return Ok(Flow::EndOfInput);
            };

            let flow = match parse_number(&line) {
                None => self.say(INVALID_NUMBER).map(|()| Flow::Continue)?,
                Some(1) => self.add_symptoms()?,
                Some(2) => self.view_patient_symptoms()?,
                Some(3) => self.clear_patient_symptoms()?,
                Some(4) => self.show_available_symptoms().map(|()| Flow::Continue)?,
                Some(5) => {
                    self.say("Returning to main menu...")?;
                    return Ok(Flow::Continue);
                }
                Some(_) => self
                    .say("Invalid choice. Please try again.")
                    .map(|()| Flow::Continue)?,
            };

            if flow == Flow::EndOfInput {
                return Ok(flow);
            }
        }
    }

    fn add_symptoms(&mut self) -> io::Result<Flow> {
        if self.service.is_empty() {
            return self.say(NO_PATIENTS).map(|()| Flow::Continue);
        }
        self.view_all_patients()?;

        let id = match self.prompt_patient_id("Enter patient ID to add symptoms: ")? {
            Some(Ok(id)) => id,
            Some(Err(_)) => return self.say(INVALID_NUMBER).map(|()| Flow::Continue),
            None => return Ok(Flow::EndOfInput),
        };
        if let Err(e) = self.service.find_patient(id) {
            return self.report_error(e).map(|()| Flow::Continue);
        }

        self.show_available_symptoms()?;
        let Some(line) = self.prompt(
            "\nEnter symptom numbers separated by spaces (e.g., 1 3 5), or 0 to cancel: ",
        )?
        else {
            return Ok(Flow::EndOfInput);
        };

        if line == "0" {
            return self.say("Operation cancelled.").map(|()| Flow::Continue);
        }
        if line.is_empty() {
            return self.say("No symptoms selected.").map(|()| Flow::Continue);
        }

        let mut chosen = Vec::new();
        for token in line.split_whitespace() {
            match token.parse::<usize>().map(Symptom::from_menu_number) {
                Ok(Ok(symptom)) => chosen.push(symptom),
                _ => self.say(&format!("Invalid symptom number: {token}"))?,
            }
        }
        if chosen.is_empty() {
            return Ok(Flow::Continue);
        }

        match self.service.add_symptoms(id, &chosen) {
            Ok(outcome) => {
                let mut text = String::new();
                for symptom in &outcome.added {
                    text.push_str(&format!("Symptom '{symptom}' added successfully.\n"));
                }
                for symptom in &outcome.already_present {
                    text.push_str(&format!(
                        "Symptom '{symptom}' already exists for this patient.\n"
                    ));
                }
                if !outcome.added.is_empty() {
                    text.push_str(&format!(
                        "Added {} symptoms successfully.\n",
                        outcome.added.len()
                    ));
                }
                self.write(&text)?;
            }
            Err(e) => self.report_error(e)?,
        }
        Ok(Flow::Continue)
    }

    fn view_patient_symptoms(&mut self) -> io::Result<Flow> {
        if self.service.is_empty() {
            return self.say("No patients available.").map(|()| Flow::Continue);
        }
        self.view_all_patients()?;

        let id = match self.prompt_patient_id("Enter patient ID to view symptoms: ")? {
            Some(Ok(id)) => id,
            Some(Err(_)) => return self.say(INVALID_NUMBER).map(|()| Flow::Continue),
            None => return Ok(Flow::EndOfInput),
        };

        let text = match self.service.find_patient(id) {
            Ok(patient) if patient.symptoms().is_empty() => format!(
                "\n--- Symptoms for {} (ID: {id}) ---\nNo symptoms recorded.\n",
                patient.name
            ),
            Ok(patient) => format!(
                "\n--- Symptoms for {} (ID: {id}) ---\nSymptoms: {}\n",
                patient.name,
                patient.symptom_summary()
            ),
            Err(e) => return self.report_error(e).map(|()| Flow::Continue),
        };
        self.write(&text).map(|()| Flow::Continue)
    }

    fn clear_patient_symptoms(&mut self) -> io::Result<Flow> {
        if self.service.is_empty() {
            return self.say("No patients available.").map(|()| Flow::Continue);
        }
        self.view_all_patients()?;

        let id = match self.prompt_patient_id("Enter patient ID to clear symptoms: ")? {
            Some(Ok(id)) => id,
            Some(Err(_)) => return self.say(INVALID_NUMBER).map(|()| Flow::Continue),
            None => return Ok(Flow::EndOfInput),
        };

        let result = self.service.clear_symptoms(id).and_then(|()| {
            self.service
                .find_patient(id)
                .map(|patient| patient.name.to_string())
        });
        match result {
            Ok(name) => self.say(&format!("All symptoms cleared for patient {name}."))?,
            Err(e) => self.report_error(e)?,
        }
        Ok(Flow::Continue)
    }

    fn show_available_symptoms(&mut self) -> io::Result<()> {
        let mut text = String::from("\nAvailable Symptoms:\n");
        for symptom in Symptom::ALL {
            text.push_str(&format!("{}. {}\n", symptom.menu_number(), symptom));
        }
        text.push('\n');
        self.write(&text)
    }

    // ------------------------------------------------------------------
    // Diagnosis
    // ------------------------------------------------------------------

    fn diagnose(&mut self) -> io::Result<Flow> {
        if self.service.is_empty() {
            return self.say(NO_PATIENTS).map(|()| Flow::Continue);
        }
        self.view_all_patients()?;

        let id = match self.prompt_patient_id("Enter patient ID for diagnosis: ")? {
            Some(Ok(id)) => id,
            Some(Err(_)) => return self.say(INVALID_NUMBER).map(|()| Flow::Continue),
            None => return Ok(Flow::EndOfInput),
        };

        match self.service.diagnose(id) {
            Ok(report) => self.write(&report.render())?,
            Err(e) => self.report_error(e)?,
        }
        Ok(Flow::Continue)
    }

    // ------------------------------------------------------------------
    // I/O helpers
    // ------------------------------------------------------------------

    /// Reads one trimmed line. `None` once input is exhausted.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        self.write(text)?;
        self.read_line()
    }

    fn prompt_patient_id(&mut self, text: &str) -> io::Result<Option<PatientResult<PatientId>>> {
        Ok(self.prompt(text)?.map(|line| line.parse::<PatientId>()))
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes())
    }

    fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    fn report_error(&mut self, err: PatientError) -> io::Result<()> {
        match err {
            PatientError::PatientNotFound(id) => {
                self.say(&format!("Patient with ID {id} not found."))
            }
            PatientError::NoSymptomsRecorded(_) => self
                .say("No symptoms recorded for this patient. Please add symptoms first."),
            PatientError::InvalidText(e) => self.say(&format!("Invalid input: {e}")),
            PatientError::InvalidAge(e) => self.say(&format!("Invalid input: {e}")),
            other => {
                tracing::error!(error = %other, "patient operation failed");
                self.say(&format!("Error: {other}"))
            }
        }
    }
}

fn parse_number(line: &str) -> Option<u32> {
    line.parse().ok()
}

fn parse_text(value: &str) -> PatientResult<NonEmptyText> {
    Ok(NonEmptyText::new(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use medicheck_core::CoreConfig;
    use std::io::Cursor;
    use std::path::Path;
    use tempfile::TempDir;

    fn open(dir: &Path) -> PatientService {
        let cfg = CoreConfig::new(dir.to_path_buf()).expect("CoreConfig::new should succeed");
        PatientService::open(&cfg).expect("open should succeed")
    }

    fn run_script(dir: &Path, script: &str) -> String {
        let mut output = Vec::new();
        Console::new(open(dir), Cursor::new(script), &mut output)
            .run()
            .expect("console should run to completion");
        String::from_utf8(output).expect("console output is UTF-8")
    }

    fn seed_patient(dir: &Path, name: &str) -> PatientId {
        open(dir)
            .register_patient(
                NonEmptyText::new(name).unwrap(),
                Age::new(30).unwrap(),
                NonEmptyText::new("M").unwrap(),
            )
            .unwrap()
    }

    #[test]
    fn test_add_patient_record_symptoms_and_diagnose() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let script = "1\n1\nJohn Doe\n30\nM\n5\n\
                      2\n1\n1\n1 2 12\n5\n\
                      3\n1\n\
                      4\n";

        let out = run_script(temp_dir.path(), script);

        assert!(out.starts_with(BANNER));
        assert!(out.contains("Patient 'John Doe' added successfully with ID: 1"));
        assert!(out.contains("Added 3 symptoms successfully."));
        assert!(out.contains("--- Diagnosis for John Doe ---\nSymptoms: fever, cough, loss of taste\n"));
        assert!(out.contains("\nPossible conditions:\n- COVID-19\n- Flu\n"));
        assert!(out.ends_with("Thank you for using MediCheck!\nGoodbye!\n"));

        let service = open(temp_dir.path());
        let patient = service.find_patient(PatientId::FIRST).unwrap();
        assert_eq!(
            patient.symptoms(),
            &[Symptom::Fever, Symptom::Cough, Symptom::LossOfTaste]
        );
    }

    #[test]
    fn test_invalid_menu_input_is_reported() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let out = run_script(temp_dir.path(), "abc\n9\n4\n");

        assert!(out.contains(INVALID_NUMBER));
        assert!(out.contains("Invalid choice. Please select 1-4."));
        assert!(out.contains("Goodbye!"));
    }

    #[test]
    fn test_end_of_input_exits_without_farewell() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let out = run_script(temp_dir.path(), "1\n1\nJohn Doe\n");

        assert!(!out.contains("Goodbye!"));
        assert!(open(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_diagnosis_requires_patients_and_symptoms() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let out = run_script(temp_dir.path(), "3\n4\n");
        assert!(out.contains(NO_PATIENTS));

        seed_patient(temp_dir.path(), "John Doe");
        let out = run_script(temp_dir.path(), "3\n1\n3\n2\n4\n");
        assert!(out.contains("No symptoms recorded for this patient. Please add symptoms first."));
        assert!(out.contains("Patient with ID 2 not found."));
    }

    #[test]
    fn test_symptom_entry_cancel_and_invalid_numbers() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        seed_patient(temp_dir.path(), "John Doe");

        let script = "2\n1\n1\n0\n\
                      1\n1\n19 abc 3\n\
                      1\n1\n3\n\
                      5\n4\n";
        let out = run_script(temp_dir.path(), script);

        assert!(out.contains("Operation cancelled."));
        assert!(out.contains("Invalid symptom number: 19"));
        assert!(out.contains("Invalid symptom number: abc"));
        assert!(out.contains("Added 1 symptoms successfully."));
        assert!(out.contains("Symptom 'headache' already exists for this patient."));
    }

    #[test]
    fn test_view_and_clear_symptoms() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let id = seed_patient(temp_dir.path(), "Jane Smith");
        open(temp_dir.path())
            .add_symptoms(id, &[Symptom::Rash, Symptom::Chills])
            .unwrap();

        let out = run_script(temp_dir.path(), "2\n2\n1\n3\n1\n2\n1\n5\n4\n");

        assert!(out.contains("--- Symptoms for Jane Smith (ID: 1) ---\nSymptoms: rash, chills\n"));
        assert!(out.contains("All symptoms cleared for patient Jane Smith."));
        assert!(out.contains("--- Symptoms for Jane Smith (ID: 1) ---\nNo symptoms recorded.\n"));
        assert!(open(temp_dir.path())
            .find_patient(id)
            .unwrap()
            .symptoms()
            .is_empty());
    }

    #[test]
    fn test_edit_and_delete_patient() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        seed_patient(temp_dir.path(), "John Doe");

        let script = "1\n3\n1\n2\n31\n\
                      3\n1\n1\n \n\
                      4\n1\n\
                      4\n\
                      5\n4\n";
        let out = run_script(temp_dir.path(), script);

        assert!(out.contains("--- Edit Patient (ID: 1) ---\n\n--- Patient Information ---\n"));
        assert!(out.contains("Age updated successfully."));
        assert!(out.contains("Invalid input: text cannot be empty"));
        assert!(out.contains("Patient with ID 1 deleted successfully."));
        assert!(out.contains("No patients available for deletion."));
        assert!(open(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_new_patient_validation() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let out = run_script(temp_dir.path(), "1\n1\nJohn Doe\nthirty\nM\n1\n\n30\nM\n5\n4\n");

        assert!(out.contains("Invalid age: age must be a whole number, got 'thirty'"));
        assert!(out.contains("Invalid name: text cannot be empty"));
        assert!(open(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_available_symptoms_are_numbered() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let out = run_script(temp_dir.path(), "2\n4\n5\n4\n");

        assert!(out.contains("\nAvailable Symptoms:\n1. fever\n2. cough\n"));
        assert!(out.contains("18. chills\n"));
    }
}
