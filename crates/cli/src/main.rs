use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use medicheck_core::constants::DATA_DIR_ENV;
use medicheck_core::{
    data_dir_from_env_value, predict, render_conditions, render_patient_details,
    render_patient_summary, Age, CoreConfig, NonEmptyText, PatientError, PatientId,
    PatientService, PatientUpdate, Symptom,
};

#[derive(Parser)]
#[command(name = "medicheck")]
#[command(about = "MediCheck symptom advisory CLI")]
struct Cli {
    /// Directory holding patients.csv and symptoms.csv (overrides MEDICHECK_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the symptoms that can be recorded
    Symptoms,
    /// Suggest conditions for a set of symptoms without recording anything
    Diagnose {
        /// Symptom names, e.g. fever "sore throat"
        #[arg(required = true)]
        symptoms: Vec<String>,
    },
    /// List all patients
    List,
    /// Show one patient's details and symptoms
    Show {
        /// Patient ID
        id: PatientId,
    },
    /// Register a new patient
    AddPatient {
        #[arg(long)]
        name: NonEmptyText,
        #[arg(long)]
        age: Age,
        /// M, F or Other
        #[arg(long)]
        gender: NonEmptyText,
    },
    /// Change a patient's name, age or gender
    Edit {
        /// Patient ID
        id: PatientId,
        #[arg(long)]
        name: Option<NonEmptyText>,
        #[arg(long)]
        age: Option<Age>,
        #[arg(long)]
        gender: Option<NonEmptyText>,
    },
    /// Delete a patient and their symptoms
    Delete {
        /// Patient ID
        id: PatientId,
    },
    /// Record symptoms for a patient
    AddSymptoms {
        /// Patient ID
        id: PatientId,
        /// Symptom names, e.g. fever "sore throat"
        #[arg(required = true)]
        symptoms: Vec<Symptom>,
    },
    /// Remove all recorded symptoms from a patient
    ClearSymptoms {
        /// Patient ID
        id: PatientId,
    },
    /// Suggest conditions for a patient's recorded symptoms
    DiagnosePatient {
        /// Patient ID
        id: PatientId,
    },
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("medicheck=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let Some(command) = cli.command else {
        println!("Use 'medicheck --help' for commands");
        return Ok(());
    };

    // Neither of these touches patient data.
    match &command {
        Commands::Symptoms => {
            for symptom in Symptom::ALL {
                println!("{}. {}", symptom.menu_number(), symptom);
            }
            return Ok(());
        }
        Commands::Diagnose { symptoms } => {
            print!("{}", diagnose_text(symptoms));
            return Ok(());
        }
        _ => {}
    }

    let data_dir = data_dir_from_env_value(cli.data_dir, std::env::var(DATA_DIR_ENV).ok());
    let cfg = CoreConfig::new(data_dir)?;
    let mut service = PatientService::open(&cfg)?;

    match command {
        Commands::Symptoms | Commands::Diagnose { .. } => {}
        Commands::List => {
            if service.is_empty() {
                println!("No patients found.");
            } else {
                for patient in service.list_patients() {
                    println!("{}", render_patient_summary(patient));
                }
                println!("\nTotal patients: {}", service.patient_count());
            }
        }
        Commands::Show { id } => {
            print!("{}", render_patient_details(service.find_patient(id)?));
        }
        Commands::AddPatient { name, age, gender } => {
            let display_name = name.to_string();
            let id = service.register_patient(name, age, gender)?;
            println!("Patient '{}' added successfully with ID: {}", display_name, id);
        }
        Commands::Edit {
            id,
            name,
            age,
            gender,
        } => {
            let updates: Vec<PatientUpdate> = [
                name.map(PatientUpdate::Name),
                age.map(PatientUpdate::Age),
                gender.map(PatientUpdate::Gender),
            ]
            .into_iter()
            .flatten()
            .collect();

            if updates.is_empty() {
                return Err(PatientError::InvalidInput(
                    "nothing to edit: pass --name, --age or --gender".into(),
                )
                .into());
            }
            service.update_patient(id, updates)?;
            println!("Patient with ID {} updated successfully.", id);
        }
        Commands::Delete { id } => {
            service.delete_patient(id)?;
            println!("Patient with ID {} deleted successfully.", id);
        }
        Commands::AddSymptoms { id, symptoms } => {
            let outcome = service.add_symptoms(id, &symptoms)?;
            for symptom in &outcome.already_present {
                println!("Symptom '{}' already exists for this patient.", symptom);
            }
            println!("Added {} symptoms successfully.", outcome.added.len());
        }
        Commands::ClearSymptoms { id } => {
            service.clear_symptoms(id)?;
            let patient = service.find_patient(id)?;
            println!("All symptoms cleared for patient {}.", patient.name);
        }
        Commands::DiagnosePatient { id } => {
            print!("{}", service.diagnose(id)?.render());
        }
    }

    Ok(())
}

/// Ad-hoc diagnosis output for symptoms typed on the command line.
fn diagnose_text(raw: &[String]) -> String {
    let tokens = canonical_tokens(raw);
    render_conditions(&predict(tokens.as_slice()))
}

/// Maps recognised symptom names to their canonical spelling. Anything else is passed through
/// unchanged, so it still counts as a symptom even though no rule mentions it.
fn canonical_tokens(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|token| match token.parse::<Symptom>() {
            Ok(symptom) => symptom.as_str().to_owned(),
            Err(_) => {
                eprintln!("Note: '{}' is not a known symptom", token.trim());
                token.trim().to_owned()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_typed_arguments() {
        let cli = Cli::try_parse_from([
            "medicheck",
            "--data-dir",
            "/tmp/records",
            "add-symptoms",
            "3",
            "Fever",
            "sore throat",
        ])
        .expect("arguments should parse");

        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/records")));
        match cli.command {
            Some(Commands::AddSymptoms { id, symptoms }) => {
                assert_eq!(id.get(), 3);
                assert_eq!(symptoms, vec![Symptom::Fever, Symptom::SoreThroat]);
            }
            _ => panic!("expected add-symptoms"),
        }
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(Cli::try_parse_from(["medicheck", "show", "0"]).is_err());
        assert!(Cli::try_parse_from(["medicheck", "add-symptoms", "1", "sneezing"]).is_err());
        assert!(Cli::try_parse_from([
            "medicheck",
            "add-patient",
            "--name",
            "John Doe",
            "--age",
            "200",
            "--gender",
            "M",
        ])
        .is_err());
    }

    #[test]
    fn test_canonical_tokens_normalise_known_symptoms() {
        let raw = vec!["FEVER".to_string(), " Cough ".to_string(), "sneezing".to_string()];
        assert_eq!(canonical_tokens(&raw), vec!["fever", "cough", "sneezing"]);
    }

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_diagnose_text_matches_mixed_case_symptoms() {
        let text = diagnose_text(&args(&["FEVER", "Cough"]));
        assert!(text.starts_with("\nPossible conditions:\n- Flu\n"));
        assert!(text.ends_with(&format!("{}\n", medicheck_core::constants::DISCLAIMER)));
    }

    #[test]
    fn test_diagnose_text_counts_unknown_words() {
        assert!(diagnose_text(&args(&["fever"])).contains("- Fever (Unknown Cause)\n"));
        assert_eq!(
            diagnose_text(&args(&["fever", "sneezing"])),
            "No matching conditions found based on current symptoms.\n"
        );
    }
}
