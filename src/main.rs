use anyhow::Context;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use medicheck_core::constants::DATA_DIR_ENV;
use medicheck_core::{data_dir_from_env_value, CoreConfig, PatientService};

mod console;

use console::Console;

/// Main entry point for the MediCheck console
///
/// Loads existing records from the data directory and runs the interactive menus on
/// stdin/stdout. Logs go to stderr so they never interleave with the menus.
///
/// # Environment Variables
/// - `MEDICHECK_DATA_DIR`: Directory holding `patients.csv` and `symptoms.csv` (default: "data")
/// - `RUST_LOG`: Log filter (default: "medicheck=warn")
///
/// # Returns
/// * `Ok(())` - When the user exits or input ends
/// * `Err(anyhow::Error)` - If existing data cannot be loaded or the console fails
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medicheck=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let data_dir = data_dir_from_env_value(None, std::env::var(DATA_DIR_ENV).ok());
    let cfg = CoreConfig::new(data_dir)?;
    tracing::info!("++ Using data directory {}", cfg.data_dir().display());

    let service = PatientService::open(&cfg).with_context(|| {
        format!(
            "failed to load patient data from {}",
            cfg.data_dir().display()
        )
    })?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    Console::new(service, stdin.lock(), stdout.lock()).run()?;

    Ok(())
}
