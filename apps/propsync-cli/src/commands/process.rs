//! Process command - reconcile the workbook against the directory

use chrono::Local;
use dialoguer::Password;
use propsync_directory::{DirectoryConfig, HttpDirectoryClient};
use propsync_reconcile::{Orchestrator, RunReport};
use propsync_sheet::CsvWorkbookStore;
use tracing::info;

use crate::cli::Cli;
use crate::error::{CliError, CliResult};
use crate::logging::init_logging;
use crate::output::print_summary;
use crate::settings::{Defaults, Settings};

/// Execute the selected command
pub async fn execute(cli: Cli) -> CliResult<()> {
    let defaults = Defaults::load(&cli.defaults)?;
    let settings = Settings::resolve(&cli, defaults, Local::now(), prompt_password)?;
    init_logging(&settings)?;
    log_settings(&settings);

    let report = run(&settings).await?;
    print_summary(&report);
    Ok(())
}

/// Open the workbook and run the command's stages against the instance.
pub async fn run(settings: &Settings) -> CliResult<RunReport> {
    let mut store = CsvWorkbookStore::open(&settings.workbook)?;
    let directory = HttpDirectoryClient::new(DirectoryConfig::new(
        settings.url.clone(),
        settings.credentials.clone(),
    ))?;
    let config = settings.engine_config();

    let report = Orchestrator::new(&directory, &config)
        .process(&mut store, &settings.stages())
        .await?;
    Ok(report)
}

fn prompt_password() -> CliResult<String> {
    Password::new()
        .with_prompt("Password")
        .interact()
        .map_err(|e| CliError::InputError(format!("Failed to read password: {e}")))
}

fn log_settings(settings: &Settings) {
    info!(url = %settings.url, "Instance URL");
    info!(user = %settings.credentials.user(), "User");
    info!("Password was provided");
    info!(environment = %settings.environment, "Instance type");
    info!(out_dir = %settings.out_dir.display(), "Output directory");
    info!(workbook = %settings.workbook.display(), "Workbook");
    if let Some(log_file) = &settings.log_file {
        info!(log_file = %log_file.display(), "Log file");
    }
    info!(supervisors = ?settings.supervisors, "Default supervisors");
    info!(property = %settings.property_name, "Person property");
    info!(command = settings.command.name(), "Command");
}
