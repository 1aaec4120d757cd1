//! CLI error types and exit codes

use propsync_directory::DirectoryError;
use propsync_reconcile::ReconcileError;
use thiserror::Error;

/// Exit codes for the CLI
/// - 0: Success
/// - 1: General, configuration or I/O error
/// - 2: Authentication failed
/// - 3: Network error
/// - 4: Missing or invalid setting
/// - 5: Server error
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Defaults file not found: {0}")]
    MissingDefaults(String),

    #[error("Missing setting: {0}")]
    MissingSetting(&'static str),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Input error: {0}")]
    InputError(String),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::AuthenticationFailed(_) => 2,
            CliError::Network(_) => 3,
            CliError::MissingSetting(_) | CliError::Validation(_) => 4,
            CliError::Server(_) => 5,
            CliError::MissingDefaults(_)
            | CliError::Config(_)
            | CliError::Workbook(_)
            | CliError::InputError(_) => 1,
        }
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {self}");
        } else {
            eprintln!("Error: {self}");
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {suggestion}");
            } else {
                eprintln!("\nSuggestion: {suggestion}");
            }
        }
    }

    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::MissingDefaults(_) => {
                Some("Create the file or point to it with -d/--defaults.")
            }
            CliError::MissingSetting(_) => {
                Some("Pass it on the command line or add it to the defaults file.")
            }
            CliError::Network(_) => Some("Check the instance URL and your network connection."),
            _ => None,
        }
    }
}

impl From<DirectoryError> for CliError {
    fn from(e: DirectoryError) -> Self {
        match e {
            DirectoryError::Transport(msg) => CliError::Network(msg),
            DirectoryError::Remote { status, detail } if status == 401 || status == 403 => {
                CliError::AuthenticationFailed(detail)
            }
            DirectoryError::Remote { status, detail } if status >= 500 => {
                CliError::Server(format!("HTTP {status}: {detail}"))
            }
            DirectoryError::InvalidConfig(msg) => CliError::Validation(msg),
            other => CliError::Config(other.to_string()),
        }
    }
}

impl From<ReconcileError> for CliError {
    fn from(e: ReconcileError) -> Self {
        match e {
            ReconcileError::Store(inner) => CliError::Workbook(inner.to_string()),
            ReconcileError::NoStages => CliError::Validation("no stages requested".to_string()),
        }
    }
}

impl From<propsync_sheet::SheetError> for CliError {
    fn from(e: propsync_sheet::SheetError) -> Self {
        CliError::Workbook(e.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Config(format!("I/O error: {e}"))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Config(format!("JSON error: {e}"))
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(e: dialoguer::Error) -> Self {
        CliError::InputError(format!("Dialog error: {e}"))
    }
}
