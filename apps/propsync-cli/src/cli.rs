//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use propsync_reconcile::{Stage, StageSet};
use propsync_sheet::Environment;

/// Default location of the defaults file.
pub const DEFAULT_DEFAULTS_FILE: &str = "defaults.json";

/// Reconcile a Sites/Admins/Groups workbook against the directory service
#[derive(Debug, Parser)]
#[command(name = "propsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Also log to the console when a log file is configured
    #[arg(short = 'c', long = "console", global = true)]
    pub console: bool,

    /// JSON file with default settings
    #[arg(short = 'd', long = "defaults", global = true, default_value = DEFAULT_DEFAULTS_FILE)]
    pub defaults: PathBuf,

    /// Workbook directory holding Sites.csv, Admins.csv and Groups.csv
    #[arg(short = 'f', long = "pfile", global = true)]
    pub properties: Option<PathBuf>,

    /// Instance type: np (non-production) or prod
    #[arg(short = 'i', long = "itype", global = true)]
    pub instance: Option<Environment>,

    /// Log file name prefix; a timestamp and `.log` are appended
    #[arg(short = 'l', long = "lfile", global = true)]
    pub log_file: Option<String>,

    /// Output directory for log files
    #[arg(short = 'o', long = "odir", global = true)]
    pub out_dir: Option<PathBuf>,

    /// Password; prompts when given without a value
    #[arg(short = 'p', long = "password", global = true, num_args = 0..=1)]
    pub password: Option<Option<String>>,

    /// Comma-separated target names of the default supervisors
    #[arg(short = 's', long = "supervisors", global = true)]
    pub supervisors: Option<String>,

    /// Name of the custom person property compared for admins
    #[arg(short = 'U', long = "udf", global = true)]
    pub udf: Option<String>,

    /// Directory user name
    #[arg(short = 'u', long = "user", global = true)]
    pub user: Option<String>,

    /// Verbosity: -v warn, -vv info, -vvv debug
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Directory instance URL
    #[arg(short = 'x', long = "xmodurl", global = true)]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Process only the Sites collection
    Sites,
    /// Process only the Admins collection
    Admins,
    /// Process only the Groups collection
    Groups,
    /// Process Sites, Admins and Groups
    All,
}

impl Command {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Command::Sites => "sites",
            Command::Admins => "admins",
            Command::Groups => "groups",
            Command::All => "all",
        }
    }

    /// Stages this command runs.
    #[must_use]
    pub fn stages(&self) -> StageSet {
        match self {
            Command::Sites => StageSet::only(Stage::Sites),
            Command::Admins => StageSet::only(Stage::Admins),
            Command::Groups => StageSet::only(Stage::Groups),
            Command::All => StageSet::all(),
        }
    }
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
    fn test_all_runs_every_stage() {
        assert_eq!(Command::All.stages(), StageSet::all());
        assert_eq!(
            Command::Groups.stages().iter().collect::<Vec<_>>(),
            vec![Stage::Groups]
        );
    }
}
