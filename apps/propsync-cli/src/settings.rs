//! Effective settings: command-line flags over the JSON defaults file.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use propsync_directory::Credentials;
use propsync_reconcile::{EngineConfig, StageSet};
use propsync_sheet::Environment;
use serde::Deserialize;

use crate::cli::{Cli, Command};
use crate::error::{CliError, CliResult};

/// Contents of the defaults file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Defaults {
    pub user: Option<String>,
    pub password: Option<String>,
    pub properties_filename: Option<PathBuf>,
    pub log_filename: Option<String>,
    pub out_directory: Option<PathBuf>,
    #[serde(rename = "xmodURL")]
    pub xmod_url: Option<String>,
    pub verbosity: Option<u8>,
    pub udf_name: Option<String>,
    /// Comma-separated.
    pub supervisors: Option<String>,
    pub instance: Option<String>,
}

impl Defaults {
    /// Read the defaults file. A missing file is an error.
    pub fn load(path: &Path) -> CliResult<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CliError::MissingDefaults(path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let defaults = serde_json::from_str(&raw)?;
        Ok(defaults)
    }
}

/// Fully resolved settings for one run.
#[derive(Clone)]
pub struct Settings {
    pub url: String,
    pub credentials: Credentials,
    pub out_dir: PathBuf,
    pub workbook: PathBuf,
    /// Full path of the log file, when file logging is configured.
    pub log_file: Option<PathBuf>,
    pub console: bool,
    pub verbosity: u8,
    pub property_name: String,
    pub supervisors: Vec<String>,
    pub environment: Environment,
    pub command: Command,
}

impl Settings {
    /// Merge `cli` over `defaults`. `prompt` is asked for the password when
    /// `-p` was given without a value.
    pub fn resolve<F>(
        cli: &Cli,
        defaults: Defaults,
        now: DateTime<Local>,
        prompt: F,
    ) -> CliResult<Self>
    where
        F: FnOnce() -> CliResult<String>,
    {
        let password = match &cli.password {
            Some(Some(password)) => Some(password.clone()),
            Some(None) => Some(prompt()?),
            None => defaults.password,
        };

        let verbosity = if cli.verbose > 0 {
            cli.verbose
        } else {
            defaults.verbosity.filter(|v| (1..=3).contains(v)).unwrap_or(0)
        };

        let environment = match (&cli.instance, defaults.instance.as_deref()) {
            (Some(env), _) => *env,
            (None, Some(code)) => code.parse().map_err(CliError::Validation)?,
            (None, None) => Environment::default(),
        };

        let supervisors = cli
            .supervisors
            .clone()
            .or(defaults.supervisors)
            .map(|list| split_list(&list))
            .unwrap_or_default();

        let url = non_empty(cli.url.clone().or(defaults.xmod_url)).ok_or(CliError::MissingSetting(
            "instance URL (-x/--xmodurl or xmodURL)",
        ))?;
        let user = non_empty(cli.user.clone().or(defaults.user))
            .ok_or(CliError::MissingSetting("user (-u/--user or user)"))?;
        let password = non_empty(password)
            .ok_or(CliError::MissingSetting("password (-p or password)"))?;
        let out_dir = cli
            .out_dir
            .clone()
            .or(defaults.out_directory)
            .ok_or(CliError::MissingSetting("output directory (-o/--odir or outDirectory)"))?;
        let workbook = cli.properties.clone().or(defaults.properties_filename).ok_or(
            CliError::MissingSetting("workbook (-f/--pfile or propertiesFilename)"),
        )?;
        if supervisors.is_empty() {
            return Err(CliError::MissingSetting(
                "supervisors (-s/--supervisors or supervisors)",
            ));
        }
        let property_name = non_empty(cli.udf.clone().or(defaults.udf_name))
            .ok_or(CliError::MissingSetting("property name (-U/--udf or udfName)"))?;

        let log_file = non_empty(cli.log_file.clone().or(defaults.log_filename))
            .map(|prefix| out_dir.join(log_file_name(&prefix, now)));

        Ok(Self {
            url,
            credentials: Credentials::basic(user, password),
            out_dir,
            workbook,
            log_file,
            console: cli.console,
            verbosity,
            property_name,
            supervisors,
            environment,
            command: cli.command,
        })
    }

    /// Engine configuration for this run.
    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(self.environment, self.property_name.clone())
            .with_supervisors(self.supervisors.iter().cloned())
    }

    #[must_use]
    pub fn stages(&self) -> StageSet {
        self.command.stages()
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("url", &self.url)
            .field("credentials", &self.credentials)
            .field("out_dir", &self.out_dir)
            .field("workbook", &self.workbook)
            .field("log_file", &self.log_file)
            .field("verbosity", &self.verbosity)
            .field("property_name", &self.property_name)
            .field("supervisors", &self.supervisors)
            .field("environment", &self.environment)
            .field("command", &self.command)
            .finish_non_exhaustive()
    }
}

/// `<prefix>-YYYYMMDD-HHMM.log`
#[must_use]
pub fn log_file_name(prefix: &str, now: DateTime<Local>) -> String {
    format!("{prefix}{}.log", now.format("-%Y%m%d-%H%M"))
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
