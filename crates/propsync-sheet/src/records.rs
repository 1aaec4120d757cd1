//! Typed workbook records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which remote instance a run targets. Selects the id column too.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Environment {
    #[serde(rename = "prod")]
    Production,
    #[default]
    #[serde(rename = "np")]
    NonProduction,
}

impl Environment {
    /// Short code used on the command line and in defaults files.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Environment::Production => "prod",
            Environment::NonProduction => "np",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => f.write_str("Production"),
            Environment::NonProduction => f.write_str("Non-Production"),
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Ok(Environment::Production),
            "np" | "nonprod" | "non-production" => Ok(Environment::NonProduction),
            other => Err(format!("unknown instance type '{other}' (expected np or prod)")),
        }
    }
}

/// Remote ids cached per environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteIds {
    pub production: Option<String>,
    pub non_production: Option<String>,
}

impl RemoteIds {
    /// The id for `env`, if one has been written.
    #[must_use]
    pub fn get(&self, env: Environment) -> Option<&str> {
        let id = match env {
            Environment::Production => self.production.as_deref(),
            Environment::NonProduction => self.non_production.as_deref(),
        };
        id.filter(|s| !s.is_empty())
    }

    pub fn set(&mut self, env: Environment, id: impl Into<String>) {
        let slot = match env {
            Environment::Production => &mut self.production,
            Environment::NonProduction => &mut self.non_production,
        };
        *slot = Some(id.into());
    }
}

/// A row of the Sites collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteRecord {
    /// 1-based row number in the source (header is row 1).
    pub row: usize,
    pub label: String,
    pub ids: RemoteIds,
    pub name: String,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub country: String,
    pub language: String,
    pub postal_code: String,
    pub state: String,
    pub timezone: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    /// Cells past the mapped columns, kept as read.
    pub extra: Vec<String>,
}

/// A row of the Admins collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminRecord {
    pub row: usize,
    /// Value of the user-defined property.
    pub property_value: String,
    pub ids: RemoteIds,
    pub target_name: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<String>,
    pub site_name: String,
    pub email: String,
    pub extra: Vec<String>,
}

impl AdminRecord {
    /// Split a `|`-separated role cell. An empty cell has no roles.
    #[must_use]
    pub fn parse_roles(cell: &str) -> Vec<String> {
        if cell.is_empty() {
            Vec::new()
        } else {
            cell.split('|').map(str::to_string).collect()
        }
    }

    /// Inverse of [`AdminRecord::parse_roles`].
    #[must_use]
    pub fn roles_cell(&self) -> String {
        self.roles.join("|")
    }
}

/// A row of the Groups collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupRecord {
    pub row: usize,
    pub label: String,
    pub ids: RemoteIds,
    pub target_name: String,
    pub site_name: String,
    pub extra: Vec<String>,
}
