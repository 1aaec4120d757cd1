//! Reconciliation stages and their fixed order.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A stage of a run. The declaration order is the execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Sites,
    Admins,
    Groups,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Sites, Stage::Admins, Stage::Groups];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Sites => "sites",
            Stage::Admins => "admins",
            Stage::Groups => "groups",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sites" => Ok(Stage::Sites),
            "admins" => Ok(Stage::Admins),
            "groups" => Ok(Stage::Groups),
            other => Err(format!("unknown stage '{other}'")),
        }
    }
}

/// A set of stages. Iteration is always in execution order, whatever order
/// the stages were added in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageSet(BTreeSet<Stage>);

impl StageSet {
    #[must_use]
    pub fn all() -> Self {
        Self(Stage::ALL.into_iter().collect())
    }

    #[must_use]
    pub fn only(stage: Stage) -> Self {
        Self(BTreeSet::from([stage]))
    }

    pub fn insert(&mut self, stage: Stage) {
        self.0.insert(stage);
    }

    #[must_use]
    pub fn contains(&self, stage: Stage) -> bool {
        self.0.contains(&stage)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Stage> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Stage> for StageSet {
    fn from_iter<T: IntoIterator<Item = Stage>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
