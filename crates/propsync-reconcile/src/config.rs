//! Immutable engine configuration.

use propsync_sheet::Environment;
use serde::{Deserialize, Serialize};

/// Shift that roster members are added to.
pub const DEFAULT_SHIFT: &str = "Default Shift";

/// Settings shared by every stage of a run.
///
/// Built once by the caller and passed by reference; the engine never
/// mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Which instance is targeted and which id column is used.
    pub environment: Environment,
    /// Target names of the people every new admin reports to.
    pub default_supervisors: Vec<String>,
    /// Name of the custom person property compared and set for admins.
    pub property_name: String,
    pub device: DeviceDefaults,
    pub default_shift: String,
    pub group_description: GroupDescription,
}

impl EngineConfig {
    #[must_use]
    pub fn new(environment: Environment, property_name: impl Into<String>) -> Self {
        Self {
            environment,
            default_supervisors: Vec::new(),
            property_name: property_name.into(),
            device: DeviceDefaults::default(),
            default_shift: DEFAULT_SHIFT.to_string(),
            group_description: GroupDescription::default(),
        }
    }

    #[must_use]
    pub fn with_supervisors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_supervisors = names.into_iter().map(Into::into).collect();
        self
    }
}

/// The device provisioned for every newly created admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDefaults {
    pub name: String,
    pub device_type: String,
}

impl Default for DeviceDefaults {
    fn default() -> Self {
        Self {
            name: "Work Email".to_string(),
            device_type: "EMAIL".to_string(),
        }
    }
}

/// How a new group's description is derived from its target name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDescription {
    /// Characters dropped from the start of the target name.
    pub prefix_len: usize,
    pub suffix: String,
}

impl Default for GroupDescription {
    fn default() -> Self {
        Self {
            prefix_len: 3,
            suffix: " Administrators".to_string(),
        }
    }
}

impl GroupDescription {
    /// `PARAdmins` becomes `Admins Administrators` with the defaults.
    #[must_use]
    pub fn describe(&self, target_name: &str) -> String {
        let stem: String = target_name.chars().skip(self.prefix_len).collect();
        format!("{stem}{}", self.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_strips_prefix() {
        let d = GroupDescription::default();
        assert_eq!(d.describe("PARAdmins"), "Admins Administrators");
        assert_eq!(d.describe("AB"), " Administrators");
    }

    #[test]
    fn test_describe_counts_characters() {
        let d = GroupDescription::default();
        assert_eq!(d.describe("ÉVRSupport"), "Support Administrators");
    }

    #[test]
    fn test_new_uses_defaults() {
        let config = EngineConfig::new(Environment::Production, "Property Code")
            .with_supervisors(["boss", "deputy"]);
        assert_eq!(config.default_shift, "Default Shift");
        assert_eq!(config.device.name, "Work Email");
        assert_eq!(config.default_supervisors, vec!["boss", "deputy"]);
    }
}
