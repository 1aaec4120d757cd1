//! Directory resource models.
//!
//! Response types tolerate missing and `null` fields; request types only
//! serialize the optional fields that carry a value.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Treat `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The kinds of entity the directory holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Site,
    Person,
    Device,
    Group,
}

impl EntityKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Site => "site",
            EntityKind::Person => "person",
            EntityKind::Device => "device",
            EntityKind::Group => "group",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Embedded collection wrapper (`{"count", "total", "data": [...]}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    pub data: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            count: 0,
            total: 0,
            data: Vec::new(),
        }
    }
}

/// Reference to another entity by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_name: Option<String>,
}

// ── Sites ──────────────────────────────────────────────────────────────

/// A site as held by the directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address1: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address2: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub language: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub postal_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timezone: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Payload for `POST /sites`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSite {
    pub name: String,
    pub address1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    pub city: String,
    pub country: String,
    pub language: String,
    pub postal_code: String,
    pub state: String,
    pub timezone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<serde_json::Value>,
}

// ── People ─────────────────────────────────────────────────────────────

/// A role granted to a person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

/// A person as held by the directory, with roles and supervisors embedded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub target_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: BTreeMap<String, serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: Page<Role>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub supervisors: Page<Reference>,
}

impl Person {
    /// Names of the roles granted to this person.
    pub fn role_names(&self) -> impl Iterator<Item = &str> {
        self.roles.data.iter().map(|r| r.name.as_str())
    }

    /// A custom property rendered as text; `None` when the property is unset.
    #[must_use]
    pub fn property_text(&self, name: &str) -> Option<String> {
        match self.properties.get(name)? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Payload for `POST /people`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPerson {
    pub target_name: String,
    pub site: String,
    pub supervisors: Vec<String>,
    pub properties: BTreeMap<String, String>,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<String>,
}

// ── Devices ────────────────────────────────────────────────────────────

/// A device owned by a person.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub device_type: String,
    #[serde(default)]
    pub email_address: Option<String>,
}

/// Payload for `POST /devices` creating an email device.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmailDevice {
    pub name: String,
    pub owner: String,
    pub device_type: String,
    pub recipient_type: String,
    pub default_device: bool,
    pub email_address: String,
}

impl NewEmailDevice {
    /// A default email device for `owner`.
    #[must_use]
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        device_type: impl Into<String>,
        email_address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            device_type: device_type.into(),
            recipient_type: "DEVICE".to_string(),
            default_device: true,
            email_address: email_address.into(),
        }
    }
}

// ── Groups ─────────────────────────────────────────────────────────────

/// A group as held by the directory, with supervisors embedded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub target_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub site: Option<Reference>,
    #[serde(default)]
    pub observed_by_all: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub supervisors: Page<Reference>,
}

impl Group {
    /// Id of the site this group belongs to.
    #[must_use]
    pub fn site_id(&self) -> Option<&str> {
        self.site.as_ref().map(|s| s.id.as_str())
    }

    /// Ids of the group's supervisors.
    pub fn supervisor_ids(&self) -> impl Iterator<Item = &str> {
        self.supervisors.data.iter().map(|s| s.id.as_str())
    }
}

/// Payload for `POST /groups`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGroup {
    pub target_name: String,
    pub description: String,
    pub site: String,
    pub supervisors: Vec<String>,
    pub observed_by_all: bool,
}

/// One entry of `GET /groups/{id}/members`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupMember {
    #[serde(default)]
    pub group: Option<Reference>,
    pub member: Reference,
}

/// Response of `GET /groups/{id}/members`.
pub type GroupMemberList = Page<GroupMember>;

/// Recipient reference used when adding roster members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub id: String,
    #[serde(default)]
    pub recipient_type: Option<String>,
}

/// Payload for `POST /groups/{name}/shifts/{shift}/members`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRosterMember {
    pub recipient: Recipient,
}

impl NewRosterMember {
    /// Add a person by id.
    #[must_use]
    pub fn person(id: impl Into<String>) -> Self {
        Self {
            recipient: Recipient {
                id: id.into(),
                recipient_type: Some("PERSON".to_string()),
            },
        }
    }
}

/// Response of a successful roster add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterMember {
    pub recipient: Recipient,
}
