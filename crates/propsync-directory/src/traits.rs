//! The directory capability consumed by the reconciliation engine.

use async_trait::async_trait;

use crate::error::DirectoryResult;
use crate::models::{
    Device, Group, NewEmailDevice, NewGroup, NewPerson, NewSite, Person, RosterMember, Site,
};

/// Lookups and creations against the remote directory.
///
/// Lookups return `Ok(None)` when the entity does not exist. Every other
/// failure is an `Err`; callers decide whether that aborts anything.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Find a site by its name.
    async fn find_site(&self, name: &str) -> DirectoryResult<Option<Site>>;

    /// Create a site.
    async fn create_site(&self, site: &NewSite) -> DirectoryResult<Site>;

    /// Find a person by target name, with roles and supervisors embedded.
    async fn find_person(&self, target_name: &str) -> DirectoryResult<Option<Person>>;

    /// Create a person.
    async fn create_person(&self, person: &NewPerson) -> DirectoryResult<Person>;

    /// Create a device for an existing person.
    async fn add_device(&self, device: &NewEmailDevice) -> DirectoryResult<Device>;

    /// Find a group by target name, with supervisors embedded.
    async fn find_group(&self, target_name: &str) -> DirectoryResult<Option<Group>>;

    /// Create a group.
    async fn create_group(&self, group: &NewGroup) -> DirectoryResult<Group>;

    /// Ids of the members of a group.
    async fn list_group_members(&self, group_id: &str) -> DirectoryResult<Vec<String>>;

    /// Add a person to a shift of a group's roster.
    async fn add_group_member(
        &self,
        group_target_name: &str,
        shift_name: &str,
        person_id: &str,
    ) -> DirectoryResult<RosterMember>;
}
