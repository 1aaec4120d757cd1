//! Shared test fixtures: an in-memory directory and workbook builders.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, Once};

use async_trait::async_trait;
use propsync_directory::{
    Device, DirectoryClient, DirectoryError, DirectoryResult, Group, NewEmailDevice, NewGroup,
    NewPerson, NewSite, Page, Person, Recipient, Reference, Role, RosterMember, Site,
};
use propsync_reconcile::EngineConfig;
use propsync_sheet::{AdminRecord, Environment, GroupRecord, RemoteIds, SiteRecord};

static INIT: Once = Once::new();

/// Route engine logs to the test harness output.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("propsync_reconcile=debug,propsync_directory=debug")
            .with_test_writer()
            .try_init();
    });
}

#[derive(Default)]
struct State {
    sites: HashMap<String, Site>,
    people: HashMap<String, Person>,
    groups: HashMap<String, Group>,
    members: HashMap<String, Vec<String>>,
    devices: Vec<NewEmailDevice>,
    created_people: Vec<NewPerson>,
    created_groups: Vec<NewGroup>,
    calls: Vec<String>,
    failing: HashSet<String>,
    next_id: u32,
}

impl State {
    fn id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

/// In-memory [`DirectoryClient`]. Every call is logged as `op:key`; any such
/// string registered with [`FakeDirectory::fail`] fails with HTTP 500, and
/// `transport:op:key` fails as unreachable.
#[derive(Default)]
pub struct FakeDirectory {
    state: Mutex<State>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_site(self, site: Site) -> Self {
        self.state
            .lock()
            .unwrap()
            .sites
            .insert(site.name.clone(), site);
        self
    }

    pub fn with_person(self, person: Person) -> Self {
        self.state
            .lock()
            .unwrap()
            .people
            .insert(person.target_name.clone(), person);
        self
    }

    pub fn with_group(self, group: Group, members: &[&str]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.members.insert(
                group.id.clone(),
                members.iter().map(|m| (*m).to_string()).collect(),
            );
            state.groups.insert(group.target_name.clone(), group);
        }
        self
    }

    /// Make `op:key` fail with a remote error.
    pub fn fail(self, call: &str) -> Self {
        self.state.lock().unwrap().failing.insert(call.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn devices(&self) -> Vec<NewEmailDevice> {
        self.state.lock().unwrap().devices.clone()
    }

    pub fn created_people(&self) -> Vec<NewPerson> {
        self.state.lock().unwrap().created_people.clone()
    }

    pub fn created_groups(&self) -> Vec<NewGroup> {
        self.state.lock().unwrap().created_groups.clone()
    }

    pub fn members_of(&self, group_id: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .members
            .get(group_id)
            .cloned()
            .unwrap_or_default()
    }

    fn record(&self, call: String) -> DirectoryResult<()> {
        let mut state = self.state.lock().unwrap();
        let transport = format!("transport:{call}");
        let failing = state.failing.contains(&call);
        let unreachable = state.failing.contains(&transport);
        state.calls.push(call.clone());
        if unreachable {
            return Err(DirectoryError::Transport(format!("{call}: connection refused")));
        }
        if failing {
            return Err(DirectoryError::Remote {
                status: 500,
                detail: format!("code: 500, reason: Internal Server Error, message: {call}"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DirectoryClient for FakeDirectory {
    async fn find_site(&self, name: &str) -> DirectoryResult<Option<Site>> {
        self.record(format!("find_site:{name}"))?;
        Ok(self.state.lock().unwrap().sites.get(name).cloned())
    }

    async fn create_site(&self, site: &NewSite) -> DirectoryResult<Site> {
        self.record(format!("create_site:{}", site.name))?;
        let mut state = self.state.lock().unwrap();
        let created = Site {
            id: state.id("site"),
            name: site.name.clone(),
            address1: site.address1.clone(),
            address2: site.address2.clone().unwrap_or_default(),
            city: site.city.clone(),
            country: site.country.clone(),
            language: site.language.clone(),
            postal_code: site.postal_code.clone(),
            state: site.state.clone(),
            timezone: site.timezone.clone(),
            latitude: site.latitude.as_ref().and_then(serde_json::Value::as_f64),
            longitude: site.longitude.as_ref().and_then(serde_json::Value::as_f64),
        };
        state.sites.insert(created.name.clone(), created.clone());
        Ok(created)
    }

    async fn find_person(&self, target_name: &str) -> DirectoryResult<Option<Person>> {
        self.record(format!("find_person:{target_name}"))?;
        Ok(self.state.lock().unwrap().people.get(target_name).cloned())
    }

    async fn create_person(&self, person: &NewPerson) -> DirectoryResult<Person> {
        self.record(format!("create_person:{}", person.target_name))?;
        let mut state = self.state.lock().unwrap();
        let created = Person {
            id: state.id("person"),
            target_name: person.target_name.clone(),
            first_name: person.first_name.clone(),
            last_name: person.last_name.clone(),
            properties: person
                .properties
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect(),
            roles: page(
                person
                    .roles
                    .iter()
                    .map(|r| Role {
                        id: None,
                        name: r.clone(),
                    })
                    .collect(),
            ),
            supervisors: page(person.supervisors.iter().map(|id| reference(id)).collect()),
        };
        state.created_people.push(person.clone());
        state
            .people
            .insert(created.target_name.clone(), created.clone());
        Ok(created)
    }

    async fn add_device(&self, device: &NewEmailDevice) -> DirectoryResult<Device> {
        self.record(format!("add_device:{}", device.owner))?;
        let mut state = self.state.lock().unwrap();
        state.devices.push(device.clone());
        Ok(Device {
            id: state.id("device"),
            name: device.name.clone(),
            device_type: device.device_type.clone(),
            email_address: Some(device.email_address.clone()),
        })
    }

    async fn find_group(&self, target_name: &str) -> DirectoryResult<Option<Group>> {
        self.record(format!("find_group:{target_name}"))?;
        Ok(self.state.lock().unwrap().groups.get(target_name).cloned())
    }

    async fn create_group(&self, group: &NewGroup) -> DirectoryResult<Group> {
        self.record(format!("create_group:{}", group.target_name))?;
        let mut state = self.state.lock().unwrap();
        let created = Group {
            id: state.id("group"),
            target_name: group.target_name.clone(),
            description: group.description.clone(),
            site: Some(reference(&group.site)),
            observed_by_all: group.observed_by_all,
            supervisors: page(group.supervisors.iter().map(|id| reference(id)).collect()),
        };
        state.created_groups.push(group.clone());
        state.members.insert(created.id.clone(), Vec::new());
        state
            .groups
            .insert(created.target_name.clone(), created.clone());
        Ok(created)
    }

    async fn list_group_members(&self, group_id: &str) -> DirectoryResult<Vec<String>> {
        self.record(format!("list_group_members:{group_id}"))?;
        Ok(self.members_of(group_id))
    }

    async fn add_group_member(
        &self,
        group_target_name: &str,
        shift_name: &str,
        person_id: &str,
    ) -> DirectoryResult<RosterMember> {
        self.record(format!("add_group_member:{group_target_name}:{person_id}"))?;
        assert_eq!(shift_name, "Default Shift");
        let mut state = self.state.lock().unwrap();
        let group_id = state
            .groups
            .get(group_target_name)
            .map(|g| g.id.clone())
            .ok_or_else(|| DirectoryError::NotFound(group_target_name.to_string()))?;
        state
            .members
            .entry(group_id)
            .or_default()
            .push(person_id.to_string());
        Ok(RosterMember {
            recipient: Recipient {
                id: person_id.to_string(),
                recipient_type: Some("PERSON".to_string()),
            },
        })
    }
}

// ── Builders ───────────────────────────────────────────────────────────

pub fn page<T>(data: Vec<T>) -> Page<T> {
    Page {
        count: data.len() as u64,
        total: data.len() as u64,
        data,
    }
}

pub fn reference(id: &str) -> Reference {
    Reference {
        id: id.to_string(),
        name: None,
        target_name: None,
    }
}

pub fn config() -> EngineConfig {
    EngineConfig::new(Environment::NonProduction, "Property Code").with_supervisors(["boss"])
}

pub fn np_ids(id: Option<&str>) -> RemoteIds {
    RemoteIds {
        production: None,
        non_production: id.map(str::to_string),
    }
}

pub fn site_record(name: &str, id: Option<&str>) -> SiteRecord {
    SiteRecord {
        row: 2,
        label: name.chars().take(3).collect::<String>().to_uppercase(),
        ids: np_ids(id),
        name: name.to_string(),
        address1: "1 Rue de Rivoli".to_string(),
        address2: None,
        city: name.to_string(),
        country: "France".to_string(),
        language: "FR".to_string(),
        postal_code: "75001".to_string(),
        state: "IDF".to_string(),
        timezone: "Europe/Paris".to_string(),
        latitude: None,
        longitude: None,
        extra: Vec::new(),
    }
}

/// The directory-side twin of [`site_record`].
pub fn remote_site(name: &str, id: &str) -> Site {
    Site {
        id: id.to_string(),
        name: name.to_string(),
        address1: "1 Rue de Rivoli".to_string(),
        address2: String::new(),
        city: name.to_string(),
        country: "France".to_string(),
        language: "FR".to_string(),
        postal_code: "75001".to_string(),
        state: "IDF".to_string(),
        timezone: "Europe/Paris".to_string(),
        latitude: Some(48.86),
        longitude: Some(2.35),
    }
}

pub fn admin_record(target: &str, site: &str, roles: &[&str], id: Option<&str>) -> AdminRecord {
    AdminRecord {
        row: 2,
        property_value: "PAR".to_string(),
        ids: np_ids(id),
        target_name: target.to_string(),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        roles: roles.iter().map(|r| (*r).to_string()).collect(),
        site_name: site.to_string(),
        email: format!("{target}@example.com"),
        extra: Vec::new(),
    }
}

/// A directory person matching [`admin_record`] apart from the given roles.
pub fn remote_person(target: &str, id: &str, roles: &[&str]) -> Person {
    Person {
        id: id.to_string(),
        target_name: target.to_string(),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        properties: [(
            "Property Code".to_string(),
            serde_json::Value::String("PAR".to_string()),
        )]
        .into_iter()
        .collect(),
        roles: page(
            roles
                .iter()
                .map(|r| Role {
                    id: None,
                    name: (*r).to_string(),
                })
                .collect(),
        ),
        supervisors: Page::default(),
    }
}

pub fn group_record(target: &str, site: &str, id: Option<&str>) -> GroupRecord {
    GroupRecord {
        row: 2,
        label: "G".to_string(),
        ids: np_ids(id),
        target_name: target.to_string(),
        site_name: site.to_string(),
        extra: Vec::new(),
    }
}

pub fn remote_group(target: &str, id: &str, site_id: &str, supervisors: &[&str]) -> Group {
    Group {
        id: id.to_string(),
        target_name: target.to_string(),
        description: String::new(),
        site: Some(reference(site_id)),
        observed_by_all: false,
        supervisors: page(supervisors.iter().map(|s| reference(s)).collect()),
    }
}
